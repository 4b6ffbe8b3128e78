//! Bootstrap tests: config, model and catalog files on disk
//!
//! Mirrors what the CLI does before any query runs.

use scout::{
    catalog::load_catalog, config::ScoutConfig, engine::AlternativesQuery, LoadError,
    ModelBundle, ScoutError, SimilarityEngine,
};
use std::path::Path;

const MODEL_JSON: &str = r#"{
    "features": ["pace", "shooting", "passing", "dribbling", "defending", "physic"],
    "scaler": {
        "mean": [68.0, 52.0, 57.0, 62.0, 51.0, 64.0],
        "scale": [10.0, 14.0, 10.0, 10.0, 16.0, 10.0]
    },
    "assigner": {
        "centroids": [
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.6, -0.2, 0.8, 0.6, 2.0, 1.6],
            [0.8, 1.8, 2.0, 2.0, -0.6, 0.6],
            [1.5, 0.8, 0.3, 0.9, -1.2, -0.3],
            [-0.8, -0.6, -0.8, -0.8, -0.5, -1.2]
        ]
    }
}"#;

// Labels match the model above
const CATALOG_CSV: &str = "\
short_name,long_name,value_eur,wage_eur,overall,pace,shooting,passing,dribbling,defending,physic,cluster
L. Messi,Lionel Andrés Messi Cuccittini,78000000,320000,93,76,92,90,95,34,64,2
K. De Bruyne,Kevin De Bruyne,125500000,350000,91,76,86,93,88,64,78,2
B. Fernandes,Bruno Miguel Borges Fernandes,107000000,250000,88,75,87,85,83,66,76,2
N. Fekir,Nabil Fekir,28500000,65000,83,77,81,79,83,40,75,2
Glitchy,Glitchy Player,0,0,82,75,85,84,86,40,65,2
V. van Dijk,Virgil van Dijk,86000000,230000,89,78,60,71,72,91,86,1
Y. Youth,Young Youth,,,55,60,40,45,50,45,50,4
";

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn bootstrap(config: &ScoutConfig) -> SimilarityEngine {
    let model = ModelBundle::load(&config.model_path)
        .unwrap()
        .with_input_range(config.input_range);
    let catalog = load_catalog(&config.catalog_path, &config.columns, model.features()).unwrap();
    SimilarityEngine::new(catalog, model, config.archetypes.clone()).unwrap()
}

#[test]
fn test_bootstrap_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = write(dir.path(), "kmeans_model.json", MODEL_JSON);
    let catalog_path = write(dir.path(), "fifa_cleaned.csv", CATALOG_CSV);

    let mut config = ScoutConfig::default();
    config.model_path = model_path;
    config.catalog_path = catalog_path;
    let config_path = dir.path().join("config.test.json");
    config.save_to_file(&config_path).unwrap();

    let config = ScoutConfig::from_file(&config_path).unwrap();
    let engine = bootstrap(&config);
    assert_eq!(engine.catalog().len(), 7);

    let report = engine.alternatives_report("K. De Bruyne", &config.search).unwrap();
    assert_eq!(
        report.archetype.as_deref(),
        Some("The Elite Technician (Playmaker/Star)")
    );
    let names: Vec<&str> = report
        .alternatives
        .iter()
        .map(|a| a.entity.name.as_str())
        .collect();
    // Messi (78M) is over half of 125.5M; Glitchy has no usable value
    assert_eq!(names, vec!["N. Fekir"]);
    assert_eq!(report.alternatives[0].savings, 125_500_000.0 - 28_500_000.0);

    let audit = engine.audit_labels().unwrap();
    assert!(audit.is_consistent(), "{:?}", audit.examples);
}

#[test]
fn test_classify_slider_input() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ScoutConfig::default();
    config.model_path = write(dir.path(), "model.json", MODEL_JSON);
    config.catalog_path = write(dir.path(), "players.csv", CATALOG_CSV);
    let engine = bootstrap(&config);

    let archetype = engine
        .classify_named([
            ("pace", 92.0),
            ("shooting", 70.0),
            ("passing", 62.0),
            ("dribbling", 72.0),
            ("defending", 32.0),
            ("physic", 61.0),
        ])
        .unwrap();
    assert_eq!(archetype.label, 3);
    assert_eq!(archetype.name, "The Speedster (Attacker/Winger)");
}

#[test]
fn test_snapshot_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = ModelBundle::from_json_str(MODEL_JSON).unwrap();
    let snapshot = dir.path().join("model.bin");

    bundle.save_snapshot(&snapshot).unwrap();
    let restored = ModelBundle::load(&snapshot).unwrap();
    assert_eq!(restored, bundle);
}

#[test]
fn test_missing_model_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModelBundle::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn test_catalog_arity_must_match_model() {
    let model = ModelBundle::from_json_str(MODEL_JSON).unwrap();
    let narrow = ModelBundle::from_json_str(
        r#"{
            "features": ["pace", "defending"],
            "scaler": { "mean": [68.0, 51.0], "scale": [10.0, 16.0] },
            "assigner": { "centroids": [[0.0, 0.0]] }
        }"#,
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let csv = write(dir.path(), "players.csv", CATALOG_CSV);
    let catalog = load_catalog(&csv, &Default::default(), narrow.features()).unwrap();

    let err = SimilarityEngine::new(catalog, model, Default::default()).err().unwrap();
    assert_eq!(err, ScoutError::SchemaMismatch { expected: 6, actual: 2 });
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ScoutConfig::load(Some(&dir.path().join("nope.json"))).is_err());
}

#[test]
fn test_default_query_matches_config_defaults() {
    assert_eq!(ScoutConfig::default().search, AlternativesQuery::default());
}
