//! Scout - find cheaper players with the same playing style
//!
//! Loads the clustered dataset and the fitted model once, runs one query and
//! prints the result as text or JSON.

use anyhow::Context;
use clap::Parser;
use scout::{
    catalog::load_catalog,
    config::ScoutConfig,
    engine::{AlternativesReport, GroupSummary, LabelAudit},
    logging, ArchetypeTable, Entity, ModelBundle, QualityMetric, SimilarityEngine,
};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Find cheaper players in the same style cluster
    Alternatives {
        /// Reference player name
        name: String,
        /// Maximum number of alternatives
        #[arg(long)]
        max_results: Option<usize>,
        /// Alternatives must cost less than this fraction of the reference value
        #[arg(long)]
        price_ratio: Option<f64>,
        /// Ranking metric: "overall" or an attribute name
        #[arg(long)]
        rank_by: Option<QualityMetric>,
    },
    /// Predict the archetype of a player from raw ratings
    Classify {
        /// Ratings as attribute=value, e.g. pace=88 shooting=75
        #[arg(required = true, value_parser = parse_rating)]
        ratings: Vec<(String, f64)>,
    },
    /// Mean attributes per archetype
    Summary,
    /// Most valuable players in the catalog
    Stars {
        #[arg(long, default_value_t = 500)]
        limit: usize,
    },
    /// Check stored cluster labels against the loaded model
    Audit,
}

#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(version)]
#[command(about = "Find statistically similar, cheaper players within playing-style clusters", long_about = None)]
struct Args {
    /// Configuration file path (overrides defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog CSV (overrides config)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Model file, .json export or snapshot (overrides config)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

fn parse_rating(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected attribute=value, got '{}'", s))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("'{}' is not a number", value))?;
    Ok((name.trim().to_string(), value))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ScoutConfig::load(args.config.as_deref())?;
    if let Some(path) = args.catalog {
        config.catalog_path = path;
    }
    if let Some(path) = args.model {
        config.model_path = path;
    }
    if let Some(path) = args.log_file {
        config.log_file = Some(path);
    }

    logging::init_logging(args.verbose || config.debug, config.log_file.as_deref())?;

    let engine = bootstrap(&config)?;

    match args.command {
        Command::Alternatives {
            name,
            max_results,
            price_ratio,
            rank_by,
        } => {
            let mut query = config.search.clone();
            if let Some(max) = max_results {
                query.max_results = max;
            }
            if let Some(ratio) = price_ratio {
                query.price_ratio_ceiling = ratio;
            }
            if let Some(metric) = rank_by {
                query.rank_by = metric;
            }

            let report = engine.alternatives_report(&name, &query)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, engine.archetypes(), query.price_ratio_ceiling);
            }
        }
        Command::Classify { ratings } => {
            let archetype = engine.classify_named(ratings.iter().map(|(n, v)| (n.as_str(), *v)))?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&archetype)?);
            } else {
                println!("Result: {} (cluster {})", archetype.name, archetype.label);
            }
        }
        Command::Summary => {
            let summary = engine.summarize();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary, engine.archetypes(), engine.features().names());
            }
        }
        Command::Stars { limit } => {
            let stars = engine.catalog().top_by_value(limit);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&stars)?);
            } else {
                for (rank, player) in stars.iter().enumerate() {
                    println!("{:>4}. {}", rank + 1, describe(player));
                }
            }
        }
        Command::Audit => {
            let audit = engine.audit_labels()?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&audit)?);
            } else {
                print_audit(&audit);
            }
        }
    }

    Ok(())
}

/// Load model and catalog, then bind them
fn bootstrap(config: &ScoutConfig) -> anyhow::Result<SimilarityEngine> {
    let model = ModelBundle::load(&config.model_path)
        .with_context(|| format!("Failed to load model from {:?}", config.model_path))?
        .with_input_range(config.input_range);

    let catalog = load_catalog(&config.catalog_path, &config.columns, model.features())
        .with_context(|| format!("Failed to load catalog from {:?}", config.catalog_path))?;

    Ok(SimilarityEngine::new(catalog, model, config.archetypes.clone())?)
}

/// Thousands-separated whole euros
fn format_eur(amount: f64) -> String {
    if !amount.is_finite() {
        return "n/a".to_string();
    }
    let whole = format!("{:.0}", amount.abs());
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0.0 {
        format!("-€{}", grouped)
    } else {
        format!("€{}", grouped)
    }
}

fn describe(player: &Entity) -> String {
    let value = player
        .market_value
        .map(format_eur)
        .unwrap_or_else(|| "n/a".to_string());
    format!("{} (Overall: {}) - Value: {}", player.name, player.overall, value)
}

fn print_report(report: &AlternativesReport, archetypes: &ArchetypeTable, ratio: f64) {
    let reference = &report.reference;
    let archetype = archetypes.display_name(reference.group_label);

    println!("{} belongs to {}.", reference.name, archetype);
    println!(
        "Market Value: {} | Wage: {}",
        reference.market_value.map(format_eur).unwrap_or_else(|| "n/a".to_string()),
        reference.wage.map(format_eur).unwrap_or_else(|| "n/a".to_string())
    );
    println!();

    if report.is_empty() {
        println!(
            "No alternatives found below {:.0}% of {}'s value.",
            ratio * 100.0,
            reference.name
        );
        return;
    }

    println!("Recommended alternatives (under {:.0}% of value):", ratio * 100.0);
    for alt in &report.alternatives {
        println!("  {} (Save {}!)", describe(&alt.entity), format_eur(alt.savings));
    }
}

fn print_summary(
    summary: &BTreeMap<usize, GroupSummary>,
    archetypes: &ArchetypeTable,
    features: &[String],
) {
    print!("{:<45} {:>7}", "Archetype", "Players");
    for name in features {
        print!(" {:>9}", name);
    }
    println!();

    for group in summary.values() {
        print!(
            "{:<45} {:>7}",
            archetypes.display_name(group.label),
            group.members
        );
        for mean in &group.means {
            print!(" {:>9.1}", mean);
        }
        println!();
    }
}

fn print_audit(audit: &LabelAudit) {
    if audit.is_consistent() {
        println!("All {} stored labels match the loaded model.", audit.checked);
        return;
    }

    println!(
        "{} of {} stored labels disagree with the loaded model:",
        audit.mismatched, audit.checked
    );
    for m in &audit.examples {
        println!("  {}: stored {}, model says {}", m.name, m.stored, m.predicted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_eur() {
        assert_eq!(format_eur(0.0), "€0");
        assert_eq!(format_eur(950.0), "€950");
        assert_eq!(format_eur(78_000_000.0), "€78,000,000");
        assert_eq!(format_eur(-1_500.0), "-€1,500");
        assert_eq!(format_eur(f64::NAN), "n/a");
        assert_eq!(format_eur(f64::INFINITY), "n/a");
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("pace=88").unwrap(), ("pace".to_string(), 88.0));
        assert!(parse_rating("pace").is_err());
        assert!(parse_rating("pace=fast").is_err());
    }
}
