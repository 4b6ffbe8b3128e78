//! Scout - style-cluster scouting engine
//!
//! Scout works on a dataset of players that was partitioned into playing-style
//! clusters by a k-means model fitted offline. Given the loaded dataset, the
//! fitted scaler and the fitted cluster centroids it answers two questions:
//!
//! - **Which archetype does this player fit?** Raw ratings are standardized
//!   and assigned to the nearest centroid.
//! - **Who plays like this star for less?** Players from the same cluster,
//!   worth under a configurable fraction of the star's value, ranked by a
//!   quality metric.
//!
//! # Modules
//!
//! - [`features`] - Ordered attribute schema and vectors
//! - [`model`] - Fitted scaler and nearest-centroid assigner
//! - [`catalog`] - Player dataset and CSV loading
//! - [`archetype`] - Cluster label to archetype names
//! - [`engine`] - Classification, alternatives, summaries
//! - [`config`] - JSON configuration with environment overrides
//!
//! # Example
//!
//! ```rust,no_run
//! use scout::{catalog::load_catalog, config::ScoutConfig, model::ModelBundle, SimilarityEngine};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = ScoutConfig::load(None)?;
//! let model = ModelBundle::load(&config.model_path)?.with_input_range(config.input_range);
//! let catalog = load_catalog(&config.catalog_path, &config.columns, model.features())?;
//! let engine = SimilarityEngine::new(catalog, model, config.archetypes.clone())?;
//!
//! for player in engine.find_alternatives("K. Mbappé", &config.search)? {
//!     println!("{} ({})", player.name, player.overall);
//! }
//! # Ok(())
//! # }
//! ```

pub mod archetype;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod logging;
pub mod model;

pub use archetype::ArchetypeTable;
pub use catalog::{Catalog, Entity};
pub use engine::{AlternativesQuery, QualityMetric, SimilarityEngine};
pub use error::{LoadError, ScoutError};
pub use features::{FeatureSpace, FeatureVector, GroupLabel};
pub use model::ModelBundle;
