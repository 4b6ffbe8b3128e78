//! Fitted model loading
//!
//! A [`ModelBundle`] is the scaler and the cluster assigner together with the
//! feature space they were fitted on. Training happens elsewhere; this module
//! only restores the fitted parameters, either from the JSON export of the
//! training notebook or from a bincode snapshot written by [`ModelBundle::save_snapshot`].
//!
//! JSON layout:
//!
//! ```json
//! {
//!   "features": ["pace", "shooting", "passing", "dribbling", "defending", "physic"],
//!   "scaler": { "mean": [68.2, 52.3, 57.1, 62.4, 51.0, 64.8],
//!               "scale": [10.9, 14.1, 10.2, 9.8, 16.3, 9.6] },
//!   "assigner": { "centroids": [[0.1, -0.3, 0.2, 0.1, 0.4, 0.2], ...] }
//! }
//! ```

pub mod assigner;
pub mod scaler;

pub use assigner::{squared_distance, CentroidAssigner};
pub use scaler::StandardScaler;

use crate::error::{LoadError, Result, ScoutError};
use crate::features::{FeatureSpace, FeatureVector, GroupLabel, InputRange, ScaledVector};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk JSON export of a fitted model
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ModelFile {
    features: Vec<String>,
    scaler: StandardScaler,
    assigner: CentroidAssigner,
}

/// Scaler + assigner + the feature space both were fitted on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    features: FeatureSpace,
    scaler: StandardScaler,
    assigner: CentroidAssigner,
}

impl ModelBundle {
    /// Assemble a bundle, checking that all three parts agree on arity
    pub fn new(
        features: FeatureSpace,
        scaler: StandardScaler,
        assigner: CentroidAssigner,
    ) -> Result<Self> {
        let bundle = Self {
            features,
            scaler,
            assigner,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    fn validate(&self) -> Result<()> {
        self.scaler.validate()?;
        self.assigner.validate()?;

        let expected = self.features.len();
        if expected == 0 {
            return Err(ScoutError::InvalidModel("feature space is empty".to_string()));
        }
        for actual in [self.scaler.dim(), self.assigner.dim()] {
            if actual != expected {
                return Err(ScoutError::SchemaMismatch { expected, actual });
            }
        }
        Ok(())
    }

    /// Parse the JSON export
    pub fn from_json_str(json: &str) -> std::result::Result<Self, LoadError> {
        let file: ModelFile = serde_json::from_str(json)?;
        Ok(Self::new(
            FeatureSpace::new(file.features),
            file.scaler,
            file.assigner,
        )?)
    }

    /// Load the JSON export from disk
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, LoadError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let bundle = Self::from_json_str(&content)?;
        tracing::info!(
            "Loaded model from {:?}: {} features, {} clusters",
            path.as_ref(),
            bundle.features.len(),
            bundle.assigner.num_clusters()
        );
        Ok(bundle)
    }

    /// Serialize to the JSON export layout
    pub fn to_json_string(&self) -> std::result::Result<String, LoadError> {
        let file = ModelFile {
            features: self.features.names().to_vec(),
            scaler: self.scaler.clone(),
            assigner: self.assigner.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Write a bincode snapshot (smaller and faster to load than JSON)
    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), LoadError> {
        let data = bincode::serialize(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn load_snapshot<P: AsRef<Path>>(path: P) -> std::result::Result<Self, LoadError> {
        let data = std::fs::read(path)?;
        let bundle: Self = bincode::deserialize(&data)?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Load by extension: `.json` is the export, anything else a snapshot
    pub fn load<P: AsRef<Path>>(path: P) -> std::result::Result<Self, LoadError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_file(path),
            _ => Self::load_snapshot(path),
        }
    }

    /// Replace the accepted raw input range
    pub fn with_input_range(mut self, range: InputRange) -> Self {
        self.features = self.features.with_range(range);
        self
    }

    pub fn features(&self) -> &FeatureSpace {
        &self.features
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn assigner(&self) -> &CentroidAssigner {
        &self.assigner
    }

    pub fn num_clusters(&self) -> usize {
        self.assigner.num_clusters()
    }

    /// Scale then assign, without input-range validation
    pub fn predict(&self, raw: &FeatureVector) -> Result<GroupLabel> {
        let scaled = self.scaler.transform(raw)?;
        self.assigner.assign(&scaled)
    }

    /// Centroid of a cluster expressed in raw attribute space
    pub fn raw_centroid(&self, label: GroupLabel) -> Option<FeatureVector> {
        let centroid = self.assigner.centroid(label)?;
        self.scaler
            .inverse_transform(&ScaledVector::new(centroid.to_vec()))
            .ok()
    }
}
