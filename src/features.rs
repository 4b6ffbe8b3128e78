//! Feature space definitions
//!
//! The feature space is the ordered list of numeric attributes the scaler and
//! the cluster assigner were fitted on. Raw vectors, scaled vectors and catalog
//! rows all follow this order.

use crate::error::{Result, ScoutError};
use serde::{Deserialize, Serialize};

/// Cluster identifier produced by the fitted partitioning model
pub type GroupLabel = usize;

/// Attributes used by the reference player-style model
pub const DEFAULT_FEATURES: [&str; 6] = [
    "pace",
    "shooting",
    "passing",
    "dribbling",
    "defending",
    "physic",
];

/// Accepted bounds for raw attribute values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputRange {
    pub min: f64,
    pub max: f64,
}

impl Default for InputRange {
    fn default() -> Self {
        // Ratings are on a 0-100 scale
        Self { min: 0.0, max: 100.0 }
    }
}

impl InputRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Ordered schema of numeric attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpace {
    names: Vec<String>,
    #[serde(default)]
    range: InputRange,
}

impl FeatureSpace {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            range: InputRange::default(),
        }
    }

    pub fn with_range(mut self, range: InputRange) -> Self {
        self.range = range;
        self
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn range(&self) -> InputRange {
        self.range
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of an attribute in the schema
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Check arity and range of a raw vector.
    ///
    /// A wrong number of values is a `SchemaMismatch`; non-finite or
    /// out-of-range values are `InvalidInput`.
    pub fn validate(&self, raw: &FeatureVector) -> Result<()> {
        if raw.len() != self.len() {
            return Err(ScoutError::SchemaMismatch {
                expected: self.len(),
                actual: raw.len(),
            });
        }

        for (name, value) in self.names.iter().zip(raw.values()) {
            if !value.is_finite() {
                return Err(ScoutError::InvalidInput(format!(
                    "{} must be a finite number",
                    name
                )));
            }
            if !self.range.contains(*value) {
                return Err(ScoutError::InvalidInput(format!(
                    "{} = {} is outside {}..={}",
                    name, value, self.range.min, self.range.max
                )));
            }
        }

        Ok(())
    }

    /// Build a vector in schema order from `(name, value)` pairs given in any order
    pub fn vector_from_named<'a>(
        &self,
        pairs: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Result<FeatureVector> {
        let mut slots: Vec<Option<f64>> = vec![None; self.len()];

        for (name, value) in pairs {
            let idx = self.index_of(name).ok_or_else(|| {
                ScoutError::InvalidInput(format!("unknown attribute '{}'", name))
            })?;
            if slots[idx].replace(value).is_some() {
                return Err(ScoutError::InvalidInput(format!(
                    "attribute '{}' given more than once",
                    name
                )));
            }
        }

        let missing: Vec<&str> = self
            .names
            .iter()
            .zip(&slots)
            .filter(|(_, slot)| slot.is_none())
            .map(|(name, _)| name.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(ScoutError::InvalidInput(format!(
                "missing attributes: {}",
                missing.join(", ")
            )));
        }

        Ok(FeatureVector::new(slots.into_iter().flatten().collect()))
    }
}

impl Default for FeatureSpace {
    fn default() -> Self {
        Self::new(DEFAULT_FEATURES)
    }
}

/// Raw attribute values in feature-space order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Standardized values ready for the cluster assigner
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledVector(Vec<f64>);

impl ScaledVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_wrong_arity() {
        let space = FeatureSpace::default();
        let raw = FeatureVector::new(vec![50.0; 5]);
        assert_eq!(
            space.validate(&raw),
            Err(ScoutError::SchemaMismatch { expected: 6, actual: 5 })
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range_and_nan() {
        let space = FeatureSpace::default();
        let mut values = vec![50.0; 6];
        values[2] = 101.0;
        assert!(space.validate(&FeatureVector::new(values.clone())).is_err());

        values[2] = f64::NAN;
        assert!(space.validate(&FeatureVector::new(values)).is_err());

        assert!(space.validate(&FeatureVector::new(vec![0.0, 100.0, 1.0, 2.0, 3.0, 4.0])).is_ok());
    }

    #[test]
    fn test_vector_from_named_any_order() {
        let space = FeatureSpace::new(["a", "b", "c"]);
        let v = space
            .vector_from_named([("c", 3.0), ("a", 1.0), ("b", 2.0)])
            .unwrap();
        assert_eq!(v.values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_vector_from_named_errors() {
        let space = FeatureSpace::new(["a", "b"]);
        assert!(space.vector_from_named([("a", 1.0)]).is_err());
        assert!(space.vector_from_named([("a", 1.0), ("b", 2.0), ("z", 0.0)]).is_err());
        assert!(space.vector_from_named([("a", 1.0), ("a", 2.0), ("b", 0.0)]).is_err());
    }
}
