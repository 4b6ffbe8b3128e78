use crate::error::{Result, ScoutError};
use crate::features::{FeatureVector, ScaledVector};
use serde::{Deserialize, Serialize};

/// Fitted per-feature standardization: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Build a scaler from fitted parameters.
    /// Every scale must be finite and strictly positive.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Check parameters after deserialization
    pub fn validate(&self) -> Result<()> {
        if self.mean.len() != self.scale.len() {
            return Err(ScoutError::InvalidModel(format!(
                "scaler has {} means but {} scales",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.mean.is_empty() {
            return Err(ScoutError::InvalidModel("scaler has no features".to_string()));
        }
        if let Some(m) = self.mean.iter().find(|m| !m.is_finite()) {
            return Err(ScoutError::InvalidModel(format!("non-finite scaler mean {}", m)));
        }
        if let Some(s) = self.scale.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
            return Err(ScoutError::InvalidModel(format!("invalid scaler scale {}", s)));
        }
        Ok(())
    }

    /// Number of features the scaler was fitted on
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    pub fn transform(&self, raw: &FeatureVector) -> Result<ScaledVector> {
        if raw.len() != self.dim() {
            return Err(ScoutError::SchemaMismatch {
                expected: self.dim(),
                actual: raw.len(),
            });
        }

        let scaled = raw
            .values()
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect();

        Ok(ScaledVector::new(scaled))
    }

    /// Map a standardized vector back to raw attribute space
    pub fn inverse_transform(&self, scaled: &ScaledVector) -> Result<FeatureVector> {
        if scaled.len() != self.dim() {
            return Err(ScoutError::SchemaMismatch {
                expected: self.dim(),
                actual: scaled.len(),
            });
        }

        let raw = scaled
            .values()
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(z, (m, s))| z * s + m)
            .collect();

        Ok(FeatureVector::new(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        let scaler = StandardScaler::new(vec![50.0, 10.0], vec![10.0, 2.0]).unwrap();
        let scaled = scaler.transform(&FeatureVector::new(vec![70.0, 9.0])).unwrap();
        assert!((scaled.values()[0] - 2.0).abs() < 1e-12);
        assert!((scaled.values()[1] + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_transform_arity_mismatch() {
        let scaler = StandardScaler::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
        let err = scaler.transform(&FeatureVector::new(vec![1.0])).unwrap_err();
        assert_eq!(err, ScoutError::SchemaMismatch { expected: 2, actual: 1 });
    }

    #[test]
    fn test_inverse_transform_restores_raw() {
        let scaler = StandardScaler::new(vec![60.0, 40.0], vec![12.5, 8.0]).unwrap();
        let raw = FeatureVector::new(vec![72.0, 31.0]);
        let back = scaler.inverse_transform(&scaler.transform(&raw).unwrap()).unwrap();
        for (a, b) in raw.values().iter().zip(back.values()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(StandardScaler::new(vec![0.0], vec![0.0]).is_err());
        assert!(StandardScaler::new(vec![0.0], vec![-1.0]).is_err());
        assert!(StandardScaler::new(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(StandardScaler::new(vec![], vec![]).is_err());
        assert!(StandardScaler::new(vec![f64::NAN], vec![1.0]).is_err());
    }
}
