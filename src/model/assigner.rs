use crate::error::{Result, ScoutError};
use crate::features::{GroupLabel, ScaledVector};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Squared Euclidean distance
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Fitted k-means decision rule: a vector belongs to its nearest centroid.
/// Label `i` is the index of centroid `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentroidAssigner {
    centroids: Vec<Vec<f64>>,
}

impl CentroidAssigner {
    pub fn new(centroids: Vec<Vec<f64>>) -> Result<Self> {
        let assigner = Self { centroids };
        assigner.validate()?;
        Ok(assigner)
    }

    /// Check parameters after deserialization
    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.centroids.first() else {
            return Err(ScoutError::InvalidModel("assigner has no centroids".to_string()));
        };
        let dim = first.len();
        if dim == 0 {
            return Err(ScoutError::InvalidModel("centroids have no dimensions".to_string()));
        }
        for (label, centroid) in self.centroids.iter().enumerate() {
            if centroid.len() != dim {
                return Err(ScoutError::InvalidModel(format!(
                    "centroid {} has {} dimensions, expected {}",
                    label,
                    centroid.len(),
                    dim
                )));
            }
            if centroid.iter().any(|c| !c.is_finite()) {
                return Err(ScoutError::InvalidModel(format!(
                    "centroid {} has non-finite coordinates",
                    label
                )));
            }
        }
        Ok(())
    }

    /// Number of clusters (K)
    pub fn num_clusters(&self) -> usize {
        self.centroids.len()
    }

    pub fn dim(&self) -> usize {
        self.centroids.first().map(Vec::len).unwrap_or(0)
    }

    pub fn centroid(&self, label: GroupLabel) -> Option<&[f64]> {
        self.centroids.get(label).map(Vec::as_slice)
    }

    /// Nearest centroid; exact ties go to the lowest label.
    pub fn assign(&self, scaled: &ScaledVector) -> Result<GroupLabel> {
        if scaled.len() != self.dim() {
            return Err(ScoutError::SchemaMismatch {
                expected: self.dim(),
                actual: scaled.len(),
            });
        }

        // min_by_key keeps the first minimum
        self.centroids
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| OrderedFloat(squared_distance(c, scaled.values())))
            .map(|(label, _)| label)
            .ok_or_else(|| ScoutError::InvalidModel("assigner has no centroids".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assigner() -> CentroidAssigner {
        CentroidAssigner::new(vec![vec![0.0, 0.0], vec![5.0, 5.0], vec![-5.0, 5.0]]).unwrap()
    }

    #[test]
    fn test_assign_nearest() {
        let a = assigner();
        assert_eq!(a.assign(&ScaledVector::new(vec![0.2, -0.1])).unwrap(), 0);
        assert_eq!(a.assign(&ScaledVector::new(vec![4.0, 6.0])).unwrap(), 1);
        assert_eq!(a.assign(&ScaledVector::new(vec![-4.0, 4.0])).unwrap(), 2);
    }

    #[test]
    fn test_assign_far_outlier_still_gets_label() {
        let a = assigner();
        assert_eq!(a.assign(&ScaledVector::new(vec![1e6, 1e6])).unwrap(), 1);
    }

    #[test]
    fn test_tie_goes_to_lowest_label() {
        let a = CentroidAssigner::new(vec![vec![-1.0], vec![1.0]]).unwrap();
        assert_eq!(a.assign(&ScaledVector::new(vec![0.0])).unwrap(), 0);
    }

    #[test]
    fn test_arity_mismatch() {
        let err = assigner().assign(&ScaledVector::new(vec![0.0])).unwrap_err();
        assert_eq!(err, ScoutError::SchemaMismatch { expected: 2, actual: 1 });
    }

    #[test]
    fn test_rejects_ragged_centroids() {
        assert!(CentroidAssigner::new(vec![vec![0.0, 0.0], vec![1.0]]).is_err());
        assert!(CentroidAssigner::new(vec![]).is_err());
    }
}
