//! Structured results handed to the presentation layer

use crate::catalog::Entity;
use crate::features::GroupLabel;
use serde::Serialize;

/// A classified archetype
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Archetype {
    pub label: GroupLabel,
    pub name: String,
}

/// One recommended alternative
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternativeMatch {
    pub entity: Entity,
    /// Reference value minus this entity's value
    pub savings: f64,
}

/// Everything the "cheaper alternative" view shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternativesReport {
    pub reference: Entity,
    /// `None` when the label has no registered name
    pub archetype: Option<String>,
    pub alternatives: Vec<AlternativeMatch>,
}

impl AlternativesReport {
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }
}

/// Per-group descriptive statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub label: GroupLabel,
    pub archetype: Option<String>,
    pub members: usize,
    /// Mean of each attribute, in feature-space order
    pub means: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelMismatch {
    pub name: String,
    pub stored: GroupLabel,
    pub predicted: GroupLabel,
}

/// Stored labels compared against the loaded model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelAudit {
    pub checked: usize,
    pub mismatched: usize,
    /// First few disagreements, in load order
    pub examples: Vec<LabelMismatch>,
}

impl LabelAudit {
    pub fn is_consistent(&self) -> bool {
        self.mismatched == 0
    }
}
