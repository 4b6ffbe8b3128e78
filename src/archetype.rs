//! Archetype names bound to cluster labels
//!
//! The table is static configuration, not derived from data. Every label the
//! assigner can produce needs an entry; a missing entry means the table is
//! stale relative to the loaded model.

use crate::error::{Result, ScoutError};
use crate::features::GroupLabel;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

lazy_static! {
    /// Names for the five-cluster player-style model
    static ref DEFAULT_ARCHETYPES: BTreeMap<GroupLabel, String> = BTreeMap::from([
        (0, "The Engine (Balanced Midfielder/Fullback)".to_string()),
        (1, "The Stopper (Center Back)".to_string()),
        (2, "The Elite Technician (Playmaker/Star)".to_string()),
        (3, "The Speedster (Attacker/Winger)".to_string()),
        (4, "The Prospect (Developing/Lower Tier)".to_string()),
    ]);
}

/// Label → human-readable archetype name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchetypeTable(BTreeMap<GroupLabel, String>);

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self(DEFAULT_ARCHETYPES.clone())
    }
}

impl From<BTreeMap<GroupLabel, String>> for ArchetypeTable {
    fn from(map: BTreeMap<GroupLabel, String>) -> Self {
        Self(map)
    }
}

impl FromIterator<(GroupLabel, String)> for ArchetypeTable {
    fn from_iter<I: IntoIterator<Item = (GroupLabel, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl ArchetypeTable {
    pub fn get(&self, label: GroupLabel) -> Option<&str> {
        self.0.get(&label).map(String::as_str)
    }

    /// Strict lookup used by classification
    pub fn resolve(&self, label: GroupLabel) -> Result<&str> {
        self.get(label).ok_or(ScoutError::UnknownArchetype(label))
    }

    /// Name for display, falling back to the numeric label
    pub fn display_name(&self, label: GroupLabel) -> String {
        self.get(label)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Cluster {}", label))
    }

    /// Labels in `0..num_clusters` without a registered name
    pub fn missing_labels(&self, num_clusters: usize) -> Vec<GroupLabel> {
        (0..num_clusters).filter(|l| !self.0.contains_key(l)).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GroupLabel, &str)> {
        self.0.iter().map(|(l, n)| (*l, n.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_covers_five_clusters() {
        let table = ArchetypeTable::default();
        assert_eq!(table.len(), 5);
        assert!(table.missing_labels(5).is_empty());
        assert_eq!(table.missing_labels(6), vec![5]);
    }

    #[test]
    fn test_resolve_unknown_label() {
        let table = ArchetypeTable::default();
        assert_eq!(table.resolve(9), Err(ScoutError::UnknownArchetype(9)));
        assert_eq!(table.display_name(9), "Cluster 9");
        assert_eq!(table.resolve(1).unwrap(), "The Stopper (Center Back)");
    }

    #[test]
    fn test_json_uses_label_keys() {
        let table: ArchetypeTable =
            serde_json::from_str(r#"{"0": "Engine", "3": "Speedster"}"#).unwrap();
        assert_eq!(table.get(3), Some("Speedster"));
        assert_eq!(table.get(1), None);
    }
}
