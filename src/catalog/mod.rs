//! In-memory player catalog
//!
//! The catalog is built once at startup and never written afterwards. Group
//! labels are read from the dataset at load time; nothing here recomputes
//! them.

pub mod loader;

pub use loader::{load_catalog, CatalogColumns};

use crate::features::{FeatureVector, GroupLabel};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One catalog row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Display name; not guaranteed unique
    pub name: String,
    /// Attribute values in feature-space order
    pub features: FeatureVector,
    /// Market value; missing or non-positive values are not comparable
    pub market_value: Option<f64>,
    pub wage: Option<f64>,
    pub overall: f64,
    pub group_label: GroupLabel,
}

impl Entity {
    pub fn new(
        name: impl Into<String>,
        features: impl Into<FeatureVector>,
        market_value: Option<f64>,
        overall: f64,
        group_label: GroupLabel,
    ) -> Self {
        Self {
            name: name.into(),
            features: features.into(),
            market_value,
            wage: None,
            overall,
            group_label,
        }
    }

    /// Market value usable in economic comparisons (finite and > 0)
    pub fn comparable_value(&self) -> Option<f64> {
        self.market_value.filter(|v| v.is_finite() && *v > 0.0)
    }
}

/// Immutable entity collection with lookup indexes
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entities: Vec<Entity>,
    by_name: HashMap<String, usize>,
    by_group: BTreeMap<GroupLabel, Vec<usize>>,
}

impl Catalog {
    pub fn new(entities: Vec<Entity>) -> Self {
        let mut by_name = HashMap::with_capacity(entities.len());
        let mut by_group: BTreeMap<GroupLabel, Vec<usize>> = BTreeMap::new();

        for (idx, entity) in entities.iter().enumerate() {
            // First in load order wins for duplicate names
            by_name.entry(entity.name.clone()).or_insert(idx);
            by_group.entry(entity.group_label).or_default().push(idx);
        }

        Self {
            entities,
            by_name,
            by_group,
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, idx: usize) -> Option<&Entity> {
        self.entities.get(idx)
    }

    /// Load-order position of the first entity with this name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn find(&self, name: &str) -> Option<&Entity> {
        self.position(name).map(|idx| &self.entities[idx])
    }

    /// Load-order positions of a group's members
    pub fn group_members(&self, label: GroupLabel) -> &[usize] {
        self.by_group.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Labels present in the catalog, ascending
    pub fn labels(&self) -> impl Iterator<Item = GroupLabel> + '_ {
        self.by_group.keys().copied()
    }

    /// Entities by descending market value; non-comparable values go last
    pub fn top_by_value(&self, limit: usize) -> Vec<&Entity> {
        let mut ranked: Vec<(usize, &Entity)> = self.entities.iter().enumerate().collect();
        ranked.sort_by_key(|(idx, e)| {
            (
                std::cmp::Reverse(e.comparable_value().map(OrderedFloat)),
                *idx,
            )
        });
        ranked.into_iter().take(limit).map(|(_, e)| e).collect()
    }
}

impl FromIterator<Entity> for Catalog {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
