//! Similarity engine
//!
//! Answers the two scouting questions over already-loaded, immutable state:
//!
//! - **classify**: which archetype does a described player fit?
//! - **find alternatives**: who plays in the same style for a fraction of the price?
//!
//! All queries are synchronous, deterministic and read-only, so a single
//! engine can be shared across threads behind an `Arc`.

pub mod query;
pub mod report;

pub use query::{AlternativesQuery, QualityMetric, DEFAULT_MAX_RESULTS, DEFAULT_PRICE_RATIO_CEILING};
pub use report::{
    AlternativeMatch, AlternativesReport, Archetype, GroupSummary, LabelAudit, LabelMismatch,
};

use crate::archetype::ArchetypeTable;
use crate::catalog::{Catalog, Entity};
use crate::error::{Result, ScoutError};
use crate::features::{FeatureSpace, FeatureVector, GroupLabel};
use crate::model::ModelBundle;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Maximum mismatches kept as examples in a label audit
const AUDIT_EXAMPLE_LIMIT: usize = 10;

/// Ranking key resolved against the feature space
#[derive(Debug, Clone, Copy)]
enum RankKey {
    Overall,
    Feature(usize),
}

impl RankKey {
    fn score(self, entity: &Entity) -> f64 {
        match self {
            Self::Overall => entity.overall,
            Self::Feature(idx) => entity.features.values()[idx],
        }
    }
}

pub struct SimilarityEngine {
    catalog: Catalog,
    model: ModelBundle,
    archetypes: ArchetypeTable,
}

impl SimilarityEngine {
    /// Bind a catalog to the model its labels were produced with.
    ///
    /// Fails with `SchemaMismatch` if any entity's attributes do not match
    /// the model's feature space, and with `InvalidInput` if an entity
    /// carries a non-finite attribute or overall rating (those cannot be
    /// ranked). Labels outside the model's range and unnamed labels are
    /// logged, not rejected.
    pub fn new(catalog: Catalog, model: ModelBundle, archetypes: ArchetypeTable) -> Result<Self> {
        let expected = model.features().len();
        if let Some(bad) = catalog.entities().iter().find(|e| e.features.len() != expected) {
            return Err(ScoutError::SchemaMismatch {
                expected,
                actual: bad.features.len(),
            });
        }
        if let Some(bad) = catalog
            .entities()
            .iter()
            .find(|e| !e.overall.is_finite() || e.features.values().iter().any(|v| !v.is_finite()))
        {
            return Err(ScoutError::InvalidInput(format!(
                "{} has a non-finite rating",
                bad.name
            )));
        }

        let k = model.num_clusters();
        let out_of_range: Vec<GroupLabel> = catalog.labels().filter(|l| *l >= k).collect();
        if !out_of_range.is_empty() {
            tracing::warn!(
                "Catalog labels {:?} are outside the model's {} clusters; the dataset and model may be from different fits",
                out_of_range,
                k
            );
        }

        let unnamed = archetypes.missing_labels(k);
        if !unnamed.is_empty() {
            tracing::warn!("No archetype name registered for labels {:?}", unnamed);
        }

        tracing::info!(
            "Similarity engine ready: {} entities, {} clusters, {} archetypes",
            catalog.len(),
            k,
            archetypes.len()
        );

        Ok(Self {
            catalog,
            model,
            archetypes,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn model(&self) -> &ModelBundle {
        &self.model
    }

    pub fn features(&self) -> &FeatureSpace {
        self.model.features()
    }

    pub fn archetypes(&self) -> &ArchetypeTable {
        &self.archetypes
    }

    /// Archetype for a raw attribute vector in feature-space order
    pub fn classify(&self, raw: &FeatureVector) -> Result<Archetype> {
        self.features().validate(raw)?;

        let scaled = self.model.scaler().transform(raw)?;
        let label = self.model.assigner().assign(&scaled)?;
        let name = self.archetypes.resolve(label)?;

        tracing::debug!("Classified {:?} as cluster {} ({})", raw.values(), label, name);

        Ok(Archetype {
            label,
            name: name.to_string(),
        })
    }

    /// Archetype for `(attribute, value)` pairs in any order
    pub fn classify_named<'a>(
        &self,
        pairs: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Result<Archetype> {
        let raw = self.features().vector_from_named(pairs)?;
        self.classify(&raw)
    }

    fn rank_key(&self, metric: &QualityMetric) -> Result<RankKey> {
        match metric {
            QualityMetric::Overall => Ok(RankKey::Overall),
            QualityMetric::Attribute(name) => self
                .features()
                .index_of(name)
                .map(RankKey::Feature)
                .ok_or_else(|| {
                    ScoutError::InvalidInput(format!("cannot rank by unknown attribute '{}'", name))
                }),
        }
    }

    fn resolve_reference(&self, reference: &str) -> Result<&Entity> {
        self.catalog
            .find(reference)
            .ok_or_else(|| ScoutError::NotFound(reference.to_string()))
    }

    /// Cheaper players from the reference's cluster, best first.
    ///
    /// Candidates share the reference's label, have a positive market value
    /// strictly below `reference value * price_ratio_ceiling`, and a different
    /// name. Ordering is `rank_by` descending, then value ascending, then load
    /// order. An empty result means no alternatives exist.
    pub fn find_alternatives(&self, reference: &str, query: &AlternativesQuery) -> Result<Vec<&Entity>> {
        query.validate()?;
        let key = self.rank_key(&query.rank_by)?;
        let reference = self.resolve_reference(reference)?;

        let Some(reference_value) = reference.comparable_value() else {
            tracing::debug!("{} has no comparable market value; no alternatives", reference.name);
            return Ok(Vec::new());
        };
        let ceiling = reference_value * query.price_ratio_ceiling;

        let mut candidates: Vec<(usize, &Entity, f64)> = self
            .catalog
            .group_members(reference.group_label)
            .iter()
            .filter_map(|&idx| {
                let entity = self.catalog.get(idx)?;
                if entity.name == reference.name {
                    return None;
                }
                let value = entity.comparable_value()?;
                (value < ceiling).then_some((idx, entity, value))
            })
            .collect();

        candidates.sort_by_key(|(idx, entity, value)| {
            (Reverse(OrderedFloat(key.score(entity))), OrderedFloat(*value), *idx)
        });

        tracing::debug!(
            "{} candidates for {} in cluster {} below {:.0}",
            candidates.len(),
            reference.name,
            reference.group_label,
            ceiling
        );

        Ok(candidates
            .into_iter()
            .take(query.max_results)
            .map(|(_, entity, _)| entity)
            .collect())
    }

    /// Alternatives plus the reference context and savings per match
    pub fn alternatives_report(&self, reference: &str, query: &AlternativesQuery) -> Result<AlternativesReport> {
        let alternatives = self.find_alternatives(reference, query)?;
        let reference = self.resolve_reference(reference)?;
        let reference_value = reference.comparable_value().unwrap_or_default();

        Ok(AlternativesReport {
            reference: reference.clone(),
            archetype: self.archetypes.get(reference.group_label).map(str::to_string),
            alternatives: alternatives
                .into_iter()
                .map(|entity| AlternativeMatch {
                    savings: reference_value - entity.comparable_value().unwrap_or_default(),
                    entity: entity.clone(),
                })
                .collect(),
        })
    }

    /// Mean attribute vector for every label present in the catalog
    pub fn summarize(&self) -> BTreeMap<GroupLabel, GroupSummary> {
        let dim = self.features().len();

        self.catalog
            .labels()
            .map(|label| {
                let members = self.catalog.group_members(label);
                let mut sums = vec![0.0; dim];
                for entity in members.iter().filter_map(|&idx| self.catalog.get(idx)) {
                    for (sum, value) in sums.iter_mut().zip(entity.features.values()) {
                        *sum += value;
                    }
                }
                let n = members.len() as f64;
                let summary = GroupSummary {
                    label,
                    archetype: self.archetypes.get(label).map(str::to_string),
                    members: members.len(),
                    means: sums.into_iter().map(|s| s / n).collect(),
                };
                (label, summary)
            })
            .collect()
    }

    /// Recompute every label with the loaded model and count disagreements
    pub fn audit_labels(&self) -> Result<LabelAudit> {
        let mut audit = LabelAudit::default();

        for entity in self.catalog.entities() {
            let predicted = self.model.predict(&entity.features)?;
            audit.checked += 1;
            if predicted != entity.group_label {
                audit.mismatched += 1;
                if audit.examples.len() < AUDIT_EXAMPLE_LIMIT {
                    audit.examples.push(LabelMismatch {
                        name: entity.name.clone(),
                        stored: entity.group_label,
                        predicted,
                    });
                }
            }
        }

        if !audit.is_consistent() {
            tracing::warn!(
                "{} of {} stored labels disagree with the loaded model",
                audit.mismatched,
                audit.checked
            );
        }

        Ok(audit)
    }
}
