//! Error kinds surfaced by the scouting core

use crate::features::GroupLabel;
use thiserror::Error;

/// Errors produced by the classification and alternatives queries.
///
/// An empty alternatives list is not an error; callers render it as
/// "no alternatives found".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoutError {
    /// Feature arity or order does not match the fitted model.
    #[error("Schema mismatch: expected {expected} features, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    /// Missing, non-finite or out-of-range caller input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Reference entity is not in the catalog.
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// The archetype table has no name for a label the model produced.
    /// This is a stale configuration, never a user error.
    #[error("No archetype registered for cluster label {0}")]
    UnknownArchetype(GroupLabel),

    /// Fitted parameters that cannot reproduce a transform or decision rule.
    #[error("Invalid model: {0}")]
    InvalidModel(String),
}

pub type Result<T> = std::result::Result<T, ScoutError>;

/// Errors raised while bootstrapping the catalog or the fitted model from disk
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse model JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to decode model snapshot: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("Missing column '{0}' in catalog header")]
    MissingColumn(String),

    #[error("Invalid record at row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

    #[error(transparent)]
    Model(#[from] ScoutError),
}
