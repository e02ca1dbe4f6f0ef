//! Generation error taxonomy.
//!
//! All variants are fatal: the pipeline has no partial-success mode, and a
//! failure aborts the run leaving already-written artifacts in place.

use std::path::PathBuf;

/// Errors raised during a generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// Phase 2 resolved a `Record` type whose class was never registered
    /// during phase 1.
    #[error("record type references class `{0}` but no record layout was registered for it")]
    UnregisteredRecord(String),

    /// A field-bearing class is missing from the event snapshot dispatch.
    #[error("object kind `{0}` has no snapshot decode case")]
    MissingSnapshotCase(String),

    /// A default value was requested for a record type. Records are never
    /// defaulted; this is a generator bug, not schema data.
    #[error("cannot produce a default value for record type `{0}`")]
    RecordDefault(String),

    #[error("failed to parse schema: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("failed to render support unit: {0}")]
    Template(#[from] tera::Error),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
