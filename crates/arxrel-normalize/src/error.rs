//! Error taxonomy for the normalization pipeline
//!
//! [`RecordError`] is per-record: the record is dropped, logged and counted.
//! [`PipelineError`] is run-level: it aborts the run before anything is written.

use thiserror::Error;

/// Failure to derive a submission date from the revision history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("revision history is empty")]
    EmptyHistory,

    #[error("unparseable revision timestamp {raw:?}")]
    Parse { raw: String },
}

/// Reasons a single input record is excluded from every table.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error(transparent)]
    Date(#[from] DateError),

    #[error("duplicate identifier")]
    DuplicateId,
}

impl RecordError {
    /// Stable short label used for counters and the run manifest.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Json(_) => "malformed_json",
            Self::MissingField(_) => "missing_field",
            Self::Date(DateError::EmptyHistory) => "empty_history",
            Self::Date(DateError::Parse { .. }) => "unparseable_date",
            Self::DuplicateId => "duplicate_id",
        }
    }
}

/// Invariant violations that abort the whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(
        "author ({surname:?}, {first_name:?}) on {arxiv_id} is missing from the author registry"
    )]
    UnknownAuthor {
        arxiv_id: String,
        surname: String,
        first_name: String,
    },

    #[error("unknown category {code:?} on {arxiv_id}: the `{area}` taxonomy needs updating")]
    UnknownCategory {
        arxiv_id: String,
        area: String,
        code: String,
    },

    #[error("{table} references missing key {key:?}")]
    DanglingKey { table: &'static str, key: String },

    #[error("no category taxonomy for area {0:?}")]
    UnsupportedArea(String),
}
