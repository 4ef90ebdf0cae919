use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a sidecar file into a [`crate::sidecar::SidecarRecord`].
#[derive(Debug, Error)]
pub enum SidecarError {
    #[error("cannot read sidecar: {0}")]
    Io(#[from] io::Error),
    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("field `{field}` {reason}")]
    Schema { field: &'static str, reason: String },
}

impl SidecarError {
    pub(crate) fn schema(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Schema {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("primary file {} does not exist", .0.display())]
    MissingPrimary(PathBuf),
}

/// Errors that stop a run. Everything else is logged and skipped.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("folder does not exist: {}", .0.display())]
    Traversal(PathBuf),
    #[error("{0}")]
    Argument(String),
    #[error("cannot write report: {0}")]
    Output(#[from] io::Error),
}
