//! Error types for the reduction pipeline.

use thiserror::Error;

use crate::data::WorkspaceError;

/// Boxed error returned by a failing step operation.
pub type StepFailure = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while orchestrating a reduction run.
///
/// All variants except [`ReductionError::Workspace`] carry the role name the
/// failure occurred under, so a caller can tell which pipeline stage broke.
/// Every variant is fatal to the enclosing run; there is no retry and no
/// rollback of already-mutated workspaces.
#[derive(Debug, Error)]
pub enum ReductionError {
    /// A required role is missing from the configuration.
    #[error("reduction not set up properly: missing {role}")]
    MissingRole { role: String },

    /// A configured role names an operation that is not registered.
    #[error("no operation named `{operation}` registered for {role}")]
    UnknownOperation { role: String, operation: String },

    /// A resolved step failed during execution.
    #[error("step {role} (`{operation}`) failed: {source}")]
    StepFailed {
        role: String,
        operation: String,
        #[source]
        source: StepFailure,
    },

    /// A workspace table operation failed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
}

impl ReductionError {
    /// Check whether this is a configuration error (missing required role).
    pub fn is_configuration(&self) -> bool {
        matches!(self, ReductionError::MissingRole { .. })
    }
}
