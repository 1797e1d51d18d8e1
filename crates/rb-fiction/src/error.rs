//! Error types for the runtime.

use rb_core::CoreError;
use thiserror::Error;

/// Result type for a single action segment.
pub type ActionResult<T> = Result<T, ActionError>;

/// Why one action segment did nothing.
///
/// These never escape [`crate::Executor::execute`]; they are logged and
/// collected in the returned [`crate::Outcome`].
#[derive(Debug, Error)]
pub enum ActionError {
    /// The segment's verb is not in the vocabulary.
    #[error("unknown verb `{0}`")]
    UnknownVerb(String),

    /// The segment could not be split into a verb and parameters.
    #[error("malformed action: {0}")]
    Malformed(String),

    /// A required parameter is absent.
    #[error("`{verb}` is missing its {name} parameter")]
    MissingParam {
        /// Verb name.
        verb: &'static str,
        /// Parameter description.
        name: &'static str,
    },

    /// A parameter could not be interpreted.
    #[error("`{verb}`: invalid {name} `{value}`")]
    InvalidParam {
        /// Verb name.
        verb: &'static str,
        /// Parameter description.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// A parameter names something the content does not define.
    #[error("unknown {kind} `{id}`")]
    MissingReference {
        /// Kind of thing referenced.
        kind: &'static str,
        /// Referenced id.
        id: String,
    },

    /// The player lacks the items or coin the action needs.
    #[error("{0}")]
    InsufficientResource(String),

    /// The world state refused the change.
    #[error("{0}")]
    Rejected(String),

    /// A store-level rule refused the change.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for session and loading operations.
pub type FictionResult<T> = Result<T, FictionError>;

/// Errors from loading content or state.
#[derive(Debug, Error)]
pub enum FictionError {
    /// The content or state file could not be read or parsed.
    #[error("failed to load: {0}")]
    Load(#[from] CoreError),

    /// The content parsed but failed linting.
    #[error("content has {errors} error(s):\n{report}")]
    InvalidContent {
        /// Number of error diagnostics.
        errors: usize,
        /// Rendered diagnostics.
        report: String,
    },
}
