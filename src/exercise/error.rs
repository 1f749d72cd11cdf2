use std::error::Error;
use std::fmt;

use crate::document::StoreError;

/// Error type for exercise journal operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExerciseError {
    /// No exercise record with this id.
    NotFound { id: String },
    /// An operation that targets a record was given an empty id.
    MissingId,
    /// The remote call failed. Carries the underlying message verbatim.
    Transport(String),
    /// The collection listener reported an error.
    Subscription(String),
    /// A stored document could not be read as an exercise record.
    Malformed { id: String, message: String },
}

impl ExerciseError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExerciseError::NotFound { .. })
    }
}

impl fmt::Display for ExerciseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseError::NotFound { id } => write!(f, "exercise not found: {}", id),
            ExerciseError::MissingId => write!(f, "exercise id is empty"),
            ExerciseError::Transport(msg) => write!(f, "{}", msg),
            ExerciseError::Subscription(msg) => write!(f, "listen failed: {}", msg),
            ExerciseError::Malformed { id, message } => {
                write!(f, "malformed exercise {}: {}", id, message)
            }
        }
    }
}

impl Error for ExerciseError {}

impl From<StoreError> for ExerciseError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => ExerciseError::NotFound { id },
            other => ExerciseError::Transport(other.to_string()),
        }
    }
}
