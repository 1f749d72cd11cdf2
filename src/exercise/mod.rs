//! Exercise records and the weight-input coercion rule.

mod error;
mod store;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Document;

pub use error::ExerciseError;
pub use store::ExerciseStore;

/// One logged exercise: a free-text name and one weight per set, in set order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Document)]
#[document(collection = "exercises")]
pub struct ExerciseRecord {
    /// Store-assigned; empty until persisted.
    #[serde(skip)]
    #[document(id)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub weights: Vec<i64>,
}

impl ExerciseRecord {
    /// An unsaved record built from raw form input.
    pub fn from_input<S: AsRef<str>>(name: impl Into<String>, raw_weights: &[S]) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            weights: coerce_weights(raw_weights),
        }
    }

    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn set_count(&self) -> usize {
        self.weights.len()
    }

    pub fn heaviest(&self) -> Option<i64> {
        self.weights.iter().copied().max()
    }

    /// Sum of all set weights.
    pub fn total(&self) -> i64 {
        self.weights.iter().fold(0i64, |acc, w| acc.saturating_add(*w))
    }
}

impl fmt::Display for ExerciseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for (i, weight) in self.weights.iter().enumerate() {
            if i == 0 {
                write!(f, " {}", weight)?;
            } else {
                write!(f, ", {}", weight)?;
            }
        }
        Ok(())
    }
}

/// Parse one weight field. Anything that is not an integer literal becomes 0.
pub fn coerce_weight(raw: &str) -> i64 {
    raw.parse().unwrap_or(0)
}

/// Coerce every weight field, keeping set order.
pub fn coerce_weights<S: AsRef<str>>(raw: &[S]) -> Vec<i64> {
    raw.iter().map(|s| coerce_weight(s.as_ref())).collect()
}
