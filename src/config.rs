//! Journal configuration.

use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const COLLECTION_VAR: &str = "FITNESS_JOURNAL_COLLECTION";
pub const WORKER_VAR: &str = "FITNESS_JOURNAL_WORKER";

/// Settings for an `ExerciseStore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Remote collection holding exercise documents.
    pub collection: String,
    /// Prefix for worker thread names.
    pub worker_name: String,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            collection: "exercises".into(),
            worker_name: "fitness-journal".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "config parse error: {}", msg),
            ConfigError::Invalid(field) => write!(f, "config field `{}` must not be empty", field),
        }
    }
}

impl std::error::Error for ConfigError {}

impl JournalConfig {
    /// Defaults, overridden by `FITNESS_JOURNAL_COLLECTION` and `FITNESS_JOURNAL_WORKER`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(collection) = env::var(COLLECTION_VAR) {
            config.collection = collection;
        }
        if let Ok(worker_name) = env::var(WORKER_VAR) {
            config.worker_name = worker_name;
        }
        config.validate()
    }

    /// Parse a JSON object; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.collection.trim().is_empty() {
            return Err(ConfigError::Invalid("collection"));
        }
        if self.worker_name.trim().is_empty() {
            return Err(ConfigError::Invalid("worker_name"));
        }
        Ok(self)
    }
}
