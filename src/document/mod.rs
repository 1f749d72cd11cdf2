//! Documents - The remote document-collection contract.
//!
//! A document store keeps schemaless bodies (`Fields`) grouped into named
//! collections, each addressed by a store-assigned identifier. Typed access
//! goes through the `Document` trait, whose identifier is never part of the
//! stored body.
//!
//! ## Example
//!
//! ```ignore
//! use fitness_journal::{Document, DocumentsExt, InMemoryDocumentStore};
//!
//! #[derive(Serialize, Deserialize, Clone, Document)]
//! #[document(collection = "exercises")]
//! struct ExerciseRecord {
//!     #[serde(skip)]
//!     pub id: String,
//!     pub name: String,
//! }
//!
//! let store = InMemoryDocumentStore::new();
//! let id = store.documents::<ExerciseRecord>().add(&record)?;
//! let loaded = store.documents::<ExerciseRecord>().get(&id)?;
//! ```

mod in_memory;
mod repository;
mod store;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A schemaless document body.
pub type Fields = serde_json::Map<String, Value>;

/// Trait for types that can be stored as documents.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection this document type lives in.
    const COLLECTION: &'static str;

    /// The store-assigned identifier. Empty until persisted.
    fn id(&self) -> &str;

    /// Attach the store-assigned identifier.
    fn set_id(&mut self, id: String);
}

/// A document as the store holds it: identifier plus body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Fields,
}

/// A complete, materialized copy of a collection.
///
/// `revision` grows by one with every committed write to the collection, so
/// two snapshots of the same collection can be ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    pub collection: String,
    pub revision: u64,
    pub documents: Vec<StoredDocument>,
}

impl CollectionSnapshot {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Error type for document store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No document with this id in the collection.
    NotFound { collection: String, id: String },
    /// The remote call failed (network, permission, quota).
    Unavailable(String),
    /// Serialization/deserialization error.
    Serde(String),
    /// Storage-level error.
    Storage(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { collection, id } => {
                write!(f, "document not found: {}/{}", collection, id)
            }
            StoreError::Unavailable(msg) => write!(f, "{}", msg),
            StoreError::Serde(msg) => write!(f, "document serialization error: {}", msg),
            StoreError::Storage(msg) => write!(f, "document storage error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

/// Serialize a document into a body. The body must be a JSON object.
pub fn to_fields<M: Document>(document: &M) -> Result<Fields, StoreError> {
    match serde_json::to_value(document)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::Serde(format!(
            "{} body must be an object, got {}",
            M::COLLECTION,
            other
        ))),
    }
}

/// Decode a stored document and attach its identifier.
pub fn from_stored<M: Document>(stored: &StoredDocument) -> Result<M, StoreError> {
    let mut document: M = serde_json::from_value(Value::Object(stored.fields.clone()))?;
    document.set_id(stored.id.clone());
    Ok(document)
}

pub use in_memory::{InMemoryDocumentStore, StoreOperation};
pub use repository::{DocumentRepository, DocumentsExt};
pub use store::{DocumentStore, SnapshotListener, WatchId};
