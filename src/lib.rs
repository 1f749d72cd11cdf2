// Lets `#[derive(Document)]` expand to `fitness_journal::Document` inside this crate too.
extern crate self as fitness_journal;

mod config;
mod document;
mod exercise;
mod form;
mod pending;
mod routes;
mod subscription;

pub use config::{ConfigError, JournalConfig, COLLECTION_VAR, WORKER_VAR};
pub use document::{
    from_stored, to_fields, CollectionSnapshot, Document, DocumentRepository, DocumentStore,
    DocumentsExt, Fields, InMemoryDocumentStore, SnapshotListener, StoreError, StoreOperation,
    StoredDocument, WatchId,
};
pub use exercise::{coerce_weight, coerce_weights, ExerciseError, ExerciseRecord, ExerciseStore};
pub use form::{ExerciseForm, FormOutcome};
pub use pending::Pending;
pub use routes::{Navigator, Route};
pub use subscription::Subscription;

// Derive macro for `Document`
pub use fitness_journal_macros::Document;
