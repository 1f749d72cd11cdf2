//! DocumentRepository - Typed accessor for document CRUD operations.

use std::marker::PhantomData;

use super::{from_stored, to_fields, Document, DocumentStore, StoreError};

/// Typed repository wrapper for accessing documents of a specific type.
pub struct DocumentRepository<'a, S: ?Sized, M> {
    store: &'a S,
    collection: String,
    _marker: PhantomData<M>,
}

impl<'a, S: DocumentStore + ?Sized, M: Document> DocumentRepository<'a, S, M> {
    pub fn new(store: &'a S) -> Self {
        Self::in_collection(store, M::COLLECTION)
    }

    /// Access documents of this type stored under another collection name.
    pub fn in_collection(store: &'a S, collection: &str) -> Self {
        Self {
            store,
            collection: collection.to_string(),
            _marker: PhantomData,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Add a document, ignoring its current id. Returns the assigned id.
    pub fn add(&self, document: &M) -> Result<String, StoreError> {
        self.store
            .add_document(&self.collection, to_fields(document)?)
    }

    /// Get a document by id.
    pub fn get(&self, id: &str) -> Result<Option<M>, StoreError> {
        self.store
            .get_document(&self.collection, id)?
            .map(|stored| from_stored(&stored))
            .transpose()
    }

    /// Replace the body fields of an existing document, keeping its id.
    pub fn update(&self, document: &M) -> Result<(), StoreError> {
        self.store
            .update_document(&self.collection, document.id(), to_fields(document)?)
    }

    /// Delete a document by id. Returns true if it existed.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete_document(&self.collection, id)
    }

    /// Read every document in the collection, in store order.
    pub fn list(&self) -> Result<Vec<M>, StoreError> {
        self.store
            .list_documents(&self.collection)?
            .documents
            .iter()
            .map(from_stored::<M>)
            .collect()
    }
}

/// Extension trait for typed document access on any DocumentStore.
pub trait DocumentsExt: DocumentStore {
    /// Get a typed document repository for `M::COLLECTION`.
    fn documents<M: Document>(&self) -> DocumentRepository<'_, Self, M> {
        DocumentRepository::new(self)
    }

    /// Get a typed document repository for a named collection.
    fn documents_in<M: Document>(&self, collection: &str) -> DocumentRepository<'_, Self, M> {
        DocumentRepository::in_collection(self, collection)
    }
}

impl<S: DocumentStore + ?Sized> DocumentsExt for S {}
