//! Remote document store.
//!
//! [`DocumentStore`] is the narrow surface the remote repository needs:
//! read a whole collection, upsert one document by id. Documents are plain
//! JSON objects; [`FirestoreDocumentStore`] converts them to and from
//! Firestore typed values on the wire.

mod client;
mod value;

use async_trait::async_trait;
use journal_core::error::Result;
use serde_json::{Map, Value};

pub use client::FirestoreDocumentStore;
pub use value::{from_typed_fields, from_typed_value, to_typed_fields, to_typed_value};

/// A document read back from a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Document id (last segment of its resource name).
    pub id: String,
    /// Field data as a plain JSON object.
    pub data: Map<String, Value>,
}

/// Collection-oriented document storage.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads every document of a collection, optionally ordered ascending by a field.
    async fn list_documents(&self, collection: &str, order_by: Option<&str>)
    -> Result<Vec<Document>>;

    /// Creates or fully replaces the document `id` in `collection`.
    async fn upsert_document(
        &self,
        collection: &str,
        id: &str,
        data: &Map<String, Value>,
    ) -> Result<()>;
}
