//! Repository Module
//!
//! Typed per-collection accessors over the [`DataStore`] capability.
//! Decoding follows the skip-and-continue policy for malformed
//! documents: one bad record is logged and dropped, never aborting the
//! whole read.

pub mod connection;
pub mod contact;
pub mod notification_log;
pub mod reservation;
pub mod source_tag;

use serde::de::DeserializeOwned;

use super::{DataStore, Document, StoreError};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, StoreError>;

/// Decode a snapshot, skipping malformed documents with a warning.
pub(crate) fn decode_all<T: DeserializeOwned>(collection: &str, docs: Vec<Document>) -> Vec<T> {
    let mut out = Vec::with_capacity(docs.len());
    for doc in docs {
        match serde_json::from_value::<T>(doc.fields) {
            Ok(v) => out.push(v),
            Err(e) => {
                tracing::warn!(
                    collection,
                    id = %doc.id,
                    error = %e,
                    "Skipping malformed record"
                );
            }
        }
    }
    out
}

/// Serialize a model into its document fields.
pub fn encode<T: serde::Serialize>(value: &T) -> RepoResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| StoreError::Backend(e.to_string()))
}

/// Fetch one decoded record by id.
pub(crate) async fn find_one<T: DeserializeOwned>(
    store: &dyn DataStore,
    collection: &str,
    id: &str,
) -> RepoResult<Option<T>> {
    let docs = store.snapshot(collection).await?;
    for doc in docs {
        if doc.id == id {
            return match serde_json::from_value::<T>(doc.fields) {
                Ok(v) => Ok(Some(v)),
                Err(e) => Err(StoreError::Backend(format!(
                    "malformed record {collection}/{id}: {e}"
                ))),
            };
        }
    }
    Ok(None)
}
