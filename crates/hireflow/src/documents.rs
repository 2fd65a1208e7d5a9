//! Generic document-store boundary shared by the pipeline, job board and scheduler.
//!
//! Records are flat key-value maps. Nested arrays and objects are stored as JSON
//! text so any table-backed store can hold them without a schema per entity.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

pub const CANDIDATES: &str = "candidates";
pub const JOBS: &str = "jobs";
pub const INTERVIEWS: &str = "interviews";

pub type DocumentRecord = Map<String, Value>;

/// Remote persistence consumed through create/update calls only.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create(&self, collection: &str, record: DocumentRecord) -> Result<(), StoreError>;

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: DocumentRecord,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{collection}/{id} already exists")]
    Conflict { collection: String, id: String },
    #[error("{collection}/{id} not found")]
    NotFound { collection: String, id: String },
    #[error("document store unavailable: {0}")]
    Unavailable(String),
    #[error("record could not be encoded: {0}")]
    Encoding(String),
}

/// Serialize an entity into a flat record.
pub fn to_document<T: Serialize>(value: &T) -> Result<DocumentRecord, StoreError> {
    let encoded =
        serde_json::to_value(value).map_err(|err| StoreError::Encoding(err.to_string()))?;

    let Value::Object(fields) = encoded else {
        return Err(StoreError::Encoding(
            "only struct-like values can be stored".to_string(),
        ));
    };

    Ok(fields
        .into_iter()
        .map(|(key, value)| (key, flatten_value(value)))
        .collect())
}

fn flatten_value(value: Value) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
        scalar => scalar,
    }
}
