use async_trait::async_trait;
use chrono::NaiveDate;
use hireflow::documents::{DocumentRecord, DocumentStore, StoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

type Collection = HashMap<String, DocumentRecord>;

/// Process-local document store keyed by collection and record id.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDocumentStore {
    collections: Arc<Mutex<HashMap<String, Collection>>>,
}

impl InMemoryDocumentStore {
    pub(crate) fn records(&self, collection: &str) -> Vec<DocumentRecord> {
        let guard = self.collections.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records: Vec<DocumentRecord> = guard
            .get(collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default();
        records.sort_by(|left, right| record_id(left).cmp(&record_id(right)));
        records
    }
}

fn record_id(record: &DocumentRecord) -> Option<String> {
    record.get("id").and_then(Value::as_str).map(str::to_string)
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(&self, collection: &str, record: DocumentRecord) -> Result<(), StoreError> {
        let id = record_id(&record)
            .ok_or_else(|| StoreError::Encoding("record is missing a string id".to_string()))?;

        let mut guard = self.collections.lock().unwrap_or_else(PoisonError::into_inner);
        let records = guard.entry(collection.to_string()).or_default();
        if records.contains_key(&id) {
            return Err(StoreError::Conflict {
                collection: collection.to_string(),
                id,
            });
        }
        records.insert(id, record);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: DocumentRecord,
    ) -> Result<(), StoreError> {
        let mut guard = self.collections.lock().unwrap_or_else(PoisonError::into_inner);
        let record = guard
            .get_mut(collection)
            .and_then(|records| records.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        record.extend(patch);
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
