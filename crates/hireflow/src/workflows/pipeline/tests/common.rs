use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::PersistenceConfig;
use crate::documents::{DocumentRecord, DocumentStore, StoreError};
use crate::workflows::pipeline::domain::{Candidate, CandidateId, Stage, StageId};
use crate::workflows::pipeline::persistence::PersistenceQueue;
use crate::workflows::pipeline::registry::StageRegistry;
use crate::workflows::pipeline::PipelineBoard;

pub(super) fn candidate(id: &str, name: &str, stage: &str) -> Candidate {
    Candidate {
        id: CandidateId(id.to_string()),
        name: name.to_string(),
        email: format!("{}@email.com", name.to_lowercase().replace(' ', ".")),
        phone: "+1-555-0123".to_string(),
        location: "Austin, TX".to_string(),
        position: "Senior Full Stack Developer".to_string(),
        score: 85,
        skills: vec!["React".to_string(), "Node.js".to_string()],
        experience: "5+ years".to_string(),
        applied_on: NaiveDate::from_ymd_opt(2024, 1, 20).expect("valid date"),
        last_activity: NaiveDate::from_ymd_opt(2024, 1, 22).expect("valid date"),
        notes: String::new(),
        resume_url: None,
        status: StageId::new(stage),
    }
}

/// Applied = [A, B], Interview = [C]; remaining stages empty.
pub(super) fn small_registry() -> StageRegistry {
    let mut registry = StageRegistry::standard();
    registry
        .admit(candidate("a", "Sarah Johnson", StageId::APPLIED))
        .expect("admit a");
    registry
        .admit(candidate("b", "Michael Chen", StageId::APPLIED))
        .expect("admit b");
    registry
        .admit(candidate("c", "David Kim", StageId::INTERVIEW))
        .expect("admit c");
    registry
}

pub(super) fn ids(stage: &Stage) -> Vec<&str> {
    stage
        .candidates
        .iter()
        .map(|candidate| candidate.id.as_str())
        .collect()
}

pub(super) fn stage<'a>(registry: &'a StageRegistry, id: &str) -> &'a Stage {
    registry
        .stage(&StageId::new(id))
        .unwrap_or_else(|| panic!("stage {id} exists"))
}

pub(super) fn board_with<S>(store: Arc<S>, max_attempts: u32) -> PipelineBoard
where
    S: DocumentStore + 'static,
{
    let queue = PersistenceQueue::spawn(store, PersistenceConfig { max_attempts });
    PipelineBoard::new(small_registry(), queue)
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum StoreWrite {
    Create {
        collection: String,
        record: DocumentRecord,
    },
    Update {
        collection: String,
        id: String,
        patch: DocumentRecord,
    },
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    writes: Arc<Mutex<Vec<StoreWrite>>>,
}

impl MemoryStore {
    pub(super) fn writes(&self) -> Vec<StoreWrite> {
        self.writes.lock().expect("store mutex poisoned").clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, record: DocumentRecord) -> Result<(), StoreError> {
        self.writes
            .lock()
            .expect("store mutex poisoned")
            .push(StoreWrite::Create {
                collection: collection.to_string(),
                record,
            });
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: DocumentRecord,
    ) -> Result<(), StoreError> {
        self.writes
            .lock()
            .expect("store mutex poisoned")
            .push(StoreWrite::Update {
                collection: collection.to_string(),
                id: id.to_string(),
                patch,
            });
        Ok(())
    }
}

/// Store that is always offline and counts how often it was tried.
#[derive(Default, Clone)]
pub(super) struct OfflineStore {
    pub(super) attempts: Arc<AtomicUsize>,
}

impl OfflineStore {
    pub(super) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for OfflineStore {
    async fn create(&self, _collection: &str, _record: DocumentRecord) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn update(
        &self,
        _collection: &str,
        _id: &str,
        _patch: DocumentRecord,
    ) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
