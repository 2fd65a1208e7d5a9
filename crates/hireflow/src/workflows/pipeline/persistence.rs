use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::PersistenceConfig;
use crate::documents::{self, DocumentRecord, DocumentStore, StoreError};

use super::domain::Candidate;

const RETRY_BASE_DELAY: Duration = Duration::from_millis(200);
const RETRY_MAX_DELAY: Duration = Duration::from_secs(30);

/// Pending write against the document store.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistCommand {
    Create {
        collection: &'static str,
        id: String,
        record: DocumentRecord,
    },
    Update {
        collection: &'static str,
        id: String,
        patch: DocumentRecord,
    },
}

impl PersistCommand {
    /// Status patch written after a stage transition.
    pub fn status_change(candidate: &Candidate, at: DateTime<Utc>) -> Self {
        let mut patch = DocumentRecord::new();
        patch.insert(
            "status".to_string(),
            Value::String(candidate.status.0.clone()),
        );
        patch.insert("updated_at".to_string(), Value::String(at.to_rfc3339()));

        PersistCommand::Update {
            collection: documents::CANDIDATES,
            id: candidate.id.0.clone(),
            patch,
        }
    }

    pub fn new_candidate(candidate: &Candidate, at: DateTime<Utc>) -> Result<Self, StoreError> {
        let mut record = documents::to_document(candidate)?;
        record.insert("created_at".to_string(), Value::String(at.to_rfc3339()));

        Ok(PersistCommand::Create {
            collection: documents::CANDIDATES,
            id: candidate.id.0.clone(),
            record,
        })
    }

    fn target(&self) -> (&'static str, &str) {
        match self {
            PersistCommand::Create { collection, id, .. }
            | PersistCommand::Update { collection, id, .. } => (*collection, id.as_str()),
        }
    }
}

/// Write-behind queue drained by a single background task.
///
/// In-memory state never waits on it. Each command gets up to `max_attempts`
/// deliveries; the last failure is logged and the command is dropped.
pub struct PersistenceQueue {
    sender: mpsc::UnboundedSender<PersistCommand>,
    worker: JoinHandle<()>,
}

impl PersistenceQueue {
    /// Start the worker. Must be called from within a Tokio runtime.
    pub fn spawn<S>(store: Arc<S>, config: PersistenceConfig) -> Self
    where
        S: DocumentStore + 'static,
    {
        let (sender, mut receiver) = mpsc::unbounded_channel::<PersistCommand>();
        let max_attempts = config.max_attempts.max(1);

        let worker = tokio::spawn(async move {
            while let Some(command) = receiver.recv().await {
                deliver(store.as_ref(), &command, max_attempts).await;
            }
        });

        Self { sender, worker }
    }

    pub fn enqueue(&self, command: PersistCommand) {
        if let Err(mpsc::error::SendError(command)) = self.sender.send(command) {
            let (collection, id) = command.target();
            warn!(collection, id, "persistence worker stopped; change kept in memory only");
        }
    }

    /// Stop accepting commands and wait for everything queued so far.
    pub async fn shutdown(self) {
        drop(self.sender);
        if let Err(err) = self.worker.await {
            warn!(error = %err, "persistence worker ended abnormally");
        }
    }
}

async fn deliver<S>(store: &S, command: &PersistCommand, max_attempts: u32)
where
    S: DocumentStore + ?Sized,
{
    let (collection, id) = command.target();

    for attempt in 1..=max_attempts {
        if attempt > 1 {
            tokio::time::sleep(retry_delay(attempt)).await;
        }

        let result = match command {
            PersistCommand::Create { record, .. } => store.create(collection, record.clone()).await,
            PersistCommand::Update { patch, .. } => {
                store.update(collection, id, patch.clone()).await
            }
        };

        match result {
            Ok(()) => {
                debug!(collection, id, attempt, "change persisted");
                return;
            }
            Err(err) if attempt == max_attempts || !is_retryable(&err) => {
                warn!(collection, id, attempt, error = %err, "change not persisted");
                return;
            }
            Err(err) => {
                debug!(collection, id, attempt, error = %err, "persist attempt failed, retrying");
            }
        }
    }
}

fn is_retryable(err: &StoreError) -> bool {
    matches!(err, StoreError::Unavailable(_))
}

/// Backoff before `attempt` (2 or later): doubles from the base, capped.
fn retry_delay(attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(2));
    RETRY_BASE_DELAY.saturating_mul(factor).min(RETRY_MAX_DELAY)
}
