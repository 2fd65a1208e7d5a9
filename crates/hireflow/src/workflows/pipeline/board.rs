use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::domain::{Candidate, CandidateId, StageSummary};
use super::persistence::{PersistCommand, PersistenceQueue};
use super::registry::{RegistryError, StageRegistry};
use super::transition::{apply_move, MoveRequest, TransitionOutcome};

/// Single-writer container for the candidate board.
///
/// Every mutation runs to completion under one lock, so two requests never
/// observe a half-applied transition. Persistence is queued afterwards and
/// never blocks or rolls back the in-memory change.
pub struct PipelineBoard {
    registry: Mutex<StageRegistry>,
    persistence: PersistenceQueue,
}

impl PipelineBoard {
    pub fn new(registry: StageRegistry, persistence: PersistenceQueue) -> Self {
        Self {
            registry: Mutex::new(registry),
            persistence,
        }
    }

    pub fn snapshot(&self) -> StageRegistry {
        self.registry().clone()
    }

    pub fn summary(&self) -> Vec<StageSummary> {
        self.registry().summary()
    }

    pub fn candidate(&self, candidate_id: &CandidateId) -> Option<Candidate> {
        self.registry().candidate(candidate_id).cloned()
    }

    /// Apply a drag-and-drop style move and queue the status patch.
    pub fn move_candidate(&self, request: &MoveRequest) -> TransitionOutcome {
        let outcome = {
            let mut registry = self.registry();
            apply_move(&mut registry, request)
        };

        match &outcome {
            TransitionOutcome::Moved {
                candidate,
                from,
                to,
            } => {
                info!(candidate = %candidate.id, %from, %to, "candidate moved");
                self.persistence
                    .enqueue(PersistCommand::status_change(candidate, Utc::now()));
            }
            TransitionOutcome::Unchanged { reason } => {
                debug!(
                    candidate = %request.candidate_id,
                    destination = %request.destination,
                    reason = reason.label(),
                    "move ignored"
                );
            }
        }

        outcome
    }

    /// Place a new candidate on the board and queue its creation.
    pub fn admit(&self, candidate: Candidate) -> Result<Candidate, RegistryError> {
        let admitted = self.registry().admit(candidate)?;
        info!(candidate = %admitted.id, stage = %admitted.status, "candidate admitted");

        match PersistCommand::new_candidate(&admitted, Utc::now()) {
            Ok(command) => self.persistence.enqueue(command),
            Err(err) => warn!(candidate = %admitted.id, error = %err, "candidate not persisted"),
        }

        Ok(admitted)
    }

    /// Drain pending writes; used on shutdown and by tests.
    pub async fn shutdown(self) -> StageRegistry {
        self.persistence.shutdown().await;
        self.registry
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn registry(&self) -> MutexGuard<'_, StageRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
