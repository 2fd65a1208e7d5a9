use serde::{Deserialize, Serialize};

use super::domain::{Candidate, CandidateId, StageId};
use super::registry::StageRegistry;

/// Drop gesture or explicit action asking to move a candidate.
///
/// `destination` is either a stage id or the id of another candidate, in which
/// case the move targets whichever stage that candidate currently occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub candidate_id: CandidateId,
    pub destination: String,
}

impl MoveRequest {
    pub fn new(candidate_id: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            candidate_id: CandidateId(candidate_id.into()),
            destination: destination.into(),
        }
    }
}

/// Result of applying a [`MoveRequest`] to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransitionOutcome {
    Moved {
        candidate: Candidate,
        from: StageId,
        to: StageId,
    },
    Unchanged {
        reason: NoopReason,
    },
}

impl TransitionOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, TransitionOutcome::Moved { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    UnknownCandidate,
    UnresolvedDestination,
    SameStage,
}

impl NoopReason {
    pub const fn label(self) -> &'static str {
        match self {
            NoopReason::UnknownCandidate => "unknown_candidate",
            NoopReason::UnresolvedDestination => "unresolved_destination",
            NoopReason::SameStage => "same_stage",
        }
    }
}

/// Resolve the stage a destination refers to: a stage id wins over a candidate id.
pub fn resolve_destination(registry: &StageRegistry, destination: &str) -> Option<usize> {
    registry.index_of_stage(destination).or_else(|| {
        registry
            .locate(&CandidateId(destination.to_string()))
            .map(|(stage_index, _)| stage_index)
    })
}

/// Pure reducer moving one candidate between stages.
///
/// Either the registry is left untouched or the candidate is removed from its
/// source stage, re-labelled, and appended to the end of the target stage.
pub fn apply_move(registry: &mut StageRegistry, request: &MoveRequest) -> TransitionOutcome {
    let Some((source_index, position)) = registry.locate(&request.candidate_id) else {
        return TransitionOutcome::Unchanged {
            reason: NoopReason::UnknownCandidate,
        };
    };

    let Some(target_index) = resolve_destination(registry, &request.destination) else {
        return TransitionOutcome::Unchanged {
            reason: NoopReason::UnresolvedDestination,
        };
    };

    if target_index == source_index {
        return TransitionOutcome::Unchanged {
            reason: NoopReason::SameStage,
        };
    }

    let stages = registry.stages_mut();
    let from = stages[source_index].id.clone();
    let to = stages[target_index].id.clone();

    let mut candidate = stages[source_index].candidates.remove(position);
    candidate.status = to.clone();
    stages[target_index].candidates.push(candidate.clone());

    TransitionOutcome::Moved {
        candidate,
        from,
        to,
    }
}
