use std::collections::HashSet;

use serde::Serialize;

use super::domain::{Candidate, CandidateId, Stage, StageId, StageSummary};

/// Ordered stages and the single owner of stage-to-candidate membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageRegistry {
    stages: Vec<Stage>,
}

impl StageRegistry {
    /// Six-stage board used by recruiting teams out of the box.
    pub fn standard() -> Self {
        Self {
            stages: vec![
                Stage::new(StageId::APPLIED, "Applied", "blue"),
                Stage::new(StageId::SCREENING, "AI Screening", "yellow"),
                Stage::new(StageId::INTERVIEW, "Interview", "purple"),
                Stage::new(StageId::OFFER, "Offer", "green"),
                Stage::new(StageId::HIRED, "Hired", "emerald"),
                Stage::new(StageId::REJECTED, "Rejected", "red"),
            ],
        }
    }

    /// Build a registry from pre-populated stages, validating membership.
    pub fn from_stages(stages: Vec<Stage>) -> Result<Self, RegistryError> {
        let mut stage_ids = HashSet::new();
        let mut candidate_ids = HashSet::new();

        for stage in &stages {
            if !stage_ids.insert(stage.id.clone()) {
                return Err(RegistryError::DuplicateStage(stage.id.clone()));
            }
            for candidate in &stage.candidates {
                if candidate.status != stage.id {
                    return Err(RegistryError::StatusMismatch {
                        candidate: candidate.id.clone(),
                        status: candidate.status.clone(),
                        stage: stage.id.clone(),
                    });
                }
                if !candidate_ids.insert(candidate.id.clone()) {
                    return Err(RegistryError::DuplicateCandidate(candidate.id.clone()));
                }
            }
        }

        Ok(Self { stages })
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, id: &StageId) -> Option<&Stage> {
        self.stages.iter().find(|stage| &stage.id == id)
    }

    /// Linear scan for the stage currently holding `candidate_id`.
    pub fn stage_of(&self, candidate_id: &CandidateId) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.contains(candidate_id))
    }

    pub fn candidate(&self, candidate_id: &CandidateId) -> Option<&Candidate> {
        self.stages
            .iter()
            .flat_map(|stage| stage.candidates.iter())
            .find(|candidate| &candidate.id == candidate_id)
    }

    pub fn candidate_count(&self) -> usize {
        self.stages.iter().map(|stage| stage.candidates.len()).sum()
    }

    /// Append a new candidate to the stage named by its `status`.
    ///
    /// Returns the stored (normalized) copy so callers can persist it.
    pub fn admit(&mut self, mut candidate: Candidate) -> Result<Candidate, RegistryError> {
        if self.candidate(&candidate.id).is_some() {
            return Err(RegistryError::DuplicateCandidate(candidate.id));
        }

        candidate.normalize();
        let stage = self
            .stages
            .iter_mut()
            .find(|stage| stage.id == candidate.status)
            .ok_or_else(|| RegistryError::UnknownStage(candidate.status.clone()))?;

        stage.candidates.push(candidate.clone());
        Ok(candidate)
    }

    pub fn summary(&self) -> Vec<StageSummary> {
        self.stages
            .iter()
            .map(|stage| StageSummary {
                id: stage.id.clone(),
                title: stage.title.clone(),
                color: stage.color.clone(),
                count: stage.candidates.len(),
            })
            .collect()
    }

    pub(crate) fn index_of_stage(&self, id: &str) -> Option<usize> {
        self.stages.iter().position(|stage| stage.id.as_str() == id)
    }

    pub(crate) fn locate(&self, candidate_id: &CandidateId) -> Option<(usize, usize)> {
        self.stages
            .iter()
            .enumerate()
            .find_map(|(stage_index, stage)| {
                stage
                    .position_of(candidate_id)
                    .map(|position| (stage_index, position))
            })
    }

    pub(crate) fn stages_mut(&mut self) -> &mut [Stage] {
        &mut self.stages
    }
}

impl Default for StageRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Membership violations rejected by the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("stage '{0}' does not exist")]
    UnknownStage(StageId),
    #[error("stage '{0}' is declared more than once")]
    DuplicateStage(StageId),
    #[error("candidate '{0}' is already on the board")]
    DuplicateCandidate(CandidateId),
    #[error("candidate '{candidate}' has status '{status}' but sits in stage '{stage}'")]
    StatusMismatch {
        candidate: CandidateId,
        status: StageId,
        stage: StageId,
    },
}
