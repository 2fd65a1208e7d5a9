use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::workflows::pipeline::{Candidate, CandidateId, PipelineBoard, RegistryError, StageId};

use super::assessment::{ParseOutcome, ResumeAssessment, SkillMatch};
use super::client::{ResumeScreeningRequest, ScoringError, ScoringService};

pub const DEFAULT_JOB_REQUIREMENTS: &str =
    "Software Developer position with React, TypeScript, and Node.js experience";
pub const DEFAULT_POSITION: &str = "Software Developer";

static CANDIDATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_candidate_id() -> CandidateId {
    let id = CANDIDATE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CandidateId(format!("cand-{}-{id:04}", Utc::now().timestamp_millis()))
}

/// Uploaded resume with its already-extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSubmission {
    pub file_name: String,
    pub resume_text: String,
    #[serde(default)]
    pub resume_url: Option<String>,
}

/// Body of a resume upload: a JSON array is a batch, a bare object a single file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ResumeUpload {
    Batch(Vec<ResumeSubmission>),
    Single(ResumeSubmission),
}

/// Result card for one screened resume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningReport {
    pub file_name: String,
    pub candidate: Candidate,
    pub skill_matches: Vec<SkillMatch>,
    pub assessment: ParseOutcome<ResumeAssessment>,
}

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("file name {0:?} does not yield a candidate name")]
    UnnamedResume(String),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Screens resumes with the scoring service and admits them to the `screening` stage.
pub struct ScreeningIntake<S> {
    scoring: Arc<S>,
    board: Arc<PipelineBoard>,
}

impl<S> ScreeningIntake<S>
where
    S: ScoringService + 'static,
{
    pub fn new(scoring: Arc<S>, board: Arc<PipelineBoard>) -> Self {
        Self {
            scoring,
            board,
        }
    }

    pub fn scoring(&self) -> &Arc<S> {
        &self.scoring
    }

    pub fn board(&self) -> &Arc<PipelineBoard> {
        &self.board
    }

    /// Screen one resume; a failed scoring call aborts this item only.
    pub async fn screen(
        &self,
        submission: ResumeSubmission,
    ) -> Result<ScreeningReport, IntakeError> {
        let name = candidate_name_from_file(&submission.file_name);
        if name.is_empty() {
            return Err(IntakeError::UnnamedResume(submission.file_name));
        }

        let request = ResumeScreeningRequest {
            resume_text: submission.resume_text,
            job_requirements: Some(DEFAULT_JOB_REQUIREMENTS.to_string()),
        };
        let assessment = self.scoring.screen_resume(&request).await?;
        if assessment.is_fallback() {
            warn!(file = %submission.file_name, "screening reply unparseable; using default assessment");
        }

        let candidate = build_candidate(
            next_candidate_id(),
            &name,
            assessment.get(),
            submission.resume_url,
            Utc::now().date_naive(),
        );
        let candidate = self.board.admit(candidate)?;
        info!(
            candidate = %candidate.id,
            file = %submission.file_name,
            score = candidate.score,
            "resume screened"
        );

        Ok(ScreeningReport {
            file_name: submission.file_name,
            skill_matches: assessment.get().skill_matches(),
            candidate,
            assessment,
        })
    }

    /// Screen resumes in order, reporting each item separately.
    pub async fn screen_all(
        &self,
        submissions: Vec<ResumeSubmission>,
    ) -> Vec<Result<ScreeningReport, IntakeError>> {
        let mut reports = Vec::with_capacity(submissions.len());
        for submission in submissions {
            let file_name = submission.file_name.clone();
            let result = self.screen(submission).await;
            if let Err(err) = &result {
                warn!(file = %file_name, error = %err, "resume screening failed");
            }
            reports.push(result);
        }
        reports
    }
}

fn build_candidate(
    id: CandidateId,
    name: &str,
    assessment: &ResumeAssessment,
    resume_url: Option<String>,
    today: NaiveDate,
) -> Candidate {
    let years = if assessment.experience.years > 0.0 {
        assessment.experience.years
    } else {
        3.0
    };

    Candidate {
        id,
        name: name.to_string(),
        email: derived_email(name),
        phone: String::new(),
        location: String::new(),
        position: DEFAULT_POSITION.to_string(),
        score: assessment.overall_score,
        skills: assessment.skills.technical.clone(),
        experience: format!("{years} years"),
        applied_on: today,
        last_activity: today,
        notes: assessment.summary.clone(),
        resume_url,
        status: StageId::new(StageId::SCREENING),
    }
}

/// `sarah_johnson-resume.pdf` becomes `Sarah Johnson Resume`.
pub fn candidate_name_from_file(file_name: &str) -> String {
    let stem = file_name.replacen(".pdf", "", 1);
    let spaced: String = stem
        .chars()
        .map(|ch| if ch == '_' || ch == '-' { ' ' } else { ch })
        .collect();

    let mut name = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for ch in spaced.trim().chars() {
        if at_word_start && ch.is_alphanumeric() {
            name.extend(ch.to_uppercase());
        } else {
            name.push(ch);
        }
        at_word_start = !ch.is_alphanumeric();
    }
    name
}

/// Placeholder contact address derived from the candidate name.
pub fn derived_email(name: &str) -> String {
    let local = name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(".");
    format!("{local}@example.com")
}
