//! Resume screening intake and the HTTP client for the remote scoring functions.

pub mod assessment;
pub mod client;
pub mod intake;
pub mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use assessment::{
    parse_job_draft, parse_match_assessment, parse_resume_assessment, FitRecommendation,
    JobDraft, MatchAssessment, ParseOutcome, Recommendation, ResumeAssessment, SkillMatch,
};
pub use client::{
    CandidateMatchRequest, GeneratedEmail, InterviewEmailRequest, JobGenerationRequest,
    ResumeScreeningRequest, ScoringClient, ScoringError, ScoringService,
};
pub use intake::{IntakeError, ResumeSubmission, ResumeUpload, ScreeningIntake, ScreeningReport};
pub use router::screening_router;
