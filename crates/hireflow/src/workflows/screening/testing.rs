use std::sync::Mutex;

use async_trait::async_trait;

use crate::documents::{DocumentRecord, DocumentStore, StoreError};

use super::assessment::{
    parse_job_draft, parse_match_assessment, parse_resume_assessment, JobDraft, MatchAssessment,
    ParseOutcome, ResumeAssessment,
};
use super::client::{
    strip_html, CandidateMatchRequest, GeneratedEmail, InterviewEmailRequest,
    JobGenerationRequest, ResumeScreeningRequest, ScoringError, ScoringService,
};

/// Canned scoring service: every call replies with the same body.
#[derive(Default)]
pub(crate) struct StubScoring {
    reply: String,
    fail_when_contains: Option<String>,
    fail_emails: bool,
    pub(crate) job_requests: Mutex<Vec<JobGenerationRequest>>,
    pub(crate) email_requests: Mutex<Vec<InterviewEmailRequest>>,
}

impl StubScoring {
    pub(crate) fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            ..Self::default()
        }
    }

    /// Resume screening fails for resume text containing `needle`.
    pub(crate) fn failing_for(needle: &str) -> Self {
        Self {
            reply: "not json".to_string(),
            fail_when_contains: Some(needle.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn without_email() -> Self {
        Self {
            fail_emails: true,
            ..Self::default()
        }
    }

    fn unavailable() -> ScoringError {
        ScoringError::Api {
            status: 503,
            message: "scoring offline".to_string(),
        }
    }
}

#[async_trait]
impl ScoringService for StubScoring {
    async fn screen_resume(
        &self,
        request: &ResumeScreeningRequest,
    ) -> Result<ParseOutcome<ResumeAssessment>, ScoringError> {
        if let Some(needle) = &self.fail_when_contains {
            if request.resume_text.contains(needle.as_str()) {
                return Err(Self::unavailable());
            }
        }
        Ok(parse_resume_assessment(&self.reply))
    }

    async fn generate_job(
        &self,
        request: &JobGenerationRequest,
    ) -> Result<ParseOutcome<JobDraft>, ScoringError> {
        self.job_requests
            .lock()
            .expect("job requests mutex poisoned")
            .push(request.clone());
        Ok(parse_job_draft(&self.reply, &request.job_title))
    }

    async fn match_candidate(
        &self,
        _request: &CandidateMatchRequest,
    ) -> Result<ParseOutcome<MatchAssessment>, ScoringError> {
        Ok(parse_match_assessment(&self.reply))
    }

    async fn interview_email(
        &self,
        request: &InterviewEmailRequest,
    ) -> Result<GeneratedEmail, ScoringError> {
        self.email_requests
            .lock()
            .expect("email requests mutex poisoned")
            .push(request.clone());
        if self.fail_emails {
            return Err(Self::unavailable());
        }
        let html = format!("<p>Hi {}</p>", request.candidate_name);
        Ok(GeneratedEmail {
            to: request.candidate_email.clone(),
            subject: "Interview Confirmation".to_string(),
            text: strip_html(&html),
            html,
        })
    }
}

/// Store that accepts and discards every write.
pub(crate) struct NullStore;

#[async_trait]
impl DocumentStore for NullStore {
    async fn create(&self, _collection: &str, _record: DocumentRecord) -> Result<(), StoreError> {
        Ok(())
    }

    async fn update(
        &self,
        _collection: &str,
        _id: &str,
        _patch: DocumentRecord,
    ) -> Result<(), StoreError> {
        Ok(())
    }
}
