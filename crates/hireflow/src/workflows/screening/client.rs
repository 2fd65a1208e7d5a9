use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ScoringConfig;

use super::assessment::{
    parse_job_draft, parse_match_assessment, parse_resume_assessment, JobDraft, MatchAssessment,
    ParseOutcome, ResumeAssessment,
};

const RESUME_SCREENING_PATH: &str = "/functions/v1/ai-resume-screening";
const JOB_GENERATOR_PATH: &str = "/functions/v1/ai-job-generator";
const CANDIDATE_MATCHING_PATH: &str = "/functions/v1/ai-candidate-matching";
const INTERVIEW_EMAIL_PATH: &str = "/functions/v1/send-interview-email";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeScreeningRequest {
    pub resume_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_requirements: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobGenerationRequest {
    pub job_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_requirements: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateMatchRequest {
    #[serde(default)]
    pub candidate_profile: Value,
    #[serde(default)]
    pub job_requirements: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewEmailRequest {
    pub candidate_email: String,
    pub candidate_name: String,
    pub interview_date: String,
    pub interview_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

/// Generated confirmation email; the service only drafts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
    email_data: GeneratedEmail,
}

/// Contract of the remote scoring and generation functions.
#[async_trait]
pub trait ScoringService: Send + Sync {
    async fn screen_resume(
        &self,
        request: &ResumeScreeningRequest,
    ) -> Result<ParseOutcome<ResumeAssessment>, ScoringError>;

    async fn generate_job(
        &self,
        request: &JobGenerationRequest,
    ) -> Result<ParseOutcome<JobDraft>, ScoringError>;

    async fn match_candidate(
        &self,
        request: &CandidateMatchRequest,
    ) -> Result<ParseOutcome<MatchAssessment>, ScoringError>;

    async fn interview_email(
        &self,
        request: &InterviewEmailRequest,
    ) -> Result<GeneratedEmail, ScoringError>;
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("scoring service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected scoring service payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// HTTP client for the serverless scoring functions, authenticated with a bearer token.
#[derive(Clone)]
pub struct ScoringClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ScoringClient {
    pub fn new(config: &ScoringConfig) -> Result<Self, ScoringError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn post_text<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, ScoringError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!(%url, status = status.as_u16(), "scoring service rejected request");
            return Err(ScoringError::Api {
                status: status.as_u16(),
                message: error_message(&message),
            });
        }

        let text = response.text().await?;
        debug!(%url, bytes = text.len(), "scoring service replied");
        Ok(text)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ScoringError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.post_text(path, body).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ScoringService for ScoringClient {
    async fn screen_resume(
        &self,
        request: &ResumeScreeningRequest,
    ) -> Result<ParseOutcome<ResumeAssessment>, ScoringError> {
        if request.resume_text.trim().is_empty() {
            return Err(ScoringError::MissingField("resumeText"));
        }
        let text = self.post_text(RESUME_SCREENING_PATH, request).await?;
        Ok(parse_resume_assessment(&text))
    }

    async fn generate_job(
        &self,
        request: &JobGenerationRequest,
    ) -> Result<ParseOutcome<JobDraft>, ScoringError> {
        if request.job_title.trim().is_empty() {
            return Err(ScoringError::MissingField("jobTitle"));
        }
        let text = self.post_text(JOB_GENERATOR_PATH, request).await?;
        Ok(parse_job_draft(&text, &request.job_title))
    }

    async fn match_candidate(
        &self,
        request: &CandidateMatchRequest,
    ) -> Result<ParseOutcome<MatchAssessment>, ScoringError> {
        if request.candidate_profile.is_null() {
            return Err(ScoringError::MissingField("candidateProfile"));
        }
        if request.job_requirements.is_null() {
            return Err(ScoringError::MissingField("jobRequirements"));
        }
        let text = self.post_text(CANDIDATE_MATCHING_PATH, request).await?;
        Ok(parse_match_assessment(&text))
    }

    async fn interview_email(
        &self,
        request: &InterviewEmailRequest,
    ) -> Result<GeneratedEmail, ScoringError> {
        for (field, value) in [
            ("candidateEmail", &request.candidate_email),
            ("candidateName", &request.candidate_name),
            ("interviewDate", &request.interview_date),
            ("interviewTime", &request.interview_time),
        ] {
            if value.trim().is_empty() {
                return Err(ScoringError::MissingField(field));
            }
        }

        let envelope: EmailEnvelope = self.post_json(INTERVIEW_EMAIL_PATH, request).await?;
        debug!(success = envelope.success, message = %envelope.message, "interview email drafted");

        let mut email = envelope.email_data;
        if email.text.is_empty() {
            email.text = strip_html(&email.html);
        }
        Ok(email)
    }
}

/// Prefer the `error` field of a JSON error body, otherwise the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Plain-text rendering of an HTML body: every `<...>` tag is removed.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text
}
