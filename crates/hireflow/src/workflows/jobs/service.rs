use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::documents::{to_document, DocumentRecord, DocumentStore, StoreError, JOBS};
use crate::workflows::screening::{
    JobGenerationRequest, ParseOutcome, ScoringError, ScoringService,
};

use super::domain::{JobFilter, JobForm, JobId, JobPosting};

pub const COMPANY_NAME: &str = "Our Company";

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

/// Flat record written to the `jobs` collection.
#[derive(Serialize)]
struct JobDocument<'a> {
    id: &'a str,
    title: &'a str,
    department: &'a str,
    location: &'a str,
    job_type: &'static str,
    salary_min: u32,
    salary_max: u32,
    description: &'a str,
    requirements: &'a [String],
    skills: &'a [String],
    experience_required: &'a str,
    status: &'static str,
    created_at: String,
}

fn job_document(job: &JobPosting, at: DateTime<Utc>) -> Result<DocumentRecord, StoreError> {
    to_document(&JobDocument {
        id: &job.id.0,
        title: &job.title,
        department: &job.department,
        location: &job.location,
        job_type: job.employment_type.as_str(),
        salary_min: job.salary.min,
        salary_max: job.salary.max,
        description: &job.description,
        requirements: &job.requirements,
        skills: &job.skills,
        experience_required: &job.experience,
        status: job.status.as_str(),
        created_at: at.to_rfc3339(),
    })
}

/// Job board backed by an in-memory list, newest posting first.
pub struct JobPostingService<D, S> {
    postings: RwLock<Vec<JobPosting>>,
    store: Arc<D>,
    scoring: Option<Arc<S>>,
}

impl<D, S> JobPostingService<D, S>
where
    D: DocumentStore + 'static,
    S: ScoringService + 'static,
{
    pub fn new(store: Arc<D>, scoring: Option<Arc<S>>) -> Self {
        Self {
            postings: RwLock::new(Vec::new()),
            store,
            scoring,
        }
    }

    /// Preload postings without persisting them.
    pub fn with_postings(self, postings: Vec<JobPosting>) -> Self {
        *self.postings.write().unwrap_or_else(PoisonError::into_inner) = postings;
        self
    }

    pub fn list(&self, filter: &JobFilter) -> Vec<JobPosting> {
        self.postings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|job| filter.matches(job))
            .cloned()
            .collect()
    }

    /// Publish a posting from the form; a failed store write is logged and the posting kept.
    pub async fn create(&self, form: JobForm) -> Result<JobPosting, JobServiceError> {
        if form.title.trim().is_empty() {
            return Err(JobServiceError::MissingField("title"));
        }

        let today: NaiveDate = Utc::now().date_naive();
        let job = form.into_posting(next_job_id(), today);

        match job_document(&job, Utc::now()) {
            Ok(record) => {
                if let Err(err) = self.store.create(JOBS, record).await {
                    warn!(job = %job.id, error = %err, "job posting not persisted");
                }
            }
            Err(err) => warn!(job = %job.id, error = %err, "job posting not encoded"),
        }

        self.postings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(0, job.clone());
        info!(job = %job.id, title = %job.title, "job posted");
        Ok(job)
    }

    /// Ask the scoring service for a description, requirements and skills.
    pub async fn draft(&self, mut form: JobForm) -> Result<ParseOutcome<JobForm>, JobServiceError> {
        if form.title.trim().is_empty() {
            return Err(JobServiceError::MissingField("title"));
        }
        if form.department.trim().is_empty() {
            return Err(JobServiceError::MissingField("department"));
        }
        let scoring = self
            .scoring
            .as_ref()
            .ok_or(JobServiceError::ScoringDisabled)?;

        let request = JobGenerationRequest {
            job_title: form.title.clone(),
            company: Some(COMPANY_NAME.to_string()),
            basic_requirements: Some(format!(
                "{} department position with competitive salary",
                form.department
            )),
        };
        let draft = scoring.generate_job(&request).await?;

        Ok(draft.map(|draft| {
            form.apply_draft(draft);
            form
        }))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("job generation is not configured")]
    ScoringDisabled,
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}
