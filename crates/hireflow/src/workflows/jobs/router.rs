use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::documents::DocumentStore;
use crate::workflows::screening::router::scoring_error_response;
use crate::workflows::screening::ScoringService;

use super::domain::{JobFilter, JobForm, JobStatus};
use super::service::{JobPostingService, JobServiceError};

/// Query string accepted by the job list; `status=all` or no status lists everything.
#[derive(Debug, Default, Deserialize)]
pub struct JobQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl JobQuery {
    fn into_filter(self) -> Result<JobFilter, String> {
        let status = match self.status.as_deref() {
            None | Some("") | Some("all") => None,
            Some(value) => Some(JobStatus::parse(value).ok_or_else(|| value.to_string())?),
        };
        Ok(JobFilter {
            search: self.search,
            status,
        })
    }
}

pub fn jobs_router<D, S>(service: Arc<JobPostingService<D, S>>) -> Router
where
    D: DocumentStore + 'static,
    S: ScoringService + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs",
            get(list_handler::<D, S>).post(create_handler::<D, S>),
        )
        .route("/api/v1/jobs/drafts", post(draft_handler::<D, S>))
        .with_state(service)
}

pub(crate) async fn list_handler<D, S>(
    State(service): State<Arc<JobPostingService<D, S>>>,
    Query(query): Query<JobQuery>,
) -> Response
where
    D: DocumentStore + 'static,
    S: ScoringService + 'static,
{
    match query.into_filter() {
        Ok(filter) => (StatusCode::OK, axum::Json(service.list(&filter))).into_response(),
        Err(status) => {
            let payload = json!({ "error": "unknown job status", "status": status });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn create_handler<D, S>(
    State(service): State<Arc<JobPostingService<D, S>>>,
    axum::Json(form): axum::Json<JobForm>,
) -> Response
where
    D: DocumentStore + 'static,
    S: ScoringService + 'static,
{
    match service.create(form).await {
        Ok(job) => (StatusCode::CREATED, axum::Json(job)).into_response(),
        Err(error) => job_error_response(error),
    }
}

pub(crate) async fn draft_handler<D, S>(
    State(service): State<Arc<JobPostingService<D, S>>>,
    axum::Json(form): axum::Json<JobForm>,
) -> Response
where
    D: DocumentStore + 'static,
    S: ScoringService + 'static,
{
    match service.draft(form).await {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => job_error_response(error),
    }
}

fn job_error_response(error: JobServiceError) -> Response {
    let status = match error {
        JobServiceError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
        JobServiceError::ScoringDisabled => StatusCode::SERVICE_UNAVAILABLE,
        JobServiceError::Scoring(error) => return scoring_error_response(error),
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
