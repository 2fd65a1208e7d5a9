use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use hireflow::documents::DocumentStore;
use hireflow::workflows::interviews::{interviews_router, InterviewScheduler};
use hireflow::workflows::jobs::{jobs_router, JobPostingService};
use hireflow::workflows::pipeline::{pipeline_router, PipelineBoard};
use hireflow::workflows::screening::{screening_router, ScoringService, ScreeningIntake};
use serde_json::json;
use std::sync::Arc;

/// Workflow services shared by the HTTP routes.
pub(crate) struct Services<D, S> {
    pub(crate) board: Arc<PipelineBoard>,
    pub(crate) jobs: Arc<JobPostingService<D, S>>,
    pub(crate) interviews: Arc<InterviewScheduler<D, S>>,
    pub(crate) screening: Option<Arc<ScreeningIntake<S>>>,
}

pub(crate) fn with_workflow_routes<D, S>(services: Services<D, S>) -> Router
where
    D: DocumentStore + 'static,
    S: ScoringService + 'static,
{
    let mut router = pipeline_router(services.board)
        .merge(jobs_router(services.jobs))
        .merge(interviews_router(services.interviews));

    if let Some(intake) = services.screening {
        router = router.merge(screening_router(intake));
    }

    router
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
