use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::board::PipelineBoard;
use super::domain::{Candidate, CandidateId, Stage, StageSummary};
use super::registry::RegistryError;
use super::transition::MoveRequest;

/// Board payload returned to the kanban view.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub stages: Vec<Stage>,
    pub summary: Vec<StageSummary>,
    pub total_candidates: usize,
}

/// Router builder exposing the pipeline board over HTTP.
pub fn pipeline_router(board: Arc<PipelineBoard>) -> Router {
    Router::new()
        .route("/api/v1/pipeline", get(board_handler))
        .route("/api/v1/pipeline/moves", post(move_handler))
        .route("/api/v1/pipeline/candidates", post(admit_handler))
        .route(
            "/api/v1/pipeline/candidates/:candidate_id",
            get(candidate_handler),
        )
        .with_state(board)
}

pub(crate) async fn board_handler(State(board): State<Arc<PipelineBoard>>) -> Response {
    let registry = board.snapshot();
    let view = BoardView {
        summary: registry.summary(),
        total_candidates: registry.candidate_count(),
        stages: registry.stages().to_vec(),
    };
    (StatusCode::OK, axum::Json(view)).into_response()
}

pub(crate) async fn move_handler(
    State(board): State<Arc<PipelineBoard>>,
    axum::Json(request): axum::Json<MoveRequest>,
) -> Response {
    let outcome = board.move_candidate(&request);
    (StatusCode::OK, axum::Json(outcome)).into_response()
}

pub(crate) async fn admit_handler(
    State(board): State<Arc<PipelineBoard>>,
    axum::Json(candidate): axum::Json<Candidate>,
) -> Response {
    match board.admit(candidate) {
        Ok(admitted) => (StatusCode::CREATED, axum::Json(admitted)).into_response(),
        Err(error @ RegistryError::DuplicateCandidate(_)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn candidate_handler(
    State(board): State<Arc<PipelineBoard>>,
    Path(candidate_id): Path<String>,
) -> Response {
    let id = CandidateId(candidate_id);
    match board.candidate(&id) {
        Some(candidate) => (StatusCode::OK, axum::Json(candidate)).into_response(),
        None => {
            let payload = json!({
                "error": "candidate not found",
                "candidate_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}
