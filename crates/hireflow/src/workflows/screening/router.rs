use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::{json, Value};

use crate::workflows::pipeline::RegistryError;

use super::client::{CandidateMatchRequest, ScoringError, ScoringService};
use super::intake::{IntakeError, ResumeSubmission, ResumeUpload, ScreeningIntake};

/// Router builder exposing resume screening and candidate matching.
pub fn screening_router<S>(intake: Arc<ScreeningIntake<S>>) -> Router
where
    S: ScoringService + 'static,
{
    Router::new()
        .route("/api/v1/screening/resumes", post(screen_handler::<S>))
        .route("/api/v1/screening/matches", post(match_handler::<S>))
        .with_state(intake)
}

pub(crate) async fn screen_handler<S>(
    State(intake): State<Arc<ScreeningIntake<S>>>,
    axum::Json(upload): axum::Json<ResumeUpload>,
) -> Response
where
    S: ScoringService + 'static,
{
    match upload {
        ResumeUpload::Single(submission) => match intake.screen(submission).await {
            Ok(report) => (StatusCode::CREATED, axum::Json(report)).into_response(),
            Err(error) => intake_error_response(error),
        },
        ResumeUpload::Batch(submissions) => screen_batch(&intake, submissions).await,
    }
}

/// Each file is reported on its own; 201 when at least one candidate was admitted.
async fn screen_batch<S>(
    intake: &ScreeningIntake<S>,
    submissions: Vec<ResumeSubmission>,
) -> Response
where
    S: ScoringService + 'static,
{
    let file_names: Vec<String> = submissions
        .iter()
        .map(|submission| submission.file_name.clone())
        .collect();
    let results = intake.screen_all(submissions).await;

    let mut screened = 0usize;
    let items: Vec<Value> = file_names
        .into_iter()
        .zip(results)
        .map(|(file_name, result)| match result {
            Ok(report) => {
                screened += 1;
                json!({ "file_name": file_name, "report": report })
            }
            Err(error) => json!({ "file_name": file_name, "error": error.to_string() }),
        })
        .collect();

    let status = if screened > 0 {
        StatusCode::CREATED
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    let payload = json!({
        "screened": screened,
        "failed": items.len() - screened,
        "results": items,
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn match_handler<S>(
    State(intake): State<Arc<ScreeningIntake<S>>>,
    axum::Json(request): axum::Json<CandidateMatchRequest>,
) -> Response
where
    S: ScoringService + 'static,
{
    match intake.scoring().match_candidate(&request).await {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => scoring_error_response(error),
    }
}

fn intake_error_response(error: IntakeError) -> Response {
    match error {
        IntakeError::Scoring(error) => scoring_error_response(error),
        IntakeError::Registry(error @ RegistryError::DuplicateCandidate(_)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

/// Missing inputs are the caller's fault; anything else is the upstream service's.
pub(crate) fn scoring_error_response(error: ScoringError) -> Response {
    let status = match error {
        ScoringError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::PersistenceConfig;
    use crate::workflows::pipeline::{PersistenceQueue, PipelineBoard, StageId, StageRegistry};
    use crate::workflows::screening::testing::{NullStore, StubScoring};

    fn intake(scoring: StubScoring) -> Arc<ScreeningIntake<StubScoring>> {
        let queue = PersistenceQueue::spawn(Arc::new(NullStore), PersistenceConfig::default());
        let board = Arc::new(PipelineBoard::new(StageRegistry::standard(), queue));
        Arc::new(ScreeningIntake::new(Arc::new(scoring), board))
    }

    fn router(scoring: StubScoring) -> Router {
        screening_router(intake(scoring))
    }

    fn screening_count(intake: &ScreeningIntake<StubScoring>) -> usize {
        intake
            .board()
            .summary()
            .into_iter()
            .find(|stage| stage.id.as_str() == StageId::SCREENING)
            .map(|stage| stage.count)
            .unwrap_or_default()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    async fn read_json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("valid json")
    }

    #[tokio::test]
    async fn screening_route_creates_candidate() {
        let response = router(StubScoring::replying("not json"))
            .oneshot(post_json(
                "/api/v1/screening/resumes",
                json!({ "file_name": "sarah_johnson.pdf", "resume_text": "React, Node.js" }),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json_body(response).await;
        assert_eq!(body["candidate"]["name"], json!("Sarah Johnson"));
        assert_eq!(body["candidate"]["status"], json!("screening"));
        assert_eq!(body["assessment"]["source"], json!("fallback"));
        assert_eq!(body["assessment"]["assessment"]["overallScore"], json!(75));
    }

    #[tokio::test]
    async fn batch_upload_reports_each_file() {
        let intake = intake(StubScoring::failing_for("Java"));
        let response = screening_router(intake.clone())
            .oneshot(post_json(
                "/api/v1/screening/resumes",
                json!([
                    { "file_name": "sarah_johnson.pdf", "resume_text": "React, Node.js" },
                    { "file_name": "michael_chen.pdf", "resume_text": "Java, Spring" }
                ]),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json_body(response).await;
        assert_eq!(body["screened"], json!(1));
        assert_eq!(body["failed"], json!(1));
        assert_eq!(body["results"][0]["file_name"], json!("sarah_johnson.pdf"));
        assert_eq!(
            body["results"][0]["report"]["candidate"]["name"],
            json!("Sarah Johnson")
        );
        assert_eq!(body["results"][1]["file_name"], json!("michael_chen.pdf"));
        assert!(body["results"][1]["error"]
            .as_str()
            .expect("error message")
            .contains("503"));
        assert_eq!(screening_count(&intake), 1);
    }

    #[tokio::test]
    async fn batch_with_no_admissions_is_unprocessable() {
        let intake = intake(StubScoring::failing_for("Java"));
        let response = screening_router(intake.clone())
            .oneshot(post_json(
                "/api/v1/screening/resumes",
                json!([{ "file_name": "michael_chen.pdf", "resume_text": "Java" }]),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_json_body(response).await;
        assert_eq!(body["screened"], json!(0));
        assert_eq!(screening_count(&intake), 0);
    }

    #[tokio::test]
    async fn scoring_failures_map_to_bad_gateway() {
        let response = router(StubScoring::failing_for("React"))
            .oneshot(post_json(
                "/api/v1/screening/resumes",
                json!({ "file_name": "michael_chen.pdf", "resume_text": "React" }),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn unnamed_resume_is_unprocessable() {
        let response = router(StubScoring::replying("not json"))
            .oneshot(post_json(
                "/api/v1/screening/resumes",
                json!({ "file_name": ".pdf", "resume_text": "React" }),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn match_route_returns_assessment() {
        let response = router(StubScoring::replying(
            r#"{
                "overallMatchScore": 82,
                "recommendation": "excellent_fit",
                "skillsMatch": { "score": 90, "matchedSkills": ["Python"], "missingSkills": ["SQL"] },
                "experienceMatch": { "score": 75 },
                "culturalFit": { "score": 80 },
                "salaryExpectation": { "alignment": "unknown" }
            }"#,
        ))
        .oneshot(post_json(
            "/api/v1/screening/matches",
            json!({
                "candidateProfile": { "name": "David Kim", "skills": ["Python"] },
                "jobRequirements": { "skills": ["Python", "SQL"] }
            }),
        ))
        .await
        .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["source"], json!("parsed"));
        assert_eq!(body["assessment"]["overallMatchScore"], json!(82));
    }
}
