use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::documents::DocumentStore;
use crate::workflows::screening::ScoringService;

use super::calendar::month_grid;
use super::domain::{InterviewStatus, NewInterview};
use super::service::{InterviewScheduler, InterviewServiceError};

#[derive(Debug, Default, Deserialize)]
pub struct InterviewQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub days: Vec<Option<NaiveDate>>,
}

pub fn interviews_router<D, S>(scheduler: Arc<InterviewScheduler<D, S>>) -> Router
where
    D: DocumentStore + 'static,
    S: ScoringService + 'static,
{
    Router::new()
        .route(
            "/api/v1/interviews",
            get(list_handler::<D, S>).post(schedule_handler::<D, S>),
        )
        .route("/api/v1/interviews/slots", get(slots_handler::<D, S>))
        .route("/api/v1/interviews/calendar", get(calendar_handler))
        .with_state(scheduler)
}

pub(crate) async fn list_handler<D, S>(
    State(scheduler): State<Arc<InterviewScheduler<D, S>>>,
    Query(query): Query<InterviewQuery>,
) -> Response
where
    D: DocumentStore + 'static,
    S: ScoringService + 'static,
{
    let status = match query.status.as_deref() {
        None | Some("") | Some("all") => None,
        Some(value) => match InterviewStatus::parse(value) {
            Some(status) => Some(status),
            None => {
                let payload = json!({ "error": "unknown interview status", "status": value });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        },
    };

    let interviews = scheduler.list(status, query.date);
    (StatusCode::OK, axum::Json(interviews)).into_response()
}

pub(crate) async fn schedule_handler<D, S>(
    State(scheduler): State<Arc<InterviewScheduler<D, S>>>,
    axum::Json(request): axum::Json<NewInterview>,
) -> Response
where
    D: DocumentStore + 'static,
    S: ScoringService + 'static,
{
    match scheduler.schedule(request).await {
        Ok(scheduled) => (StatusCode::CREATED, axum::Json(scheduled)).into_response(),
        Err(error @ InterviewServiceError::MissingField(_)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn slots_handler<D, S>(
    State(scheduler): State<Arc<InterviewScheduler<D, S>>>,
    Query(query): Query<SlotQuery>,
) -> Response
where
    D: DocumentStore + 'static,
    S: ScoringService + 'static,
{
    (StatusCode::OK, axum::Json(scheduler.slots(query.date))).into_response()
}

pub(crate) async fn calendar_handler(Query(query): Query<MonthQuery>) -> Response {
    match month_grid(query.year, query.month) {
        Some(days) => {
            let view = MonthView {
                year: query.year,
                month: query.month,
                days,
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        None => {
            let payload = json!({ "error": "invalid month", "month": query.month });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::workflows::screening::testing::{NullStore, StubScoring};

    fn router() -> Router {
        let scheduler = InterviewScheduler::new(
            Arc::new(NullStore),
            Some(Arc::new(StubScoring::default())),
        );
        interviews_router(Arc::new(scheduler))
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("request builds")
    }

    async fn read_json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("valid json")
    }

    #[tokio::test]
    async fn scheduled_interview_blocks_its_slot() {
        let router = router();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/interviews")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "candidate_name": "David Kim",
                            "candidate_email": "david.kim@email.com",
                            "kind": "phone",
                            "date": "2024-01-25",
                            "time": "09:30"
                        })
                        .to_string(),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json_body(response).await;
        assert_eq!(body["interview"]["status"], json!("scheduled"));
        assert_eq!(body["email"]["to"], json!("david.kim@email.com"));

        let response = router
            .clone()
            .oneshot(get_request("/api/v1/interviews/slots?date=2024-01-25"))
            .await
            .expect("router responds");
        let slots = read_json_body(response).await;
        assert_eq!(slots[1]["time"], json!("09:30"));
        assert_eq!(slots[1]["available"], json!(false));
        assert_eq!(slots[0]["available"], json!(true));

        let response = router
            .oneshot(get_request("/api/v1/interviews?status=scheduled&date=2024-01-25"))
            .await
            .expect("router responds");
        let listed = read_json_body(response).await;
        assert_eq!(listed.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn calendar_route_returns_padded_month() {
        let response = router()
            .oneshot(get_request("/api/v1/interviews/calendar?year=2024&month=2"))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        // 2024-02-01 is a Thursday.
        let days = body["days"].as_array().cloned().unwrap_or_default();
        assert_eq!(days.len(), 4 + 29);
        assert_eq!(days[3], Value::Null);
        assert_eq!(days[4], json!("2024-02-01"));
    }

    #[tokio::test]
    async fn unknown_status_filter_is_rejected() {
        let response = router()
            .oneshot(get_request("/api/v1/interviews?status=lost"))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
