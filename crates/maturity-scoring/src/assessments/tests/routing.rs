use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::assessments::domain::ScoreSubmission;
use crate::assessments::router::{assessment_router, score_handler};
use crate::assessments::service::AssessmentScoringService;
use crate::scoring::ScoringPolicy;

async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn score_handler_returns_result_envelope() {
    let (service, _store) = build_service(ScoringPolicy::default());
    let submission = submission(answers(&[("q1", text("a"))]), 2.2);

    let response = score_handler::<MemoryStore>(
        State(Arc::new(service)),
        Path(TYPE_NAME.to_string()),
        axum::Json(submission),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["score"], json!(3.0));
    assert_eq!(body["bracket"], json!("score_2"));
    assert_eq!(body["scored"], json!(true));
    assert_eq!(body["assessmentType"], json!(TYPE_NAME));
    assert!(body.get("diagnostics").is_some());
}

#[tokio::test]
async fn diagnostics_are_omitted_unless_requested() {
    let (service, _store) = build_service(ScoringPolicy::default());
    let mut submission = submission(answers(&[("q1", text("a"))]), 2.2);
    submission.include_diagnostics = false;

    let response = score_handler::<MemoryStore>(
        State(Arc::new(service)),
        Path(TYPE_NAME.to_string()),
        axum::Json(submission),
    )
    .await;

    let body = read_json_body(response).await;
    assert!(body.get("diagnostics").is_none());
}

#[tokio::test]
async fn missing_fields_return_bad_request_with_field_names() {
    let (service, _store) = build_service(ScoringPolicy::default());

    let response = score_handler::<MemoryStore>(
        State(Arc::new(service)),
        Path(TYPE_NAME.to_string()),
        axum::Json(ScoreSubmission::default()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(
        body["fields"],
        json!(["answers", "preliminaryScore", "userId"])
    );
}

#[tokio::test]
async fn unknown_assessment_type_returns_not_found() {
    let (service, _store) = build_service(ScoringPolicy::default());
    let submission = submission(answers(&[("q1", text("a"))]), 2.2);

    let response = score_handler::<MemoryStore>(
        State(Arc::new(service)),
        Path("mystery_type".to_string()),
        axum::Json(submission),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn assessment_write_failure_names_the_failed_half() {
    let service = AssessmentScoringService::new(
        repository(ScoringPolicy::default()),
        Arc::new(UnavailableStore),
    );
    let submission = submission(answers(&[("q1", text("a"))]), 2.2);

    let response = score_handler::<UnavailableStore>(
        State(Arc::new(service)),
        Path(TYPE_NAME.to_string()),
        axum::Json(submission),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(body["failedWrite"], json!("assessment"));
    assert_eq!(body["assessmentSaved"], json!(false));
}

#[tokio::test]
async fn rollup_failure_reports_the_saved_half() {
    let service = AssessmentScoringService::new(
        repository(ScoringPolicy::default()),
        Arc::new(RollupFailsStore::default()),
    );
    let submission = submission(answers(&[("q1", text("a"))]), 2.2);

    let response = score_handler::<RollupFailsStore>(
        State(Arc::new(service)),
        Path(TYPE_NAME.to_string()),
        axum::Json(submission),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(body["failedWrite"], json!("profile_rollup"));
    assert_eq!(body["assessmentSaved"], json!(true));
}

#[tokio::test]
async fn router_routes_by_assessment_type_path() {
    let (service, store) = build_service(ScoringPolicy::default());
    let app = assessment_router(Arc::new(service));

    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/v1/assessments/{TYPE_NAME}/score"))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "answers": {"q1": "a"},
                "preliminaryScore": 2.2,
                "userId": "u-1"
            })
            .to_string(),
        ))
        .expect("request builds");

    let response = app.oneshot(request).await.expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.assessments().len(), 1);
}
