use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use maturity_scoring::assessments::{
    assessment_router, AssessmentScoringService, AssessmentStore,
};
use maturity_scoring::scoring::ScoringMapRepository;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_assessment_routes<S>(
    service: Arc<AssessmentScoringService<S>>,
) -> axum::Router
where
    S: AssessmentStore + 'static,
{
    assessment_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/assessments",
            axum::routing::get(assessment_types_endpoint),
        )
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

pub(crate) async fn assessment_types_endpoint(
    Extension(repository): Extension<Arc<ScoringMapRepository>>,
) -> Json<serde_json::Value> {
    let types: Vec<&str> = repository.assessment_types().collect();
    Json(json!({ "assessmentTypes": types }))
}
