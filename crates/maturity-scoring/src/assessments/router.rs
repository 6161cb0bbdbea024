use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::domain::ScoreSubmission;
use super::service::{AssessmentScoringService, AssessmentServiceError, ScoredAssessment};
use super::store::AssessmentStore;
use crate::scoring::ScoringMapError;

/// Router builder exposing the scoring endpoint.
pub fn assessment_router<S>(service: Arc<AssessmentScoringService<S>>) -> Router
where
    S: AssessmentStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/assessments/:assessment_type/score",
            post(score_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn score_handler<S>(
    State(service): State<Arc<AssessmentScoringService<S>>>,
    Path(assessment_type): Path<String>,
    axum::Json(submission): axum::Json<ScoreSubmission>,
) -> Response
where
    S: AssessmentStore + 'static,
{
    match service.score(&assessment_type, submission) {
        Ok(outcome) => success_response(outcome),
        Err(AssessmentServiceError::Validation(error)) => {
            let payload = json!({
                "error": error.to_string(),
                "fields": error.fields(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(AssessmentServiceError::ScoringMap(ScoringMapError::UnknownAssessmentType {
            assessment_type,
        })) => {
            let payload = json!({
                "error": format!("unknown assessment type '{assessment_type}'"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(AssessmentServiceError::ScoringMap(error)) => {
            let payload = json!({
                "error": "scoring map unavailable",
                "detail": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
        Err(AssessmentServiceError::AssessmentWrite(error)) => {
            let payload = json!({
                "error": error.to_string(),
                "failedWrite": "assessment",
                "assessmentSaved": false,
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
        Err(AssessmentServiceError::ProfileRollup(error)) => {
            let payload = json!({
                "error": error.to_string(),
                "failedWrite": "profile_rollup",
                "assessmentSaved": true,
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn success_response(outcome: ScoredAssessment) -> Response {
    let mut payload = json!({
        "assessmentType": outcome.assessment_type,
        "userId": outcome.user_id.0,
        "score": outcome.result.final_score,
        "bracket": outcome.result.bracket,
        "scored": outcome.result.scored,
    });
    if outcome.include_diagnostics {
        if let Some(body) = payload.as_object_mut() {
            body.insert(
                "diagnostics".to_string(),
                serde_json::to_value(&outcome.result.diagnostics).unwrap_or_default(),
            );
        }
    }
    (StatusCode::OK, axum::Json(payload)).into_response()
}
