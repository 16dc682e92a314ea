use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::marathon_dto::{
    AttemptResponse, CreateMarathonRequest, SubmitAttemptRequest, SubmitAttemptResponse,
};
use crate::middleware::auth::Claims;
use crate::models::question::MergedQuestion;
use crate::models::test::SourceTestSummary;
use crate::services::marathon_service::{AssembledAttempt, MarathonService};
use crate::AppState;

pub(crate) fn attempt_response(assembled: AssembledAttempt) -> AttemptResponse {
    AttemptResponse {
        id: assembled.attempt.id,
        title: assembled.attempt.title,
        description: assembled.attempt.description,
        difficulty: assembled.attempt.difficulty,
        status: assembled.attempt.status,
        questions_count: assembled.questions.len(),
        questions: assembled.questions,
        source_tests: assembled.source_tests,
        created_at: assembled.attempt.created_at,
    }
}

#[utoipa::path(
    post,
    path = "/api/marathon",
    request_body = CreateMarathonRequest,
    responses(
        (status = 200, description = "Combined test assembled", body = Json<serde_json::Value>),
        (status = 400, description = "Invalid request payload"),
        (status = 404, description = "No matching tests"),
    ),
)]
#[axum::debug_handler]
pub async fn create_marathon(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateMarathonRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let user_id = claims.user_id()?;

    let svc = MarathonService::new(state.pool.clone());
    let assembled = svc.create_marathon(user_id, &req.test_ids).await?;
    tracing::info!(
        attempt_id = %assembled.attempt.id,
        sources = assembled.source_tests.len(),
        questions = assembled.questions.len(),
        "Assembled marathon attempt"
    );

    Ok(Json(attempt_response(assembled)).into_response())
}

#[axum::debug_handler]
pub async fn get_attempt(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(attempt_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let user_id = claims.user_id()?;
    let svc = MarathonService::new(state.pool.clone());
    let attempt = svc.get_attempt(user_id, attempt_id).await?;

    let questions: Vec<MergedQuestion> =
        serde_json::from_value(attempt.questions_snapshot.clone())?;
    let source_tests: Vec<SourceTestSummary> =
        serde_json::from_value(attempt.source_tests.clone())?;

    Ok(Json(attempt_response(AssembledAttempt {
        attempt,
        questions,
        source_tests,
    }))
    .into_response())
}

#[utoipa::path(
    post,
    path = "/api/attempts/{id}/submit",
    params(
        ("id" = Uuid, Path, description = "Attempt ID")
    ),
    request_body = SubmitAttemptRequest,
    responses(
        (status = 200, description = "Attempt graded", body = Json<serde_json::Value>),
        (status = 404, description = "Attempt not found"),
        (status = 409, description = "Attempt already submitted"),
    ),
)]
#[axum::debug_handler]
pub async fn submit_attempt(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(attempt_id): Path<Uuid>,
    Json(req): Json<SubmitAttemptRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let user_id = claims.user_id()?;

    let svc = MarathonService::new(state.pool.clone());
    let attempt = svc.get_attempt(user_id, attempt_id).await?;

    if attempt.status == "completed" {
        tracing::warn!(%attempt_id, "Rejected duplicate submission");
        return Ok((
            StatusCode::CONFLICT,
            Json(json!({
                "error": "already_completed",
                "message": "This attempt has already been submitted"
            })),
        )
            .into_response());
    }

    let (report, result_id) = svc.submit_attempt(&attempt, &req.answers).await?;
    tracing::info!(
        %attempt_id,
        score = report.total_score,
        correct = report.correct_answers,
        "Attempt graded"
    );

    Ok(Json(SubmitAttemptResponse {
        attempt_id: attempt.id,
        result_id,
        status: "completed".to_string(),
        total_score: report.total_score,
        total_questions: report.total_questions,
        correct_answers: report.correct_answers,
        test_scores: report.test_scores,
    })
    .into_response())
}
