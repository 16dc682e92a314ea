use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::pomodoro_dto::{StartSessionRequest, StatsQuery};
use crate::middleware::auth::Claims;
use crate::services::pomodoro_service::PomodoroService;
use crate::AppState;

#[axum::debug_handler]
pub async fn start_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<StartSessionRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let user_id = claims.user_id()?;
    let svc = PomodoroService::new(state.pool.clone());
    let session = svc
        .start_session(user_id, &req.kind, req.duration_seconds)
        .await?;
    Ok((StatusCode::CREATED, Json(session)).into_response())
}

#[axum::debug_handler]
pub async fn complete_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(session_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let user_id = claims.user_id()?;
    let svc = PomodoroService::new(state.pool.clone());
    let session = svc.complete_session(user_id, session_id).await?;
    Ok(Json(session).into_response())
}

#[axum::debug_handler]
pub async fn stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<StatsQuery>,
) -> crate::error::Result<Response> {
    let user_id = claims.user_id()?;
    let days = query.days.unwrap_or(7).clamp(1, 365);
    let svc = PomodoroService::new(state.pool.clone());
    let stats = svc.stats(user_id, days).await?;
    Ok(Json(stats).into_response())
}
