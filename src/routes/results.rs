use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::auth::Claims;
use crate::services::result_service::ResultService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ResultListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[axum::debug_handler]
pub async fn list_results(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ResultListQuery>,
) -> crate::error::Result<Response> {
    let user_id = claims.user_id()?;
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let svc = ResultService::new(state.pool.clone());
    let results = svc.list_results(user_id, page, per_page).await?;
    Ok(Json(results).into_response())
}

#[axum::debug_handler]
pub async fn get_result(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(result_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let user_id = claims.user_id()?;
    let svc = ResultService::new(state.pool.clone());
    let result = svc.get_result(user_id, result_id).await?;
    Ok(Json(result).into_response())
}

#[axum::debug_handler]
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> crate::error::Result<Response> {
    let user_id = claims.user_id()?;
    let svc = ResultService::new(state.pool.clone());
    let stats = svc.user_stats(user_id).await?;
    Ok(Json(stats).into_response())
}
