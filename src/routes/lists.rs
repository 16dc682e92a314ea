use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::list_dto::{AddTestRequest, CreateListRequest, RenameListRequest};
use crate::middleware::auth::Claims;
use crate::services::list_service::ListService;
use crate::AppState;

#[axum::debug_handler]
pub async fn create_list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateListRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let user_id = claims.user_id()?;
    let svc = ListService::new(state.pool.clone());
    let list = svc.create_list(user_id, req.name.trim()).await?;
    Ok((StatusCode::CREATED, Json(list)).into_response())
}

#[axum::debug_handler]
pub async fn list_lists(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> crate::error::Result<Response> {
    let user_id = claims.user_id()?;
    let svc = ListService::new(state.pool.clone());
    let lists = svc.list_lists(user_id).await?;
    Ok(Json(lists).into_response())
}

#[axum::debug_handler]
pub async fn rename_list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(list_id): Path<Uuid>,
    Json(req): Json<RenameListRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let user_id = claims.user_id()?;
    let svc = ListService::new(state.pool.clone());
    let list = svc.rename_list(user_id, list_id, req.name.trim()).await?;
    Ok(Json(list).into_response())
}

#[axum::debug_handler]
pub async fn delete_list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(list_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let user_id = claims.user_id()?;
    let svc = ListService::new(state.pool.clone());
    let deleted = svc.delete_list(user_id, list_id).await?;
    if !deleted {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "list_not_found"})),
        )
            .into_response());
    }
    Ok(Json(json!({"deleted": true})).into_response())
}

#[axum::debug_handler]
pub async fn add_test_to_list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(list_id): Path<Uuid>,
    Json(req): Json<AddTestRequest>,
) -> crate::error::Result<Response> {
    let user_id = claims.user_id()?;
    let svc = ListService::new(state.pool.clone());
    svc.add_test(user_id, list_id, req.test_id).await?;
    Ok(Json(json!({"added": true})).into_response())
}

#[axum::debug_handler]
pub async fn remove_test_from_list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((list_id, test_id)): Path<(Uuid, Uuid)>,
) -> crate::error::Result<Response> {
    let user_id = claims.user_id()?;
    let svc = ListService::new(state.pool.clone());
    let removed = svc.remove_test(user_id, list_id, test_id).await?;
    Ok(Json(json!({"removed": removed})).into_response())
}
