use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json, Response},
};

use crate::dto::lecture_dto::LectureListQuery;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_lectures(
    State(state): State<AppState>,
    Query(query): Query<LectureListQuery>,
) -> crate::error::Result<Response> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let lectures = state
        .lecture_service
        .list_lectures(page, per_page, query.category)
        .await?;
    Ok(Json(lectures).into_response())
}

#[axum::debug_handler]
pub async fn get_lecture(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> crate::error::Result<Response> {
    let lecture = state.lecture_service.get_lecture_by_slug(&slug).await?;
    Ok(Json(lecture).into_response())
}
