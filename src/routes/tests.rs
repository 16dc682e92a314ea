use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json, Response},
    Extension,
};

use crate::dto::test_dto::{
    PaginatedTestsResponse, PublicQuestion, TestDetail, TestListQuery, TestSummary,
};
use crate::middleware::auth::Claims;
use crate::services::marathon_service::{
    assemble_questions, parse_questions, MarathonService, SourceTest,
};
use crate::services::test_service::TestFilter;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_tests(
    State(state): State<AppState>,
    Query(query): Query<TestListQuery>,
) -> crate::error::Result<Response> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let result = state
        .test_service
        .list_tests(
            page,
            per_page,
            Some(TestFilter {
                difficulty: query.difficulty,
                category: query.category,
                search: query.search,
            }),
        )
        .await?;

    let items = result
        .tests
        .iter()
        .map(TestSummary::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let response = PaginatedTestsResponse {
        items,
        total: result.total,
        page: result.page,
        per_page: result.per_page,
        total_pages: result.total_pages,
    };
    Ok(Json(response).into_response())
}

/// One test with its questions shuffled per its own flags. The remapped
/// correct answers stay server-side; grading only ever happens against an
/// attempt snapshot.
#[axum::debug_handler]
pub async fn get_test(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> crate::error::Result<Response> {
    let test = state.test_service.get_test_by_slug(&slug).await?;

    let source = SourceTest {
        id: test.id,
        title: test.title.clone(),
        questions: parse_questions(&test)?,
    };
    let mut rng = rand::thread_rng();
    let questions = assemble_questions(
        std::slice::from_ref(&source),
        test.shuffle_questions,
        test.shuffle_options,
        &mut rng,
    )?;

    let response = TestDetail {
        summary: TestSummary::new(&test, questions.len()),
        questions: questions.into_iter().map(PublicQuestion::from).collect(),
    };
    Ok(Json(response).into_response())
}

/// Starts an attempt for one test, honoring its shuffle settings. The
/// response carries the snapshot the submission will be graded against.
#[axum::debug_handler]
pub async fn start_test(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(slug): Path<String>,
) -> crate::error::Result<Response> {
    let user_id = claims.user_id()?;
    let test = state.test_service.get_test_by_slug(&slug).await?;

    let svc = MarathonService::new(state.pool.clone());
    let assembled = svc.start_test(user_id, &test).await?;
    tracing::info!(attempt_id = %assembled.attempt.id, %slug, "Started single-test attempt");

    Ok(Json(crate::routes::marathon::attempt_response(assembled)).into_response())
}
