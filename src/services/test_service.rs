use crate::error::Result;
use crate::models::test::Test;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, serde::Serialize)]
pub struct PaginatedTests {
    #[serde(rename = "items")]
    pub tests: Vec<Test>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

#[derive(Debug, Default)]
pub struct TestFilter {
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct TestService {
    pool: PgPool,
}

impl TestService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_tests(
        &self,
        page: i64,
        per_page: i64,
        filter: Option<TestFilter>,
    ) -> Result<PaginatedTests> {
        let offset = (page - 1) * per_page;
        let filter = filter.unwrap_or_default();

        let difficulty_param: Option<String> = filter.difficulty;
        let category_param: Option<String> = filter.category;
        let search_param: Option<String> = filter.search.map(|s| format!("%{}%", s));

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tests
            WHERE is_published = TRUE
              AND ($1::text IS NULL OR difficulty = $1)
              AND ($2::text IS NULL OR category = $2)
              AND ($3::text IS NULL OR (title ILIKE $3 OR description ILIKE $3))
            "#,
        )
        .bind(&difficulty_param)
        .bind(&category_param)
        .bind(&search_param)
        .fetch_one(&self.pool)
        .await?;

        let total_pages = if per_page > 0 {
            ((total as f64) / (per_page as f64)).ceil() as i64
        } else {
            1
        };

        let tests = sqlx::query_as::<_, Test>(
            r#"
            SELECT * FROM tests
            WHERE is_published = TRUE
              AND ($1::text IS NULL OR difficulty = $1)
              AND ($2::text IS NULL OR category = $2)
              AND ($3::text IS NULL OR (title ILIKE $3 OR description ILIKE $3))
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(&difficulty_param)
        .bind(&category_param)
        .bind(&search_param)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(PaginatedTests {
            tests,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    pub async fn get_test_by_slug(&self, slug: &str) -> Result<Test> {
        let test = sqlx::query_as::<_, Test>(
            r#"SELECT * FROM tests WHERE slug = $1 AND is_published = TRUE"#,
        )
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;
        Ok(test)
    }

    pub async fn get_test_by_id(&self, test_id: Uuid) -> Result<Test> {
        let test = sqlx::query_as::<_, Test>(r#"SELECT * FROM tests WHERE id = $1"#)
            .bind(test_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(test)
    }
}
