use crate::error::Result;
use crate::models::test_result::TestResult;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug, serde::Serialize)]
pub struct PaginatedResults {
    #[serde(rename = "items")]
    pub results: Vec<TestResult>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

#[derive(Debug, serde::Serialize)]
pub struct UserStats {
    pub attempts: i64,
    pub average_score: Decimal,
    pub best_score: i32,
    pub questions_answered: i64,
}

#[derive(Clone)]
pub struct ResultService {
    pool: PgPool,
}

impl ResultService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_results(
        &self,
        user_id: Uuid,
        page: i64,
        per_page: i64,
    ) -> Result<PaginatedResults> {
        let offset = (page - 1) * per_page;

        let total: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM test_results WHERE user_id = $1"#)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let total_pages = if per_page > 0 {
            ((total as f64) / (per_page as f64)).ceil() as i64
        } else {
            1
        };

        let results = sqlx::query_as::<_, TestResult>(
            r#"
            SELECT * FROM test_results
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(PaginatedResults {
            results,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    pub async fn get_result(&self, user_id: Uuid, result_id: Uuid) -> Result<TestResult> {
        let result = sqlx::query_as::<_, TestResult>(
            r#"SELECT * FROM test_results WHERE id = $1 AND user_id = $2"#,
        )
        .bind(result_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(result)
    }

    pub async fn user_stats(&self, user_id: Uuid) -> Result<UserStats> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS attempts,
                COALESCE(AVG(total_score), 0) AS average_score,
                COALESCE(MAX(total_score), 0) AS best_score,
                COALESCE(SUM(total_questions), 0) AS questions_answered
            FROM test_results
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(UserStats {
            attempts: row.try_get("attempts")?,
            average_score: row.try_get("average_score")?,
            best_score: row.try_get("best_score")?,
            questions_answered: row.try_get::<i64, _>("questions_answered")?,
        })
    }
}
