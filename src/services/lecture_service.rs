use crate::error::Result;
use crate::models::lecture::Lecture;
use sqlx::PgPool;

#[derive(Debug, serde::Serialize)]
pub struct PaginatedLectures {
    #[serde(rename = "items")]
    pub lectures: Vec<LectureSummary>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

/// Catalog entry without the markdown body; the body is only fetched for
/// the single-lecture endpoint.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct LectureSummary {
    pub id: uuid::Uuid,
    pub slug: String,
    pub title: String,
    pub category: Option<String>,
    pub reading_minutes: i32,
}

#[derive(Clone)]
pub struct LectureService {
    pool: PgPool,
}

impl LectureService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_lectures(
        &self,
        page: i64,
        per_page: i64,
        category: Option<String>,
    ) -> Result<PaginatedLectures> {
        let offset = (page - 1) * per_page;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM lectures
            WHERE is_published = TRUE AND ($1::text IS NULL OR category = $1)
            "#,
        )
        .bind(&category)
        .fetch_one(&self.pool)
        .await?;

        let total_pages = if per_page > 0 {
            ((total as f64) / (per_page as f64)).ceil() as i64
        } else {
            1
        };

        let lectures = sqlx::query_as::<_, LectureSummary>(
            r#"
            SELECT id, slug, title, category, reading_minutes FROM lectures
            WHERE is_published = TRUE AND ($1::text IS NULL OR category = $1)
            ORDER BY created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&category)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(PaginatedLectures {
            lectures,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    pub async fn get_lecture_by_slug(&self, slug: &str) -> Result<Lecture> {
        let lecture = sqlx::query_as::<_, Lecture>(
            r#"SELECT * FROM lectures WHERE slug = $1 AND is_published = TRUE"#,
        )
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;
        Ok(lecture)
    }
}
