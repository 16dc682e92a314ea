use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata for one source test inside an assembled attempt.
/// `questions_count` is the number of deduplicated questions the test
/// shares with the merged set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceTestSummary {
    pub id: Uuid,
    pub title: String,
    pub questions_count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Test {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub category: Option<String>,
    pub questions: JsonValue,
    pub shuffle_questions: bool,
    pub shuffle_options: bool,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
