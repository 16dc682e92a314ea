use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TestResult {
    pub id: Uuid,
    pub user_id: Uuid,
    pub attempt_id: Option<Uuid>,
    pub test_id: Option<Uuid>,
    pub total_score: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub test_scores: JsonValue,
    pub created_at: DateTime<Utc>,
}
