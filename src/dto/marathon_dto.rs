use crate::models::question::MergedQuestion;
use crate::models::test::SourceTestSummary;
use crate::services::scoring_service::TestScore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMarathonRequest {
    #[validate(length(min = 1, max = 20, message = "Between 1 and 20 test ids are required"))]
    pub test_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAttemptRequest {
    #[validate(length(max = 500))]
    pub answers: Vec<i32>,
}

/// The assembled test exactly as presented to the user.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub status: String,
    pub questions_count: usize,
    pub questions: Vec<MergedQuestion>,
    pub source_tests: Vec<SourceTestSummary>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitAttemptResponse {
    pub attempt_id: Uuid,
    pub result_id: Uuid,
    pub status: String,
    pub total_score: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub test_scores: Vec<TestScore>,
}
