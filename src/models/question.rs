use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One multiple-choice question as stored on a test row. Canonical storage
/// is never shuffled; presentation copies are built per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: i32,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// A question inside an assembled (possibly combined) test, tagged with
/// every source test it belongs to. `correct_answer` refers to the option
/// order carried here, which may already be shuffled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedQuestion {
    pub id: Uuid,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: i32,
    #[serde(default)]
    pub explanation: Option<String>,
    pub source_test_ids: Vec<Uuid>,
}
