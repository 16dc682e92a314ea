use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::question::MergedQuestion;
use crate::models::test::Test;

#[derive(Debug, Deserialize)]
pub struct TestListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

/// Catalog entry. Correct answers and explanations are only exposed
/// through an attempt snapshot, never from the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct TestSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub category: Option<String>,
    pub questions_count: usize,
    pub created_at: DateTime<Utc>,
}

impl TestSummary {
    pub fn new(test: &Test, questions_count: usize) -> Self {
        Self {
            id: test.id,
            slug: test.slug.clone(),
            title: test.title.clone(),
            description: test.description.clone(),
            difficulty: test.difficulty.clone(),
            category: test.category.clone(),
            questions_count,
            created_at: test.created_at,
        }
    }
}

impl TryFrom<&Test> for TestSummary {
    type Error = crate::error::Error;

    fn try_from(test: &Test) -> Result<Self, Self::Error> {
        let questions = crate::services::marathon_service::parse_questions(test)?;
        Ok(Self::new(test, questions.len()))
    }
}

/// A question as shown on the public test page: shuffled per the test's
/// flags, with the correct answer and explanation withheld.
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub id: Uuid,
    pub question: String,
    pub options: Vec<String>,
}

impl From<MergedQuestion> for PublicQuestion {
    fn from(q: MergedQuestion) -> Self {
        Self {
            id: q.id,
            question: q.question,
            options: q.options,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TestDetail {
    #[serde(flatten)]
    pub summary: TestSummary,
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Serialize)]
pub struct PaginatedTestsResponse {
    pub items: Vec<TestSummary>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}
