use crate::error::{Error, Result};
use crate::models::attempt::Attempt;
use crate::models::question::{MergedQuestion, Question};
use crate::models::test::{SourceTestSummary, Test};
use crate::services::scoring_service::{ScoreReport, ScoringService};
use crate::utils::shuffle::{shuffle_options, shuffled};
use chrono::Utc;
use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

/// A source test already resolved from storage, in the order the caller
/// requested it.
#[derive(Debug, Clone)]
pub struct SourceTest {
    pub id: Uuid,
    pub title: String,
    pub questions: Vec<Question>,
}

#[derive(Debug)]
pub struct AssembledAttempt {
    pub attempt: Attempt,
    pub questions: Vec<MergedQuestion>,
    pub source_tests: Vec<SourceTestSummary>,
}

/// Deduplicates questions across source tests by question id.
/// First-seen-wins: a repeated id keeps the position and content of its
/// first encounter, and only accumulates source-test membership.
pub fn merge_source_tests(sources: &[SourceTest]) -> Vec<MergedQuestion> {
    let mut merged: Vec<MergedQuestion> = Vec::new();

    for source in sources {
        for question in &source.questions {
            if let Some(existing) = merged.iter_mut().find(|m| m.id == question.id) {
                if !existing.source_test_ids.contains(&source.id) {
                    existing.source_test_ids.push(source.id);
                }
            } else {
                merged.push(MergedQuestion {
                    id: question.id,
                    question: question.question.clone(),
                    options: question.options.clone(),
                    correct_answer: question.correct_answer,
                    explanation: question.explanation.clone(),
                    source_test_ids: vec![source.id],
                });
            }
        }
    }

    merged
}

/// Merges, then shuffles each question's options and the question order.
/// Flags exist because a single-test attempt honors the test's own
/// shuffle settings; a marathon always shuffles both.
pub fn assemble_questions<R>(
    sources: &[SourceTest],
    shuffle_question_order: bool,
    shuffle_option_order: bool,
    rng: &mut R,
) -> Result<Vec<MergedQuestion>>
where
    R: Rng + ?Sized,
{
    let mut merged = merge_source_tests(sources);

    if shuffle_option_order {
        for question in merged.iter_mut() {
            let (options, correct_answer) =
                shuffle_options(&question.options, question.correct_answer, rng)?;
            question.options = options;
            question.correct_answer = correct_answer;
        }
    }

    if shuffle_question_order {
        merged = shuffled(&merged, rng);
    }

    Ok(merged)
}

pub fn source_summaries(
    sources: &[SourceTest],
    merged: &[MergedQuestion],
) -> Vec<SourceTestSummary> {
    sources
        .iter()
        .map(|source| SourceTestSummary {
            id: source.id,
            title: source.title.clone(),
            questions_count: merged
                .iter()
                .filter(|q| q.source_test_ids.contains(&source.id))
                .count() as i32,
        })
        .collect()
}

fn difficulty_rank(difficulty: &str) -> u8 {
    match difficulty {
        "easy" => 0,
        "hard" => 2,
        _ => 1,
    }
}

/// A row whose `questions` payload no longer deserializes is a
/// data-integrity problem; it must fail loudly, not contribute an empty
/// question list.
pub fn parse_questions(test: &Test) -> Result<Vec<Question>> {
    serde_json::from_value(test.questions.clone()).map_err(|e| {
        Error::Internal(format!(
            "test {}: malformed questions payload: {}",
            test.id, e
        ))
    })
}

#[derive(Clone)]
pub struct MarathonService {
    pool: PgPool,
}

impl MarathonService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Assembles a combined test from the requested source tests and
    /// persists the presented snapshot so submission can be graded
    /// server-side against exactly what the user saw.
    pub async fn create_marathon(
        &self,
        user_id: Uuid,
        test_ids: &[Uuid],
    ) -> Result<AssembledAttempt> {
        let mut requested: Vec<Uuid> = Vec::new();
        for id in test_ids {
            if !requested.contains(id) {
                requested.push(*id);
            }
        }

        let rows = sqlx::query_as::<_, Test>(
            r#"SELECT * FROM tests WHERE id = ANY($1) AND is_published = TRUE"#,
        )
        .bind(&requested)
        .fetch_all(&self.pool)
        .await?;

        // Preserve the caller's ordering; unknown ids are dropped here so
        // the assembler never sees them.
        let tests: Vec<Test> = requested
            .iter()
            .filter_map(|id| rows.iter().find(|t| t.id == *id).cloned())
            .collect();

        if tests.is_empty() {
            return Err(Error::NotFound(
                "None of the requested tests exist".to_string(),
            ));
        }
        if tests.len() < requested.len() {
            tracing::warn!(
                requested = requested.len(),
                found = tests.len(),
                "Some marathon source tests were not found and were skipped"
            );
        }

        let mut sources = Vec::with_capacity(tests.len());
        for t in &tests {
            sources.push(SourceTest {
                id: t.id,
                title: t.title.clone(),
                questions: parse_questions(t)?,
            });
        }

        let merged = {
            let mut rng = rand::thread_rng();
            assemble_questions(&sources, true, true, &mut rng)?
        };
        let summaries = source_summaries(&sources, &merged);

        let title = if tests.len() == 1 {
            tests[0].title.clone()
        } else {
            format!(
                "Marathon: {}",
                tests
                    .iter()
                    .map(|t| t.title.as_str())
                    .collect::<Vec<_>>()
                    .join(" + ")
            )
        };
        let description = format!("Combined test assembled from {} source tests", tests.len());
        let difficulty = tests
            .iter()
            .map(|t| t.difficulty.as_str())
            .max_by_key(|d| difficulty_rank(d))
            .unwrap_or("medium")
            .to_string();

        let attempt = self
            .insert_attempt(user_id, &title, Some(&description), &difficulty, &merged, &summaries)
            .await?;

        Ok(AssembledAttempt {
            attempt,
            questions: merged,
            source_tests: summaries,
        })
    }

    /// Starts a single-test attempt, honoring the test's own shuffle flags.
    pub async fn start_test(&self, user_id: Uuid, test: &Test) -> Result<AssembledAttempt> {
        let source = SourceTest {
            id: test.id,
            title: test.title.clone(),
            questions: parse_questions(test)?,
        };

        let merged = {
            let mut rng = rand::thread_rng();
            assemble_questions(
                std::slice::from_ref(&source),
                test.shuffle_questions,
                test.shuffle_options,
                &mut rng,
            )?
        };
        let summaries = source_summaries(std::slice::from_ref(&source), &merged);

        let attempt = self
            .insert_attempt(
                user_id,
                &test.title,
                test.description.as_deref(),
                &test.difficulty,
                &merged,
                &summaries,
            )
            .await?;

        Ok(AssembledAttempt {
            attempt,
            questions: merged,
            source_tests: summaries,
        })
    }

    async fn insert_attempt(
        &self,
        user_id: Uuid,
        title: &str,
        description: Option<&str>,
        difficulty: &str,
        questions: &[MergedQuestion],
        source_tests: &[SourceTestSummary],
    ) -> Result<Attempt> {
        let snapshot = serde_json::to_value(questions)?;
        let sources_json = serde_json::to_value(source_tests)?;

        let attempt = sqlx::query_as::<_, Attempt>(
            r#"
            INSERT INTO attempts (user_id, title, description, difficulty, questions_snapshot, source_tests, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'in_progress')
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(difficulty)
        .bind(snapshot)
        .bind(sources_json)
        .fetch_one(&self.pool)
        .await?;

        Ok(attempt)
    }

    pub async fn get_attempt(&self, user_id: Uuid, attempt_id: Uuid) -> Result<Attempt> {
        let attempt = sqlx::query_as::<_, Attempt>(
            r#"SELECT * FROM attempts WHERE id = $1 AND user_id = $2"#,
        )
        .bind(attempt_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(attempt)
    }

    /// Grades the answers against the snapshot, records the result, and
    /// marks the attempt completed.
    pub async fn submit_attempt(
        &self,
        attempt: &Attempt,
        answers: &[i32],
    ) -> Result<(ScoreReport, Uuid)> {
        let questions: Vec<MergedQuestion> =
            serde_json::from_value(attempt.questions_snapshot.clone())?;
        let source_tests: Vec<SourceTestSummary> =
            serde_json::from_value(attempt.source_tests.clone())?;

        let report = ScoringService::aggregate(&questions, answers, &source_tests);

        let mut test_scores = serde_json::Map::new();
        for score in &report.test_scores {
            test_scores.insert(
                score.test_id.to_string(),
                serde_json::json!({
                    "title": score.title,
                    "score": score.score,
                    "correct": score.correct,
                    "total": score.total,
                }),
            );
        }
        let single_test_id = if report.test_scores.len() == 1 {
            Some(report.test_scores[0].test_id)
        } else {
            None
        };

        let result_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO test_results (user_id, attempt_id, test_id, total_score, total_questions, correct_answers, test_scores)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(attempt.user_id)
        .bind(attempt.id)
        .bind(single_test_id)
        .bind(report.total_score)
        .bind(report.total_questions)
        .bind(report.correct_answers)
        .bind(serde_json::Value::Object(test_scores))
        .fetch_one(&self.pool)
        .await?;

        sqlx::query(
            r#"UPDATE attempts SET status = 'completed', completed_at = $1 WHERE id = $2"#,
        )
        .bind(Utc::now())
        .bind(attempt.id)
        .execute(&self.pool)
        .await?;

        Ok((report, result_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(id: Uuid, correct_answer: i32) -> Question {
        Question {
            id,
            question: format!("q-{}", id),
            options: vec!["one".into(), "two".into(), "three".into()],
            correct_answer,
            explanation: Some("because".into()),
        }
    }

    #[test]
    fn merge_deduplicates_by_question_id() {
        let shared = question(Uuid::new_v4(), 1);
        let a = SourceTest {
            id: Uuid::new_v4(),
            title: "A".into(),
            questions: vec![question(Uuid::new_v4(), 0), shared.clone()],
        };
        let b = SourceTest {
            id: Uuid::new_v4(),
            title: "B".into(),
            questions: vec![shared.clone(), question(Uuid::new_v4(), 2)],
        };

        let merged = merge_source_tests(&[a.clone(), b.clone()]);

        assert_eq!(merged.len(), 3);
        let shared_merged = merged.iter().find(|q| q.id == shared.id).unwrap();
        assert!(shared_merged.source_test_ids.contains(&a.id));
        assert!(shared_merged.source_test_ids.contains(&b.id));
        assert_eq!(merged.iter().filter(|q| q.id == shared.id).count(), 1);
    }

    #[test]
    fn merge_is_first_seen_wins_for_position_and_content() {
        let shared_id = Uuid::new_v4();
        let mut first = question(shared_id, 0);
        first.question = "original wording".into();
        let mut later = question(shared_id, 2);
        later.question = "changed wording".into();

        let a = SourceTest {
            id: Uuid::new_v4(),
            title: "A".into(),
            questions: vec![first],
        };
        let b = SourceTest {
            id: Uuid::new_v4(),
            title: "B".into(),
            questions: vec![later],
        };

        let merged = merge_source_tests(&[a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].question, "original wording");
        assert_eq!(merged[0].correct_answer, 0);
        assert_eq!(merged[0].source_test_ids.len(), 2);
    }

    #[test]
    fn merge_count_equals_distinct_question_ids() {
        let q1 = question(Uuid::new_v4(), 0);
        let q2 = question(Uuid::new_v4(), 1);
        let q3 = question(Uuid::new_v4(), 2);
        let a = SourceTest {
            id: Uuid::new_v4(),
            title: "A".into(),
            questions: vec![q1.clone(), q2.clone()],
        };
        let b = SourceTest {
            id: Uuid::new_v4(),
            title: "B".into(),
            questions: vec![q2.clone(), q3.clone(), q1.clone()],
        };
        let merged = merge_source_tests(&[a, b]);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn empty_sources_produce_empty_result() {
        assert!(merge_source_tests(&[]).is_empty());
        let empty = SourceTest {
            id: Uuid::new_v4(),
            title: "empty".into(),
            questions: vec![],
        };
        assert!(merge_source_tests(&[empty]).is_empty());
    }

    #[test]
    fn assemble_remaps_correct_answers() {
        let a = SourceTest {
            id: Uuid::new_v4(),
            title: "A".into(),
            questions: vec![question(Uuid::new_v4(), 2), question(Uuid::new_v4(), 0)],
        };
        let originals: Vec<(Uuid, String)> = a
            .questions
            .iter()
            .map(|q| (q.id, q.options[q.correct_answer as usize].clone()))
            .collect();

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let merged = assemble_questions(&[a.clone()], true, true, &mut rng).unwrap();
            for q in &merged {
                let expected = &originals.iter().find(|(id, _)| *id == q.id).unwrap().1;
                assert_eq!(&q.options[q.correct_answer as usize], expected);
            }
        }
    }

    #[test]
    fn assemble_propagates_bad_correct_index() {
        let mut bad = question(Uuid::new_v4(), 0);
        bad.correct_answer = 99;
        let source = SourceTest {
            id: Uuid::new_v4(),
            title: "broken".into(),
            questions: vec![bad],
        };
        let mut rng = StdRng::seed_from_u64(5);
        assert!(assemble_questions(&[source], true, true, &mut rng).is_err());
    }

    #[test]
    fn assemble_without_shuffling_preserves_everything() {
        let a = SourceTest {
            id: Uuid::new_v4(),
            title: "A".into(),
            questions: vec![question(Uuid::new_v4(), 1), question(Uuid::new_v4(), 2)],
        };
        let mut rng = StdRng::seed_from_u64(9);
        let merged = assemble_questions(&[a.clone()], false, false, &mut rng).unwrap();
        assert_eq!(merged.len(), 2);
        for (merged_q, original) in merged.iter().zip(&a.questions) {
            assert_eq!(merged_q.id, original.id);
            assert_eq!(merged_q.options, original.options);
            assert_eq!(merged_q.correct_answer, original.correct_answer);
        }
    }

    #[test]
    fn parse_questions_rejects_malformed_payload() {
        let now = chrono::Utc::now();
        let test = Test {
            id: Uuid::new_v4(),
            slug: "broken".into(),
            title: "Broken".into(),
            description: None,
            difficulty: "medium".into(),
            category: None,
            questions: serde_json::json!({"not": "an array"}),
            shuffle_questions: true,
            shuffle_options: true,
            is_published: true,
            created_at: now,
            updated_at: now,
        };
        assert!(parse_questions(&test).is_err());
    }

    #[test]
    fn summaries_count_shared_questions_for_each_test() {
        let shared = question(Uuid::new_v4(), 0);
        let a = SourceTest {
            id: Uuid::new_v4(),
            title: "A".into(),
            questions: vec![question(Uuid::new_v4(), 0), shared.clone()],
        };
        let b = SourceTest {
            id: Uuid::new_v4(),
            title: "B".into(),
            questions: vec![shared, question(Uuid::new_v4(), 1)],
        };
        let merged = merge_source_tests(&[a.clone(), b.clone()]);
        let summaries = source_summaries(&[a, b], &merged);
        assert_eq!(summaries[0].questions_count, 2);
        assert_eq!(summaries[1].questions_count, 2);
    }
}
