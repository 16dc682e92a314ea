use crate::models::question::MergedQuestion;
use crate::models::test::SourceTestSummary;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel for a question the user never answered. Never equal to a valid
/// option index.
pub const UNANSWERED: i32 = -1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestScore {
    pub test_id: Uuid,
    pub title: String,
    pub score: i32,
    pub correct: i32,
    pub total: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub total_score: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub test_scores: Vec<TestScore>,
}

pub struct ScoringService;

impl ScoringService {
    /// Grades an answer sequence against the questions as presented.
    ///
    /// `answers` is aligned positionally with `questions`; a missing tail
    /// entry counts as unanswered rather than an error, since the sequence
    /// comes from the client. A question contributes to the breakdown of
    /// every source test it belongs to, but only once to the overall score.
    pub fn aggregate(
        questions: &[MergedQuestion],
        answers: &[i32],
        source_tests: &[SourceTestSummary],
    ) -> ScoreReport {
        let answer_at = |idx: usize| answers.get(idx).copied().unwrap_or(UNANSWERED);

        let correct_answers = questions
            .iter()
            .enumerate()
            .filter(|(idx, q)| answer_at(*idx) == q.correct_answer)
            .count();

        let test_scores = source_tests
            .iter()
            .map(|source| {
                let mut correct = 0;
                let mut total = 0;
                for (idx, q) in questions.iter().enumerate() {
                    if !q.source_test_ids.contains(&source.id) {
                        continue;
                    }
                    total += 1;
                    if answer_at(idx) == q.correct_answer {
                        correct += 1;
                    }
                }
                TestScore {
                    test_id: source.id,
                    title: source.title.clone(),
                    score: percentage(correct, total),
                    correct: correct as i32,
                    total: total as i32,
                }
            })
            .collect();

        ScoreReport {
            total_score: percentage(correct_answers, questions.len()),
            total_questions: questions.len() as i32,
            correct_answers: correct_answers as i32,
            test_scores,
        }
    }
}

fn percentage(correct: usize, total: usize) -> i32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: Uuid, correct_answer: i32, sources: &[Uuid]) -> MergedQuestion {
        MergedQuestion {
            id,
            question: format!("q-{}", id),
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_answer,
            explanation: None,
            source_test_ids: sources.to_vec(),
        }
    }

    fn summary(id: Uuid, title: &str) -> SourceTestSummary {
        SourceTestSummary {
            id,
            title: title.to_string(),
            questions_count: 0,
        }
    }

    #[test]
    fn all_correct_scores_100() {
        let t = Uuid::new_v4();
        let questions = vec![
            question(Uuid::new_v4(), 0, &[t]),
            question(Uuid::new_v4(), 2, &[t]),
        ];
        let report = ScoringService::aggregate(&questions, &[0, 2], &[summary(t, "A")]);
        assert_eq!(report.total_score, 100);
        assert_eq!(report.correct_answers, 2);
        assert_eq!(report.test_scores[0].score, 100);
    }

    #[test]
    fn none_correct_scores_0() {
        let t = Uuid::new_v4();
        let questions = vec![
            question(Uuid::new_v4(), 0, &[t]),
            question(Uuid::new_v4(), 1, &[t]),
        ];
        let report = ScoringService::aggregate(&questions, &[1, 0], &[summary(t, "A")]);
        assert_eq!(report.total_score, 0);
        assert_eq!(report.correct_answers, 0);
    }

    #[test]
    fn short_answer_sequence_counts_as_unanswered() {
        let t = Uuid::new_v4();
        let questions = vec![
            question(Uuid::new_v4(), 1, &[t]),
            question(Uuid::new_v4(), 1, &[t]),
            question(Uuid::new_v4(), 1, &[t]),
        ];
        let report = ScoringService::aggregate(&questions, &[1], &[summary(t, "A")]);
        assert_eq!(report.correct_answers, 1);
        assert_eq!(report.total_score, 33);
    }

    #[test]
    fn unanswered_sentinel_never_matches() {
        let t = Uuid::new_v4();
        let questions = vec![question(Uuid::new_v4(), 0, &[t])];
        let report = ScoringService::aggregate(&questions, &[UNANSWERED], &[summary(t, "A")]);
        assert_eq!(report.correct_answers, 0);
    }

    #[test]
    fn source_test_without_questions_scores_0_not_nan() {
        let t = Uuid::new_v4();
        let empty = Uuid::new_v4();
        let questions = vec![question(Uuid::new_v4(), 0, &[t])];
        let report = ScoringService::aggregate(
            &questions,
            &[0],
            &[summary(t, "A"), summary(empty, "B")],
        );
        let b = &report.test_scores[1];
        assert_eq!((b.score, b.correct, b.total), (0, 0, 0));
    }

    #[test]
    fn empty_question_list_scores_0() {
        let report = ScoringService::aggregate(&[], &[], &[]);
        assert_eq!(report.total_score, 0);
        assert_eq!(report.total_questions, 0);
    }

    #[test]
    fn shared_question_counts_toward_both_breakdowns_once_overall() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let q1 = question(Uuid::new_v4(), 0, &[a]);
        let q2 = question(Uuid::new_v4(), 1, &[a, b]);
        let q3 = question(Uuid::new_v4(), 2, &[b]);
        let questions = vec![q1, q2, q3];

        let report = ScoringService::aggregate(
            &questions,
            &[0, 1, 2],
            &[summary(a, "A"), summary(b, "B")],
        );

        assert_eq!(report.total_questions, 3);
        assert_eq!(report.total_score, 100);
        let score_a = &report.test_scores[0];
        let score_b = &report.test_scores[1];
        assert_eq!((score_a.correct, score_a.total, score_a.score), (2, 2, 100));
        assert_eq!((score_b.correct, score_b.total, score_b.score), (2, 2, 100));
    }

    #[test]
    fn percentage_rounds_to_nearest_integer() {
        let t = Uuid::new_v4();
        let questions = vec![
            question(Uuid::new_v4(), 0, &[t]),
            question(Uuid::new_v4(), 0, &[t]),
            question(Uuid::new_v4(), 0, &[t]),
        ];
        // 2/3 -> 66.67 -> 67
        let report = ScoringService::aggregate(&questions, &[0, 0, 1], &[summary(t, "A")]);
        assert_eq!(report.total_score, 67);
    }
}
