use rand::rngs::StdRng;
use rand::SeedableRng;
use trainer_backend::models::question::Question;
use trainer_backend::models::test::SourceTestSummary;
use trainer_backend::services::marathon_service::{
    assemble_questions, merge_source_tests, source_summaries, SourceTest,
};
use trainer_backend::services::scoring_service::{ScoringService, UNANSWERED};
use trainer_backend::utils::shuffle::shuffle_options;
use uuid::Uuid;

fn question(correct_answer: i32, options: &[&str]) -> Question {
    Question {
        id: Uuid::new_v4(),
        question: format!("prompt {}", Uuid::new_v4()),
        options: options.iter().map(|s| s.to_string()).collect(),
        correct_answer,
        explanation: Some("see lecture".into()),
    }
}

/// Two overlapping source tests, assembled, answered perfectly, graded.
/// The shared question appears once overall and counts toward both
/// per-test breakdowns.
#[test]
fn marathon_round_trip_scores_100_everywhere() {
    let q1 = question(0, &["alpha", "beta", "gamma"]);
    let q2 = question(1, &["GET", "POST", "PUT", "DELETE"]);
    let q3 = question(2, &["200", "301", "404"]);

    let test_a = SourceTest {
        id: Uuid::new_v4(),
        title: "HTTP Basics".into(),
        questions: vec![q1.clone(), q2.clone()],
    };
    let test_b = SourceTest {
        id: Uuid::new_v4(),
        title: "Status Codes".into(),
        questions: vec![q2.clone(), q3.clone()],
    };

    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let sources = [test_a.clone(), test_b.clone()];
        let merged = assemble_questions(&sources, true, true, &mut rng).unwrap();
        let summaries = source_summaries(&sources, &merged);

        assert_eq!(merged.len(), 3);
        let shared = merged.iter().find(|q| q.id == q2.id).unwrap();
        assert!(shared.source_test_ids.contains(&test_a.id));
        assert!(shared.source_test_ids.contains(&test_b.id));
        assert_eq!(summaries[0].questions_count, 2);
        assert_eq!(summaries[1].questions_count, 2);

        // Answer every question with its remapped correct index.
        let answers: Vec<i32> = merged.iter().map(|q| q.correct_answer).collect();
        let report = ScoringService::aggregate(&merged, &answers, &summaries);

        assert_eq!(report.total_score, 100);
        assert_eq!(report.total_questions, 3);
        assert_eq!(report.correct_answers, 3);
        for score in &report.test_scores {
            assert_eq!((score.score, score.correct, score.total), (100, 2, 2));
        }
    }
}

#[test]
fn marathon_round_trip_with_no_answers_scores_0() {
    let test = SourceTest {
        id: Uuid::new_v4(),
        title: "Requirements".into(),
        questions: vec![
            question(0, &["yes", "no"]),
            question(1, &["a", "b", "c"]),
        ],
    };

    let mut rng = StdRng::seed_from_u64(77);
    let sources = [test];
    let merged = assemble_questions(&sources, true, true, &mut rng).unwrap();
    let summaries = source_summaries(&sources, &merged);

    let report = ScoringService::aggregate(&merged, &[UNANSWERED, UNANSWERED], &summaries);
    assert_eq!(report.total_score, 0);
    assert_eq!(report.correct_answers, 0);
    assert_eq!(report.test_scores[0].total, 2);
}

/// The remapped index always lands on the original correct option text,
/// across many shuffles.
#[test]
fn option_shuffle_keeps_pointing_at_the_same_text() {
    let options: Vec<String> = ["X", "Y", "Z"].iter().map(|s| s.to_string()).collect();
    for seed in 0..1000 {
        let mut rng = StdRng::seed_from_u64(seed);
        let (shuffled, new_index) = shuffle_options(&options, 2, &mut rng).unwrap();
        assert_eq!(shuffled[new_index as usize], "Z");
    }
}

#[test]
fn aggregate_tolerates_stale_source_metadata() {
    let orphan = SourceTestSummary {
        id: Uuid::new_v4(),
        title: "No longer present".into(),
        questions_count: 0,
    };
    let report = ScoringService::aggregate(&[], &[], &[orphan]);
    assert_eq!(report.total_score, 0);
    assert_eq!(report.test_scores[0].score, 0);
    assert_eq!(report.test_scores[0].total, 0);
}

#[test]
fn merge_keeps_first_encounter_order_before_shuffling() {
    let tests: Vec<SourceTest> = (0..3)
        .map(|i| SourceTest {
            id: Uuid::new_v4(),
            title: format!("T{}", i),
            questions: vec![question(0, &["a", "b"]), question(1, &["c", "d"])],
        })
        .collect();

    let merged = merge_source_tests(&tests);
    assert_eq!(merged.len(), 6);
    let expected: Vec<Uuid> = tests
        .iter()
        .flat_map(|t| t.questions.iter().map(|q| q.id))
        .collect();
    let actual: Vec<Uuid> = merged.iter().map(|q| q.id).collect();
    assert_eq!(actual, expected);
}
