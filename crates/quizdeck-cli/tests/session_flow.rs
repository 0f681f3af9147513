//! End-to-end flow through the library: store → aggregate → session → grade.

use quizdeck_core::aggregate::{aggregate_course, aggregate_general};
use quizdeck_core::grader::AnswerValue;
use quizdeck_core::model::{Question, QuestionKind, QuizDocument};
use quizdeck_core::session::{Phase, QuizSession};
use quizdeck_core::traits::QuizStore;
use quizdeck_store::MemoryStore;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn mcq(id: &str, correct_option: usize) -> Question {
    Question {
        id: id.into(),
        text: format!("Question {id}"),
        explanation: None,
        reference_table: None,
        include_table: false,
        kind: QuestionKind::Mcq {
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_option,
        },
    }
}

fn doc(course_code: &str, topic: &str, questions: Vec<Question>) -> QuizDocument {
    QuizDocument {
        course_code: course_code.into(),
        topic: topic.into(),
        marks: questions.len() as u32,
        time_limit_minutes: 10.0,
        quiz_type: "mcq".into(),
        questions,
        reference_table: None,
        created_at: None,
    }
}

fn seeded_store() -> MemoryStore {
    MemoryStore::with_documents([
        (
            "ACC101_Ledgers.json".to_string(),
            doc("ACC101", "Ledgers", vec![mcq("q1", 0), mcq("q2", 1)]),
        ),
        (
            "FIN200_Bonds.json".to_string(),
            // Id collides with the other document on purpose.
            doc("FIN200", "Bonds", vec![mcq("q1", 2)]),
        ),
    ])
}

#[tokio::test]
async fn general_exam_full_walkthrough() {
    let store = seeded_store();
    let documents = store.load_all().await.unwrap();
    let exam = aggregate_general(&documents).unwrap();
    assert_eq!(exam.questions.len(), 3);

    // Correct options by position in the synthesized exam, keyed off the
    // deterministic source ordering (ACC101 file first).
    let correct_by_index = [0usize, 1, 2];

    let mut rng = StdRng::seed_from_u64(99);
    let mut session = QuizSession::start(exam, &mut rng).unwrap();
    assert_eq!(session.question_count(), 3);

    for id in session.ordered_ids().to_vec() {
        let index: usize = id.split('_').nth(1).unwrap().parse().unwrap();
        session
            .record_answer(&id, AnswerValue::Option(correct_by_index[index]))
            .unwrap();
    }
    for _ in 0..3 {
        session.advance();
    }

    assert_eq!(session.phase(), Phase::Finished);
    let result = session.result().unwrap();
    assert_eq!(result.total_score, 3);
    assert_eq!(result.max_score, 3);
}

#[tokio::test]
async fn course_exam_only_includes_matching_documents() {
    let store = seeded_store();
    let documents = store.load_all().await.unwrap();

    let exam = aggregate_course(&documents, "acc101").unwrap();
    assert_eq!(exam.questions.len(), 2);
    assert!(exam.questions.iter().all(|q| q.id.starts_with("course_")));

    assert!(aggregate_course(&documents, "BIO999").is_err());
}

#[tokio::test]
async fn retake_after_timeout_produces_fresh_attempt() {
    let store = seeded_store();
    let document = store.load("ACC101_Ledgers.json").await.unwrap();

    let mut rng = StdRng::seed_from_u64(3);
    let mut session = QuizSession::start(document, &mut rng).unwrap();
    let budget = session.remaining_seconds();

    for _ in 0..budget {
        session.tick();
    }
    assert_eq!(session.phase(), Phase::Finished);
    let first_attempt = session.result().unwrap().id;

    session.retake(&mut rng);
    assert_eq!(session.phase(), Phase::InProgress);
    assert_eq!(session.remaining_seconds(), budget);
    assert!(session.result().is_none());

    session.finish();
    assert_ne!(session.result().unwrap().id, first_attempt);
}
