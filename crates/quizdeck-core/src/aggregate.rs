//! Synthesizing cumulative quiz documents across the stored corpus.
//!
//! Aggregation is pure over already-fetched `(source key, document)` pairs.
//! Storage may fetch concurrently in any order; pairs are sorted by their
//! source key here, so the concatenation order is stable and reproducible.
//! Every merged question gets a fresh identifier; original ids are never
//! reused, since independent documents routinely collide on them.

use chrono::Utc;

use crate::error::EngineError;
use crate::model::{Question, QuizDocument};

/// Minutes granted per question in a cumulative course exam.
const COURSE_MINUTES_PER_QUESTION: f64 = 0.4;
/// Longest time limit a cumulative course exam may reach, in minutes.
const MAX_COURSE_EXAM_MINUTES: f64 = 180.0;
/// Fixed time limit for the all-course general test, in minutes.
const GENERAL_EXAM_MINUTES: f64 = 20.0;

/// Merge every document whose course code matches (case-insensitively,
/// trimmed) into one cumulative exam for that course.
pub fn aggregate_course(
    documents: &[(String, QuizDocument)],
    course_code: &str,
) -> Result<QuizDocument, EngineError> {
    let target = course_code.trim();
    let questions = collect_questions(documents, |document| {
        document.course_code.trim().eq_ignore_ascii_case(target)
    });
    if questions.is_empty() {
        return Err(EngineError::AggregationNotFound {
            scope: format!("course {target}"),
        });
    }

    let stamp = Utc::now().timestamp_millis();
    let questions = reassign_ids(questions, |index| format!("course_{target}_{index}_{stamp}"));
    let count = questions.len();

    Ok(QuizDocument {
        course_code: target.to_string(),
        topic: format!("Cumulative {target} Exam"),
        marks: count as u32,
        time_limit_minutes: (count as f64 * COURSE_MINUTES_PER_QUESTION)
            .min(MAX_COURSE_EXAM_MINUTES),
        quiz_type: "mixed".to_string(),
        questions,
        reference_table: None,
        created_at: None,
    })
}

/// Merge every stored document, regardless of course, into the all-course
/// general test.
pub fn aggregate_general(
    documents: &[(String, QuizDocument)],
) -> Result<QuizDocument, EngineError> {
    let questions = collect_questions(documents, |_| true);
    if questions.is_empty() {
        return Err(EngineError::AggregationNotFound {
            scope: "general test".to_string(),
        });
    }

    let stamp = Utc::now().timestamp_millis();
    let questions = reassign_ids(questions, |index| format!("gen_{index}_{stamp}"));
    let count = questions.len();

    Ok(QuizDocument {
        course_code: "GEN".to_string(),
        topic: "General Knowledge Test".to_string(),
        marks: count as u32,
        time_limit_minutes: GENERAL_EXAM_MINUTES,
        quiz_type: "mixed".to_string(),
        questions,
        reference_table: None,
        created_at: None,
    })
}

/// Concatenate matching documents' questions in source-key order.
fn collect_questions(
    documents: &[(String, QuizDocument)],
    mut matches: impl FnMut(&QuizDocument) -> bool,
) -> Vec<Question> {
    let mut sorted: Vec<&(String, QuizDocument)> = documents.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted
        .into_iter()
        .filter(|(_, document)| matches(document))
        .flat_map(|(_, document)| document.questions.iter().cloned())
        .collect()
}

fn reassign_ids(
    mut questions: Vec<Question>,
    id_for: impl Fn(usize) -> String,
) -> Vec<Question> {
    for (index, question) in questions.iter_mut().enumerate() {
        question.id = id_for(index);
    }
    questions
}
