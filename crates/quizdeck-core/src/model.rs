//! Core data model types for quizdeck.
//!
//! JSON field names follow the camelCase convention of the stored quiz
//! documents, so files from external authoring tools load unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::EngineError;

/// A stored quiz: metadata plus its question list.
///
/// Immutable once loaded into a session; owned by the storage layer and
/// read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDocument {
    pub course_code: String,
    pub topic: String,
    /// Total marks advertised for the quiz. Display metadata only; the
    /// grader derives the real maximum per question.
    #[serde(default)]
    pub marks: u32,
    /// Time limit in minutes. Fractional values come from course
    /// aggregation (0.4 minutes per question).
    #[serde(rename = "timeLimit", default)]
    pub time_limit_minutes: f64,
    #[serde(default)]
    pub quiz_type: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Context table shown alongside every question; unrelated to grading.
    #[serde(rename = "tableData", default, skip_serializing_if = "Option::is_none")]
    pub reference_table: Option<TableData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One question, polymorphic over its answering mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique within the document; stable across sessions.
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Context table shown with this question; unrelated to grading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_table: Option<TableData>,
    /// Authoring flag: the question renders with a table. Grants extra
    /// session time like table-answer questions do.
    #[serde(default)]
    pub include_table: bool,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// The question variants, tagged by the document's `type` field.
///
/// Modeled as a sum type so the grader matches exhaustively; adding a new
/// question type is a compile-time-checked change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    #[serde(rename_all = "camelCase")]
    Mcq {
        options: Vec<String>,
        /// Index into `options`.
        correct_option: usize,
    },
    #[serde(rename_all = "camelCase")]
    Theory {
        #[serde(default)]
        answer: String,
        #[serde(default)]
        is_table_answer: bool,
        /// Headers and seed rows presented to the user when
        /// `is_table_answer` is set.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        answer_table: Option<TableData>,
    },
    #[serde(rename_all = "camelCase")]
    FillBlanks {
        #[serde(default)]
        answer: String,
        #[serde(default)]
        is_table_answer: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        answer_table: Option<TableData>,
    },
}

/// A rectangular grid of strings: headers plus rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

/// Listing metadata for one stored quiz (the dashboard shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub file_name: String,
    pub course_code: String,
    pub topic: String,
    pub marks: u32,
    #[serde(rename = "timeLimit")]
    pub time_limit_minutes: f64,
    pub quiz_type: String,
    pub question_count: usize,
}

impl Question {
    /// Whether the expected response is a structured table rather than a
    /// scalar value.
    pub fn is_table_answer(&self) -> bool {
        match &self.kind {
            QuestionKind::Mcq { .. } => false,
            QuestionKind::Theory {
                is_table_answer, ..
            }
            | QuestionKind::FillBlanks {
                is_table_answer, ..
            } => *is_table_answer,
        }
    }

    /// Table questions take longer to answer; the session grants each of
    /// them extra time.
    pub fn grants_time_bonus(&self) -> bool {
        self.include_table || self.is_table_answer()
    }
}

impl QuizDocument {
    /// Minimal shape validation for documents arriving from storage.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.course_code.trim().is_empty() {
            return Err(EngineError::MalformedDocument(
                "missing courseCode".to_string(),
            ));
        }
        if self.topic.trim().is_empty() {
            return Err(EngineError::MalformedDocument("missing topic".to_string()));
        }
        let mut seen = HashSet::new();
        for question in &self.questions {
            if !seen.insert(question.id.as_str()) {
                return Err(EngineError::MalformedDocument(format!(
                    "duplicate question id: {}",
                    question.id
                )));
            }
            if let QuestionKind::Mcq {
                options,
                correct_option,
            } = &question.kind
            {
                if options.is_empty() {
                    return Err(EngineError::MalformedDocument(format!(
                        "question {} has no options",
                        question.id
                    )));
                }
                if *correct_option >= options.len() {
                    return Err(EngineError::MalformedDocument(format!(
                        "question {} correctOption out of range",
                        question.id
                    )));
                }
            }
        }
        Ok(())
    }
}
