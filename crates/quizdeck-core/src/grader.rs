//! Per-question grading and the aggregate result.
//!
//! Grading is pure and never fails: wrong-shaped or missing answers earn
//! zero credit instead of raising. Multiple-choice and free-text questions
//! score on a 1-point scale; table-answer questions score on a 100-point
//! scale so partial credit lands at a finer granularity. The mixed scale is
//! deliberate and preserved as-is in the aggregate.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Question, QuestionKind, TableData};
use crate::similarity::{keyword_overlap, normalize, similarity_ratio};

/// Similarity ratio at which a free-text answer counts as correct.
const SIMILARITY_THRESHOLD: f64 = 0.75;
/// Keyword overlap at which a long free-text answer counts as correct.
const KEYWORD_THRESHOLD: f64 = 0.6;
/// Normalized expected answers longer than this get the keyword fallback.
const KEYWORD_MIN_ANSWER_LEN: usize = 10;
/// Point scale for table-answer questions.
const TABLE_ANSWER_MAX: u32 = 100;

/// A submitted answer, shaped by the question variant.
///
/// Stored documents and sessions serialize this untagged, matching the raw
/// values the quiz UI produces: an option index, free text, or a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Option(usize),
    Text(String),
    Table(TableData),
}

/// Per-question grading outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Partial,
    Incorrect,
    Unanswered,
}

/// Earned and maximum points for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionScore {
    pub earned: u32,
    pub max: u32,
    pub verdict: Verdict,
}

/// The graded outcome of one session, computed once at the terminal
/// transition and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingResult {
    /// Unique attempt identifier.
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub total_score: u32,
    pub max_score: u32,
    /// Keyed by question id.
    pub per_question: HashMap<String, QuestionScore>,
}

impl GradingResult {
    /// Total as a percentage of the maximum; `0.0` for an empty result.
    pub fn percentage(&self) -> f64 {
        if self.max_score == 0 {
            0.0
        } else {
            self.total_score as f64 / self.max_score as f64 * 100.0
        }
    }

    /// Save the result as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize result")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write result to {}", path.display()))?;
        Ok(())
    }

    /// Load a result from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read result from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse result JSON")
    }
}

/// Grade one `(question, answer)` pair.
pub fn grade_question(question: &Question, answer: Option<&AnswerValue>) -> QuestionScore {
    match &question.kind {
        QuestionKind::Mcq { correct_option, .. } => grade_mcq(*correct_option, answer),
        QuestionKind::Theory {
            answer: expected,
            is_table_answer,
            ..
        }
        | QuestionKind::FillBlanks {
            answer: expected,
            is_table_answer,
            ..
        } => {
            if *is_table_answer {
                grade_table_answer(answer)
            } else {
                grade_text_answer(expected, answer)
            }
        }
    }
}

/// Grade every question in session order and aggregate.
pub fn grade_questions<'a, I>(
    questions: I,
    answers: &HashMap<String, AnswerValue>,
) -> GradingResult
where
    I: IntoIterator<Item = &'a Question>,
{
    let mut per_question = HashMap::new();
    let mut total_score = 0;
    let mut max_score = 0;

    for question in questions {
        let score = grade_question(question, answers.get(&question.id));
        total_score += score.earned;
        max_score += score.max;
        per_question.insert(question.id.clone(), score);
    }

    GradingResult {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        total_score,
        max_score,
        per_question,
    }
}

fn grade_mcq(correct_option: usize, answer: Option<&AnswerValue>) -> QuestionScore {
    match answer {
        Some(AnswerValue::Option(picked)) if *picked == correct_option => QuestionScore {
            earned: 1,
            max: 1,
            verdict: Verdict::Correct,
        },
        Some(_) => QuestionScore {
            earned: 0,
            max: 1,
            verdict: Verdict::Incorrect,
        },
        None => QuestionScore {
            earned: 0,
            max: 1,
            verdict: Verdict::Unanswered,
        },
    }
}

fn grade_text_answer(expected: &str, answer: Option<&AnswerValue>) -> QuestionScore {
    let raw = match answer {
        Some(AnswerValue::Text(text)) => text.as_str(),
        None => "",
        // Wrong-shaped answers earn nothing.
        Some(_) => {
            return QuestionScore {
                earned: 0,
                max: 1,
                verdict: Verdict::Incorrect,
            }
        }
    };

    let submitted = normalize(raw);
    if submitted.is_empty() {
        return QuestionScore {
            earned: 0,
            max: 1,
            verdict: Verdict::Unanswered,
        };
    }

    let target = normalize(expected);
    // First match wins: exact, then edit-distance, then keyword overlap
    // for long answers.
    let correct = submitted == target
        || similarity_ratio(&submitted, &target) >= SIMILARITY_THRESHOLD
        || (target.len() > KEYWORD_MIN_ANSWER_LEN
            && keyword_overlap(raw, expected) >= KEYWORD_THRESHOLD);

    QuestionScore {
        earned: u32::from(correct),
        max: 1,
        verdict: if correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        },
    }
}

fn grade_table_answer(answer: Option<&AnswerValue>) -> QuestionScore {
    let table = match answer {
        Some(AnswerValue::Table(table)) => table,
        None => {
            return QuestionScore {
                earned: 0,
                max: TABLE_ANSWER_MAX,
                verdict: Verdict::Unanswered,
            }
        }
        Some(_) => {
            return QuestionScore {
                earned: 0,
                max: TABLE_ANSWER_MAX,
                verdict: Verdict::Incorrect,
            }
        }
    };

    // Credit is proportional to rows the user filled in, over the rows the
    // user submitted (not the template).
    let total_rows = table.rows.len();
    if total_rows == 0 {
        return QuestionScore {
            earned: 0,
            max: TABLE_ANSWER_MAX,
            verdict: Verdict::Unanswered,
        };
    }
    let filled_rows = table
        .rows
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .count();
    let earned = (100 * filled_rows / total_rows) as u32;

    QuestionScore {
        earned,
        max: TABLE_ANSWER_MAX,
        verdict: match earned {
            0 => Verdict::Incorrect,
            100 => Verdict::Correct,
            _ => Verdict::Partial,
        },
    }
}
