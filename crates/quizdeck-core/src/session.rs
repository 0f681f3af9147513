//! The timed quiz session state machine.
//!
//! A session owns one attempt at a quiz document: it draws a bounded,
//! shuffled subset of the questions, counts a timer down, captures answers,
//! and grades everything exactly once at the terminal transition. Retaking
//! re-runs the whole selection procedure; nothing from the previous attempt
//! survives.

use std::collections::HashMap;

use rand::Rng;

use crate::error::EngineError;
use crate::grader::{grade_questions, AnswerValue, GradingResult};
use crate::model::{Question, QuizDocument};

/// Cap on the number of questions drawn into one attempt.
pub const MAX_SESSION_QUESTIONS: usize = 40;
/// Extra seconds granted per selected question that carries a table.
pub const TABLE_TIME_BONUS_SECS: u32 = 5 * 60;

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Finished,
}

/// One timed attempt at a quiz document.
#[derive(Debug)]
pub struct QuizSession {
    document: QuizDocument,
    /// Ids of the selected questions, in presentation order. A permutation
    /// of a subset of the document's questions; each id unique.
    order: Vec<String>,
    answers: HashMap<String, AnswerValue>,
    current_index: usize,
    remaining_seconds: u32,
    phase: Phase,
    result: Option<GradingResult>,
}

impl QuizSession {
    /// Start a fresh attempt at `document`.
    ///
    /// Shuffles the full question list (uniform Fisher–Yates via `rng`),
    /// keeps at most [`MAX_SESSION_QUESTIONS`], and arms the countdown. The
    /// random source is injected so callers can seed it for reproducible
    /// orderings.
    pub fn start<R: Rng>(document: QuizDocument, rng: &mut R) -> Result<Self, EngineError> {
        if document.questions.is_empty() {
            return Err(EngineError::EmptyQuestionSet);
        }
        let mut session = Self {
            document,
            order: Vec::new(),
            answers: HashMap::new(),
            current_index: 0,
            remaining_seconds: 0,
            phase: Phase::InProgress,
            result: None,
        };
        session.reset(rng);
        Ok(session)
    }

    /// Re-run the selection procedure: fresh shuffle, fresh truncation,
    /// fresh timer, answers cleared, prior result discarded.
    fn reset<R: Rng>(&mut self, rng: &mut R) {
        let mut order: Vec<String> = self
            .document
            .questions
            .iter()
            .map(|q| q.id.clone())
            .collect();

        // Fisher–Yates, back to front.
        for i in (1..order.len()).rev() {
            let j = rng.gen_range(0..=i);
            order.swap(i, j);
        }
        order.truncate(MAX_SESSION_QUESTIONS);

        let bonus_questions = order
            .iter()
            .filter_map(|id| self.question(id))
            .filter(|q| q.grants_time_bonus())
            .count() as u32;

        self.remaining_seconds =
            (self.document.time_limit_minutes * 60.0) as u32 + bonus_questions * TABLE_TIME_BONUS_SECS;
        self.order = order;
        self.answers.clear();
        self.current_index = 0;
        self.phase = Phase::InProgress;
        self.result = None;
    }

    /// Record (or overwrite) an answer for a question in the active set.
    ///
    /// The value's shape is not checked against the question variant here;
    /// the grader degrades mismatches to zero credit.
    pub fn record_answer(
        &mut self,
        question_id: &str,
        value: AnswerValue,
    ) -> Result<(), EngineError> {
        if self.phase == Phase::Finished {
            tracing::warn!(question_id, "answer recorded after finish, ignoring");
            return Ok(());
        }
        if !self.order.iter().any(|id| id == question_id) {
            return Err(EngineError::InvalidQuestion {
                id: question_id.to_string(),
            });
        }
        self.answers.insert(question_id.to_string(), value);
        Ok(())
    }

    /// Jump to a question by position. Out-of-range requests clamp to the
    /// valid range rather than erroring.
    pub fn go_to(&mut self, index: usize) {
        if self.phase == Phase::Finished {
            return;
        }
        self.current_index = index.min(self.order.len() - 1);
    }

    /// Move to the next question, or finish when already on the last one.
    pub fn advance(&mut self) {
        if self.phase == Phase::Finished {
            return;
        }
        if self.current_index + 1 < self.order.len() {
            self.current_index += 1;
        } else {
            self.finish();
        }
    }

    /// One countdown step, called at ~1 Hz while in progress. Reaching zero
    /// finishes the session; it is a normal trigger, not an error.
    pub fn tick(&mut self) {
        if self.phase == Phase::Finished {
            return;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.finish();
        }
    }

    /// Grade every selected question and enter the terminal phase.
    ///
    /// Idempotent: the result is computed exactly once; later calls are
    /// no-ops.
    pub fn finish(&mut self) {
        if self.result.is_some() {
            return;
        }
        let result = {
            let selected = self.order.iter().filter_map(|id| self.question(id));
            grade_questions(selected, &self.answers)
        };
        self.result = Some(result);
        self.phase = Phase::Finished;
    }

    /// Start a brand-new attempt at the same document. Valid from the
    /// finished phase only; ignored mid-attempt.
    pub fn retake<R: Rng>(&mut self, rng: &mut R) {
        if self.phase != Phase::Finished {
            tracing::warn!("retake requested mid-attempt, ignoring");
            return;
        }
        self.reset(rng);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Ids of the selected questions in presentation order.
    pub fn ordered_ids(&self) -> &[String] {
        &self.order
    }

    pub fn question_count(&self) -> usize {
        self.order.len()
    }

    pub fn document(&self) -> &QuizDocument {
        &self.document
    }

    /// Look a selected question up by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.document.questions.iter().find(|q| q.id == id)
    }

    /// The question at the current index. `None` only after finish.
    pub fn current_question(&self) -> Option<&Question> {
        self.order
            .get(self.current_index)
            .and_then(|id| self.question(id))
    }

    pub fn answer(&self, question_id: &str) -> Option<&AnswerValue> {
        self.answers.get(question_id)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// The grading result; present once finished.
    pub fn result(&self) -> Option<&GradingResult> {
        self.result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionKind, TableData};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

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

    fn table_theory(id: &str) -> Question {
        Question {
            id: id.into(),
            text: format!("Question {id}"),
            explanation: None,
            reference_table: None,
            include_table: false,
            kind: QuestionKind::Theory {
                answer: String::new(),
                is_table_answer: true,
                answer_table: Some(TableData::default()),
            },
        }
    }

    fn doc(time_limit_minutes: f64, questions: Vec<Question>) -> QuizDocument {
        QuizDocument {
            course_code: "ACC101".into(),
            topic: "Ledgers".into(),
            marks: questions.len() as u32,
            time_limit_minutes,
            quiz_type: "mixed".into(),
            questions,
            reference_table: None,
            created_at: None,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn small_quiz_selects_a_permutation() {
        let questions: Vec<Question> = (0..10).map(|i| mcq(&format!("q{i}"), 0)).collect();
        let source_ids: HashSet<String> = questions.iter().map(|q| q.id.clone()).collect();

        let session = QuizSession::start(doc(10.0, questions), &mut rng()).unwrap();
        let selected: HashSet<String> = session.ordered_ids().iter().cloned().collect();

        assert_eq!(session.question_count(), 10);
        assert_eq!(selected, source_ids);
    }

    #[test]
    fn large_quiz_truncates_to_forty_distinct() {
        let questions: Vec<Question> = (0..75).map(|i| mcq(&format!("q{i}"), 0)).collect();
        let source_ids: HashSet<String> = questions.iter().map(|q| q.id.clone()).collect();

        let session = QuizSession::start(doc(60.0, questions), &mut rng()).unwrap();
        let selected: HashSet<String> = session.ordered_ids().iter().cloned().collect();

        assert_eq!(session.question_count(), MAX_SESSION_QUESTIONS);
        assert_eq!(selected.len(), MAX_SESSION_QUESTIONS);
        assert!(selected.is_subset(&source_ids));
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let questions: Vec<Question> = (0..20).map(|i| mcq(&format!("q{i}"), 0)).collect();
        let a = QuizSession::start(doc(10.0, questions.clone()), &mut rng()).unwrap();
        let b = QuizSession::start(doc(10.0, questions), &mut rng()).unwrap();
        assert_eq!(a.ordered_ids(), b.ordered_ids());
    }

    #[test]
    fn empty_quiz_cannot_start() {
        let result = QuizSession::start(doc(10.0, vec![]), &mut rng());
        assert!(matches!(result, Err(EngineError::EmptyQuestionSet)));
    }

    #[test]
    fn timer_starts_from_minutes_plus_table_bonus() {
        let session = QuizSession::start(doc(10.0, vec![mcq("q1", 0)]), &mut rng()).unwrap();
        assert_eq!(session.remaining_seconds(), 600);

        let mut with_table = doc(10.0, vec![mcq("q1", 0), table_theory("q2")]);
        with_table.questions[0].include_table = true;
        let session = QuizSession::start(with_table, &mut rng()).unwrap();
        // Two bonus questions: one include_table, one table-answer.
        assert_eq!(session.remaining_seconds(), 600 + 2 * TABLE_TIME_BONUS_SECS);
    }

    #[test]
    fn fractional_time_limit_keeps_subminute_remainder() {
        let session = QuizSession::start(doc(4.4, vec![mcq("q1", 0)]), &mut rng()).unwrap();
        assert_eq!(session.remaining_seconds(), 264);
    }

    #[test]
    fn record_answer_rejects_unknown_id() {
        let mut session = QuizSession::start(doc(10.0, vec![mcq("q1", 0)]), &mut rng()).unwrap();
        let err = session
            .record_answer("nope", AnswerValue::Option(0))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidQuestion { id } if id == "nope"));
    }

    #[test]
    fn record_answer_overwrites() {
        let mut session = QuizSession::start(doc(10.0, vec![mcq("q1", 1)]), &mut rng()).unwrap();
        session.record_answer("q1", AnswerValue::Option(0)).unwrap();
        session.record_answer("q1", AnswerValue::Option(1)).unwrap();
        assert_eq!(session.answer("q1"), Some(&AnswerValue::Option(1)));
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn go_to_clamps_out_of_range() {
        let questions: Vec<Question> = (0..5).map(|i| mcq(&format!("q{i}"), 0)).collect();
        let mut session = QuizSession::start(doc(10.0, questions), &mut rng()).unwrap();

        session.go_to(3);
        assert_eq!(session.current_index(), 3);
        session.go_to(99);
        assert_eq!(session.current_index(), 4);
        session.go_to(0);
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn two_question_walkthrough() {
        // Two mcqs, one answered right and one wrong, 10 minute limit.
        let questions = vec![mcq("q1", 0), mcq("q2", 0)];
        let mut session = QuizSession::start(doc(10.0, questions), &mut rng()).unwrap();
        assert_eq!(session.remaining_seconds(), 600);
        assert_eq!(session.phase(), Phase::InProgress);

        session.record_answer("q1", AnswerValue::Option(0)).unwrap();
        session.record_answer("q2", AnswerValue::Option(2)).unwrap();
        session.advance();
        assert_eq!(session.phase(), Phase::InProgress);
        session.advance();

        assert_eq!(session.phase(), Phase::Finished);
        let result = session.result().unwrap();
        assert_eq!(result.total_score, 1);
        assert_eq!(result.max_score, 2);
    }

    #[test]
    fn timer_underrun_finishes() {
        let mut session = QuizSession::start(doc(1.0, vec![mcq("q1", 0)]), &mut rng()).unwrap();
        assert_eq!(session.remaining_seconds(), 60);
        for _ in 0..59 {
            session.tick();
        }
        assert_eq!(session.phase(), Phase::InProgress);
        session.tick();
        assert_eq!(session.phase(), Phase::Finished);
        assert!(session.result().is_some());

        // Ticking a finished session changes nothing.
        session.tick();
        assert_eq!(session.remaining_seconds(), 0);
    }

    #[test]
    fn finish_is_idempotent() {
        let mut session = QuizSession::start(doc(10.0, vec![mcq("q1", 0)]), &mut rng()).unwrap();
        session.record_answer("q1", AnswerValue::Option(0)).unwrap();
        session.finish();
        let first_id = session.result().unwrap().id;
        let first_score = session.result().unwrap().total_score;

        session.finish();
        session.advance();
        assert_eq!(session.result().unwrap().id, first_id);
        assert_eq!(session.result().unwrap().total_score, first_score);
    }

    #[test]
    fn answers_after_finish_are_ignored() {
        let mut session = QuizSession::start(doc(10.0, vec![mcq("q1", 0)]), &mut rng()).unwrap();
        session.finish();
        session.record_answer("q1", AnswerValue::Option(0)).unwrap();
        assert_eq!(session.result().unwrap().total_score, 0);
    }

    #[test]
    fn retake_resets_everything() {
        let questions: Vec<Question> = (0..8).map(|i| mcq(&format!("q{i}"), 0)).collect();
        let mut session = QuizSession::start(doc(10.0, questions), &mut rng()).unwrap();
        session.record_answer("q1", AnswerValue::Option(0)).unwrap();
        session.go_to(4);
        session.tick();
        session.finish();
        assert!(session.result().is_some());

        session.retake(&mut StdRng::seed_from_u64(7));
        assert_eq!(session.phase(), Phase::InProgress);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.answered_count(), 0);
        assert_eq!(session.remaining_seconds(), 600);
        assert!(session.result().is_none());
        assert_eq!(session.question_count(), 8);
    }

    #[test]
    fn retake_mid_attempt_is_ignored() {
        let mut session = QuizSession::start(doc(10.0, vec![mcq("q1", 0)]), &mut rng()).unwrap();
        session.record_answer("q1", AnswerValue::Option(0)).unwrap();
        session.retake(&mut rng());
        assert_eq!(session.answered_count(), 1);
    }
}
