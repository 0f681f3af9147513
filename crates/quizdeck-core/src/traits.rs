//! Core trait definitions for quiz storage and session observation.
//!
//! `QuizStore` is implemented by the `quizdeck-store` crate; the engine
//! itself only ever reads. `SessionObserver` is the presentation-side hook
//! surface driven by the session runtime.

use async_trait::async_trait;

use crate::grader::GradingResult;
use crate::model::{QuizDocument, QuizSummary};

/// Read-side storage interface the engine consumes.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Metadata for every stored document, in deterministic discovery
    /// order.
    async fn list(&self) -> anyhow::Result<Vec<QuizSummary>>;

    /// Load one document by its stored name.
    async fn load(&self, name: &str) -> anyhow::Result<QuizDocument>;

    /// Load every stored document, keyed by its stored name. Completion
    /// order is unspecified; aggregation sorts by key before concatenating.
    async fn load_all(&self) -> anyhow::Result<Vec<(String, QuizDocument)>>;
}

/// Presentation hooks fired by the session runtime.
pub trait SessionObserver: Send + Sync {
    /// Fired after every countdown step with the seconds left.
    fn on_tick(&self, remaining_seconds: u32);

    /// Fired once if the countdown itself finishes the session. A session
    /// finished by the caller does not fire this; the caller already holds
    /// the result.
    fn on_finish(&self, result: &GradingResult);
}

/// No-op observer.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_tick(&self, _: u32) {}
    fn on_finish(&self, _: &GradingResult) {}
}
