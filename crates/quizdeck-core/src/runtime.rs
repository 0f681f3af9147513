//! Cancelable 1 Hz driver for an in-progress session.
//!
//! The countdown is a spawned tokio task holding a clone of the shared
//! session. The task stops on its own when the session reaches the terminal
//! phase; `teardown` (or dropping the runner) aborts it outright, so no
//! orphaned callback can keep mutating a session the caller has discarded.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::session::{Phase, QuizSession};
use crate::traits::SessionObserver;

/// A session shared between the caller and the tick task.
pub type SharedSession = Arc<Mutex<QuizSession>>;

/// Wrap a session for sharing with a [`SessionRunner`].
pub fn shared(session: QuizSession) -> SharedSession {
    Arc::new(Mutex::new(session))
}

/// Owns the periodic tick task for one session.
pub struct SessionRunner {
    handle: JoinHandle<()>,
}

enum Step {
    Running,
    FinishedByTimer,
    AlreadyFinished,
}

impl SessionRunner {
    /// Spawn the countdown task. Ticks roughly once per second; the cadence
    /// is advisory wall-clock, not a monotonic scheduling guarantee.
    pub fn spawn(session: SharedSession, observer: Arc<dyn SessionObserver>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first interval tick completes immediately; consume it so
            // the countdown starts a full second after spawn.
            interval.tick().await;

            loop {
                interval.tick().await;

                let step = {
                    let mut session = session.lock().unwrap();
                    if session.phase() == Phase::Finished {
                        Step::AlreadyFinished
                    } else {
                        session.tick();
                        observer.on_tick(session.remaining_seconds());
                        if session.phase() == Phase::Finished {
                            Step::FinishedByTimer
                        } else {
                            Step::Running
                        }
                    }
                };

                match step {
                    Step::Running => {}
                    Step::AlreadyFinished => break,
                    Step::FinishedByTimer => {
                        let session = session.lock().unwrap();
                        if let Some(result) = session.result() {
                            observer.on_finish(result);
                        }
                        break;
                    }
                }
            }
        });

        Self { handle }
    }

    /// Cancel the tick task. Safe to call at any time, including after the
    /// task already stopped on its own.
    pub fn teardown(&self) {
        self.handle.abort();
    }

    /// Whether the tick task is still alive.
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for SessionRunner {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
