//! Cancellable one-shot round timer for quizrace rooms.
//!
//! Each room actor owns exactly one [`RoundTimer`]. Arming it schedules a
//! single delayed trigger (the automatic advance to the next round);
//! arming again replaces the previous deadline unconditionally, so at most
//! one trigger is ever pending and none fires twice.
//!
//! # Integration
//!
//! The timer is designed to sit inside a room actor's `tokio::select!`
//! loop. While disarmed, [`RoundTimer::fired`] pends forever, so the
//! branch simply never runs:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         _ = timer.fired() => { /* start the next round */ }
//!     }
//! }
//! ```

use std::time::Duration;

use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace};

/// A delayed, cancellable, at-most-once trigger.
///
/// Owned exclusively by one room; `&mut self` on every operation is what
/// makes "at most one armed deadline" structural rather than policed.
#[derive(Debug, Default)]
pub struct RoundTimer {
    /// The pending deadline, if armed.
    deadline: Option<TokioInstant>,
}

impl RoundTimer {
    /// Creates a disarmed timer.
    pub fn new() -> Self {
        Self { deadline: None }
    }

    /// Arms the timer to fire after `delay`.
    ///
    /// Any previously armed deadline is cancelled and replaced — there is
    /// no window in which both could fire.
    pub fn arm(&mut self, delay: Duration) {
        if self.deadline.is_some() {
            debug!(?delay, "round timer rearmed, prior deadline cancelled");
        } else {
            debug!(?delay, "round timer armed");
        }
        self.deadline = Some(TokioInstant::now() + delay);
    }

    /// Cancels the pending deadline, if any. Idempotent.
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            debug!("round timer cancelled");
        }
    }

    /// Whether a deadline is currently pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolves once when the armed deadline is reached, disarming the
    /// timer. While disarmed, pends forever — `tokio::select!` will keep
    /// servicing its other branches.
    ///
    /// Cancel-safe: if the enclosing `select!` drops this future before
    /// the deadline, the deadline stays armed and the next call resumes
    /// waiting for the same instant.
    pub async fn fired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                time::sleep_until(deadline).await;
                self.deadline = None;
                trace!("round timer fired");
            }
            None => {
                // Never completes — select! handles other branches.
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}
