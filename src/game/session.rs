//! Submission phase tracking
//!
//! A session is either `Idle` or `AwaitingReply`. Moving into
//! `AwaitingReply` hands out a [`SubmissionPermit`]; dropping the permit is
//! the only way back to `Idle`. At most one permit exists at a time, so at
//! most one move is ever waiting on the arbitration service.

use crate::game::types::ProposedMove;
use parking_lot::Mutex;
use std::sync::Arc;

/// Where the session is in the submit/reply cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No request outstanding; new moves may start
    #[default]
    Idle,
    /// A move has been sent and its verdict has not been processed yet
    AwaitingReply { submitted: ProposedMove },
}

/// Gate handing out one submission permit at a time
#[derive(Debug, Clone, Default)]
pub struct MoveGate {
    phase: Arc<Mutex<SessionPhase>>,
}

impl MoveGate {
    /// Move to `AwaitingReply`, or `None` if a submission is already in flight.
    pub fn try_begin(&self, submitted: ProposedMove) -> Option<SubmissionPermit> {
        let mut phase = self.phase.lock();
        if matches!(*phase, SessionPhase::AwaitingReply { .. }) {
            return None;
        }
        *phase = SessionPhase::AwaitingReply { submitted };
        Some(SubmissionPermit {
            phase: Arc::clone(&self.phase),
        })
    }

    pub fn is_pending(&self) -> bool {
        matches!(*self.phase.lock(), SessionPhase::AwaitingReply { .. })
    }

    pub fn phase(&self) -> SessionPhase {
        *self.phase.lock()
    }
}

/// Proof that the holder owns the single in-flight submission
///
/// Returns the session to `Idle` when dropped.
#[must_use = "dropping the permit immediately ends the submission"]
#[derive(Debug)]
pub struct SubmissionPermit {
    phase: Arc<Mutex<SessionPhase>>,
}

impl SubmissionPermit {
    pub fn submitted(&self) -> Option<ProposedMove> {
        match *self.phase.lock() {
            SessionPhase::AwaitingReply { submitted } => Some(submitted),
            SessionPhase::Idle => None,
        }
    }
}

impl Drop for SubmissionPermit {
    fn drop(&mut self) {
        *self.phase.lock() = SessionPhase::Idle;
    }
}
