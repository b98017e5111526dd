//! State machine for a single in-flight checkout submission.
//!
//! ```text
//! Idle -> Submitted -> Pending -> Confirmed
//!                 \          \-> Failed   (back to Idle)
//!                  \-> Rejected           (back to Idle)
//! ```
//!
//! Every signal carries the handle it belongs to. Signals for any handle other
//! than the current one are ignored, and a confirmation fires its effects at
//! most once per handle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned to a submission when it is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionHandle(u64);

impl fmt::Display for SubmissionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The ledger's own reference for an accepted submission (a transaction hash).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxReference(pub String);

impl fmt::Display for TxReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TxState {
    #[default]
    Idle,
    Submitted {
        handle: SubmissionHandle,
    },
    Pending {
        handle: SubmissionHandle,
        tx: TxReference,
    },
    Confirmed {
        handle: SubmissionHandle,
        tx: TxReference,
        order_id: u64,
    },
}

impl TxState {
    pub fn handle(&self) -> Option<SubmissionHandle> {
        match self {
            Self::Idle => None,
            Self::Submitted { handle }
            | Self::Pending { handle, .. }
            | Self::Confirmed { handle, .. } => Some(*handle),
        }
    }

    /// Whether a submission is currently awaiting an outcome.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Submitted { .. } | Self::Pending { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The signal belongs to a handle that is no longer current.
    StaleHandle,
    /// The confirmation for this handle has already been acted on.
    AlreadyHandled,
    /// The signal arrived before the transition it depends on.
    OutOfOrder,
}

/// Result of feeding a signal into the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Submitted(SubmissionHandle),
    Pending,
    /// Emitted once per handle; the caller runs the post-success effects.
    Confirmed { order_id: u64, tx: TxReference },
    /// Terminal failure after acknowledgment; state is back to `Idle`.
    Failed { reason: String },
    /// Terminal rejection before acknowledgment; state is back to `Idle`.
    Rejected { reason: String },
    Cancelled,
    Ignored(IgnoreReason),
}

#[derive(Debug, Default)]
pub struct TransactionLifecycle {
    state: TxState,
    next_handle: u64,
    /// Handles only grow; anything older than the current one is stale.
    last_confirmed: Option<SubmissionHandle>,
    last_error: Option<String>,
}

impl TransactionLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TxState {
        &self.state
    }

    pub fn current_handle(&self) -> Option<SubmissionHandle> {
        self.state.handle()
    }

    /// Reason of the most recent failure or rejection, cleared on the next submit.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Moves to `Submitted` with a fresh handle. Returns `None` while another
    /// submission is still in flight.
    pub fn submit(&mut self) -> Option<SubmissionHandle> {
        if self.state.is_in_flight() {
            return None;
        }
        self.next_handle += 1;
        let handle = SubmissionHandle(self.next_handle);
        self.state = TxState::Submitted { handle };
        self.last_error = None;
        Some(handle)
    }

    /// The ledger acknowledged receipt of the submission.
    pub fn acknowledge(&mut self, handle: SubmissionHandle, tx: TxReference) -> Transition {
        match &self.state {
            TxState::Submitted { handle: current } if *current == handle => {
                self.state = TxState::Pending { handle, tx };
                Transition::Pending
            }
            TxState::Pending { handle: current, .. } if *current == handle => {
                Transition::Ignored(IgnoreReason::AlreadyHandled)
            }
            _ => Transition::Ignored(self.ignore_reason(handle)),
        }
    }

    /// Final settlement. Fires `Confirmed` only the first time it is observed
    /// for the current, pending handle.
    pub fn confirm(&mut self, handle: SubmissionHandle, order_id: u64) -> Transition {
        if self.last_confirmed == Some(handle) {
            return Transition::Ignored(IgnoreReason::AlreadyHandled);
        }
        match &self.state {
            TxState::Pending { handle: current, tx } if *current == handle => {
                let tx = tx.clone();
                self.last_confirmed = Some(handle);
                self.state = TxState::Confirmed {
                    handle,
                    tx: tx.clone(),
                    order_id,
                };
                Transition::Confirmed { order_id, tx }
            }
            TxState::Submitted { handle: current } if *current == handle => {
                Transition::Ignored(IgnoreReason::OutOfOrder)
            }
            _ => Transition::Ignored(IgnoreReason::StaleHandle),
        }
    }

    /// The submission did not go through. Before acknowledgment this is a
    /// rejection, after it a failure; both return control to `Idle`.
    pub fn fail(&mut self, handle: SubmissionHandle, reason: impl Into<String>) -> Transition {
        let reason = reason.into();
        match &self.state {
            TxState::Submitted { handle: current } if *current == handle => {
                self.reset(Some(reason.clone()));
                Transition::Rejected { reason }
            }
            TxState::Pending { handle: current, .. } if *current == handle => {
                self.reset(Some(reason.clone()));
                Transition::Failed { reason }
            }
            _ => Transition::Ignored(self.ignore_reason(handle)),
        }
    }

    /// Drops the in-flight submission. The ledger stays the system of record,
    /// so nothing is compensated; late signals for the dropped handle are
    /// ignored as stale.
    pub fn cancel(&mut self) -> Transition {
        if self.state == TxState::Idle {
            return Transition::Ignored(IgnoreReason::StaleHandle);
        }
        self.reset(None);
        Transition::Cancelled
    }

    fn reset(&mut self, error: Option<String>) {
        self.state = TxState::Idle;
        self.last_error = error;
    }

    fn ignore_reason(&self, handle: SubmissionHandle) -> IgnoreReason {
        if self.last_confirmed == Some(handle) {
            IgnoreReason::AlreadyHandled
        } else {
            IgnoreReason::StaleHandle
        }
    }
}
