//! gateway::phase
//!
//! The refresh-and-retry protocol as an explicit state machine.
//!
//! ```text
//! Attempt --(non-401)------------------------> Done(Returned)
//! Attempt --(401, refresh credential)--------> Refresh
//! Attempt --(401, no refresh credential)-----> Done(Terminated)
//! Refresh --(refresh ok)---------------------> Retry
//! Refresh --(refresh failed)-----------------> Done(Terminated)
//! Retry   --(any status)---------------------> Done(Returned)
//! ```
//!
//! `Retry` has no edge back to `Refresh`, so a single invocation refreshes
//! at most once. Events that do not apply to the current phase leave it
//! unchanged.

use reqwest::StatusCode;

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The last response is handed to the caller as-is.
    Returned,
    /// The session was cleared; the caller gets the original 401.
    Terminated,
}

/// Position of one gateway invocation in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Attempt,
    Refresh,
    Retry,
    Done(Outcome),
}

impl Phase {
    /// Transition after a backend response has been observed.
    ///
    /// `can_refresh` is whether the session holds a refresh credential.
    pub fn on_response(self, status: StatusCode, can_refresh: bool) -> Phase {
        match self {
            Phase::Attempt if status != StatusCode::UNAUTHORIZED => Phase::Done(Outcome::Returned),
            Phase::Attempt if can_refresh => Phase::Refresh,
            Phase::Attempt => Phase::Done(Outcome::Terminated),
            Phase::Retry => Phase::Done(Outcome::Returned),
            other => other,
        }
    }

    /// Transition after the `/refresh` sub-call has completed.
    pub fn on_refresh(self, succeeded: bool) -> Phase {
        match self {
            Phase::Refresh if succeeded => Phase::Retry,
            Phase::Refresh => Phase::Done(Outcome::Terminated),
            other => other,
        }
    }

    pub fn is_done(self) -> bool {
        matches!(self, Phase::Done(_))
    }
}
