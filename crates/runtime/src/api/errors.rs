//! Unified error types surfaced by the runtime API.
//!
//! Input problems are [`ValidationError`]s and never reach the network. Once a
//! request is issued, it can fail in the transport ([`TransportError`]) or
//! come back in a shape the client cannot use ([`ProtocolError`]). Both are
//! fatal to the step that issued the request and are never retried here.
use std::fmt;

use thiserror::Error;

use game_core::SnapshotError;

use super::types::SessionId;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("at least two participants are required, got {count}")]
    TooFewParticipants { count: usize },

    #[error("participant slot {index} is empty")]
    EmptySlot { index: usize },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {endpoint} failed")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} responded with status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("game service unreachable: {0}")]
    Unreachable(String),
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("response body is not a session payload")]
    Decode(#[source] serde_json::Error),

    #[error("game service rejected the request: {0}")]
    Rejected(String),

    #[error("requested session {expected} but the service answered for {actual}")]
    SessionMismatch {
        expected: SessionId,
        actual: SessionId,
    },

    #[error("malformed snapshot")]
    Snapshot(#[from] SnapshotError),
}

/// Failure of a single call to the game service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl From<SnapshotError> for ServiceError {
    fn from(err: SnapshotError) -> Self {
        Self::Protocol(ProtocolError::Snapshot(err))
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(TransportError),

    #[error(transparent)]
    Protocol(ProtocolError),

    #[error("no active session")]
    NoActiveSession,
}

impl From<ServiceError> for SessionError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Transport(e) => Self::Transport(e),
            ServiceError::Protocol(e) => Self::Protocol(e),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Protocol,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::Transport => "transport",
            FailureKind::Protocol => "protocol",
        };
        write!(f, "{}", label)
    }
}

/// Session-level failure as kept by the controller for the presentation layer.
///
/// Holds the rendered error chain rather than the error itself so controller
/// state stays cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub(crate) fn from_service(err: &ServiceError) -> Self {
        let kind = match err {
            ServiceError::Transport(_) => FailureKind::Transport,
            ServiceError::Protocol(_) => FailureKind::Protocol,
        };
        Self {
            kind,
            message: error_chain(err),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failure: {}", self.kind, self.message)
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
