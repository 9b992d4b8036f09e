//! Events published by the session controller.

use std::sync::Arc;

use crate::api::{BotId, Failure, PlayMode, SessionId, StopReason};

use super::bus::Topic;

#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A new session was created and committed.
    SessionStarted {
        session: SessionId,
        participants: Arc<[BotId]>,
    },

    /// The controller dropped its session and returned to `NotStarted`.
    SessionReset,

    ModeChanged { mode: PlayMode },

    /// A step or start request failed and was recorded.
    Failed(Failure),

    /// A step result was applied to the current session.
    StepCommitted {
        session: SessionId,
        step: u64,
        terminal: bool,
    },

    /// A step result arrived after its epoch was superseded and was dropped.
    StepDiscarded { session: SessionId, epoch: u64 },

    AutoPlayStopped { reason: StopReason },
}

impl SessionEvent {
    pub fn topic(&self) -> Topic {
        match self {
            Self::SessionStarted { .. }
            | Self::SessionReset
            | Self::ModeChanged { .. }
            | Self::Failed(_) => Topic::Session,
            Self::StepCommitted { .. } | Self::StepDiscarded { .. } => Topic::Step,
            Self::AutoPlayStopped { .. } => Topic::AutoPlay,
        }
    }
}
