//! Utilities for reacting to session events inside UI layers.
use runtime::{FailureKind, SessionEvent, StopReason};

use crate::message::{MessageEntry, MessageLevel, MessageLog};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventImpact {
    pub requires_redraw: bool,
}

impl EventImpact {
    pub const fn none() -> Self {
        Self {
            requires_redraw: false,
        }
    }

    pub const fn redraw() -> Self {
        Self {
            requires_redraw: true,
        }
    }}

pub trait EventConsumer {
    fn on_event(&mut self, event: &SessionEvent) -> EventImpact;
    fn message_log(&self) -> &MessageLog;
}

/// Turns session events into status messages.
///
/// Committed steps are not logged here; the bots' own log covers them.
#[derive(Clone, Debug)]
pub struct StatusMessages {
    log: MessageLog,
}

impl StatusMessages {
    pub fn new(capacity: usize) -> Self {
        Self {
            log: MessageLog::new(capacity),
        }
    }
}

impl EventConsumer for StatusMessages {
    fn on_event(&mut self, event: &SessionEvent) -> EventImpact {
        match event {
            SessionEvent::SessionStarted {
                session,
                participants,
            } => {
                let names: Vec<_> = participants.iter().map(|p| p.as_str()).collect();
                self.log
                    .push_text(format!("Session {} started: {}", session, names.join(" vs ")));
                EventImpact::redraw()
            }
            SessionEvent::SessionReset => {
                self.log.push_text("Back to setup");
                EventImpact::redraw()
            }
            SessionEvent::ModeChanged { mode } => {
                self.log.push_text(format!("Mode: {}", mode));
                EventImpact::redraw()
            }
            SessionEvent::Failed(failure) => {
                let level = match failure.kind {
                    FailureKind::Transport => MessageLevel::Warning,
                    FailureKind::Protocol => MessageLevel::Error,
                };
                self.log
                    .push(MessageEntry::new(failure.to_string(), None, level));
                EventImpact::redraw()
            }
            SessionEvent::StepCommitted { step, terminal, .. } => {
                if *terminal {
                    self.log.push(MessageEntry::new(
                        "Game over",
                        Some(*step),
                        MessageLevel::Info,
                    ));
                }
                EventImpact::redraw()
            }
            SessionEvent::StepDiscarded { .. } => EventImpact::none(),
            SessionEvent::AutoPlayStopped { reason } => match reason {
                StopReason::Finished | StopReason::Cancelled => EventImpact::redraw(),
                StopReason::Failed => {
                    self.log.push(MessageEntry::new(
                        "Autoplay stopped after a failure",
                        None,
                        MessageLevel::Warning,
                    ));
                    EventImpact::redraw()
                }
                StopReason::StepLimit => {
                    self.log.push(MessageEntry::new(
                        "Autoplay stopped at the step limit",
                        None,
                        MessageLevel::Warning,
                    ));
                    EventImpact::redraw()
                }
            },
        }
    }

    fn message_log(&self) -> &MessageLog {
        &self.log
    }}
