//! Identifiers and wire payloads shared by the controller and transports.
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use game_core::StateSnapshot;

/// Opaque session identifier assigned by the game service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a registered bot (the service uses the uploaded file name).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BotId(String);

impl BotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for an unfilled seat.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BotId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Body returned by every session endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub id: SessionId,

    /// Display names, one per seat.
    #[serde(rename = "bots", default)]
    pub display_names: Vec<String>,

    #[serde(rename = "state")]
    pub snapshot: StateSnapshot,
}

/// How the session advances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PlayMode {
    /// One step per user request.
    #[default]
    #[strum(to_string = "manual", serialize = "step")]
    Manual,
    /// Steps are issued by the autoplay loop until the game ends.
    #[strum(to_string = "auto", serialize = "autonomous")]
    Autonomous,
}

/// Where the current session stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum Lifecycle {
    NotStarted,
    Active,
    Terminal,
}

/// Why the autoplay loop ended.
#[derive(Clone, Debug, PartialEq, Eq, Display)]
pub enum StopReason {
    /// The session reached a terminal snapshot.
    Finished,
    /// A step failed; the failure is recorded on the controller.
    Failed,
    /// Mode switch, restart or reset superseded the loop.
    Cancelled,
    /// The configured step cap was hit before the game ended.
    StepLimit,
}

/// Observable state of the autoplay loop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AutoPlayState {
    #[default]
    Idle,
    /// A step request is outstanding.
    Requesting,
    /// Waiting out the delay before the next request.
    Pausing,
    Stopped(StopReason),
}

impl AutoPlayState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Requesting | Self::Pausing)
    }
}
