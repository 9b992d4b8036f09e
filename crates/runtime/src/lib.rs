//! Session orchestration for games played against a remote game service.
//!
//! This crate wires the service abstraction, the single-flight step executor
//! and the autoplay worker into one controller API. Consumers embed
//! [`SessionController`] to start sessions, advance them by hand or let them
//! run, and observe committed snapshots.
//!
//! Modules are organized by responsibility:
//! - [`controller`] hosts the controller and the session it owns
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`transport`] implements the service over HTTP
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod controller;
pub mod events;
pub mod transport;

mod workers;

#[cfg(test)]
pub mod mock;

pub use api::{
    AutoPlayState, BotId, Failure, FailureKind, GameService, Lifecycle, PlayMode, ProtocolError,
    Result, ServiceError, SessionError, SessionId, SessionView, StopReason, TransportError,
    ValidationError,
};
pub use controller::{
    ControllerConfig, ControllerState, MAX_AUTOPLAY_DELAY, Session, SessionController,
    SkipReason, StartOutcome, StepOutcome,
};
pub use events::{EventBus, SessionEvent, Topic};
pub use transport::HttpGameService;
pub use workers::StepExecutor;
