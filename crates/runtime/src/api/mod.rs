//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, workers, or transport.

pub mod errors;
pub mod service;
pub mod types;

pub use errors::{
    Failure, FailureKind, ProtocolError, Result, ServiceError, SessionError, TransportError,
    ValidationError,
};
pub use service::GameService;
pub use types::{AutoPlayState, BotId, Lifecycle, PlayMode, SessionId, SessionView, StopReason};
