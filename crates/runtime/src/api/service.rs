//! Asynchronous abstraction over the remote game service.
//!
//! The service owns the rules and the authoritative state. The runtime only
//! asks it to create a session, advance a session by one step, or report a
//! session as it stands. Implementations plug in an HTTP client, scripted
//! fixtures for tests, or anything else that speaks the same contract.
use async_trait::async_trait;

use super::errors::ServiceError;
use super::types::{BotId, SessionId, SessionView};

/// Request/response contract of the game service.
///
/// None of these calls is assumed idempotent. In particular a repeated
/// [`step_session`](GameService::step_session) may advance the game twice, so
/// callers must never retry it on their own.
#[async_trait]
pub trait GameService: Send + Sync {
    /// Create a session seating `participants` in the given order.
    ///
    /// Duplicates are allowed: the same bot may take several seats.
    async fn create_session(&self, participants: &[BotId]) -> Result<SessionView, ServiceError>;

    /// Advance the session by exactly one atomic game action.
    async fn step_session(&self, id: &SessionId) -> Result<SessionView, ServiceError>;

    /// Read the session without advancing it.
    async fn get_session(&self, id: &SessionId) -> Result<SessionView, ServiceError>;
}
