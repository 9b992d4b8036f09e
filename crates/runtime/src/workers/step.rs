//! Single-flight step requests for one session.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::{GameService, ProtocolError, ServiceError, SessionId, SessionView};

/// Issues step requests for one session, at most one at a time.
///
/// Every request holds the gate for its whole duration, so responses can never
/// interleave. A response is checked against the session it was issued for
/// and against the seat count before it is handed back.
pub struct StepExecutor {
    service: Arc<dyn GameService>,
    session: SessionId,
    participants: usize,
    gate: Mutex<()>,
}

impl StepExecutor {
    pub fn new(service: Arc<dyn GameService>, session: SessionId, participants: usize) -> Self {
        Self {
            service,
            session,
            participants,
            gate: Mutex::new(()),
        }
    }

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Request one step, waiting for any outstanding request to finish first.
    pub async fn advance(&self) -> Result<SessionView, ServiceError> {
        let _guard = self.gate.lock().await;
        self.issue().await
    }

    /// Request one step unless another request is outstanding.
    ///
    /// Returns `None` without touching the service when busy.
    pub async fn try_advance(&self) -> Option<Result<SessionView, ServiceError>> {
        let _guard = self.gate.try_lock().ok()?;
        Some(self.issue().await)
    }

    pub fn is_in_flight(&self) -> bool {
        self.gate.try_lock().is_err()
    }

    /// Read the session as the service currently has it, without advancing.
    pub async fn fetch(&self) -> Result<SessionView, ServiceError> {
        let view = self.service.get_session(&self.session).await?;
        self.check(view)
    }

    async fn issue(&self) -> Result<SessionView, ServiceError> {
        tracing::debug!("Requesting step for session {}", self.session);
        let view = self.service.step_session(&self.session).await?;
        self.check(view)
    }

    fn check(&self, view: SessionView) -> Result<SessionView, ServiceError> {
        if view.id != self.session {
            return Err(ProtocolError::SessionMismatch {
                expected: self.session.clone(),
                actual: view.id,
            }
            .into());
        }
        view.snapshot.validate(self.participants)?;
        Ok(view)
    }
}

impl fmt::Debug for StepExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepExecutor")
            .field("session", &self.session)
            .field("participants", &self.participants)
            .field("in_flight", &self.is_in_flight())
            .finish()
    }
}
