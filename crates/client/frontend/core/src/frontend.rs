//! Trait describing a runnable client front-end.
use anyhow::Result;
use async_trait::async_trait;
use runtime::SessionController;

/// Frontend abstraction for UI layers.
///
/// Frontends communicate with the game through a [`SessionController`]:
/// - Watch the controller state or subscribe to session events
/// - Start sessions, switch modes and request steps
/// - Read the committed snapshot and outcome
///
/// Frontends never talk to the game service directly.
///
/// # Example Implementation
///
/// ```no_run
/// use async_trait::async_trait;
/// use client_frontend_core::Frontend;
/// use runtime::{SessionController, Topic};
/// use anyhow::Result;
///
/// struct MyFrontend;
///
/// #[async_trait]
/// impl Frontend for MyFrontend {
///     async fn run(&mut self, controller: SessionController) -> Result<()> {
///         let mut events = controller.subscribe_events(Topic::Step);
///
///         while let Ok(_event) = events.recv().await {
///             // Render the new snapshot
///         }
///
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Frontend: Send {
    /// Run the frontend until the user quits or the session ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the frontend encounters a fatal error.
    async fn run(&mut self, controller: SessionController) -> Result<()>;
}
