//! Top-level client wiring a session controller to a frontend.
//!
//! # Architecture
//!
//! ```text
//! Client (Top-level container)
//!   ├─→ SessionController (session state, stepping, autoplay)
//!   └─→ Frontend (console today; anything implementing the trait)
//! ```
//!
//! The controller is built by `client-bootstrap` and handed to the frontend,
//! which only ever talks to the game through it.

mod builder;
pub mod console;
pub mod logging;

pub use builder::ClientBuilder;
pub use console::ConsoleFrontend;

// Re-export Frontend trait from client-frontend-core
pub use client_frontend_core::Frontend;

use anyhow::Result;
use runtime::SessionController;

/// Top-level client container.
///
/// # Lifecycle
///
/// 1. `Client::builder()` receives the controller and frontend
/// 2. `Client::run()` transfers control to the frontend until it returns
/// 3. The session is then reset, which stops any autoplay loop still running
pub struct Client {
    controller: SessionController,
    frontend: Box<dyn Frontend>,
}

impl Client {
    /// Create a new ClientBuilder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Run the frontend against the controller.
    ///
    /// # Errors
    ///
    /// Returns whatever error the frontend exits with.
    pub async fn run(self) -> Result<()> {
        let mut frontend = self.frontend;
        let result = frontend.run(self.controller.clone()).await;

        self.controller.reset();
        tracing::info!("Client shutdown complete");

        result
    }
}
