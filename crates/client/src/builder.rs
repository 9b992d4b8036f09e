//! Client builder with dependency injection pattern.

use crate::{Client, Frontend};
use anyhow::{Context, Result};
use runtime::SessionController;

/// Builder for constructing a Client with proper validation.
///
/// Both the controller and the frontend are required; `build()` fails fast
/// when either is missing.
#[derive(Default)]
pub struct ClientBuilder {
    controller: Option<SessionController>,
    frontend: Option<Box<dyn Frontend>>,
}

impl ClientBuilder {
    /// Create a new ClientBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session controller (required).
    ///
    /// It should be constructed via `ControllerBuilder` from the
    /// `client-bootstrap` crate.
    pub fn controller(mut self, controller: SessionController) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Set the frontend (required).
    pub fn frontend(mut self, frontend: impl Frontend + 'static) -> Self {
        self.frontend = Some(Box::new(frontend));
        self
    }

    /// Build the Client.
    ///
    /// # Errors
    ///
    /// Returns an error if the controller or the frontend is not set.
    pub fn build(self) -> Result<Client> {
        let controller = self
            .controller
            .context("Controller is required. Use .controller() to set it.")?;

        let frontend = self
            .frontend
            .context("Frontend is required. Use .frontend() to set it.")?;

        Ok(Client {
            controller,
            frontend,
        })
    }
}
