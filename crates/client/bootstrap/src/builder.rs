//! Builds the game service client and session controller used by front-ends.
use std::sync::Arc;

use anyhow::{Context, Result};
use runtime::{GameService, HttpGameService, SessionController};

use crate::config::ClientConfig;

/// Builder that assembles the service client, controller, and configuration.
pub struct ControllerBuilder {
    config: ClientConfig,
    service: Option<Arc<dyn GameService>>,
}

impl ControllerBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            service: None,
        }
    }

    /// Provide a custom game service instead of the HTTP client.
    pub fn service(mut self, service: Arc<dyn GameService>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn build(self) -> Result<ControllerSetup> {
        let service = match self.service {
            Some(service) => service,
            None => {
                let http = HttpGameService::new(
                    self.config.api.base_url.clone(),
                    self.config.api.request_timeout,
                )
                .context("failed to build game service client")?;
                tracing::info!("Game service at {}", http.base_url());
                Arc::new(http)
            }
        };

        let controller = SessionController::new(service, self.config.controller_config());

        Ok(ControllerSetup {
            config: self.config,
            controller,
        })
    }
}

pub struct ControllerSetup {
    pub config: ClientConfig,
    pub controller: SessionController,
}
