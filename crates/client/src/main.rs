//! Arena console client binary.
//!
//! Composition root that assembles:
//! 1. Configuration from `.env`, the environment and command-line arguments
//! 2. The session controller via `ControllerBuilder`
//! 3. The console frontend
//!
//! # Examples
//!
//! ```bash
//! # Watch two bots play to the end
//! cargo run -p arena-client -- greedy.py random.py --mode auto
//!
//! # Step through a game by hand
//! cargo run -p arena-client -- greedy.py random.py cautious.py --interactive
//! ```

use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use arena_client::{Client, ConsoleFrontend, logging};
use client_bootstrap::{ClientConfig, ControllerBuilder};
use client_frontend_core::FrontendConfig;
use runtime::{BotId, MAX_AUTOPLAY_DELAY, PlayMode};

/// Play bots against each other on the arena game service
#[derive(Parser)]
#[command(name = "arena")]
#[command(about = "Drive Durak games between bots on the arena game service", long_about = None)]
#[command(version)]
struct Cli {
    /// Bot file names in seat order; the same bot may take several seats
    #[arg(required = true)]
    participants: Vec<String>,

    /// `manual` or `auto` (overrides ARENA_PLAY_MODE)
    #[arg(short, long)]
    mode: Option<PlayMode>,

    /// Pause between autonomous steps in milliseconds, at most 2000
    #[arg(short, long)]
    delay_ms: Option<u64>,

    /// Stop autonomous play after this many steps
    #[arg(long)]
    max_steps: Option<u64>,

    /// Base URL of the game service API (overrides ARENA_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Read commands from stdin instead of running to the end
    #[arg(short, long)]
    interactive: bool,
}

impl Cli {
    fn apply(&self, config: &mut ClientConfig) {
        if let Some(mode) = self.mode {
            config.play.mode = mode;
        }
        if let Some(ms) = self.delay_ms {
            config.play.autoplay_delay = Duration::from_millis(ms).min(MAX_AUTOPLAY_DELAY);
        }
        if let Some(limit) = self.max_steps {
            config.play.max_steps = Some(limit);
        }
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 1. Load configuration from environment, then apply arguments
    let mut client_config = ClientConfig::from_env();
    cli.apply(&mut client_config);
    let frontend_config = FrontendConfig::from_env();

    // 2. Setup logging
    let (_guard, log_file) = logging::setup_logging(None)?;

    tracing::info!("Starting arena client");
    tracing::info!("Game service: {}", client_config.api.base_url);
    tracing::info!("Mode: {}", client_config.play.mode);
    tracing::info!("Autoplay delay: {:?}", client_config.play.autoplay_delay);

    // 3. Build the controller
    let setup = ControllerBuilder::new(client_config).build()?;

    // 4. Build the frontend
    let participants = cli.participants.iter().map(|p| BotId::new(p.as_str())).collect();
    let frontend = ConsoleFrontend::new(frontend_config, participants).interactive(cli.interactive);

    // 5. Build and run
    let client = Client::builder()
        .controller(setup.controller)
        .frontend(frontend)
        .build()?;

    tracing::info!("Client assembled, starting...");
    let result = client.run().await;
    if let Err(err) = &result {
        tracing::error!("Client exited with error: {:#}", err);
        eprintln!("see {} for details", log_file.display());
    }
    result
}
