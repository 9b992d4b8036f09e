//! Client configuration structures and loaders.
use std::env;
use std::time::Duration;

use runtime::{ControllerConfig, MAX_AUTOPLAY_DELAY, PlayMode};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

/// Configuration required to reach the game service and drive sessions.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub play: PlayConfig,
    pub events: EventConfig,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_API_URL` - Base URL of the game service API (default: local server)
    /// - `ARENA_REQUEST_TIMEOUT_MS` - Per-request timeout (default: 10000)
    /// - `ARENA_PLAY_MODE` - `manual` or `auto` (default: manual)
    /// - `ARENA_AUTOPLAY_DELAY_MS` - Pause between autonomous steps, at most 2000 (default: 200)
    /// - `ARENA_MAX_STEPS` - Stop autonomous play after this many steps (default: unlimited)
    /// - `ARENA_EVENT_BUFFER` - Event queue size per topic (default: 64)
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = read("ARENA_API_URL") {
            config.api.base_url = url.trim().to_string();
        }

        if let Some(ms) = read_env::<u64>(read("ARENA_REQUEST_TIMEOUT_MS")) {
            config.api.request_timeout = Duration::from_millis(ms.max(1));
        }

        if let Some(mode) = read_env::<PlayMode>(read("ARENA_PLAY_MODE")) {
            config.play.mode = mode;
        }

        if let Some(ms) = read_env::<u64>(read("ARENA_AUTOPLAY_DELAY_MS")) {
            config.play.autoplay_delay = Duration::from_millis(ms).min(MAX_AUTOPLAY_DELAY);
        }

        // Zero means unlimited
        config.play.max_steps = read_env::<u64>(read("ARENA_MAX_STEPS")).filter(|n| *n > 0);

        if let Some(capacity) = read_env::<usize>(read("ARENA_EVENT_BUFFER")) {
            config.events.buffer = capacity.max(1);
        }

        config
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            initial_mode: self.play.mode,
            autoplay_delay: self.play.autoplay_delay,
            max_steps: self.play.max_steps,
            event_buffer: self.events.buffer,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlayConfig {
    pub mode: PlayMode,
    pub autoplay_delay: Duration,
    pub max_steps: Option<u64>,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            mode: PlayMode::Manual,
            autoplay_delay: Duration::from_millis(200),
            max_steps: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EventConfig {
    pub buffer: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self { buffer: 64 }
    }
}

fn read_env<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}
