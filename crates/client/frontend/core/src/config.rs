//! Frontend configuration structures and loaders.
//!
//! This module contains UI-specific configuration that is shared across
//! different frontend implementations.

use std::env;

/// Frontend-specific configuration.
#[derive(Clone, Debug, Default)]
pub struct FrontendConfig {
    pub messages: MessageConfig,
    pub log: LogConfig,
}

impl FrontendConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_MESSAGE_CAPACITY` - Status message capacity (default: 64)
    /// - `ARENA_LOG_LINES` - Merged game log lines shown (default: 20)
    /// - `ARENA_SHOW_BOT_LOGS` - Show each bot's own log (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("ARENA_MESSAGE_CAPACITY") {
            config.messages.capacity = capacity.max(1);
        }

        if let Some(lines) = read_env::<usize>("ARENA_LOG_LINES") {
            config.log.lines = lines;
        }
        if let Some(show) = read_env_bool("ARENA_SHOW_BOT_LOGS") {
            config.log.show_bot_logs = show;
        }

        config
    }
}

#[derive(Clone, Debug)]
pub struct MessageConfig {
    pub capacity: usize,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self { capacity: 64 }
    }
}

/// Controls how much of the bots' logs a view carries.
#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Newest merged log lines kept in a view.
    pub lines: usize,
    pub show_bot_logs: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            lines: 20,
            show_bot_logs: false,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    parse_bool(&env::var(key).ok()?)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
