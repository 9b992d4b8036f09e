//! Pure game data types shared across the client.
//!
//! `game-core` models what the remote game service sends back on every step
//! and derives everything a client needs to know from it without touching the
//! network: who has won, who has lost, and the globally ordered game log.
//! The runtime commits [`StateSnapshot`] values and frontends render them.
pub mod error;
pub mod log;
pub mod outcome;
pub mod snapshot;

pub use error::SnapshotError;
pub use log::{LogEntry, OrderKey, merge_logs, parse_fragment, strip_marker};
pub use outcome::Outcome;
pub use snapshot::{Card, StateSnapshot, TablePair};
