//! Cross-frontend primitives for presenting a session.
//!
//! Houses status messages, event handling, and view-model types that the
//! console client and future graphical clients can reuse.
pub mod config;
pub mod event;
pub mod frontend;
pub mod message;
pub mod view_model;

pub use config::{FrontendConfig, LogConfig, MessageConfig};
pub use event::{EventConsumer, EventImpact, StatusMessages};
pub use frontend::Frontend;
pub use message::{MessageEntry, MessageLevel, MessageLog};
pub use view_model::{Frame, GameView, LogLine, SeatView, SessionSummary, TableView};
