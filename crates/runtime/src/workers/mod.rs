//! Worker tasks that back the session controller.
//!
//! The step executor serializes requests to the game service, while the
//! autoplay loop drives a session on its own until it ends.

mod autoplay;
mod step;

pub(crate) use autoplay::AutoPlayLoop;
pub use step::StepExecutor;
