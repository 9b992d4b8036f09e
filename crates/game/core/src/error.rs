//! Structural errors for snapshots received from the game service.
//!
//! The service owns the rules, so the client never checks legality. It only
//! refuses snapshots whose shape cannot be displayed or reasoned about.

use thiserror::Error;

/// A snapshot violated one of its structural invariants.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// `hands` must carry exactly one hand per participant.
    #[error("snapshot carries {hands} hands for {participants} participants")]
    HandCount { hands: usize, participants: usize },

    /// Every defense card answers an attack card, so defense can never be longer.
    #[error("defense has {defense} cards but attack only {attack}")]
    DefenseOverflow { attack: usize, defense: usize },
}
