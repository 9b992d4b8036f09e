//! Immutable game state as reported by the game service after each step.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::outcome::Outcome;

/// Opaque card code such as `"10♥"` or `"A♠"`.
///
/// The client never interprets a card; it only displays it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card(String);

impl Card {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Card {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// One attack card and the defense card that answers it, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TablePair<'a> {
    pub attack: &'a Card,
    pub defense: Option<&'a Card>,
}

/// Complete description of the game at one point in time.
///
/// Field names on the wire follow the service's JSON (`table_defence`,
/// `curr_player`, ...). Fields the client does not use are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// One ordered hand per participant, in seat order.
    pub hands: Vec<Vec<Card>>,

    #[serde(rename = "table_attack", default)]
    pub attack: Vec<Card>,

    /// `defense[i]` answers `attack[i]`.
    #[serde(rename = "table_defence", default)]
    pub defense: Vec<Card>,

    pub attacker: usize,
    pub defender: usize,

    #[serde(rename = "curr_player")]
    pub current_player: usize,

    #[serde(default)]
    pub deck_count: u32,

    pub trump_card: Card,

    #[serde(default)]
    pub trump_suit: Option<String>,

    #[serde(rename = "num_of_burned_cards", default)]
    pub burned_count: u32,

    /// Raw log fragments, one ordered list per participant.
    #[serde(default)]
    pub log: Vec<Vec<String>>,
}

impl StateSnapshot {
    /// Checks the structural invariants against the number of seated participants.
    pub fn validate(&self, participants: usize) -> Result<(), SnapshotError> {
        if self.hands.len() != participants {
            return Err(SnapshotError::HandCount {
                hands: self.hands.len(),
                participants,
            });
        }
        if self.defense.len() > self.attack.len() {
            return Err(SnapshotError::DefenseOverflow {
                attack: self.attack.len(),
                defense: self.defense.len(),
            });
        }
        Ok(())
    }

    /// Attack cards paired with their answers, in table order.
    pub fn table_pairs(&self) -> impl Iterator<Item = TablePair<'_>> {
        self.attack.iter().enumerate().map(|(i, attack)| TablePair {
            attack,
            defense: self.defense.get(i),
        })
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::detect(&self.hands)
    }}
