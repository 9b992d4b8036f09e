//! Terminal state detection over a snapshot's hands.
//!
//! A participant who has played out every card has won. The game is lost by
//! the last participant still holding cards. When every hand empties at once
//! there is nobody left to lose: every participant is a winner and the game
//! is over as a draw.

use crate::snapshot::Card;

/// Winners and loser derived from a set of hands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Seat indices with an empty hand, ascending.
    pub winners: Vec<usize>,
    /// The only seat still holding cards, if exactly one does.
    pub loser: Option<usize>,
    seats: usize,
}

impl Outcome {
    pub fn detect<H: AsRef<[Card]>>(hands: &[H]) -> Self {
        let mut winners = Vec::new();
        let mut holding = Vec::new();
        for (index, hand) in hands.iter().enumerate() {
            if hand.as_ref().is_empty() {
                winners.push(index);
            } else {
                holding.push(index);
            }
        }

        let loser = match holding.as_slice() {
            [only] => Some(*only),
            _ => None,
        };

        Self {
            winners,
            loser,
            seats: hands.len(),
        }
    }

    /// Every seat emptied its hand at once.
    pub fn is_draw(&self) -> bool {
        self.seats > 0 && self.winners.len() == self.seats
    }

    /// No further steps should be requested.
    pub fn is_terminal(&self) -> bool {
        self.loser.is_some() || self.is_draw()
    }

    pub fn is_winner(&self, index: usize) -> bool {
        self.winners.binary_search(&index).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::hand;

    #[test]
    fn game_in_progress_has_no_loser() {
        let hands = vec![hand(&["6♠"]), hand(&["7♥", "8♥"]), hand(&["A♣"])];

        let outcome = Outcome::detect(&hands);

        assert!(outcome.winners.is_empty());
        assert_eq!(outcome.loser, None);
        assert!(!outcome.is_terminal());
    }

    #[test]
    fn early_finisher_wins_while_others_play_on() {
        let hands = vec![hand(&["6♠"]), hand(&[]), hand(&["A♣"])];

        let outcome = Outcome::detect(&hands);

        assert_eq!(outcome.winners, vec![1]);
        assert_eq!(outcome.loser, None);
        assert!(!outcome.is_terminal());
        assert!(!outcome.is_draw());
    }

    #[test]
    fn last_player_holding_cards_loses() {
        let hands = vec![hand(&[]), hand(&["K♦", "Q♦"]), hand(&[])];

        let outcome = Outcome::detect(&hands);

        assert_eq!(outcome.winners, vec![0, 2]);
        assert_eq!(outcome.loser, Some(1));
        assert!(outcome.is_terminal());
        assert!(outcome.is_winner(2));
        assert!(!outcome.is_winner(1));
    }

    #[test]
    fn all_hands_empty_is_a_terminal_draw() {
        let hands = vec![hand(&[]), hand(&[])];

        let outcome = Outcome::detect(&hands);

        assert_eq!(outcome.winners, vec![0, 1]);
        assert_eq!(outcome.loser, None);
        assert!(outcome.is_draw());
        assert!(outcome.is_terminal());
    }

    #[test]
    fn winners_are_exactly_the_empty_hands() {
        // every subset of four seats
        for mask in 0u8..16 {
            let hands: Vec<Vec<Card>> = (0..4)
                .map(|seat| {
                    if mask & (1 << seat) == 0 {
                        hand(&[])
                    } else {
                        hand(&["9♣"])
                    }
                })
                .collect();

            let outcome = Outcome::detect(&hands);

            let expected: Vec<usize> = (0..4).filter(|s| mask & (1 << s) == 0).collect();
            assert_eq!(outcome.winners, expected, "mask {mask:#06b}");
            let holders = mask.count_ones();
            assert_eq!(outcome.loser.is_some(), holders == 1, "mask {mask:#06b}");
            assert_eq!(outcome.is_draw(), holders == 0, "mask {mask:#06b}");
        }
    }
}
