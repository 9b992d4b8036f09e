//! View-model snapshots derived from the controller state.
use game_core::{Card, Outcome, StateSnapshot, merge_logs, strip_marker};
use runtime::{AutoPlayState, ControllerState, Failure, Lifecycle, PlayMode, SessionId};

use crate::config::LogConfig;
use crate::message::{MessageEntry, MessageLog};

/// High-level snapshot of the session used by presentation layers.
#[derive(Clone, Debug)]
pub struct Frame {
    pub summary: SessionSummary,
    /// Absent until a session has started.
    pub game: Option<GameView>,
    pub messages: Vec<MessageEntry>,
}

impl Frame {
    pub fn from_state(
        state: &ControllerState,
        log: &LogConfig,
        messages: &MessageLog,
        message_limit: usize,
    ) -> Self {
        let game = state
            .session
            .as_ref()
            .map(|session| GameView::from_snapshot(&session.snapshot, &session.display_names, log));

        Self {
            summary: SessionSummary::from_state(state),
            game,
            messages: collect_messages(messages, message_limit),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionSummary {
    pub session: Option<SessionId>,
    pub step: u64,
    pub lifecycle: Lifecycle,
    pub mode: PlayMode,
    pub autoplay: AutoPlayState,
    pub failure: Option<Failure>,
}

impl SessionSummary {
    fn from_state(state: &ControllerState) -> Self {
        Self {
            session: state.session.as_ref().map(|s| s.id.clone()),
            step: state.session.as_ref().map_or(0, |s| s.step),
            lifecycle: state.lifecycle(),
            mode: state.mode,
            autoplay: state.autoplay.clone(),
            failure: state.failure.clone(),
        }
    }
}

/// One attack card and its answer, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableView {
    pub attack: Card,
    pub defense: Option<Card>,
}

#[derive(Clone, Debug)]
pub struct SeatView {
    pub index: usize,
    pub name: String,
    pub card_count: usize,
    pub cards: Vec<Card>,
    pub is_attacker: bool,
    pub is_defender: bool,
    pub is_current: bool,
    pub is_winner: bool,
    pub is_loser: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    pub seat: usize,
    pub name: String,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct GameView {
    pub trump: Card,
    pub deck_count: u32,
    pub burned_count: u32,
    pub table: Vec<TableView>,
    pub seats: Vec<SeatView>,
    /// Merged log of every bot, newest first.
    pub log: Vec<LogLine>,
    /// Each bot's own log with markers stripped, newest first. Empty unless
    /// enabled in [`LogConfig`].
    pub bot_logs: Vec<Vec<String>>,
    pub outcome: Outcome,
}

impl GameView {
    pub fn from_snapshot(snapshot: &StateSnapshot, names: &[String], log: &LogConfig) -> Self {
        let outcome = snapshot.outcome();

        let table = snapshot
            .table_pairs()
            .map(|pair| TableView {
                attack: pair.attack.clone(),
                defense: pair.defense.cloned(),
            })
            .collect();

        let seats = snapshot
            .hands
            .iter()
            .enumerate()
            .map(|(index, hand)| SeatView {
                index,
                name: seat_name(names, index),
                card_count: hand.len(),
                cards: hand.clone(),
                is_attacker: snapshot.attacker == index,
                is_defender: snapshot.defender == index,
                is_current: snapshot.current_player == index,
                is_winner: outcome.is_winner(index),
                is_loser: outcome.loser == Some(index),
            })
            .collect();

        let merged = merge_logs(&snapshot.log, names)
            .into_iter()
            .rev()
            .take(log.lines)
            .map(|entry| LogLine {
                seat: entry.participant,
                name: entry.name,
                text: entry.text,
            })
            .collect();

        let bot_logs = if log.show_bot_logs {
            snapshot
                .log
                .iter()
                .map(|fragments| {
                    fragments
                        .iter()
                        .rev()
                        .map(|fragment| strip_marker(fragment).to_string())
                        .collect()
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            trump: snapshot.trump_card.clone(),
            deck_count: snapshot.deck_count,
            burned_count: snapshot.burned_count,
            table,
            seats,
            log: merged,
            bot_logs,
            outcome,
        }
    }

    /// One-line summary of where the game stands.
    pub fn headline(&self) -> String {
        if self.outcome.is_draw() {
            return "Game over: draw".to_string();
        }
        if let Some(loser) = self.outcome.loser {
            return format!("Game over: {} is the durak", self.seat_name(loser));
        }
        match self.seats.iter().find(|seat| seat.is_current) {
            Some(seat) => format!("{} to move", seat.name),
            None => "Waiting".to_string(),
        }
    }

    fn seat_name(&self, index: usize) -> &str {
        self.seats
            .get(index)
            .map(|seat| seat.name.as_str())
            .unwrap_or("?")
    }
}

fn seat_name(names: &[String], index: usize) -> String {
    match names.get(index) {
        Some(name) if !name.is_empty() => name.clone(),
        _ => format!("Player {}", index),
    }
}

fn collect_messages(log: &MessageLog, limit: usize) -> Vec<MessageEntry> {
    if limit == 0 {
        return Vec::new();
    }
    let mut items: Vec<_> = log.recent(limit).cloned().collect();
    items.reverse();
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(codes: &[&str]) -> Vec<Card> {
        codes.iter().map(|c| Card::from(*c)).collect()
    }

    fn snapshot() -> StateSnapshot {
        StateSnapshot {
            hands: vec![cards(&["6♠", "K♥"]), cards(&["7♠"]), Vec::new()],
            attack: cards(&["9♦", "9♣"]),
            defense: cards(&["10♦"]),
            attacker: 0,
            defender: 1,
            current_player: 1,
            deck_count: 4,
            trump_card: Card::from("A♣"),
            trump_suit: None,
            burned_count: 12,
            log: vec![
                vec!["[TS:2]plays 9♦".into(), "[TS:4]plays 9♣".into()],
                vec!["[TS:3]beats with 10♦".into(), "thinking".into()],
                vec![],
            ],
        }
    }

    fn names() -> Vec<String> {
        vec!["alpha".into(), "beta".into(), String::new()]
    }

    #[test]
    fn table_pairs_leave_open_attacks_unanswered() {
        let view = GameView::from_snapshot(&snapshot(), &names(), &LogConfig::default());

        assert_eq!(
            view.table,
            vec![
                TableView {
                    attack: Card::from("9♦"),
                    defense: Some(Card::from("10♦")),
                },
                TableView {
                    attack: Card::from("9♣"),
                    defense: None,
                },
            ]
        );
    }

    #[test]
    fn seats_carry_roles_and_results() {
        let view = GameView::from_snapshot(&snapshot(), &names(), &LogConfig::default());

        let beta = &view.seats[1];
        assert!(beta.is_defender && beta.is_current && !beta.is_attacker);
        assert_eq!(beta.card_count, 1);
        assert!(view.seats[2].is_winner);
        assert_eq!(view.seats[2].name, "Player 2");
        assert_eq!(view.headline(), "beta to move");
    }

    #[test]
    fn merged_log_is_newest_first_and_bounded() {
        let config = LogConfig {
            lines: 3,
            show_bot_logs: true,
        };
        let view = GameView::from_snapshot(&snapshot(), &names(), &config);

        let texts: Vec<_> = view.log.iter().map(|line| line.text.as_str()).collect();
        assert_eq!(texts, ["thinking", "plays 9♣", "beats with 10♦"]);
        assert_eq!(view.bot_logs[0], vec!["plays 9♣", "plays 9♦"]);
    }

    #[test]
    fn headline_names_the_durak() {
        let mut snapshot = snapshot();
        snapshot.hands = vec![Vec::new(), cards(&["7♠"]), Vec::new()];

        let view = GameView::from_snapshot(&snapshot, &names(), &LogConfig::default());

        assert_eq!(view.headline(), "Game over: beta is the durak");
        assert!(view.bot_logs.is_empty());
    }
}
