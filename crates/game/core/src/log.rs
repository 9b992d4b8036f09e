//! Merging per-participant log fragments into one display order.
//!
//! Each participant's log is an independent, append-only list of strings. A
//! fragment may start with a `[TS:<seconds>]` marker stamped by whoever wrote
//! it; merging sorts on that marker so fragments from different participants
//! interleave in the order they happened. Fragments without a marker sort
//! after every stamped one and keep their original relative order.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[TS:(\d+(?:\.\d+)?)\]").expect("timestamp marker pattern is valid")
});

/// Sort key of a log entry.
///
/// `Unstamped` is the maximum: it compares greater than every stamped key.
#[derive(Clone, Copy, Debug)]
pub enum OrderKey {
    Stamped(f64),
    Unstamped,
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Stamped(a), Self::Stamped(b)) => a.total_cmp(b),
            (Self::Stamped(_), Self::Unstamped) => Ordering::Less,
            (Self::Unstamped, Self::Stamped(_)) => Ordering::Greater,
            (Self::Unstamped, Self::Unstamped) => Ordering::Equal,
        }
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OrderKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderKey {}

/// A log fragment tagged with its author, ready for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub participant: usize,
    pub name: String,
    pub text: String,
    pub order: OrderKey,
}

/// Splits a raw fragment into its order key and message text.
pub fn parse_fragment(fragment: &str) -> (OrderKey, &str) {
    let Some(captures) = MARKER.captures(fragment) else {
        return (OrderKey::Unstamped, fragment);
    };
    let marker_len = captures.get(0).map_or(0, |m| m.end());
    match captures[1].parse::<f64>() {
        Ok(stamp) => (OrderKey::Stamped(stamp), &fragment[marker_len..]),
        Err(_) => (OrderKey::Unstamped, fragment),
    }
}

/// Message text with any leading timestamp marker removed.
pub fn strip_marker(fragment: &str) -> &str {
    parse_fragment(fragment).1
}

/// Flattens per-participant fragments into one ascending sequence.
///
/// Participants are visited in seat order and fragments in insertion order
/// before a stable sort, so the result is the same for the same input every
/// time, ties included. `names[i]` labels seat `i`; seats without a name are
/// shown as `Player i`.
pub fn merge_logs<S: AsRef<str>>(fragments: &[Vec<S>], names: &[String]) -> Vec<LogEntry> {
    let mut entries: Vec<LogEntry> = fragments
        .iter()
        .enumerate()
        .flat_map(|(participant, log)| {
            let name = names
                .get(participant)
                .filter(|n| !n.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("Player {participant}"));
            log.iter().map(move |fragment| {
                let (order, text) = parse_fragment(fragment.as_ref());
                LogEntry {
                    participant,
                    name: name.clone(),
                    text: text.to_string(),
                    order,
                }
            })
        })
        .collect();

    entries.sort_by(|a, b| a.order.cmp(&b.order));
    entries
}
