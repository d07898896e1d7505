use super::selection::selection_numbers;
use crate::model::{SuperballWinnerRecord, Ticket};

/// The three mutually exclusive result states a concluded-or-pending
/// Superball draw can present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuperballStatus {
    /// No winners data published yet.
    Pending,
    /// Draw concluded, none of the user's tickets carry the number.
    NoMatch,
    /// Draw concluded with a matching ticket.
    Matched,
}

impl SuperballStatus {
    pub fn derive(winning_number: Option<i64>, matched: bool) -> Self {
        match (winning_number, matched) {
            (None, _) => SuperballStatus::Pending,
            (Some(_), false) => SuperballStatus::NoMatch,
            (Some(_), true) => SuperballStatus::Matched,
        }
    }
}

/// The authoritative latest winning number: `winners[0]` in the
/// most-recent-first feed. `None` while the draw is still pending.
pub fn latest_winning_number(winners: &[SuperballWinnerRecord]) -> Option<i64> {
    winners.first().and_then(|r| r.winner_number.as_i64())
}

/// A ticket matches when its number sequence contains the winning number.
/// Stored numbers may be strings; coercion happens at the canonicalization
/// boundary.
pub fn ticket_matches(ticket: &Ticket, winning_number: i64) -> bool {
    selection_numbers(ticket.selections.as_ref()).contains(&winning_number)
}

pub fn any_ticket_matches(tickets: &[Ticket], winning_number: Option<i64>) -> bool {
    match winning_number {
        Some(n) => tickets.iter().any(|t| ticket_matches(t, n)),
        None => false,
    }
}

/// Whether the user appears in any historical winner record, not just the
/// latest one.
pub fn has_won(winners: &[SuperballWinnerRecord], email: &str) -> bool {
    winners
        .iter()
        .flat_map(|r| r.winners.iter())
        .any(|w| w.email == email)
}

/// Prize total summed across every historical record naming the user.
pub fn total_prize(winners: &[SuperballWinnerRecord], email: &str) -> f64 {
    winners
        .iter()
        .flat_map(|r| r.winners.iter())
        .filter(|w| w.email == email)
        .map(|w| w.prize)
        .sum()
}
