use super::selection::{canonical_key, selection_numbers};
use crate::model::{Order, OrderStatus, Ticket, Win, WinningNumber};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// One ticket of the flat reconciliation input, annotated with its
/// originating order.
#[derive(Debug, Clone)]
pub struct TicketRecord {
    pub ticket: Ticket,
    pub order_id: String,
    pub draw_date: DateTime<Utc>,
}

/// Ledger key for one ticket's prize entry: the real ticket id, or the
/// position in the flat input when the ticket carries no identifier.
/// Keeping the variants separate means a real id that happens to look
/// like a positional key can never merge with one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum TicketKey {
    Id(String),
    Index(usize),
}

impl fmt::Display for TicketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketKey::Id(id) => f.write_str(id),
            TicketKey::Index(position) => write!(f, "idx-{position}"),
        }
    }
}

impl Serialize for TicketKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Per-ticket prize attribution plus the aggregate total.
#[derive(Debug, Clone, Default)]
pub struct LotteryReconciliation {
    /// Keyed by ticket id, falling back to the positional key for
    /// id-less tickets. Duplicate ids are summed.
    pub prizes: BTreeMap<TicketKey, f64>,
    pub total: f64,
}

/// Flatten the user's orders into the reconciliation input. Only `paid`
/// orders targeting `draw_date` participate.
pub fn tickets_for_draw(orders: &[Order], draw_date: DateTime<Utc>) -> Vec<TicketRecord> {
    orders
        .iter()
        .filter(|o| o.payment_status == OrderStatus::Paid && o.draw_date == draw_date)
        .flat_map(|o| {
            o.tickets.iter().map(|t| TicketRecord {
                ticket: t.clone(),
                order_id: o.id.clone(),
                draw_date: o.draw_date,
            })
        })
        .collect()
}

/// Wins attested for `draw_date`.
pub fn wins_for_draw(wins: &[Win], draw_date: DateTime<Utc>) -> Vec<Win> {
    wins.iter()
        .filter(|w| w.draw_date == draw_date)
        .cloned()
        .collect()
}

/// Match every ticket against the attested wins and attribute prizes.
///
/// Identifier equality takes precedence over content equality: a ticket
/// whose id matches a win keeps that win's prize even when their selections
/// snapshots differ. Content matching compares canonical keys; an empty
/// canonical key (malformed selections) never content-matches anything.
pub fn reconcile_tickets(tickets: &[TicketRecord], wins: &[Win]) -> LotteryReconciliation {
    let mut prizes: BTreeMap<TicketKey, f64> = BTreeMap::new();
    for (position, record) in tickets.iter().enumerate() {
        let key = match &record.ticket.id {
            Some(id) => TicketKey::Id(id.clone()),
            None => TicketKey::Index(position),
        };
        *prizes.entry(key).or_insert(0.0) += match_prize(&record.ticket, wins);
    }
    let total = prizes.values().sum();
    LotteryReconciliation { prizes, total }
}

fn match_prize(ticket: &Ticket, wins: &[Win]) -> f64 {
    // 1. First match by identifier wins outright.
    if let Some(id) = ticket.id.as_deref() {
        let by_id = wins
            .iter()
            .find(|w| w.ticket_id.as_deref() == Some(id) || w.id.as_deref() == Some(id));
        if let Some(win) = by_id {
            return win_amount(win);
        }
    }

    // 2. Fall back to content equality of the canonical serializations.
    let key = canonical_key(ticket.selections.as_ref());
    if !key.is_empty() {
        let by_content = wins
            .iter()
            .find(|w| canonical_key(w.selections.as_ref()) == key);
        if let Some(win) = by_content {
            return win_amount(win);
        }
    }

    0.0
}

fn win_amount(win: &Win) -> f64 {
    win.prize.or(win.prize_amount).unwrap_or(0.0)
}

/// Country-blind winner signal: true when any ticket number of any paid
/// order for `draw_date` appears among that date's winning values,
/// irrespective of which country it was played for. Gates the celebratory
/// effect only; prize attribution stays with [`reconcile_tickets`].
pub fn any_number_hit(
    orders: &[Order],
    winning: &[WinningNumber],
    draw_date: DateTime<Utc>,
) -> bool {
    let winning_values: HashSet<i64> = winning
        .iter()
        .filter(|w| w.draw_date == draw_date)
        .filter_map(|w| w.number.as_i64())
        .collect();
    if winning_values.is_empty() {
        return false;
    }
    orders
        .iter()
        .filter(|o| o.payment_status == OrderStatus::Paid && o.draw_date == draw_date)
        .flat_map(|o| o.tickets.iter())
        .flat_map(|t| selection_numbers(t.selections.as_ref()))
        .any(|n| winning_values.contains(&n))
}
