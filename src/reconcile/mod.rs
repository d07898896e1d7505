//! Ticket-prize reconciliation: matching purchased selections against
//! published winning numbers and server-attested wins.
//!
//! Two independent modes share one canonicalization boundary:
//! multi-country lottery draws ([`lottery`]) and single-number Superball
//! draws ([`superball`]). Malformed payloads degrade to "no match" rather
//! than failing the view.

pub mod lottery;
pub mod selection;
pub mod superball;
