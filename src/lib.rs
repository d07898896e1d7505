//! Core client logic for a recurring-draw lottery product: countdown and
//! deadline timers, next-draw selection, ticket-prize reconciliation
//! against published winning numbers, winner detection for the
//! celebratory effect, and the payment-session state machine. Rendering,
//! routing and transport stay behind the narrow collaborator traits in
//! [`services`].

pub mod countdown;
pub mod draws;
pub mod effects;
pub mod error;
pub mod model;
pub mod payment;
pub mod reconcile;
pub mod services;
pub mod store;
pub mod validate;
