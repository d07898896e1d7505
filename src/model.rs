use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A scheduled lottery event, fetched periodically from the draw service.
/// Immutable once received; superseded wholesale by the next refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draw {
    pub id: String,
    pub country: String,
    pub draw_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// A number that upstream services deliver either as JSON number or as a
/// numeric string. Stored as received, coerced on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FlexNumber {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FlexNumber::Int(n) => Some(*n),
            FlexNumber::Float(f) => Some(*f as i64),
            FlexNumber::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }
}

/// One `{country, number}` entry of the array-shaped selections payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionPair {
    pub country: String,
    pub number: FlexNumber,
}

/// The polymorphic selections payload. Upstream sends one of three shapes:
/// an ordered array of `{country, number}` objects, a country-to-number map,
/// or (Superball) a bare list of numbers. Anything else is kept as raw JSON
/// and canonicalizes to an empty key rather than failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selections {
    Pairs(Vec<SelectionPair>),
    ByCountry(BTreeMap<String, FlexNumber>),
    Numbers(Vec<FlexNumber>),
    Other(serde_json::Value),
}

/// One purchased set of number selections. The identifier may be absent;
/// reconciliation falls back to a positional key in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selections: Option<Selections>,
    /// Superball entries carry their own draw date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    #[serde(other)]
    Other,
}

/// A purchase order. Only `paid` orders targeting the relevant draw date
/// participate in reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub payment_status: OrderStatus,
    pub draw_date: DateTime<Utc>,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

/// One country's published winning value for a draw date. Multiple records
/// share a draw date when they belong to one multi-country draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinningNumber {
    pub country: String,
    pub number: FlexNumber,
    pub draw_date: DateTime<Utc>,
}

/// A server-attested win. Ground truth for prize amounts; ticket/selection
/// matching is the fallback when identifiers are absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Win {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selections: Option<Selections>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prize: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prize_amount: Option<f64>,
    pub draw_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperballWinner {
    pub email: String,
    pub prize: f64,
}

/// One concluded Superball draw, most recent first in the winners feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperballWinnerRecord {
    pub winner_number: FlexNumber,
    #[serde(default)]
    pub winners: Vec<SuperballWinner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JackpotStatus {
    pub active: bool,
    pub amount: f64,
    pub current_streak: u32,
}

/// Structured time-remaining value. All fields are zero when the target is
/// absent, unparsable, or already passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    pub total_ms: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl CountdownState {
    /// Truthy "still running" flag; `total_ms` is not redisplayed.
    pub fn is_running(&self) -> bool {
        self.total_ms > 0
    }
}

/// Payload of the single external submit call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderPayload {
    pub tickets: Vec<Ticket>,
    pub tkid: String,
    pub payment_method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}
