//! Data models for the dashboard
//!
//! Wire items are parsed one at a time so a single malformed entry only drops
//! itself. View-model types are what the aggregator publishes.

pub mod dashboard;
pub mod exchange;
pub mod listing;
pub mod meeting;
pub mod negotiation;
pub mod user;

// Re-export commonly used types for convenience
pub use dashboard::{DashboardState, LoadPhase};
pub use exchange::{Coordinates, ExchangeItem, ExchangeRecord, ExchangeRole};
pub use listing::{ListingItem, ListingSummary};
pub use meeting::{MeetingProposal, MeetingState, ProposalStatus, ProposalType};
pub use negotiation::{NegotiationItem, NegotiationStatus, PendingNegotiation};
pub use user::UserProfile;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// Deserialize each element on its own, dropping the ones that don't fit `T`
pub fn parse_items<T: DeserializeOwned>(items: &[Value], source: &str) -> Vec<T> {
    let mut parsed = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match serde_json::from_value::<T>(item.clone()) {
            Ok(value) => parsed.push(value),
            Err(e) => debug!("Dropping {} item #{}: {}", source, index, e),
        }
    }
    parsed
}

/// Ids arrive as strings from some endpoints and as numbers from others
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid id: {}", other))),
    }
}

/// Amounts may be JSON numbers or numeric strings ("150.00")
pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    amount_from_value(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid amount: {}", value)))
}

pub(crate) fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    amount_from_value(&value)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid amount: {}", value)))
}

fn amount_from_value(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    amount.is_finite().then_some(amount)
}
