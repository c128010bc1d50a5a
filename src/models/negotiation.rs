//! Negotiations that are still open for the current user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::exchange::ExchangeRole;
use super::{deserialize_amount, deserialize_id};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum NegotiationStatus {
    Negotiating,
    Agreed,
    PaidPartial,
    PaidComplete,
    Other(String),
}

impl From<String> for NegotiationStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "negotiating" => NegotiationStatus::Negotiating,
            "agreed" => NegotiationStatus::Agreed,
            "paid_partial" => NegotiationStatus::PaidPartial,
            "paid_complete" => NegotiationStatus::PaidComplete,
            _ => NegotiationStatus::Other(raw),
        }
    }
}

impl NegotiationStatus {
    pub fn label(&self) -> &str {
        match self {
            NegotiationStatus::Negotiating => "negotiating",
            NegotiationStatus::Agreed => "agreed",
            NegotiationStatus::PaidPartial => "paid_partial",
            NegotiationStatus::PaidComplete => "paid_complete",
            NegotiationStatus::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingNegotiation {
    pub id: String,
    pub listing_id: String,
    pub counterpart_name: String,
    pub from_currency: String,
    pub to_currency: String,
    pub amount: f64,
    pub proposed_time: Option<DateTime<Utc>>,
    pub status: NegotiationStatus,
    pub action_required: bool,
    pub user_role: ExchangeRole,
}

/// Entry of `negotiations` in `GET Negotiations/GetMyNegotiations`
#[derive(Debug, Clone, Deserialize)]
pub struct NegotiationItem {
    #[serde(deserialize_with = "deserialize_id")]
    pub negotiation_id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub listing_id: String,
    pub counterpart_name: String,
    pub currency: String,
    pub accept_currency: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[serde(default)]
    pub proposed_time: Option<DateTime<Utc>>,
    pub status: NegotiationStatus,
    #[serde(default)]
    pub action_required: bool,
    pub user_role: String,
}

impl PendingNegotiation {
    pub fn from_item(item: NegotiationItem) -> Option<Self> {
        Some(PendingNegotiation {
            user_role: ExchangeRole::parse(&item.user_role)?,
            id: item.negotiation_id,
            listing_id: item.listing_id,
            counterpart_name: item.counterpart_name,
            from_currency: item.currency.trim().to_uppercase(),
            to_currency: item.accept_currency.trim().to_uppercase(),
            amount: item.amount,
            proposed_time: item.proposed_time,
            status: item.status,
            action_required: item.action_required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_items;
    use serde_json::json;

    #[test]
    fn test_status_parsing_keeps_unknown_values() {
        assert_eq!(NegotiationStatus::from("PAID_PARTIAL".to_string()), NegotiationStatus::PaidPartial);
        let other = NegotiationStatus::from("disputed".to_string());
        assert_eq!(other, NegotiationStatus::Other("disputed".to_string()));
        assert_eq!(other.label(), "disputed");
    }

    #[test]
    fn test_invalid_role_drops_negotiation() {
        let raw = vec![
            json!({ "negotiation_id": 1, "listing_id": "L1", "counterpart_name": "Ana",
                    "currency": "usd", "accept_currency": "eur", "amount": 50,
                    "status": "negotiating", "action_required": true, "user_role": "buyer" }),
            json!({ "negotiation_id": 2, "listing_id": "L2", "counterpart_name": "Bo",
                    "currency": "usd", "accept_currency": "eur", "amount": 50,
                    "status": "agreed", "user_role": "broker" }),
        ];
        let negotiations: Vec<PendingNegotiation> = parse_items::<NegotiationItem>(&raw, "negotiations")
            .into_iter()
            .filter_map(PendingNegotiation::from_item)
            .collect();

        assert_eq!(negotiations.len(), 1);
        assert_eq!(negotiations[0].listing_id, "L1");
        assert!(negotiations[0].action_required);
        assert_eq!(negotiations[0].user_role, ExchangeRole::Buyer);
    }
}
