//! The current user's own listings

use serde::{Deserialize, Serialize};

use super::meeting::MeetingState;
use super::{deserialize_amount, deserialize_id};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingSummary {
    pub id: String,
    pub currency: String,
    pub amount: f64,
    pub accept_currency: String,
    pub location: String,
    pub status: String,
    pub pending_location_proposals: u32,
    pub accepted_location_proposals: u32,
}

/// Entry of `recentListings` in the dashboard summary
#[derive(Debug, Clone, Deserialize)]
pub struct ListingItem {
    #[serde(alias = "id", deserialize_with = "deserialize_id")]
    pub listing_id: String,
    pub currency: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    pub accept_currency: String,
    #[serde(default)]
    pub location: String,
    pub status: String,
    #[serde(default)]
    pub pending_location_proposals: u32,
    #[serde(default)]
    pub accepted_location_proposals: u32,
}

impl From<ListingItem> for ListingSummary {
    fn from(item: ListingItem) -> Self {
        ListingSummary {
            id: item.listing_id,
            currency: item.currency.trim().to_uppercase(),
            amount: item.amount,
            accept_currency: item.accept_currency.trim().to_uppercase(),
            location: item.location,
            status: item.status,
            pending_location_proposals: item.pending_location_proposals,
            accepted_location_proposals: item.accepted_location_proposals,
        }
    }
}

impl ListingSummary {
    /// Proposal counts from the meeting endpoint replace the summary's copy
    pub fn apply_meeting(&mut self, meeting: &MeetingState) {
        self.pending_location_proposals = meeting.pending_location_proposals;
        self.accepted_location_proposals = meeting.accepted_location_proposals;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_items;
    use serde_json::json;

    #[test]
    fn test_listing_accepts_id_alias() {
        let raw = vec![
            json!({ "id": 5, "currency": "usd", "amount": 300, "accept_currency": "cop",
                    "location": "Bogotá", "status": "active", "pending_location_proposals": 2 }),
            json!({ "id": 6, "currency": "usd", "accept_currency": "cop", "status": "active" }),
        ];
        let listings: Vec<ListingSummary> = parse_items::<ListingItem>(&raw, "recentListings")
            .into_iter()
            .map(ListingSummary::from)
            .collect();

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "5");
        assert_eq!(listings[0].accept_currency, "COP");
        assert_eq!(listings[0].pending_location_proposals, 2);
    }

    #[test]
    fn test_apply_meeting_replaces_counters() {
        let mut listing = ListingSummary {
            id: "1".to_string(),
            currency: "USD".to_string(),
            amount: 10.0,
            accept_currency: "EUR".to_string(),
            location: String::new(),
            status: "active".to_string(),
            pending_location_proposals: 4,
            accepted_location_proposals: 0,
        };
        let meeting = MeetingState {
            pending_location_proposals: 1,
            accepted_location_proposals: 2,
            ..MeetingState::default()
        };
        listing.apply_meeting(&meeting);
        assert_eq!(listing.pending_location_proposals, 1);
        assert_eq!(listing.accepted_location_proposals, 2);
    }
}
