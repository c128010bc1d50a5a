//! Exchange records: one active trade relationship per listing id

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::meeting::MeetingState;
use super::{deserialize_amount, deserialize_id, deserialize_optional_amount};
use crate::utils::format::parse_coordinates;

/// Which side of the trade the current user is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeRole {
    Buyer,
    Seller,
}

impl ExchangeRole {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "buyer" => Some(ExchangeRole::Buyer),
            "seller" => Some(ExchangeRole::Seller),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeRole::Buyer => "buyer",
            ExchangeRole::Seller => "seller",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Accepts only points on the globe
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Coordinates { latitude, longitude })
    }
}

/// Merged view-model entry for one exchange
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRecord {
    pub id: String,
    pub from_currency: String,
    pub to_currency: String,
    pub amount: f64,
    pub converted_amount: Option<f64>,
    pub counterpart_name: String,
    pub location: String,
    pub coordinates: Option<Coordinates>,
    pub radius: f64,
    pub role: ExchangeRole,
    pub will_round: bool,
    pub meeting_time: Option<DateTime<Utc>>,
    pub negotiation_status: Option<String>,
    pub has_pending_location_proposal: bool,
    pub has_accepted_location: bool,
    pub display_status: String,
}

/// Wire shape shared by `activeExchanges`, `purchased_contacts` and
/// `listing_purchases`
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeItem {
    #[serde(deserialize_with = "deserialize_id")]
    pub listing_id: String,
    pub currency: String,
    pub accept_currency: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub converted_amount: Option<f64>,
    #[serde(default)]
    pub counterpart_name: Option<String>,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default)]
    pub buyer_name: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub radius: Option<f64>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub will_round_to_nearest_dollar: bool,
    #[serde(default)]
    pub meeting_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub negotiation_status: Option<String>,
    #[serde(default)]
    pub display_status: Option<String>,
}

impl ExchangeItem {
    /// The other party: a buyer deals with the seller and vice versa
    fn counterpart(&self, role: ExchangeRole) -> Option<String> {
        let (first, second) = match role {
            ExchangeRole::Buyer => (&self.seller_name, &self.buyer_name),
            ExchangeRole::Seller => (&self.buyer_name, &self.seller_name),
        };
        [&self.counterpart_name, first, second]
            .into_iter()
            .flatten()
            .map(|name| name.trim())
            .find(|name| !name.is_empty())
            .map(str::to_string)
    }
}

impl ExchangeRecord {
    /// Build a record from a wire item. `role` overrides whatever the item
    /// says; with `None` the item's own `role` field is required.
    pub fn from_item(item: ExchangeItem, role: Option<ExchangeRole>) -> Option<Self> {
        let role = match role {
            Some(role) => role,
            None => ExchangeRole::parse(item.role.as_deref()?)?,
        };
        let counterpart_name = item.counterpart(role)?;

        let coordinates = match (item.latitude, item.longitude) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
            _ => parse_coordinates(&item.location),
        };

        Some(ExchangeRecord {
            id: item.listing_id,
            from_currency: item.currency.trim().to_uppercase(),
            to_currency: item.accept_currency.trim().to_uppercase(),
            amount: item.amount,
            converted_amount: item.converted_amount,
            counterpart_name,
            location: item.location,
            coordinates,
            radius: item.radius.unwrap_or(0.0),
            role,
            will_round: item.will_round_to_nearest_dollar,
            meeting_time: item.meeting_time,
            negotiation_status: item.negotiation_status.filter(|s| !s.trim().is_empty()),
            has_pending_location_proposal: false,
            has_accepted_location: false,
            display_status: item.display_status.unwrap_or_default(),
        })
    }

    /// Fold the listing's meeting proposals into this record
    pub fn apply_meeting(&mut self, meeting: &MeetingState) {
        if let Some(time) = meeting.accepted_time {
            self.meeting_time = Some(time);
        }
        if let Some(location) = &meeting.accepted_location {
            self.location = location.clone();
            self.coordinates = meeting
                .accepted_coordinates
                .or_else(|| parse_coordinates(location));
        }
        self.has_pending_location_proposal = meeting.pending_location_proposals > 0;
        self.has_accepted_location =
            meeting.accepted_location.is_some() || meeting.accepted_location_proposals > 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: serde_json::Value) -> ExchangeItem {
        serde_json::from_value(value).expect("fixture should parse")
    }

    #[test]
    fn test_role_comes_from_item_when_not_forced() {
        let exchange = item(json!({
            "listing_id": 42,
            "currency": "usd",
            "accept_currency": "eur",
            "amount": "100",
            "counterpart_name": "Ana",
            "location": "40.4168,-3.7038",
            "role": "Seller"
        }));

        let record = ExchangeRecord::from_item(exchange, None).expect("record");
        assert_eq!(record.id, "42");
        assert_eq!(record.role, ExchangeRole::Seller);
        assert_eq!(record.from_currency, "USD");
        assert_eq!(record.to_currency, "EUR");
        let coords = record.coordinates.expect("coordinates from location text");
        assert!((coords.latitude - 40.4168).abs() < 1e-9);
    }

    #[test]
    fn test_missing_role_or_counterpart_drops_record() {
        let no_role = item(json!({
            "listing_id": "L1", "currency": "USD", "accept_currency": "MXN",
            "amount": 5, "counterpart_name": "Bo"
        }));
        assert!(ExchangeRecord::from_item(no_role, None).is_none());

        let no_name = item(json!({
            "listing_id": "L1", "currency": "USD", "accept_currency": "MXN",
            "amount": 5, "seller_name": "   "
        }));
        assert!(ExchangeRecord::from_item(no_name, Some(ExchangeRole::Buyer)).is_none());
    }

    #[test]
    fn test_counterpart_is_the_other_side_of_the_role() {
        let both = json!({
            "listing_id": "L4", "currency": "USD", "accept_currency": "EUR",
            "amount": 50, "seller_name": "Me (owner)", "buyer_name": "Bea"
        });

        let sold = ExchangeRecord::from_item(item(both.clone()), Some(ExchangeRole::Seller)).expect("record");
        assert_eq!(sold.counterpart_name, "Bea");

        let bought = ExchangeRecord::from_item(item(both), Some(ExchangeRole::Buyer)).expect("record");
        assert_eq!(bought.counterpart_name, "Me (owner)");

        let named = item(json!({
            "listing_id": "L4", "currency": "USD", "accept_currency": "EUR", "amount": 50,
            "counterpart_name": "Cal", "seller_name": "Sam", "buyer_name": "Bea"
        }));
        let record = ExchangeRecord::from_item(named, Some(ExchangeRole::Seller)).expect("record");
        assert_eq!(record.counterpart_name, "Cal");

        let buyer_only = item(json!({
            "listing_id": "L4", "currency": "USD", "accept_currency": "EUR",
            "amount": 50, "buyer_name": "Bea"
        }));
        let record = ExchangeRecord::from_item(buyer_only, Some(ExchangeRole::Buyer)).expect("record");
        assert_eq!(record.counterpart_name, "Bea");
    }

    #[test]
    fn test_apply_meeting_overrides_location() {
        let purchase = item(json!({
            "listing_id": "L9", "currency": "GBP", "accept_currency": "USD",
            "amount": 20, "buyer_name": "Kit", "location": "Central station"
        }));
        let mut record = ExchangeRecord::from_item(purchase, Some(ExchangeRole::Seller)).expect("record");
        assert!(record.coordinates.is_none());

        let meeting = MeetingState {
            accepted_location: Some("51.5072,-0.1276".to_string()),
            pending_location_proposals: 1,
            ..MeetingState::default()
        };
        record.apply_meeting(&meeting);

        assert_eq!(record.location, "51.5072,-0.1276");
        assert!(record.coordinates.is_some());
        assert!(record.has_pending_location_proposal);
        assert!(record.has_accepted_location);
    }
}
