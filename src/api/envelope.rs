//! Envelope checks and payload extraction for the read endpoints
//!
//! The `success` flag and the presence of the expected key are the only
//! validity signals. Items inside a valid envelope are parsed one by one.

use serde_json::{Map, Value};

use super::models::{ApiError, SummaryPayload};
use crate::models::{
    parse_items, ExchangeItem, ExchangeRecord, ExchangeRole, ListingItem, ListingSummary,
    MeetingProposal, NegotiationItem, PendingNegotiation, UserProfile,
};

fn as_object(body: &Value) -> Result<&Map<String, Value>, ApiError> {
    body.as_object()
        .ok_or_else(|| ApiError::Deserialization("response is not a JSON object".to_string()))
}

fn failure_message(object: &Map<String, Value>) -> String {
    object
        .get("message")
        .or_else(|| object.get("error"))
        .and_then(Value::as_str)
        .unwrap_or("success flag is false")
        .to_string()
}

/// Rejects an explicit `success: false`; an absent flag is fine
fn reject_failure(object: &Map<String, Value>) -> Result<(), ApiError> {
    match object.get("success") {
        Some(Value::Bool(false)) => Err(ApiError::Business(failure_message(object))),
        _ => Ok(()),
    }
}

/// Requires `success: true`
fn require_success(object: &Map<String, Value>) -> Result<(), ApiError> {
    match object.get("success") {
        Some(Value::Bool(true)) => Ok(()),
        Some(_) => Err(ApiError::Business(failure_message(object))),
        None => Err(ApiError::Business("missing success flag".to_string())),
    }
}

fn expect_array<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], ApiError> {
    match object.get(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(ApiError::Deserialization(format!("`{}` is not an array", key))),
        None => Err(ApiError::Deserialization(format!("missing `{}`", key))),
    }
}

/// Optional arrays inside the summary's `data` default to empty
fn optional_array<'a>(object: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    match object.get(key) {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

fn exchange_records(items: &[Value], source: &str, role: Option<ExchangeRole>) -> Vec<ExchangeRecord> {
    parse_items::<ExchangeItem>(items, source)
        .into_iter()
        .filter_map(|item| ExchangeRecord::from_item(item, role))
        .collect()
}

/// `{ data: { user, recentListings[], activeExchanges[] } }`
pub fn parse_summary(body: &Value) -> Result<SummaryPayload, ApiError> {
    let object = as_object(body)?;
    reject_failure(object)?;
    let data = object
        .get("data")
        .and_then(Value::as_object)
        .ok_or_else(|| ApiError::Deserialization("missing `data`".to_string()))?;

    let user = data
        .get("user")
        .and_then(|user| serde_json::from_value::<UserProfile>(user.clone()).ok());

    let listings = parse_items::<ListingItem>(optional_array(data, "recentListings"), "recentListings")
        .into_iter()
        .map(ListingSummary::from)
        .collect();

    let active_exchanges = exchange_records(optional_array(data, "activeExchanges"), "activeExchanges", None);

    Ok(SummaryPayload {
        user,
        listings,
        active_exchanges,
    })
}

/// `{ purchased_contacts: [...] }`, the user bought access, so they are the buyer
pub fn parse_purchased_contacts(body: &Value) -> Result<Vec<ExchangeRecord>, ApiError> {
    let object = as_object(body)?;
    reject_failure(object)?;
    let items = expect_array(object, "purchased_contacts")?;
    Ok(exchange_records(items, "purchased_contacts", Some(ExchangeRole::Buyer)))
}

/// `{ listing_purchases: [...] }`, someone bought access to the user's listing
pub fn parse_listing_purchases(body: &Value) -> Result<Vec<ExchangeRecord>, ApiError> {
    let object = as_object(body)?;
    reject_failure(object)?;
    let items = expect_array(object, "listing_purchases")?;
    Ok(exchange_records(items, "listing_purchases", Some(ExchangeRole::Seller)))
}

/// `{ success, negotiations: [...] }`
pub fn parse_negotiations(body: &Value) -> Result<Vec<PendingNegotiation>, ApiError> {
    let object = as_object(body)?;
    require_success(object)?;
    let items = expect_array(object, "negotiations")?;
    Ok(parse_items::<NegotiationItem>(items, "negotiations")
        .into_iter()
        .filter_map(PendingNegotiation::from_item)
        .collect())
}

/// `{ success, proposals: [...] }`
pub fn parse_meeting_proposals(body: &Value) -> Result<Vec<MeetingProposal>, ApiError> {
    let object = as_object(body)?;
    require_success(object)?;
    let items = expect_array(object, "proposals")?;
    Ok(parse_items(items, "proposals"))
}
