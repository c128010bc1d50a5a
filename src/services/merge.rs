//! Single-writer merge of the dashboard sources
//!
//! Runs once per load after every source has reported (or failed). Record
//! order is fixed: summary active exchanges, then purchased contacts, then
//! listing purchases. The first record seen for an id wins.

use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tracing::debug;
use uuid::Uuid;

use crate::api::SummaryPayload;
use crate::models::{
    DashboardState, ExchangeRecord, LoadPhase, MeetingState, PendingNegotiation,
};

/// Everything one load collected; failed sources are already empty here
#[derive(Debug, Clone, Default)]
pub struct SourceResults {
    pub summary: SummaryPayload,
    /// Meeting state keyed by listing id
    pub meetings: HashMap<String, MeetingState>,
    pub purchased_contacts: Vec<ExchangeRecord>,
    pub listing_purchases: Vec<ExchangeRecord>,
    pub negotiations: Vec<PendingNegotiation>,
}

/// Exchange collection that refuses a second record for an id
#[derive(Debug, Default)]
pub struct ExchangeMerger {
    seen: HashSet<String>,
    records: Vec<ExchangeRecord>,
}

impl ExchangeMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many records were actually added
    pub fn extend<I>(&mut self, records: I, source: &str) -> usize
    where
        I: IntoIterator<Item = ExchangeRecord>,
    {
        let mut added = 0;
        for record in records {
            if self.seen.insert(record.id.clone()) {
                self.records.push(record);
                added += 1;
            } else {
                debug!("Skipping duplicate exchange {} from {}", record.id, source);
            }
        }
        added
    }

    pub fn into_records(self) -> Vec<ExchangeRecord> {
        self.records
    }
}

pub fn merge_dashboard(load_id: Uuid, results: SourceResults) -> DashboardState {
    let SourceResults {
        summary,
        meetings,
        purchased_contacts,
        listing_purchases,
        negotiations,
    } = results;

    let mut listings = summary.listings;
    for listing in &mut listings {
        if let Some(meeting) = meetings.get(&listing.id) {
            listing.apply_meeting(meeting);
        }
    }

    let mut merger = ExchangeMerger::new();
    merger.extend(summary.active_exchanges, "activeExchanges");
    merger.extend(purchased_contacts, "purchased_contacts");
    merger.extend(listing_purchases, "listing_purchases");

    // A listing with an open negotiation is shown only in that section
    let negotiated: HashSet<&str> = negotiations.iter().map(|n| n.listing_id.as_str()).collect();

    let exchanges: Vec<ExchangeRecord> = merger
        .into_records()
        .into_iter()
        .filter(|record| !negotiated.contains(record.id.as_str()))
        .map(|mut record| {
            if let Some(meeting) = meetings.get(&record.id) {
                record.apply_meeting(meeting);
            }
            record
        })
        .collect();

    DashboardState {
        load_id: Some(load_id),
        phase: LoadPhase::Ready,
        is_loading: false,
        error: None,
        user: summary.user,
        listings,
        exchanges,
        pending_negotiations: negotiations,
        loaded_at: Some(Utc::now()),
    }
}
