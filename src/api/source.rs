use async_trait::async_trait;

use super::models::{ApiError, SummaryPayload};
use crate::config::Session;
use crate::models::{ExchangeRecord, MeetingProposal, PendingNegotiation};

/// The read endpoints the dashboard aggregates, already validated and parsed
#[async_trait]
pub trait DashboardSource: Send + Sync + 'static {
    async fn fetch_summary(&self, session: &Session) -> Result<SummaryPayload, ApiError>;

    async fn fetch_purchased_contacts(&self, session: &Session) -> Result<Vec<ExchangeRecord>, ApiError>;

    async fn fetch_listing_purchases(&self, session: &Session) -> Result<Vec<ExchangeRecord>, ApiError>;

    async fn fetch_negotiations(&self, session: &Session) -> Result<Vec<PendingNegotiation>, ApiError>;

    async fn fetch_meeting_proposals(
        &self,
        session: &Session,
        listing_id: &str,
    ) -> Result<Vec<MeetingProposal>, ApiError>;
}
