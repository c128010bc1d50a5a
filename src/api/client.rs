use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, RETRY_AFTER};
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::{debug, warn};

use super::envelope;
use super::models::{ApiError, SummaryPayload};
use super::source::DashboardSource;
use crate::config::{DashboardConfig, Session};
use crate::models::{ExchangeRecord, MeetingProposal, PendingNegotiation};
use crate::utils::RequestRateLimiter;

const SUMMARY_PATH: &str = "Dashboard/GetUserDashboard";
const PURCHASED_CONTACTS_PATH: &str = "Contact/GetPurchasedContacts";
const LISTING_PURCHASES_PATH: &str = "Contact/GetListingPurchases";
const NEGOTIATIONS_PATH: &str = "Negotiations/GetMyNegotiations";
const MEETING_PROPOSALS_PATH: &str = "Meeting/GetMeetingProposals";

/// HTTP client for the marketplace backend's read endpoints
pub struct MarketplaceClient {
    http_client: HttpClient,
    base_url: String,
    limiter: RequestRateLimiter,
}

impl MarketplaceClient {
    pub fn new(config: &DashboardConfig) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .default_headers(Self::create_headers())
            .build()
            .map_err(|e| ApiError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            limiter: RequestRateLimiter::new(config.max_requests_per_second),
        })
    }

    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Map a non-success status to an error, pulling `message` out of JSON bodies
    async fn handle_error_response(response: reqwest::Response) -> ApiError {
        let status_code = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());
        let body_text = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<Value>(&body_text)
            .ok()
            .and_then(|json| json.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(body_text);

        match status_code {
            400 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            429 => {
                let retry_after = retry_after.unwrap_or(1);
                warn!("Rate limited by marketplace API, retry after {} s", retry_after);
                ApiError::RateLimited { retry_after }
            }
            500..=599 => {
                warn!("Server error {}: {}", status_code, message);
                ApiError::ServerError(status_code, message)
            }
            _ => ApiError::HttpError(status_code, message),
        }
    }

    /// GET `{base}/{path}?sessionId=..&lang=..` and return the JSON body
    async fn get_json(
        &self,
        path: &str,
        session: &Session,
        extra_query: &[(&str, &str)],
    ) -> Result<Value, ApiError> {
        self.limiter.acquire().await;

        let mut query: Vec<(&str, &str)> = vec![
            ("sessionId", session.session_id.as_str()),
            ("lang", session.language.as_str()),
        ];
        query.extend_from_slice(extra_query);

        debug!("GET {}", path);
        let response = self
            .http_client
            .get(self.url(path))
            .query(&query)
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Deserialization(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl DashboardSource for MarketplaceClient {
    async fn fetch_summary(&self, session: &Session) -> Result<SummaryPayload, ApiError> {
        let body = self.get_json(SUMMARY_PATH, session, &[]).await?;
        envelope::parse_summary(&body)
    }

    async fn fetch_purchased_contacts(&self, session: &Session) -> Result<Vec<ExchangeRecord>, ApiError> {
        let body = self.get_json(PURCHASED_CONTACTS_PATH, session, &[]).await?;
        envelope::parse_purchased_contacts(&body)
    }

    async fn fetch_listing_purchases(&self, session: &Session) -> Result<Vec<ExchangeRecord>, ApiError> {
        let body = self.get_json(LISTING_PURCHASES_PATH, session, &[]).await?;
        envelope::parse_listing_purchases(&body)
    }

    async fn fetch_negotiations(&self, session: &Session) -> Result<Vec<PendingNegotiation>, ApiError> {
        let body = self.get_json(NEGOTIATIONS_PATH, session, &[]).await?;
        envelope::parse_negotiations(&body)
    }

    async fn fetch_meeting_proposals(
        &self,
        session: &Session,
        listing_id: &str,
    ) -> Result<Vec<MeetingProposal>, ApiError> {
        let body = self
            .get_json(MEETING_PROPOSALS_PATH, session, &[("listingId", listing_id)])
            .await?;
        envelope::parse_meeting_proposals(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let config = DashboardConfig::new("https://api.example.com/api/");
        let client = MarketplaceClient::new(&config).expect("client");
        assert_eq!(
            client.url(SUMMARY_PATH),
            "https://api.example.com/api/Dashboard/GetUserDashboard"
        );
    }
}
