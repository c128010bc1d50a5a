use thiserror::Error;

use crate::models::{ExchangeRecord, ListingSummary, UserProfile};

/// Parsed `GET Dashboard/GetUserDashboard` payload
#[derive(Debug, Clone, Default)]
pub struct SummaryPayload {
    pub user: Option<UserProfile>,
    pub listings: Vec<ListingSummary>,
    pub active_exchanges: Vec<ExchangeRecord>,
}

/// Everything that can go wrong talking to the marketplace API
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// 400 Bad Request
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// 401 Unauthorized (expired or unknown session)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// 403 Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// 404 Not Found
    #[error("Not Found: {0}")]
    NotFound(String),
    /// 429 Too Many Requests
    #[error("Rate Limited. Retry after {retry_after} s")]
    RateLimited { retry_after: u64 },
    /// 5xx Server Error
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    /// Other HTTP errors
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/transport error
    #[error("Request Error: {0}")]
    Request(String),
    /// Body was not the JSON shape we expect
    #[error("Deserialization Error: {0}")]
    Deserialization(String),
    /// Server answered but flagged the call as unsuccessful
    #[error("Request unsuccessful: {0}")]
    Business(String),
    #[error("{0} timed out")]
    Timeout(String),
    #[error("Cancelled")]
    Cancelled,
}
