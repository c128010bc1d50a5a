pub mod client;
pub mod envelope;
pub mod models;
pub mod source;

pub use client::MarketplaceClient;
pub use models::{ApiError, SummaryPayload};
pub use source::DashboardSource;
