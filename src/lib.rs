//! Dashboard client for a peer-to-peer currency-exchange marketplace.
//!
//! The backend owns all data. This crate reads the user's dashboard sources,
//! merges them into one de-duplicated view and publishes it through a
//! `tokio::sync::watch` channel.

pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use api::{ApiError, DashboardSource, MarketplaceClient};
pub use config::{ConfigError, DashboardConfig, Session};
pub use models::{DashboardState, ExchangeRecord, LoadPhase, PendingNegotiation};
pub use services::{DashboardAggregator, LoadTicket};
