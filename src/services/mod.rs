pub mod dashboard_service;
pub mod load_token;
pub mod merge;
pub mod report_service;

pub use dashboard_service::{DashboardAggregator, LoadTicket};
pub use load_token::LoadToken;
