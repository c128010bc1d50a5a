pub mod format;
pub mod ratelimit;
pub mod table;

pub use format::{currency_symbol, format_amount, format_meeting_time, parse_coordinates};
pub use ratelimit::RequestRateLimiter;
pub use table::Table;
