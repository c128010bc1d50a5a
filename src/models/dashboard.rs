//! Published dashboard state

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::exchange::{ExchangeRecord, ExchangeRole};
use super::listing::ListingSummary;
use super::negotiation::PendingNegotiation;
use super::user::UserProfile;

/// Message shown when the summary source fails
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

impl LoadPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadPhase::Ready | LoadPhase::Error)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub load_id: Option<Uuid>,
    pub phase: LoadPhase,
    pub is_loading: bool,
    pub error: Option<String>,
    pub user: Option<UserProfile>,
    pub listings: Vec<ListingSummary>,
    pub exchanges: Vec<ExchangeRecord>,
    pub pending_negotiations: Vec<PendingNegotiation>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl DashboardState {
    /// Fresh state for a load that just started: every collection cleared
    pub fn loading(load_id: Uuid) -> Self {
        DashboardState {
            load_id: Some(load_id),
            phase: LoadPhase::Loading,
            is_loading: true,
            ..DashboardState::default()
        }
    }

    pub fn failed(load_id: Uuid) -> Self {
        DashboardState {
            load_id: Some(load_id),
            phase: LoadPhase::Error,
            is_loading: false,
            error: Some(LOAD_FAILED_MESSAGE.to_string()),
            loaded_at: Some(Utc::now()),
            ..DashboardState::default()
        }
    }

    /// Negotiations where the counterpart is waiting on the current user
    pub fn needs_attention(&self) -> impl Iterator<Item = &PendingNegotiation> {
        self.pending_negotiations.iter().filter(|n| n.action_required)
    }

    pub fn exchanges_for(&self, role: ExchangeRole) -> impl Iterator<Item = &ExchangeRecord> {
        self.exchanges.iter().filter(move |e| e.role == role)
    }
}
