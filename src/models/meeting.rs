//! Meeting proposals for a listing and their folded state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deserialize_id;
use super::exchange::Coordinates;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalType {
    Time,
    Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum ProposalStatus {
    Pending,
    Accepted,
    Rejected,
    Other(String),
}

impl From<String> for ProposalStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "pending" => ProposalStatus::Pending,
            "accepted" => ProposalStatus::Accepted,
            "rejected" => ProposalStatus::Rejected,
            _ => ProposalStatus::Other(raw),
        }
    }
}

/// One entry of `GET Meeting/GetMeetingProposals`
#[derive(Debug, Clone, Deserialize)]
pub struct MeetingProposal {
    #[serde(deserialize_with = "deserialize_id")]
    pub proposal_id: String,
    pub proposal_type: ProposalType,
    #[serde(default)]
    pub proposed_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub proposed_location: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub status: ProposalStatus,
}

/// Meeting data for one listing, derived from all of its proposals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeetingState {
    pub accepted_time: Option<DateTime<Utc>>,
    pub accepted_location: Option<String>,
    pub accepted_coordinates: Option<Coordinates>,
    pub pending_time_proposal: bool,
    pub pending_location_proposals: u32,
    pub accepted_location_proposals: u32,
}

impl MeetingState {
    /// When several proposals were accepted, the latest accepted time wins and
    /// the last accepted location in server order wins.
    pub fn from_proposals(proposals: &[MeetingProposal]) -> Self {
        let mut state = MeetingState::default();

        for proposal in proposals {
            match (&proposal.proposal_type, &proposal.status) {
                (ProposalType::Time, ProposalStatus::Pending) => {
                    state.pending_time_proposal = true;
                }
                (ProposalType::Time, ProposalStatus::Accepted) => {
                    if let Some(time) = proposal.proposed_time {
                        if state.accepted_time.map_or(true, |current| time > current) {
                            state.accepted_time = Some(time);
                        }
                    }
                }
                (ProposalType::Location, ProposalStatus::Pending) => {
                    state.pending_location_proposals += 1;
                }
                (ProposalType::Location, ProposalStatus::Accepted) => {
                    state.accepted_location_proposals += 1;
                    if let Some(location) = proposal
                        .proposed_location
                        .as_ref()
                        .filter(|l| !l.trim().is_empty())
                    {
                        state.accepted_location = Some(location.clone());
                        state.accepted_coordinates = match (proposal.latitude, proposal.longitude) {
                            (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
                            _ => None,
                        };
                    }
                }
                _ => {}
            }
        }

        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_items;
    use serde_json::json;

    #[test]
    fn test_fold_counts_and_latest_time() {
        let raw = vec![
            json!({ "proposal_id": 1, "proposal_type": "time", "status": "accepted",
                    "proposed_time": "2026-03-01T10:00:00Z" }),
            json!({ "proposal_id": 2, "proposal_type": "time", "status": "accepted",
                    "proposed_time": "2026-03-02T10:00:00Z" }),
            json!({ "proposal_id": 3, "proposal_type": "location", "status": "pending",
                    "proposed_location": "Plaza Mayor" }),
            json!({ "proposal_id": 4, "proposal_type": "location", "status": "accepted",
                    "proposed_location": "Sol", "latitude": 40.41, "longitude": -3.70 }),
            json!({ "proposal_id": 5, "proposal_type": "location", "status": "withdrawn" }),
        ];
        let proposals: Vec<MeetingProposal> = parse_items(&raw, "proposals");
        assert_eq!(proposals.len(), 5);

        let state = MeetingState::from_proposals(&proposals);
        assert_eq!(
            state.accepted_time.map(|t| t.to_rfc3339()),
            Some("2026-03-02T10:00:00+00:00".to_string())
        );
        assert_eq!(state.pending_location_proposals, 1);
        assert_eq!(state.accepted_location_proposals, 1);
        assert_eq!(state.accepted_location.as_deref(), Some("Sol"));
        assert!(state.accepted_coordinates.is_some());
        assert!(!state.pending_time_proposal);
    }

    #[test]
    fn test_unknown_proposal_type_is_dropped() {
        let raw = vec![json!({ "proposal_id": 1, "proposal_type": "venue", "status": "pending" })];
        let proposals: Vec<MeetingProposal> = parse_items(&raw, "proposals");
        assert!(proposals.is_empty());
    }
}
