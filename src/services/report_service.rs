//! Text rendering of a dashboard state for the CLI

use crate::models::{DashboardState, LoadPhase};
use crate::utils::{format_amount, format_meeting_time, Table};

pub fn render_dashboard(state: &DashboardState) -> String {
    match state.phase {
        LoadPhase::Idle => return "Dashboard not loaded\n".to_string(),
        LoadPhase::Loading => return "Loading dashboard...\n".to_string(),
        LoadPhase::Error => {
            return format!(
                "{}\n",
                state.error.as_deref().unwrap_or("Failed to load dashboard")
            )
        }
        LoadPhase::Ready => {}
    }

    let mut output = String::new();

    if let Some(user) = &state.user {
        output.push_str(&format!(
            "{} ({} completed exchanges)\n\n",
            user.name(),
            user.completed_exchanges
        ));
    }

    output.push_str(&format!("Needs your attention ({})\n", state.pending_negotiations.len()));
    if state.pending_negotiations.is_empty() {
        output.push_str("Nothing pending\n");
    } else {
        let mut table = Table::new(&["Listing", "With", "Amount", "Pair", "Status", "Proposed", "Action"])
            .align_right(2);
        for negotiation in &state.pending_negotiations {
            table.add_row([
                negotiation.listing_id.clone(),
                negotiation.counterpart_name.clone(),
                format_amount(negotiation.amount, &negotiation.from_currency, false),
                format!("{}/{}", negotiation.from_currency, negotiation.to_currency),
                negotiation.status.label().to_string(),
                format_meeting_time(negotiation.proposed_time),
                if negotiation.action_required { "yes" } else { "" }.to_string(),
            ]);
        }
        output.push_str(&table.render());
    }

    output.push_str(&format!("\nActive exchanges ({})\n", state.exchanges.len()));
    if state.exchanges.is_empty() {
        output.push_str("No active exchanges\n");
    } else {
        let mut table = Table::new(&["Listing", "Role", "With", "Amount", "Receive", "Meeting", "Location", "Status"])
            .align_right(3)
            .align_right(4);
        for exchange in &state.exchanges {
            let receive = exchange
                .converted_amount
                .map(|amount| format_amount(amount, &exchange.to_currency, exchange.will_round))
                .unwrap_or_else(|| exchange.to_currency.clone());
            let mut location = exchange.location.clone();
            if exchange.has_pending_location_proposal {
                location.push_str(" (new proposal)");
            }
            table.add_row([
                exchange.id.clone(),
                exchange.role.as_str().to_string(),
                exchange.counterpart_name.clone(),
                format_amount(exchange.amount, &exchange.from_currency, exchange.will_round),
                receive,
                format_meeting_time(exchange.meeting_time),
                location,
                exchange.display_status.clone(),
            ]);
        }
        output.push_str(&table.render());
    }

    output.push_str(&format!("\nMy listings ({})\n", state.listings.len()));
    if !state.listings.is_empty() {
        let mut table = Table::new(&["Listing", "Offer", "For", "Location", "Status", "Proposals"]).align_right(1);
        for listing in &state.listings {
            table.add_row([
                listing.id.clone(),
                format_amount(listing.amount, &listing.currency, false),
                listing.accept_currency.clone(),
                listing.location.clone(),
                listing.status.clone(),
                format!(
                    "{} pending / {} accepted",
                    listing.pending_location_proposals, listing.accepted_location_proposals
                ),
            ]);
        }
        output.push_str(&table.render());
    }

    output
}
