//! Dashboard aggregation
//!
//! A load fans out to four sources at once (summary, purchased contacts,
//! listing purchases, pending negotiations). The summary additionally fans out
//! one meeting-proposal request per listing/exchange and joins them before it
//! reports. Once all four have reported, failed, timed out or been abandoned,
//! a single merge step builds the new `DashboardState` and publishes it.
//!
//! A failed summary is published as `Error` right away; the other sources
//! are abandoned rather than waited for.
//!
//! Every load owns a `LoadToken`. Starting another load cancels the previous
//! token and aborts its task, which abandons its in-flight requests; the
//! publish step also refuses any state whose load id is no longer current.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::load_token::LoadToken;
use super::merge::{merge_dashboard, SourceResults};
use crate::api::{ApiError, DashboardSource, SummaryPayload};
use crate::config::{DashboardConfig, Session};
use crate::models::{DashboardState, MeetingState};

/// Identifies the load started by `start_load`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub load_id: Uuid,
}

/// The load currently allowed to publish
struct ActiveLoad {
    token: LoadToken,
    task: JoinHandle<()>,
}

impl ActiveLoad {
    fn abandon(self) -> LoadToken {
        self.token.cancel();
        self.task.abort();
        self.token
    }
}

pub struct DashboardAggregator<S: DashboardSource> {
    source: Arc<S>,
    source_timeout: Duration,
    state_tx: Arc<watch::Sender<DashboardState>>,
    active: Mutex<Option<ActiveLoad>>,
}

impl<S: DashboardSource> DashboardAggregator<S> {
    pub fn new(source: S, config: &DashboardConfig) -> Self {
        Self::with_shared_source(Arc::new(source), config.source_timeout)
    }

    pub fn with_shared_source(source: Arc<S>, source_timeout: Duration) -> Self {
        let (state_tx, _) = watch::channel(DashboardState::default());
        Self {
            source,
            source_timeout,
            state_tx: Arc::new(state_tx),
            active: Mutex::new(None),
        }
    }

    /// Receiver that sees every published state change
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> DashboardState {
        self.state_tx.borrow().clone()
    }

    /// Start a new load and return immediately.
    ///
    /// Any load still in flight is cancelled and can no longer publish.
    /// Must be called from within a tokio runtime.
    pub fn start_load(&self, session: Session) -> LoadTicket {
        let token = LoadToken::new();
        let load_id = token.id();

        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = active.take() {
            let previous = previous.abandon();
            debug!(superseded = %previous.id(), %load_id, "Superseding in-flight dashboard load");
        }

        self.state_tx.send_replace(DashboardState::loading(load_id));

        let task = tokio::spawn(run_load(
            Arc::clone(&self.source),
            Arc::clone(&self.state_tx),
            session,
            token.clone(),
            self.source_timeout,
        ));
        *active = Some(ActiveLoad { token, task });

        LoadTicket { load_id }
    }

    /// Wait until the ticket's load reaches `Ready` or `Error`.
    ///
    /// Returns early with whatever is current if the load was superseded or
    /// cancelled.
    pub async fn wait_for(&self, ticket: LoadTicket) -> DashboardState {
        let mut rx = self.subscribe();
        loop {
            {
                let state = rx.borrow_and_update();
                if state.load_id != Some(ticket.load_id) || state.phase.is_terminal() {
                    return state.clone();
                }
            }
            if rx.changed().await.is_err() {
                return self.state();
            }
        }
    }

    pub async fn load(&self, session: Session) -> DashboardState {
        let ticket = self.start_load(session);
        self.wait_for(ticket).await
    }

    /// Abandon the in-flight load, if any, and go back to `Idle`
    pub fn cancel(&self) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(load) = active.take() {
            let load_id = load.abandon().id();
            let reset = self.state_tx.send_if_modified(|state| {
                if state.load_id == Some(load_id) && !state.phase.is_terminal() {
                    *state = DashboardState::default();
                    true
                } else {
                    false
                }
            });
            if reset {
                info!(%load_id, "Dashboard load cancelled");
            }
        }
    }
}

impl<S: DashboardSource> Drop for DashboardAggregator<S> {
    fn drop(&mut self) {
        if let Some(load) = self.active.get_mut().unwrap_or_else(|e| e.into_inner()).take() {
            load.abandon();
        }
    }
}

async fn run_load<S: DashboardSource>(
    source: Arc<S>,
    state_tx: Arc<watch::Sender<DashboardState>>,
    session: Session,
    token: LoadToken,
    timeout: Duration,
) {
    let load_id = token.id();
    info!(%load_id, "Loading dashboard");

    let summary = async {
        let result = load_summary(&source, &session, &token, timeout).await;
        if let Err(e) = &result {
            if !token.is_cancelled() {
                error!(%load_id, "Dashboard summary failed: {}", e);
                publish(&state_tx, &token, DashboardState::failed(load_id));
                // Nothing left to merge into
                token.cancel();
            }
        }
        result
    };

    let (summary, purchased_contacts, listing_purchases, negotiations) = tokio::join!(
        summary,
        guarded("purchased contacts", &token, timeout, source.fetch_purchased_contacts(&session)),
        guarded("listing purchases", &token, timeout, source.fetch_listing_purchases(&session)),
        guarded("negotiations", &token, timeout, source.fetch_negotiations(&session)),
    );

    if token.is_cancelled() {
        debug!(%load_id, "Dashboard load ended early, remaining results dropped");
        return;
    }
    let Ok((summary, meetings)) = summary else {
        return;
    };

    let next = merge_dashboard(
        load_id,
        SourceResults {
            summary,
            meetings,
            purchased_contacts: or_empty("purchased contacts", purchased_contacts),
            listing_purchases: or_empty("listing purchases", listing_purchases),
            negotiations: or_empty("negotiations", negotiations),
        },
    );
    publish(&state_tx, &token, next);
}

/// Replace the shared state unless this load has been superseded
fn publish(state_tx: &watch::Sender<DashboardState>, token: &LoadToken, next: DashboardState) -> bool {
    let load_id = token.id();
    let exchanges = next.exchanges.len();
    let pending = next.pending_negotiations.len();
    let phase = next.phase;

    let published = state_tx.send_if_modified(|current| {
        if current.load_id != Some(load_id) || token.is_cancelled() {
            return false;
        }
        *current = next;
        true
    });

    if published {
        info!(%load_id, ?phase, exchanges, pending, "Dashboard load finished");
    } else {
        debug!(%load_id, "Dashboard load no longer current, result discarded");
    }
    published
}

/// Summary plus its meeting follow-ups
async fn load_summary<S: DashboardSource>(
    source: &Arc<S>,
    session: &Session,
    token: &LoadToken,
    timeout: Duration,
) -> Result<(SummaryPayload, HashMap<String, MeetingState>), ApiError> {
    let summary = guarded("summary", token, timeout, source.fetch_summary(session)).await?;

    let listing_ids = {
        let mut seen = HashSet::new();
        let mut listing_ids = Vec::new();
        let ids = summary
            .listings
            .iter()
            .map(|listing| &listing.id)
            .chain(summary.active_exchanges.iter().map(|exchange| &exchange.id));
        for id in ids {
            if seen.insert(id.as_str()) {
                listing_ids.push(id.clone());
            }
        }
        listing_ids
    };

    let meetings = fetch_meetings(source, session, token, timeout, listing_ids).await;
    Ok((summary, meetings))
}

async fn fetch_meetings<S: DashboardSource>(
    source: &Arc<S>,
    session: &Session,
    token: &LoadToken,
    timeout: Duration,
    listing_ids: Vec<String>,
) -> HashMap<String, MeetingState> {
    let mut follow_ups = JoinSet::new();
    for listing_id in listing_ids {
        let source = Arc::clone(source);
        let session = session.clone();
        let token = token.clone();
        follow_ups.spawn(async move {
            let result = guarded(
                "meeting proposals",
                &token,
                timeout,
                source.fetch_meeting_proposals(&session, &listing_id),
            )
            .await;
            (listing_id, result)
        });
    }

    // Fires only once every follow-up has completed or failed
    let mut meetings = HashMap::new();
    while let Some(joined) = follow_ups.join_next().await {
        match joined {
            Ok((listing_id, Ok(proposals))) => {
                meetings.insert(listing_id, MeetingState::from_proposals(&proposals));
            }
            Ok((listing_id, Err(e))) => {
                debug!("No meeting data for listing {}: {}", listing_id, e);
            }
            Err(e) => warn!("Meeting follow-up task failed: {}", e),
        }
    }
    meetings
}

/// Race a request against the load's cancellation and the per-source timeout
async fn guarded<T, F>(
    label: &str,
    token: &LoadToken,
    timeout: Duration,
    request: F,
) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    match token.run_until_cancelled(tokio::time::timeout(timeout, request)).await {
        None => Err(ApiError::Cancelled),
        Some(Err(_elapsed)) => Err(ApiError::Timeout(label.to_string())),
        Some(Ok(result)) => result,
    }
}

/// Secondary sources fail quietly: empty section, no visible error
fn or_empty<T>(label: &str, result: Result<Vec<T>, ApiError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!("Dashboard source `{}` unavailable: {}", label, e);
        Vec::new()
    })
}
