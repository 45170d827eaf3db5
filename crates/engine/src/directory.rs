//! Ad-space catalog — filtered fetch, optimistic delete, by-value edit.

use std::sync::Arc;

use adboard_client::BookingAuthority;
use adboard_core::events::{make_event, EngineEventKind, EventSink};
use adboard_core::types::{AdSpace, AdSpaceType, City, Filter};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::mutation::{replace_by_key, surface_message, OptimisticTxn};

#[derive(Default)]
struct DirectoryState {
    items: Vec<AdSpace>,
    loading: bool,
    error: Option<String>,
    type_filter: Filter<AdSpaceType>,
    city_filter: Filter<City>,
    /// Detached copy of the row open for editing, never an alias into
    /// `items`; a fetch replacing the rows cannot corrupt an open edit.
    editing: Option<AdSpace>,
    fetch_ticket: u64,
}

/// Catalog of ad spaces mirrored from the remote authority.
pub struct AdSpaceDirectory {
    authority: Arc<dyn BookingAuthority>,
    state: RwLock<DirectoryState>,
    event_sink: Arc<dyn EventSink>,
}

impl AdSpaceDirectory {
    pub fn new(authority: Arc<dyn BookingAuthority>) -> Self {
        Self {
            authority,
            state: RwLock::new(DirectoryState::default()),
            event_sink: adboard_core::events::noop_sink(),
        }
    }

    /// Attach an event sink observing confirmed directory transitions.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Replace the catalog with the authority's list for the current
    /// filters. Only the most recently issued fetch may settle state;
    /// a completion that lost the race is discarded whole, so re-issuing
    /// while a prior call is in flight is safe.
    pub async fn fetch_all(&self) {
        let (ticket, type_filter, city_filter) = {
            let mut state = self.state.write();
            state.fetch_ticket += 1;
            state.loading = true;
            state.error = None;
            (state.fetch_ticket, state.type_filter, state.city_filter)
        };

        let outcome = self
            .authority
            .fetch_ad_spaces(type_filter, city_filter)
            .await;

        let mut state = self.state.write();
        if state.fetch_ticket != ticket {
            debug!(
                ticket,
                latest = state.fetch_ticket,
                "discarding stale ad-space fetch"
            );
            metrics::counter!("engine.fetch", "container" => "ad_spaces", "outcome" => "stale")
                .increment(1);
            return;
        }
        match outcome {
            Ok(items) => {
                debug!(count = items.len(), "fetched ad spaces");
                metrics::counter!("engine.fetch", "container" => "ad_spaces", "outcome" => "ok")
                    .increment(1);
                state.items = items;
                state.loading = false;
            }
            Err(err) => {
                warn!(error = %err, "ad-space fetch failed");
                metrics::counter!("engine.fetch", "container" => "ad_spaces", "outcome" => "error")
                    .increment(1);
                state.error = Some(surface_message(&err, "Something went wrong"));
                state.loading = false;
            }
        }
    }

    /// Set the type filter. Does not fetch: callers re-fetch after changing
    /// a filter, otherwise previously loaded rows keep showing.
    pub fn set_type_filter(&self, filter: Filter<AdSpaceType>) {
        self.state.write().type_filter = filter;
    }

    /// Set the city filter. Same fetch discipline as [`set_type_filter`].
    ///
    /// [`set_type_filter`]: AdSpaceDirectory::set_type_filter
    pub fn set_city_filter(&self, filter: Filter<City>) {
        self.state.write().city_filter = filter;
    }

    /// Locally held rows narrowed by both filters. Re-applies constraints
    /// the fetch already sent to the authority; a row the server-side
    /// filter admitted is never dropped here.
    pub fn filtered(&self) -> Vec<AdSpace> {
        let state = self.state.read();
        state
            .items
            .iter()
            .filter(|space| {
                state.type_filter.admits(&space.space_type)
                    && state.city_filter.admits(&space.city)
            })
            .cloned()
            .collect()
    }

    /// Optimistically remove the row, then ask the authority to delete it.
    /// Success reconciles with a full re-fetch; failure restores the
    /// snapshot and sets a generic error.
    pub async fn delete_one(&self, id: i64) {
        let txn = {
            let mut state = self.state.write();
            OptimisticTxn::begin(&mut state.items, |rows| {
                rows.retain(|space| space.id != id)
            })
        };

        match self.authority.delete_ad_space(id).await {
            Ok(()) => {
                info!(id, "ad space deleted");
                metrics::counter!("engine.mutation", "op" => "delete", "outcome" => "confirmed")
                    .increment(1);
                txn.commit();
                self.event_sink
                    .emit(make_event(EngineEventKind::AdSpaceDeleted, id));
                self.fetch_all().await;
            }
            Err(err) => {
                warn!(id, error = %err, "ad space delete failed, rolling back");
                metrics::counter!("engine.mutation", "op" => "delete", "outcome" => "rolled_back")
                    .increment(1);
                let mut state = self.state.write();
                txn.rollback(&mut state.items);
                state.error = Some("Failed to delete ad space".to_string());
            }
        }
    }

    /// Open an edit on a detached copy of the row. No-op when the id is
    /// not locally held.
    pub fn open_edit(&self, id: i64) {
        let mut state = self.state.write();
        let found = state.items.iter().find(|space| space.id == id).cloned();
        if let Some(space) = found {
            state.editing = Some(space);
        }
    }

    /// Drop the editing copy without saving.
    pub fn close_edit(&self) {
        self.state.write().editing = None;
    }

    /// Send the full updated representation to the authority. Nothing is
    /// written optimistically, so there is no snapshot to restore: success
    /// merges the authoritative row and closes the edit, failure leaves the
    /// editing copy open with a sticky error so the caller can retry.
    pub async fn save_edit(&self, updated: AdSpace) {
        let id = updated.id;
        match self.authority.update_ad_space(&updated).await {
            Ok(saved) => {
                info!(id, "ad space updated");
                metrics::counter!("engine.mutation", "op" => "save_edit", "outcome" => "confirmed")
                    .increment(1);
                {
                    let mut state = self.state.write();
                    replace_by_key(&mut state.items, saved);
                    state.editing = None;
                }
                self.event_sink
                    .emit(make_event(EngineEventKind::AdSpaceUpdated, id));
            }
            Err(err) => {
                warn!(id, error = %err, "ad space update failed");
                metrics::counter!("engine.mutation", "op" => "save_edit", "outcome" => "failed")
                    .increment(1);
                self.state.write().error =
                    Some(surface_message(&err, "Failed to update ad space"));
            }
        }
    }

    /// Display label for an ad space: its name when locally held, a
    /// placeholder otherwise. Never fails on a missing reference.
    pub fn display_name(&self, id: i64) -> String {
        self.state
            .read()
            .items
            .iter()
            .find(|space| space.id == id)
            .map(|space| space.name.clone())
            .unwrap_or_else(|| format!("Ad Space #{id}"))
    }

    /// Unfiltered snapshot of the held rows.
    pub fn items(&self) -> Vec<AdSpace> {
        self.state.read().items.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// The detached copy currently open for editing, if any.
    pub fn editing(&self) -> Option<AdSpace> {
        self.state.read().editing.clone()
    }

    pub fn type_filter(&self) -> Filter<AdSpaceType> {
        self.state.read().type_filter
    }

    pub fn city_filter(&self) -> Filter<City> {
        self.state.read().city_filter
    }
}
