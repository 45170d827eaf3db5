//! Booking ledger — status-filtered fetch and approve/reject transitions.

use std::sync::Arc;

use adboard_client::{AuthorityResult, BookingAuthority};
use adboard_core::events::{make_event, EngineEventKind, EventSink};
use adboard_core::types::{BookingRequest, BookingStatus, Filter};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::mutation::{replace_by_key, surface_message, OptimisticTxn};

#[derive(Default)]
struct LedgerState {
    items: Vec<BookingRequest>,
    loading: bool,
    error: Option<String>,
    status_filter: Filter<BookingStatus>,
    fetch_ticket: u64,
}

/// Booking requests mirrored from the remote authority, with optimistic
/// approve/reject transitions.
///
/// Transitions snapshot the whole row set before flipping a status, and a
/// failed remote call restores that snapshot wholesale. When two transitions
/// overlap, a failing one can erase the other's confirmed result until the
/// next fetch; sequencing mutations is the caller's job.
pub struct BookingLedger {
    authority: Arc<dyn BookingAuthority>,
    state: RwLock<LedgerState>,
    event_sink: Arc<dyn EventSink>,
}

impl BookingLedger {
    pub fn new(authority: Arc<dyn BookingAuthority>) -> Self {
        Self {
            authority,
            state: RwLock::new(LedgerState::default()),
            event_sink: adboard_core::events::noop_sink(),
        }
    }

    /// Attach an event sink observing confirmed ledger transitions.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Replace the ledger with the authority's list for the current status
    /// filter. Stale completions are discarded whole, as in the directory.
    pub async fn fetch_all(&self) {
        let (ticket, status_filter) = {
            let mut state = self.state.write();
            state.fetch_ticket += 1;
            state.loading = true;
            state.error = None;
            (state.fetch_ticket, state.status_filter)
        };

        let outcome = self.authority.fetch_bookings(status_filter).await;

        let mut state = self.state.write();
        if state.fetch_ticket != ticket {
            debug!(
                ticket,
                latest = state.fetch_ticket,
                "discarding stale booking fetch"
            );
            metrics::counter!("engine.fetch", "container" => "bookings", "outcome" => "stale")
                .increment(1);
            return;
        }
        match outcome {
            Ok(items) => {
                debug!(count = items.len(), "fetched bookings");
                metrics::counter!("engine.fetch", "container" => "bookings", "outcome" => "ok")
                    .increment(1);
                state.items = items;
                state.loading = false;
            }
            Err(err) => {
                warn!(error = %err, "booking fetch failed");
                metrics::counter!("engine.fetch", "container" => "bookings", "outcome" => "error")
                    .increment(1);
                state.error = Some(surface_message(&err, "Failed to fetch bookings"));
                state.loading = false;
            }
        }
    }

    /// Set the status filter. Does not fetch.
    pub fn set_status_filter(&self, filter: Filter<BookingStatus>) {
        self.state.write().status_filter = filter;
    }

    /// Locally held rows narrowed by the status filter.
    pub fn filtered(&self) -> Vec<BookingRequest> {
        let state = self.state.read();
        state
            .items
            .iter()
            .filter(|booking| state.status_filter.admits(&booking.status))
            .cloned()
            .collect()
    }

    /// Optimistically mark the booking approved, then confirm with the
    /// authority.
    pub async fn approve_one(&self, id: i64) {
        let txn = self.begin_transition(id, BookingStatus::Approved);
        let outcome = self.authority.approve_booking(id).await;
        self.settle_transition(
            id,
            txn,
            outcome,
            "approve",
            "Failed to approve booking",
            EngineEventKind::BookingApproved,
        );
    }

    /// Optimistically mark the booking rejected, then confirm with the
    /// authority.
    pub async fn reject_one(&self, id: i64) {
        let txn = self.begin_transition(id, BookingStatus::Rejected);
        let outcome = self.authority.reject_booking(id).await;
        self.settle_transition(
            id,
            txn,
            outcome,
            "reject",
            "Failed to reject booking",
            EngineEventKind::BookingRejected,
        );
    }

    fn begin_transition(&self, id: i64, target: BookingStatus) -> OptimisticTxn<BookingRequest> {
        let mut state = self.state.write();
        OptimisticTxn::begin(&mut state.items, |rows| {
            if let Some(row) = rows.iter_mut().find(|booking| booking.id == id) {
                row.status = target;
            }
        })
    }

    fn settle_transition(
        &self,
        id: i64,
        txn: OptimisticTxn<BookingRequest>,
        outcome: AuthorityResult<BookingRequest>,
        op: &'static str,
        fallback: &str,
        event_kind: EngineEventKind,
    ) {
        match outcome {
            Ok(updated) => {
                info!(id, status = %updated.status, "booking transition confirmed");
                metrics::counter!("engine.mutation", "op" => op, "outcome" => "confirmed")
                    .increment(1);
                {
                    let mut state = self.state.write();
                    // Merge over the rows as they are now, not the snapshot:
                    // edits that landed while the call was in flight survive.
                    replace_by_key(&mut state.items, updated);
                }
                txn.commit();
                self.event_sink.emit(make_event(event_kind, id));
            }
            Err(err) => {
                warn!(id, error = %err, "booking transition failed, rolling back");
                metrics::counter!("engine.mutation", "op" => op, "outcome" => "rolled_back")
                    .increment(1);
                let mut state = self.state.write();
                txn.rollback(&mut state.items);
                state.error = Some(surface_message(&err, fallback));
            }
        }
    }

    /// Unfiltered snapshot of the held rows.
    pub fn items(&self) -> Vec<BookingRequest> {
        self.state.read().items.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn status_filter(&self) -> Filter<BookingStatus> {
        self.state.read().status_filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{seed_bookings, MockAuthority, ScriptedFailure};
    use adboard_core::events::{capture_sink, EngineEventKind};

    fn setup() -> (Arc<MockAuthority>, BookingLedger) {
        let authority = Arc::new(MockAuthority::new());
        authority.put_bookings(seed_bookings());
        let ledger = BookingLedger::new(authority.clone());
        (authority, ledger)
    }

    #[tokio::test]
    async fn test_fetch_all_replaces_items() {
        let (_, ledger) = setup();
        ledger.fetch_all().await;

        assert_eq!(ledger.items().len(), 2);
        assert!(!ledger.loading());
        assert!(ledger.error().is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_items() {
        let (authority, ledger) = setup();
        ledger.fetch_all().await;
        let before = ledger.items();

        authority.fail_once("fetch_bookings", ScriptedFailure::Transport);
        ledger.fetch_all().await;

        assert_eq!(ledger.items(), before);
        assert_eq!(ledger.error().as_deref(), Some("Failed to fetch bookings"));
    }

    #[tokio::test]
    async fn test_status_filter_narrows_fetch() {
        let (authority, ledger) = setup();
        authority.approve_booking(2).await.unwrap();

        ledger.set_status_filter(Filter::Only(BookingStatus::Approved));
        ledger.fetch_all().await;

        assert_eq!(ledger.items().len(), 1);
        assert_eq!(ledger.items()[0].id, 2);
        assert_eq!(ledger.filtered(), ledger.items());
    }

    #[tokio::test]
    async fn test_approve_one_confirms_and_emits() {
        let (_, ledger) = setup();
        let sink = capture_sink();
        let ledger = ledger.with_event_sink(sink.clone());
        ledger.fetch_all().await;

        ledger.approve_one(1).await;

        let row = ledger
            .items()
            .into_iter()
            .find(|booking| booking.id == 1)
            .unwrap();
        assert_eq!(row.status, BookingStatus::Approved);
        assert!(ledger.error().is_none());
        assert_eq!(sink.count_kind(EngineEventKind::BookingApproved), 1);
    }

    #[tokio::test]
    async fn test_authoritative_row_wins_over_optimistic_flip() {
        let (authority, ledger) = setup();
        ledger.fetch_all().await;

        // The authority holds a different cost than the ledger does; its
        // response must overwrite the locally flipped row entirely.
        authority.set_booking_cost(1, 9_999);
        ledger.approve_one(1).await;

        let row = ledger
            .items()
            .into_iter()
            .find(|booking| booking.id == 1)
            .unwrap();
        assert_eq!(row.status, BookingStatus::Approved);
        assert_eq!(row.total_cost, 9_999);
    }

    #[tokio::test]
    async fn test_reject_one_rolls_back_on_failure() {
        let (authority, ledger) = setup();
        ledger.fetch_all().await;
        let before = ledger.items();

        authority.fail_once(
            "reject_booking",
            ScriptedFailure::Remote("Booking already settled".into()),
        );
        ledger.reject_one(2).await;

        assert_eq!(ledger.items(), before);
        assert!(ledger
            .items()
            .iter()
            .all(|booking| booking.status == BookingStatus::Pending));
        assert_eq!(ledger.error().as_deref(), Some("Booking already settled"));
    }

    #[tokio::test]
    async fn test_reject_transport_failure_uses_fallback_message() {
        let (authority, ledger) = setup();
        ledger.fetch_all().await;

        authority.fail_once("reject_booking", ScriptedFailure::Transport);
        ledger.reject_one(1).await;

        assert_eq!(ledger.error().as_deref(), Some("Failed to reject booking"));
    }

    #[tokio::test]
    async fn test_transition_missing_id_leaves_rows_unchanged() {
        let (_, ledger) = setup();
        ledger.fetch_all().await;
        let before = ledger.items();

        ledger.approve_one(999).await;

        // The optimistic flip found nothing; the authority's failure rolls
        // back to an identical snapshot.
        assert_eq!(ledger.items(), before);
        assert!(ledger.error().is_some());
    }

    #[tokio::test]
    async fn test_failed_transition_erases_overlapping_success() {
        let (authority, ledger) = setup();
        let ledger = Arc::new(ledger);
        ledger.fetch_all().await;

        // First approve parks at the gate holding a snapshot where both
        // bookings are pending.
        let gate = authority.gate_next("approve_booking");
        let slow = {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.approve_one(1).await })
        };
        tokio::task::yield_now().await;

        // Second approve settles while the first is still in flight.
        ledger.approve_one(2).await;
        assert_eq!(
            ledger
                .items()
                .iter()
                .find(|booking| booking.id == 2)
                .unwrap()
                .status,
            BookingStatus::Approved
        );

        // Releasing the first call into a failure restores its snapshot,
        // erasing the second approval until the next fetch.
        authority.fail_once("approve_booking", ScriptedFailure::Transport);
        gate.notify_one();
        slow.await.unwrap();

        assert!(ledger
            .items()
            .iter()
            .all(|booking| booking.status == BookingStatus::Pending));
        assert_eq!(ledger.error().as_deref(), Some("Failed to approve booking"));
    }
}
