//! Booking intake — a single-flight submission dialog over one ad space.

use std::sync::Arc;

use adboard_client::BookingAuthority;
use adboard_core::events::{make_event, EngineEventKind, EventSink};
use adboard_core::pricing::{booking_window_days, estimate_cost};
use adboard_core::types::{AdSpace, BookingDraft, BookingRequest};
use chrono::NaiveDate;
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::mutation::surface_message;

/// Price preview for a candidate booking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingQuote {
    pub days: i64,
    pub total_cost: i64,
}

#[derive(Default)]
struct IntakeState {
    dialog_open: bool,
    selected: Option<AdSpace>,
    submitting: bool,
    submit_error: Option<String>,
    submit_success: Option<BookingRequest>,
}

/// Dialog-scoped workflow for submitting one booking request at a time.
///
/// Opening the dialog pins the target ad space and clears the previous
/// attempt's outcome; nothing here is optimistic, the created booking
/// reaches the ledger through its next fetch.
pub struct BookingIntake {
    authority: Arc<dyn BookingAuthority>,
    state: RwLock<IntakeState>,
    event_sink: Arc<dyn EventSink>,
}

impl BookingIntake {
    pub fn new(authority: Arc<dyn BookingAuthority>) -> Self {
        Self {
            authority,
            state: RwLock::new(IntakeState::default()),
            event_sink: adboard_core::events::noop_sink(),
        }
    }

    /// Attach an event sink observing confirmed submissions.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Open the dialog for one ad space, dropping the previous attempt's
    /// error and success. An in-flight submission keeps running.
    pub fn open_for(&self, space: AdSpace) {
        let mut state = self.state.write();
        state.selected = Some(space);
        state.dialog_open = true;
        state.submit_error = None;
        state.submit_success = None;
    }

    /// Close the dialog and clear the selection and prior outcome.
    /// Idempotent.
    pub fn close(&self) {
        let mut state = self.state.write();
        state.dialog_open = false;
        state.selected = None;
        state.submit_error = None;
        state.submit_success = None;
    }

    /// Submit a booking draft to the authority. The confirmed request is
    /// kept for display; failure surfaces the remote message when there is
    /// one. Callers disable their submit control while [`submitting`] is
    /// set rather than relying on this to reject overlaps.
    ///
    /// [`submitting`]: BookingIntake::submitting
    pub async fn submit(&self, draft: BookingDraft) {
        {
            let mut state = self.state.write();
            state.submitting = true;
            state.submit_error = None;
            state.submit_success = None;
        }

        match self.authority.create_booking(&draft).await {
            Ok(created) => {
                info!(
                    id = created.id,
                    ad_space_id = created.ad_space_id,
                    total_cost = created.total_cost,
                    "booking created"
                );
                metrics::counter!("engine.mutation", "op" => "submit", "outcome" => "confirmed")
                    .increment(1);
                let id = created.id;
                {
                    let mut state = self.state.write();
                    state.submit_success = Some(created);
                    state.submitting = false;
                }
                self.event_sink
                    .emit(make_event(EngineEventKind::BookingCreated, id));
            }
            Err(err) => {
                warn!(ad_space_id = draft.ad_space_id, error = %err, "booking submit failed");
                metrics::counter!("engine.mutation", "op" => "submit", "outcome" => "failed")
                    .increment(1);
                let mut state = self.state.write();
                state.submit_error = Some(surface_message(&err, "Failed to create booking"));
                state.submitting = false;
            }
        }
    }

    /// Price preview for the selected space over `[start_date, end_date)`.
    /// `None` when no space is selected; a non-positive window quotes as
    /// zero days.
    pub fn quote(&self, start_date: NaiveDate, end_date: NaiveDate) -> Option<BookingQuote> {
        let state = self.state.read();
        let space = state.selected.as_ref()?;
        let days = booking_window_days(start_date, end_date);
        Some(BookingQuote {
            days,
            total_cost: estimate_cost(days, space.price_per_day),
        })
    }

    pub fn dialog_open(&self) -> bool {
        self.state.read().dialog_open
    }

    /// The ad space the dialog is pinned to, if open.
    pub fn selected(&self) -> Option<AdSpace> {
        self.state.read().selected.clone()
    }

    pub fn submitting(&self) -> bool {
        self.state.read().submitting
    }

    pub fn submit_error(&self) -> Option<String> {
        self.state.read().submit_error.clone()
    }

    /// The confirmed booking from the last successful submission.
    pub fn submit_success(&self) -> Option<BookingRequest> {
        self.state.read().submit_success.clone()
    }
}
