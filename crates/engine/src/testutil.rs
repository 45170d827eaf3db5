//! In-memory authority for container tests: a scriptable store with
//! per-operation failure injection and one-shot gates for racing calls.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use adboard_client::{AuthorityError, AuthorityResult, BookingAuthority};
use adboard_core::pricing::{booking_window_days, estimate_cost};
use adboard_core::types::{
    AdSpace, AdSpaceType, AvailabilityStatus, BookingDraft, BookingRequest, BookingStatus, City,
    Filter,
};
use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use tokio::sync::Notify;

/// What the next scripted call should fail with.
pub(crate) enum ScriptedFailure {
    /// A resolved remote error carrying a server message.
    Remote(String),
    /// A transport-level failure with no usable message.
    Transport,
}

impl ScriptedFailure {
    fn into_error(self) -> AuthorityError {
        match self {
            Self::Remote(message) => AuthorityError::Remote(message),
            Self::Transport => AuthorityError::Url(url::ParseError::EmptyHost),
        }
    }
}

#[derive(Default)]
pub(crate) struct MockAuthority {
    spaces: Mutex<Vec<AdSpace>>,
    bookings: Mutex<Vec<BookingRequest>>,
    failures: Mutex<HashMap<String, VecDeque<ScriptedFailure>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl MockAuthority {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn put_spaces(&self, spaces: Vec<AdSpace>) {
        *self.spaces.lock() = spaces;
    }

    pub(crate) fn put_bookings(&self, bookings: Vec<BookingRequest>) {
        *self.bookings.lock() = bookings;
    }

    pub(crate) fn set_booking_cost(&self, id: i64, total_cost: i64) {
        if let Some(row) = self.bookings.lock().iter_mut().find(|b| b.id == id) {
            row.total_cost = total_cost;
        }
    }

    /// Queue a failure for the next call to `op`.
    pub(crate) fn fail_once(&self, op: &str, failure: ScriptedFailure) {
        self.failures
            .lock()
            .entry(op.to_string())
            .or_default()
            .push_back(failure);
    }

    /// Park the next call to `op` until the returned handle is notified.
    /// The call records itself and snapshots fetch data before parking.
    pub(crate) fn gate_next(&self, op: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().insert(op.to_string(), gate.clone());
        gate
    }

    pub(crate) fn calls(&self, op: &str) -> usize {
        self.calls.lock().get(op).copied().unwrap_or(0)
    }

    fn record(&self, op: &str) {
        *self.calls.lock().entry(op.to_string()).or_insert(0) += 1;
    }

    async fn pass_gate(&self, op: &str) {
        let gate = self.gates.lock().remove(op);
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn scripted(&self, op: &str) -> Option<AuthorityError> {
        self.failures
            .lock()
            .get_mut(op)
            .and_then(VecDeque::pop_front)
            .map(ScriptedFailure::into_error)
    }
}

#[async_trait::async_trait]
impl BookingAuthority for MockAuthority {
    async fn fetch_ad_spaces(
        &self,
        type_filter: Filter<AdSpaceType>,
        city_filter: Filter<City>,
    ) -> AuthorityResult<Vec<AdSpace>> {
        self.record("fetch_ad_spaces");
        // Snapshot before parking so a gated call returns data as of the
        // moment it was issued, the way an in-flight response would.
        let snapshot: Vec<AdSpace> = self
            .spaces
            .lock()
            .iter()
            .filter(|space| {
                type_filter.admits(&space.space_type) && city_filter.admits(&space.city)
            })
            .cloned()
            .collect();
        self.pass_gate("fetch_ad_spaces").await;
        if let Some(err) = self.scripted("fetch_ad_spaces") {
            return Err(err);
        }
        Ok(snapshot)
    }

    async fn update_ad_space(&self, space: &AdSpace) -> AuthorityResult<AdSpace> {
        self.record("update_ad_space");
        self.pass_gate("update_ad_space").await;
        if let Some(err) = self.scripted("update_ad_space") {
            return Err(err);
        }
        let mut spaces = self.spaces.lock();
        match spaces.iter_mut().find(|row| row.id == space.id) {
            Some(row) => {
                *row = space.clone();
                Ok(row.clone())
            }
            None => Err(AuthorityError::Remote(format!(
                "Failed to update ad space {}",
                space.id
            ))),
        }
    }

    async fn delete_ad_space(&self, id: i64) -> AuthorityResult<()> {
        self.record("delete_ad_space");
        self.pass_gate("delete_ad_space").await;
        if let Some(err) = self.scripted("delete_ad_space") {
            return Err(err);
        }
        self.spaces.lock().retain(|space| space.id != id);
        Ok(())
    }

    async fn fetch_bookings(
        &self,
        status_filter: Filter<BookingStatus>,
    ) -> AuthorityResult<Vec<BookingRequest>> {
        self.record("fetch_bookings");
        let snapshot: Vec<BookingRequest> = self
            .bookings
            .lock()
            .iter()
            .filter(|booking| status_filter.admits(&booking.status))
            .cloned()
            .collect();
        self.pass_gate("fetch_bookings").await;
        if let Some(err) = self.scripted("fetch_bookings") {
            return Err(err);
        }
        Ok(snapshot)
    }

    async fn create_booking(&self, draft: &BookingDraft) -> AuthorityResult<BookingRequest> {
        self.record("create_booking");
        self.pass_gate("create_booking").await;
        if let Some(err) = self.scripted("create_booking") {
            return Err(err);
        }
        let price_per_day = self
            .spaces
            .lock()
            .iter()
            .find(|space| space.id == draft.ad_space_id)
            .map(|space| space.price_per_day)
            .ok_or_else(|| AuthorityError::Remote("Failed to create booking (404)".into()))?;

        let days = booking_window_days(draft.start_date, draft.end_date);
        let mut bookings = self.bookings.lock();
        let id = bookings.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        let created = BookingRequest {
            id,
            ad_space_id: draft.ad_space_id,
            advertiser_name: draft.advertiser_name.clone(),
            advertiser_email: draft.advertiser_email.clone(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            created_at: Utc::now(),
            status: BookingStatus::Pending,
            total_cost: estimate_cost(days, price_per_day),
        };
        bookings.push(created.clone());
        Ok(created)
    }

    async fn approve_booking(&self, id: i64) -> AuthorityResult<BookingRequest> {
        self.record("approve_booking");
        self.pass_gate("approve_booking").await;
        if let Some(err) = self.scripted("approve_booking") {
            return Err(err);
        }
        transition(&self.bookings, id, BookingStatus::Approved, "approve")
    }

    async fn reject_booking(&self, id: i64) -> AuthorityResult<BookingRequest> {
        self.record("reject_booking");
        self.pass_gate("reject_booking").await;
        if let Some(err) = self.scripted("reject_booking") {
            return Err(err);
        }
        transition(&self.bookings, id, BookingStatus::Rejected, "reject")
    }
}

fn transition(
    bookings: &Mutex<Vec<BookingRequest>>,
    id: i64,
    status: BookingStatus,
    verb: &str,
) -> AuthorityResult<BookingRequest> {
    let mut bookings = bookings.lock();
    match bookings.iter_mut().find(|row| row.id == id) {
        Some(row) => {
            row.status = status;
            Ok(row.clone())
        }
        None => Err(AuthorityError::Remote(format!(
            "Failed to {verb} booking (404)"
        ))),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub(crate) fn seed_spaces() -> Vec<AdSpace> {
    vec![
        AdSpace {
            id: 1,
            name: "Piata Unirii LED".into(),
            price_per_day: 150,
            city: City::Bucuresti,
            address: "Piata Unirii 1".into(),
            availability_status: AvailabilityStatus::Available,
            space_type: AdSpaceType::Billboard,
        },
        AdSpace {
            id: 2,
            name: "Eroilor Shelter".into(),
            price_per_day: 40,
            city: City::Cluj,
            address: "Bd. Eroilor 12".into(),
            availability_status: AvailabilityStatus::Available,
            space_type: AdSpaceType::BusStop,
        },
        AdSpace {
            id: 3,
            name: "Centru Rooftop".into(),
            price_per_day: 120,
            city: City::Cluj,
            address: "Str. Memorandumului 4".into(),
            availability_status: AvailabilityStatus::Booked,
            space_type: AdSpaceType::Billboard,
        },
    ]
}

pub(crate) fn seed_bookings() -> Vec<BookingRequest> {
    vec![
        BookingRequest {
            id: 1,
            ad_space_id: 1,
            advertiser_name: "Aurora Media".into(),
            advertiser_email: "contact@auroramedia.ro".into(),
            start_date: date(2024, 6, 1),
            end_date: date(2024, 6, 11),
            created_at: Utc::now(),
            status: BookingStatus::Pending,
            total_cost: 1_500,
        },
        BookingRequest {
            id: 2,
            ad_space_id: 2,
            advertiser_name: "Retro Coffee".into(),
            advertiser_email: "hello@retrocoffee.ro".into(),
            start_date: date(2024, 7, 1),
            end_date: date(2024, 7, 8),
            created_at: Utc::now(),
            status: BookingStatus::Pending,
            total_cost: 280,
        },
    ]
}
