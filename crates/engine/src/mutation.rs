//! Snapshot/rollback machinery shared by the optimistic mutations.
//!
//! Every single-item mutation follows the same transaction: snapshot the
//! rows, apply the local transform, dispatch the remote call, then merge
//! the authoritative result or restore the snapshot exactly as captured.
//! The snapshot is restored unconditionally on failure, even if another
//! mutation settled in between; concurrent mutations on one container are
//! deliberately not isolated from each other.

use adboard_client::AuthorityError;
use adboard_core::types::{AdSpace, BookingRequest};

/// Rows addressable by the authority-assigned integer id.
pub(crate) trait Keyed {
    fn key(&self) -> i64;
}

impl Keyed for AdSpace {
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for BookingRequest {
    fn key(&self) -> i64 {
        self.id
    }
}

/// One optimistic write over an ordered row collection.
pub(crate) struct OptimisticTxn<T: Clone> {
    snapshot: Vec<T>,
}

impl<T: Clone> OptimisticTxn<T> {
    /// Snapshot the current rows, then apply the optimistic transform in
    /// place so callers observe the result before the remote call runs.
    pub fn begin(items: &mut Vec<T>, apply: impl FnOnce(&mut Vec<T>)) -> Self {
        let snapshot = items.clone();
        apply(items);
        Self { snapshot }
    }

    /// The remote call failed: restore the pre-mutation rows verbatim.
    pub fn rollback(self, items: &mut Vec<T>) {
        *items = self.snapshot;
    }

    /// The remote call succeeded: the optimistic rows stand until the
    /// caller merges the authoritative response.
    pub fn commit(self) {}
}

/// Merge the authority's representation over the optimistic guess, matching
/// by id. A row that disappeared in the meantime is left absent.
pub(crate) fn replace_by_key<T: Keyed>(items: &mut [T], authoritative: T) {
    if let Some(slot) = items.iter_mut().find(|row| row.key() == authoritative.key()) {
        *slot = authoritative;
    }
}

/// User-facing message for a failed remote call: the resolved remote
/// message when the authority produced one, the container's fallback for
/// transport-level failures.
pub(crate) fn surface_message(err: &AuthorityError, fallback: &str) -> String {
    match err {
        AuthorityError::Remote(message) => message.clone(),
        _ => fallback.to_string(),
    }
}
