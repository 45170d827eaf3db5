//! Seam to the remote booking/ad-space authority.
//! The engine only talks to the authority through this trait; tests and
//! alternative transports provide their own implementations.

use adboard_core::types::{
    AdSpace, AdSpaceType, BookingDraft, BookingRequest, BookingStatus, City, Filter,
};

use crate::error::AuthorityResult;

/// Remote CRUD surface for ad spaces and booking requests. One method per
/// endpoint; implementations resolve non-2xx responses into
/// `AuthorityError::Remote` carrying a displayable message.
#[async_trait::async_trait]
pub trait BookingAuthority: Send + Sync {
    /// List ad spaces, constrained by any non-ALL filters.
    async fn fetch_ad_spaces(
        &self,
        type_filter: Filter<AdSpaceType>,
        city_filter: Filter<City>,
    ) -> AuthorityResult<Vec<AdSpace>>;

    /// Propose a full-representation update; returns the authoritative copy.
    async fn update_ad_space(&self, space: &AdSpace) -> AuthorityResult<AdSpace>;

    /// Propose a delete. Success carries no body.
    async fn delete_ad_space(&self, id: i64) -> AuthorityResult<()>;

    /// List booking requests, constrained by a non-ALL status filter.
    async fn fetch_bookings(
        &self,
        status_filter: Filter<BookingStatus>,
    ) -> AuthorityResult<Vec<BookingRequest>>;

    /// Create a booking request. The authority assigns id, createdAt,
    /// Pending status, and the recomputed total cost.
    async fn create_booking(&self, draft: &BookingDraft) -> AuthorityResult<BookingRequest>;

    /// Request the Pending -> Approved transition.
    async fn approve_booking(&self, id: i64) -> AuthorityResult<BookingRequest>;

    /// Request the Pending -> Rejected transition.
    async fn reject_booking(&self, id: i64) -> AuthorityResult<BookingRequest>;
}
