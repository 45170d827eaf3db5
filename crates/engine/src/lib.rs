//! Client-side domain-state engine for ad-space booking administration.
//!
//! Three containers hold the engine's state: [`AdSpaceDirectory`] (the
//! filtered ad-space catalog), [`BookingLedger`] (booking requests with
//! approve/reject), and [`BookingIntake`] (the single-in-flight submission
//! workflow). Each container owns its rows exclusively; cross-container
//! reads are by-id lookups that tolerate missing entries, and a booking
//! created through intake shows up in the ledger only after the ledger's
//! own next fetch.
//!
//! Single-item mutations are optimistic: the local transform is visible
//! before the remote call is dispatched, and a failure restores the
//! pre-mutation snapshot verbatim. Remote failures never propagate to the
//! caller; they surface through each container's `error` field.

pub mod directory;
pub mod intake;
pub mod ledger;
mod mutation;

#[cfg(test)]
pub(crate) mod testutil;

pub use directory::AdSpaceDirectory;
pub use intake::{BookingIntake, BookingQuote};
pub use ledger::BookingLedger;
