pub mod config;
pub mod events;
pub mod pricing;
pub mod types;
pub mod validation;

pub use config::AppConfig;
pub use types::{
    AdSpace, AdSpaceType, AvailabilityStatus, BookingDraft, BookingRequest, BookingStatus, City,
    Filter,
};
