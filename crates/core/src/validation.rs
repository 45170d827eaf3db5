//! Field-level validation for booking submissions and ad-space edits.
//!
//! Pure functions: no side effects, no network access, no clock reads (the
//! caller supplies `today`). Each field keeps its earliest-detected message;
//! later rules never overwrite an existing field error. Validation here is a
//! UX convenience, not a trust boundary; the remote authority re-validates.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// local@domain with a dot-separated domain part.
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Per-field messages from booking validation. All `None` = valid input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFieldErrors {
    pub advertiser_name: Option<String>,
    pub advertiser_email: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl BookingFieldErrors {
    pub fn is_empty(&self) -> bool {
        self.advertiser_name.is_none()
            && self.advertiser_email.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

/// Per-field messages from ad-space edit validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdSpaceEditErrors {
    pub name: Option<String>,
    pub price_per_day: Option<String>,
    pub address: Option<String>,
}

impl AdSpaceEditErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price_per_day.is_none() && self.address.is_none()
    }
}

fn set_once(slot: &mut Option<String>, message: &str) {
    if slot.is_none() {
        *slot = Some(message.to_string());
    }
}

/// Validate a booking submission. Name and email are evaluated trimmed;
/// missing dates are required-field errors. When both dates are present,
/// the cross-checks run in order: both strictly after `today` (attached to
/// the start date), end strictly after start, span of at least 7 days.
pub fn validate_booking_input(
    advertiser_name: &str,
    advertiser_email: &str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> BookingFieldErrors {
    let mut errors = BookingFieldErrors::default();

    if advertiser_name.trim().is_empty() {
        set_once(&mut errors.advertiser_name, "Advertiser name is required");
    }

    let email = advertiser_email.trim();
    if email.is_empty() {
        set_once(&mut errors.advertiser_email, "Advertiser email is required");
    } else if !EMAIL_PATTERN.is_match(email) {
        set_once(&mut errors.advertiser_email, "Invalid email format");
    }

    if start_date.is_none() {
        set_once(&mut errors.start_date, "Start date is required");
    }
    if end_date.is_none() {
        set_once(&mut errors.end_date, "End date is required");
    }

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start <= today || end <= today {
            set_once(
                &mut errors.start_date,
                "Start and end dates must both be in the future",
            );
        }

        if end <= start {
            set_once(&mut errors.end_date, "End date must be after start date");
        }

        if (end - start).num_days() < 7 {
            set_once(&mut errors.end_date, "Minimum booking duration is 7 days");
        }
    }

    errors
}

/// Validate the editable fields of an ad space before proposing an update.
pub fn validate_ad_space_edit(
    name: &str,
    price_per_day: i64,
    address: &str,
) -> AdSpaceEditErrors {
    let mut errors = AdSpaceEditErrors::default();

    if name.chars().count() < 2 {
        set_once(&mut errors.name, "Name must be at least 2 characters");
    } else if name.chars().count() > 20 {
        set_once(&mut errors.name, "Name must be at max 20 characters");
    }

    if price_per_day <= 0 {
        set_once(&mut errors.price_per_day, "Price must be greater than 0");
    }

    if address.chars().count() < 3 {
        set_once(&mut errors.address, "Address must be at least 3 characters");
    }

    errors
}
