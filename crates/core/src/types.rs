use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A bookable advertising surface, as represented by the remote authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdSpace {
    pub id: i64,
    pub name: String,
    pub price_per_day: i64,
    pub city: City,
    pub address: String,
    pub availability_status: AvailabilityStatus,
    #[serde(rename = "type")]
    pub space_type: AdSpaceType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdSpaceType {
    Billboard,
    BusStop,
    MallDisplay,
    TransitAd,
}

impl AdSpaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdSpaceType::Billboard => "Billboard",
            AdSpaceType::BusStop => "BusStop",
            AdSpaceType::MallDisplay => "MallDisplay",
            AdSpaceType::TransitAd => "TransitAd",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum City {
    Bucuresti,
    Cluj,
    Roman,
    Brasov,
    Sibiu,
    Constanta,
    Craiova,
    Iasi,
    Suceava,
}

impl City {
    pub fn as_str(&self) -> &'static str {
        match self {
            City::Bucuresti => "Bucuresti",
            City::Cluj => "Cluj",
            City::Roman => "Roman",
            City::Brasov => "Brasov",
            City::Sibiu => "Sibiu",
            City::Constanta => "Constanta",
            City::Craiova => "Craiova",
            City::Iasi => "Iasi",
            City::Suceava => "Suceava",
        }
    }
}

/// Informational availability of an ad space. Not enforced locally; the
/// authority decides whether a booking against a non-available space succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityStatus {
    Available,
    Booked,
    Maintenance,
}

impl AvailabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Available => "Available",
            AvailabilityStatus::Booked => "Booked",
            AvailabilityStatus::Maintenance => "Maintenance",
        }
    }
}

/// A reservation proposal over an ad space for a date range.
///
/// `id`, `created_at`, `status`, and `total_cost` are assigned by the remote
/// authority on creation. The ad-space reference is a lookup key, not an
/// ownership pointer; the referenced space may be absent from a locally held
/// catalog at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub id: i64,
    pub ad_space_id: i64,
    pub advertiser_name: String,
    pub advertiser_email: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub total_cost: i64,
}

/// Booking lifecycle. `Pending` may move to `Approved` or `Rejected`; both
/// are terminal. Transitions are requested by the engine but enforced by the
/// authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Approved => "Approved",
            BookingStatus::Rejected => "Rejected",
        }
    }
}

/// Creation payload for a booking request. The local cost estimate is
/// advisory and never part of this payload; the authority recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub ad_space_id: i64,
    pub advertiser_name: String,
    pub advertiser_email: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// ALL-or-specific selector for one list dimension (type, city, status).
/// `All` removes the dimension's constraint entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Filter<T> {
    /// Whether a value passes this filter. `All` admits everything.
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(only) => only == value,
        }
    }

    /// The concrete selection, if the filter constrains anything.
    pub fn selection(&self) -> Option<&T> {
        match self {
            Filter::All => None,
            Filter::Only(only) => Some(only),
        }
    }
}

impl fmt::Display for AdSpaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdSpaceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Billboard" => Ok(AdSpaceType::Billboard),
            "BusStop" => Ok(AdSpaceType::BusStop),
            "MallDisplay" => Ok(AdSpaceType::MallDisplay),
            "TransitAd" => Ok(AdSpaceType::TransitAd),
            other => Err(format!("unknown ad space type: {other}")),
        }
    }
}

impl FromStr for City {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bucuresti" => Ok(City::Bucuresti),
            "Cluj" => Ok(City::Cluj),
            "Roman" => Ok(City::Roman),
            "Brasov" => Ok(City::Brasov),
            "Sibiu" => Ok(City::Sibiu),
            "Constanta" => Ok(City::Constanta),
            "Craiova" => Ok(City::Craiova),
            "Iasi" => Ok(City::Iasi),
            "Suceava" => Ok(City::Suceava),
            other => Err(format!("unknown city: {other}")),
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(BookingStatus::Pending),
            "Approved" => Ok(BookingStatus::Approved),
            "Rejected" => Ok(BookingStatus::Rejected),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}
