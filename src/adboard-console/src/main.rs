//! Adboard console — inspect and administer ad spaces and booking requests
//! against a remote booking authority.

use std::sync::Arc;

use adboard_client::{BookingAuthority, HttpAuthority};
use adboard_core::config::AppConfig;
use adboard_core::types::{
    AdSpaceType, AvailabilityStatus, BookingDraft, BookingStatus, City, Filter,
};
use adboard_core::validation::{validate_ad_space_edit, validate_booking_input};
use adboard_engine::{AdSpaceDirectory, BookingIntake, BookingLedger};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "adboard-console")]
#[command(about = "Ad space and booking administration console")]
#[command(version)]
struct Cli {
    /// Authority base URL (overrides config)
    #[arg(long, env = "ADBOARD__AUTHORITY__BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in milliseconds (overrides config)
    #[arg(long, env = "ADBOARD__AUTHORITY__TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Print results as JSON instead of tables
    #[arg(long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ad space catalog
    AdSpaces {
        #[command(subcommand)]
        action: AdSpaceAction,
    },

    /// Booking requests
    Bookings {
        #[command(subcommand)]
        action: BookingAction,
    },

    /// Submit a booking request for an ad space
    Book {
        /// Ad space id to book
        space_id: i64,

        /// Advertiser display name
        #[arg(long)]
        name: String,

        /// Advertiser contact email
        #[arg(long)]
        email: String,

        /// First booked day (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Day after the last booked day (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
    },
}

#[derive(Subcommand)]
enum AdSpaceAction {
    /// List ad spaces, optionally narrowed by type and city
    List {
        /// Ad space type: billboard, bus-stop, mall-display, transit-ad
        #[arg(long = "type")]
        space_type: Option<String>,

        /// City name, e.g. Bucuresti or Cluj
        #[arg(long)]
        city: Option<String>,
    },

    /// Update an ad space's descriptive fields
    Edit {
        /// Ad space id
        id: i64,

        #[arg(long)]
        name: Option<String>,

        /// Price per day in whole currency units
        #[arg(long)]
        price: Option<i64>,

        #[arg(long)]
        address: Option<String>,

        /// City name, e.g. Bucuresti or Cluj
        #[arg(long)]
        city: Option<String>,

        /// Ad space type: billboard, bus-stop, mall-display, transit-ad
        #[arg(long = "type")]
        space_type: Option<String>,

        /// Availability: available, booked, maintenance
        #[arg(long)]
        availability: Option<String>,
    },

    /// Delete an ad space
    Delete {
        /// Ad space id
        id: i64,
    },
}

#[derive(Subcommand)]
enum BookingAction {
    /// List booking requests, optionally narrowed by status
    List {
        /// Booking status: pending, approved, rejected
        #[arg(long)]
        status: Option<String>,
    },

    /// Approve a pending booking request
    Approve {
        /// Booking request id
        id: i64,
    },

    /// Reject a pending booking request
    Reject {
        /// Booking request id
        id: i64,
    },
}

fn parse_space_type(s: &str) -> AdSpaceType {
    match s.trim().to_lowercase().as_str() {
        "billboard" => AdSpaceType::Billboard,
        "busstop" | "bus-stop" => AdSpaceType::BusStop,
        "malldisplay" | "mall-display" => AdSpaceType::MallDisplay,
        "transitad" | "transit-ad" => AdSpaceType::TransitAd,
        _ => {
            eprintln!(
                "Unknown ad space type: '{s}' (expected billboard, bus-stop, mall-display, transit-ad)"
            );
            std::process::exit(1);
        }
    }
}

fn parse_city(s: &str) -> City {
    match s.trim().parse::<City>() {
        Ok(city) => city,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn parse_status(s: &str) -> BookingStatus {
    match s.trim().to_lowercase().as_str() {
        "pending" => BookingStatus::Pending,
        "approved" => BookingStatus::Approved,
        "rejected" => BookingStatus::Rejected,
        _ => {
            eprintln!("Unknown booking status: '{s}' (expected pending, approved, rejected)");
            std::process::exit(1);
        }
    }
}

fn parse_availability(s: &str) -> AvailabilityStatus {
    match s.trim().to_lowercase().as_str() {
        "available" => AvailabilityStatus::Available,
        "booked" => AvailabilityStatus::Booked,
        "maintenance" => AvailabilityStatus::Maintenance,
        _ => {
            eprintln!("Unknown availability: '{s}' (expected available, booked, maintenance)");
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adboard_engine=warn,adboard_client=warn".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(base_url) = cli.base_url {
        config.authority.base_url = base_url;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.authority.timeout_ms = timeout_ms;
    }

    let authority: Arc<dyn BookingAuthority> = Arc::new(HttpAuthority::new(&config.authority)?);
    let json = cli.json;

    match cli.command {
        Commands::AdSpaces { action } => match action {
            AdSpaceAction::List { space_type, city } => {
                cmd_spaces_list(authority, space_type, city, json).await
            }
            AdSpaceAction::Edit {
                id,
                name,
                price,
                address,
                city,
                space_type,
                availability,
            } => {
                cmd_spaces_edit(
                    authority,
                    id,
                    name,
                    price,
                    address,
                    city,
                    space_type,
                    availability,
                )
                .await
            }
            AdSpaceAction::Delete { id } => cmd_spaces_delete(authority, id).await,
        },
        Commands::Bookings { action } => match action {
            BookingAction::List { status } => cmd_bookings_list(authority, status, json).await,
            BookingAction::Approve { id } => cmd_bookings_settle(authority, id, true).await,
            BookingAction::Reject { id } => cmd_bookings_settle(authority, id, false).await,
        },
        Commands::Book {
            space_id,
            name,
            email,
            start,
            end,
        } => cmd_book(authority, space_id, name, email, start, end, json).await,
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Ad space commands
// ---------------------------------------------------------------------------

async fn cmd_spaces_list(
    authority: Arc<dyn BookingAuthority>,
    space_type: Option<String>,
    city: Option<String>,
    json: bool,
) {
    let directory = AdSpaceDirectory::new(authority);
    if let Some(t) = space_type {
        directory.set_type_filter(Filter::Only(parse_space_type(&t)));
    }
    if let Some(c) = city {
        directory.set_city_filter(Filter::Only(parse_city(&c)));
    }

    directory.fetch_all().await;
    if let Some(error) = directory.error() {
        eprintln!("{error}");
        std::process::exit(1);
    }

    let rows = directory.filtered();
    if json {
        println!("{}", serde_json::to_string_pretty(&rows).unwrap_or_default());
        return;
    }

    println!(
        "  {:<6} {:<22} {:<12} {:<14} {:<12} {:>10}  Address",
        "ID", "Name", "City", "Type", "Status", "Price/day"
    );
    println!("  {}", "-".repeat(100));
    for space in &rows {
        println!(
            "  {:<6} {:<22} {:<12} {:<14} {:<12} {:>10}  {}",
            space.id,
            truncate(&space.name, 20),
            space.city,
            space.space_type,
            space.availability_status,
            format_money(space.price_per_day),
            space.address,
        );
    }
    println!();
    println!("  Total: {} ad spaces", rows.len());
}

async fn cmd_spaces_edit(
    authority: Arc<dyn BookingAuthority>,
    id: i64,
    name: Option<String>,
    price: Option<i64>,
    address: Option<String>,
    city: Option<String>,
    space_type: Option<String>,
    availability: Option<String>,
) {
    let directory = AdSpaceDirectory::new(authority);
    directory.fetch_all().await;
    if let Some(error) = directory.error() {
        eprintln!("{error}");
        std::process::exit(1);
    }

    directory.open_edit(id);
    let Some(mut updated) = directory.editing() else {
        eprintln!("Ad space {id} not found");
        std::process::exit(1);
    };

    if let Some(name) = name {
        updated.name = name;
    }
    if let Some(price) = price {
        updated.price_per_day = price;
    }
    if let Some(address) = address {
        updated.address = address;
    }
    if let Some(city) = city {
        updated.city = parse_city(&city);
    }
    if let Some(space_type) = space_type {
        updated.space_type = parse_space_type(&space_type);
    }
    if let Some(availability) = availability {
        updated.availability_status = parse_availability(&availability);
    }

    let errors = validate_ad_space_edit(&updated.name, updated.price_per_day, &updated.address);
    if !errors.is_empty() {
        if let Some(e) = errors.name {
            eprintln!("  name: {e}");
        }
        if let Some(e) = errors.price_per_day {
            eprintln!("  price: {e}");
        }
        if let Some(e) = errors.address {
            eprintln!("  address: {e}");
        }
        std::process::exit(1);
    }

    directory.save_edit(updated).await;
    if let Some(error) = directory.error() {
        eprintln!("{error}");
        std::process::exit(1);
    }
    println!("Ad space {id} updated");
}

async fn cmd_spaces_delete(authority: Arc<dyn BookingAuthority>, id: i64) {
    let directory = AdSpaceDirectory::new(authority);
    directory.fetch_all().await;
    if let Some(error) = directory.error() {
        eprintln!("{error}");
        std::process::exit(1);
    }

    directory.delete_one(id).await;
    if let Some(error) = directory.error() {
        eprintln!("{error}");
        std::process::exit(1);
    }
    println!(
        "Ad space {id} deleted ({} remaining)",
        directory.items().len()
    );
}

// ---------------------------------------------------------------------------
// Booking commands
// ---------------------------------------------------------------------------

async fn cmd_bookings_list(
    authority: Arc<dyn BookingAuthority>,
    status: Option<String>,
    json: bool,
) {
    let ledger = BookingLedger::new(authority.clone());
    if let Some(s) = status {
        ledger.set_status_filter(Filter::Only(parse_status(&s)));
    }

    ledger.fetch_all().await;
    if let Some(error) = ledger.error() {
        eprintln!("{error}");
        std::process::exit(1);
    }

    let rows = ledger.filtered();
    if json {
        println!("{}", serde_json::to_string_pretty(&rows).unwrap_or_default());
        return;
    }

    // The directory is only consulted for display names; bookings whose ad
    // space is gone still render.
    let directory = AdSpaceDirectory::new(authority);
    directory.fetch_all().await;

    println!(
        "  {:<6} {:<22} {:<20} {:<12} {:<12} {:<10} {:>10}",
        "ID", "Ad Space", "Advertiser", "Start", "End", "Status", "Total"
    );
    println!("  {}", "-".repeat(100));
    for booking in &rows {
        println!(
            "  {:<6} {:<22} {:<20} {:<12} {:<12} {:<10} {:>10}",
            booking.id,
            truncate(&directory.display_name(booking.ad_space_id), 20),
            truncate(&booking.advertiser_name, 18),
            booking.start_date,
            booking.end_date,
            booking.status,
            format_money(booking.total_cost),
        );
    }
    println!();
    println!("  Total: {} booking requests", rows.len());
}

async fn cmd_bookings_settle(authority: Arc<dyn BookingAuthority>, id: i64, approve: bool) {
    let ledger = BookingLedger::new(authority);
    ledger.fetch_all().await;
    if let Some(error) = ledger.error() {
        eprintln!("{error}");
        std::process::exit(1);
    }

    if approve {
        ledger.approve_one(id).await;
    } else {
        ledger.reject_one(id).await;
    }
    if let Some(error) = ledger.error() {
        eprintln!("{error}");
        std::process::exit(1);
    }

    let verb = if approve { "approved" } else { "rejected" };
    println!("Booking request {id} {verb}");
    if let Some(row) = ledger.items().iter().find(|booking| booking.id == id) {
        println!("  Status:      {}", row.status);
        println!("  Total cost:  {}", format_money(row.total_cost));
    }
}

async fn cmd_book(
    authority: Arc<dyn BookingAuthority>,
    space_id: i64,
    name: String,
    email: String,
    start: NaiveDate,
    end: NaiveDate,
    json: bool,
) {
    let directory = AdSpaceDirectory::new(authority.clone());
    directory.fetch_all().await;
    if let Some(error) = directory.error() {
        eprintln!("{error}");
        std::process::exit(1);
    }

    let Some(space) = directory
        .items()
        .into_iter()
        .find(|space| space.id == space_id)
    else {
        eprintln!("Ad space {space_id} not found");
        std::process::exit(1);
    };

    let errors = validate_booking_input(&name, &email, Some(start), Some(end), today());
    if !errors.is_empty() {
        if let Some(e) = errors.advertiser_name {
            eprintln!("  name: {e}");
        }
        if let Some(e) = errors.advertiser_email {
            eprintln!("  email: {e}");
        }
        if let Some(e) = errors.start_date {
            eprintln!("  start: {e}");
        }
        if let Some(e) = errors.end_date {
            eprintln!("  end: {e}");
        }
        std::process::exit(1);
    }

    let intake = BookingIntake::new(authority);
    intake.open_for(space.clone());

    if !json {
        if let Some(quote) = intake.quote(start, end) {
            println!("Booking {} ({})", space.name, space.city);
            println!("  Window:     {} days", quote.days);
            println!(
                "  Estimated:  {} ({}/day)",
                format_money(quote.total_cost),
                format_money(space.price_per_day)
            );
        }
    }

    intake
        .submit(BookingDraft {
            ad_space_id: space_id,
            advertiser_name: name.trim().to_string(),
            advertiser_email: email.trim().to_string(),
            start_date: start,
            end_date: end,
        })
        .await;

    match intake.submit_success() {
        Some(created) => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&created).unwrap_or_default()
                );
                return;
            }
            println!();
            println!("Booking request created");
            println!("  ID:          {}", created.id);
            println!("  Status:      {}", created.status);
            println!("  Total cost:  {}", format_money(created.total_cost));
        }
        None => {
            let message = intake
                .submit_error()
                .unwrap_or_else(|| "Failed to create booking".into());
            eprintln!("{message}");
            std::process::exit(1);
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

fn format_money(amount: i64) -> String {
    if amount >= 1_000 {
        format!("{},{:03}", amount / 1_000, amount % 1_000)
    } else {
        amount.to_string()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if max < 3 {
        return s.chars().take(max).collect();
    }
    let char_count = s.chars().count();
    if char_count > max {
        let truncated: String = s.chars().take(max - 2).collect();
        format!("{truncated}..")
    } else {
        s.to_string()
    }
}
