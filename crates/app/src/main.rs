//! Reelbook Back Office CLI

use std::process;

use clap::{Args, Parser, Subcommand};
use jiff::{Zoned, civil::Date};
use reelbook::referral::PartnerCode;
use reelbook_app::{
    config::{DatabaseConfig, LoggingConfig, PricingConfig},
    context::{AppContext, AppInitError},
    database,
    domain::{
        bookings::{
            BookingsService, BookingsServiceError,
            data::{NewBooking, QuoteUpdate},
            records::{BookingUuid, CustomerUuid},
        },
        events::{
            EventsService, EventsServiceError,
            data::NewEvent,
            records::{EventOffer, EventUuid},
        },
        pricing::{PricingPolicy, PricingPolicyError},
        reservations::{ReservationsService, ReservationsServiceError},
        reviews::{
            ReviewsService, ReviewsServiceError,
            data::NewReview,
            records::ReviewUuid,
        },
    },
    observability,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "reelbook-app", about = "Reelbook back office CLI", long_about = None)]
struct Cli {
    #[command(flatten)]
    database: DatabaseConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(flatten)]
    pricing: PricingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Manage bookings
    Booking(BookingCommand),

    /// Manage events
    Event(EventCommand),

    /// Moderate reviews
    Review(ReviewCommand),

    /// Inspect and repair legacy reservations
    Reservation(ReservationCommand),
}

#[derive(Debug, Args)]
struct BookingCommand {
    #[command(subcommand)]
    command: BookingSubcommand,
}

#[derive(Debug, Subcommand)]
enum BookingSubcommand {
    Create(CreateBookingArgs),
    Show(BookingArgs),
    List,
    Quote(QuoteArgs),
    Confirm(BookingArgs),
    Deliver(BookingArgs),
    Cancel(BookingArgs),
    AssignEvent(AssignEventArgs),
    ApplyCode(ApplyCodeArgs),
    SpecialDiscount(SpecialDiscountArgs),
    Recalculate(BookingArgs),
}

#[derive(Debug, Args)]
struct BookingArgs {
    /// Booking UUID
    #[arg(long)]
    booking: BookingUuid,
}

#[derive(Debug, Args)]
struct CreateBookingArgs {
    /// Customer UUID from the identity service
    #[arg(long)]
    customer: CustomerUuid,

    /// Customer display name
    #[arg(long)]
    name: String,

    /// Wedding date (YYYY-MM-DD)
    #[arg(long)]
    wedding_date: Date,

    /// List price in minor units
    #[arg(long)]
    list_price: u64,

    /// Deposit already paid, in minor units
    #[arg(long, default_value_t = 0)]
    deposit: u64,

    /// Optional booking UUID; generated when omitted
    #[arg(long)]
    booking: Option<BookingUuid>,
}

#[derive(Debug, Args)]
struct QuoteArgs {
    /// Booking UUID
    #[arg(long)]
    booking: BookingUuid,

    /// List price in minor units
    #[arg(long)]
    list_price: u64,

    /// Deposit already paid, in minor units
    #[arg(long)]
    deposit: u64,
}

#[derive(Debug, Args)]
struct AssignEventArgs {
    /// Booking UUID
    #[arg(long)]
    booking: BookingUuid,

    /// Event UUID; clears the event when omitted
    #[arg(long)]
    event: Option<EventUuid>,

    /// Date the event must be running on; defaults to today
    #[arg(long)]
    today: Option<Date>,
}

#[derive(Debug, Args)]
struct ApplyCodeArgs {
    /// Booking the code is entered on
    #[arg(long)]
    booking: BookingUuid,

    /// Partner code of the referring booking
    #[arg(long)]
    code: PartnerCode,

    /// Date the referrer's wedding is compared against; defaults to today
    #[arg(long)]
    today: Option<Date>,
}

#[derive(Debug, Args)]
struct SpecialDiscountArgs {
    /// Booking UUID
    #[arg(long)]
    booking: BookingUuid,

    /// Discount in minor units; 0 removes it
    #[arg(long)]
    amount: u64,
}

#[derive(Debug, Args)]
struct EventCommand {
    #[command(subcommand)]
    command: EventSubcommand,
}

#[derive(Debug, Subcommand)]
enum EventSubcommand {
    Create(CreateEventArgs),
    Show(EventArgs),
    List,
}

#[derive(Debug, Args)]
struct EventArgs {
    /// Event UUID
    #[arg(long)]
    event: EventUuid,
}

#[derive(Debug, Args)]
struct CreateEventArgs {
    /// Event display name
    #[arg(long)]
    name: String,

    /// First day of the event (YYYY-MM-DD)
    #[arg(long)]
    starts_on: Date,

    /// Last day of the event (YYYY-MM-DD)
    #[arg(long)]
    ends_on: Date,

    #[command(flatten)]
    offer: OfferArgs,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct OfferArgs {
    /// Percentage off the list price, in basis points (1000 = 10%)
    #[arg(long)]
    basis_points: Option<u32>,

    /// Fixed amount off, in minor units
    #[arg(long)]
    amount: Option<u64>,
}

impl OfferArgs {
    fn offer(&self) -> Result<EventOffer, CliError> {
        match (self.basis_points, self.amount) {
            (Some(basis_points), None) => Ok(EventOffer::PercentageOff { basis_points }),
            (None, Some(amount)) => Ok(EventOffer::AmountOff { amount }),
            _ => Err(CliError::Usage(
                "exactly one of --basis-points or --amount is required",
            )),
        }
    }
}

#[derive(Debug, Args)]
struct ReviewCommand {
    #[command(subcommand)]
    command: ReviewSubcommand,
}

#[derive(Debug, Subcommand)]
enum ReviewSubcommand {
    Submit(SubmitReviewArgs),
    Approve(ReviewArgs),
    Cancel(ReviewArgs),
}

#[derive(Debug, Args)]
struct SubmitReviewArgs {
    /// Booking UUID
    #[arg(long)]
    booking: BookingUuid,

    /// URL of the published review
    #[arg(long)]
    url: String,
}

#[derive(Debug, Args)]
struct ReviewArgs {
    /// Review UUID
    #[arg(long)]
    review: ReviewUuid,
}

#[derive(Debug, Args)]
struct ReservationCommand {
    #[command(subcommand)]
    command: ReservationSubcommand,
}

#[derive(Debug, Subcommand)]
enum ReservationSubcommand {
    Show(BookingArgs),
    Reconcile,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(&'static str),

    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("invalid pricing configuration: {0}")]
    Pricing(#[from] PricingPolicyError),

    #[error(transparent)]
    Init(#[from] AppInitError),

    #[error(transparent)]
    Bookings(#[from] BookingsServiceError),

    #[error(transparent)]
    Events(#[from] EventsServiceError),

    #[error(transparent)]
    Reviews(#[from] ReviewsServiceError),

    #[error(transparent)]
    Reservations(#[from] ReservationsServiceError),

    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = observability::init_subscriber(&cli.logging) {
        eprintln!("failed to initialise logging: {error}");
    }

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let pricing = PricingPolicy::from_config(&cli.pricing)?;

    if matches!(cli.command, Commands::Migrate) {
        let pool = database::connect(&cli.database.database_url)
            .await
            .map_err(CliError::Connect)?;

        database::migrate(&pool).await?;

        println!("migrations applied");

        return Ok(());
    }

    let ctx = AppContext::from_database_url(&cli.database.database_url, pricing).await?;

    match cli.command {
        Commands::Migrate => Ok(()),
        Commands::Booking(BookingCommand { command }) => run_booking(&ctx, command).await,
        Commands::Event(EventCommand { command }) => run_event(&ctx, command).await,
        Commands::Review(ReviewCommand { command }) => run_review(&ctx, command).await,
        Commands::Reservation(ReservationCommand { command }) => {
            run_reservation(&ctx, command).await
        }
    }
}

async fn run_booking(ctx: &AppContext, command: BookingSubcommand) -> Result<(), CliError> {
    let bookings = &ctx.bookings;

    match command {
        BookingSubcommand::Create(args) => print_json(
            &bookings
                .create_booking(NewBooking {
                    uuid: args.booking.unwrap_or_default(),
                    customer_uuid: args.customer,
                    customer_name: args.name,
                    wedding_date: args.wedding_date,
                    list_price: args.list_price,
                    deposit: args.deposit,
                })
                .await?,
        ),
        BookingSubcommand::Show(args) => print_json(&bookings.get_booking(args.booking).await?),
        BookingSubcommand::List => print_json(&bookings.list_bookings().await?),
        BookingSubcommand::Quote(args) => print_json(
            &bookings
                .update_quote(
                    args.booking,
                    QuoteUpdate {
                        list_price: args.list_price,
                        deposit: args.deposit,
                    },
                )
                .await?,
        ),
        BookingSubcommand::Confirm(args) => {
            print_json(&bookings.confirm_booking(args.booking).await?)
        }
        BookingSubcommand::Deliver(args) => {
            print_json(&bookings.deliver_booking(args.booking).await?)
        }
        BookingSubcommand::Cancel(args) => print_json(&bookings.cancel_booking(args.booking).await?),
        BookingSubcommand::AssignEvent(args) => print_json(
            &bookings
                .assign_event(args.booking, args.event, args.today.unwrap_or_else(today))
                .await?,
        ),
        BookingSubcommand::ApplyCode(args) => print_json(
            &bookings
                .apply_partner_code(args.booking, args.code, args.today.unwrap_or_else(today))
                .await?,
        ),
        BookingSubcommand::SpecialDiscount(args) => print_json(
            &bookings
                .update_special_discount(args.booking, args.amount)
                .await?,
        ),
        BookingSubcommand::Recalculate(args) => {
            print_json(&bookings.recalculate(args.booking).await?)
        }
    }
}

async fn run_event(ctx: &AppContext, command: EventSubcommand) -> Result<(), CliError> {
    match command {
        EventSubcommand::Create(args) => {
            let offer = args.offer.offer()?;

            print_json(
                &ctx.events
                    .create_event(NewEvent {
                        uuid: EventUuid::new(),
                        name: args.name,
                        offer,
                        starts_on: args.starts_on,
                        ends_on: args.ends_on,
                    })
                    .await?,
            )
        }
        EventSubcommand::Show(args) => print_json(&ctx.events.get_event(args.event).await?),
        EventSubcommand::List => print_json(&ctx.events.list_events().await?),
    }
}

async fn run_review(ctx: &AppContext, command: ReviewSubcommand) -> Result<(), CliError> {
    match command {
        ReviewSubcommand::Submit(args) => print_json(
            &ctx.reviews
                .submit_review(NewReview {
                    uuid: ReviewUuid::new(),
                    booking_uuid: args.booking,
                    url: args.url,
                })
                .await?,
        ),
        ReviewSubcommand::Approve(args) => {
            print_json(&ctx.reviews.approve_review(args.review).await?)
        }
        ReviewSubcommand::Cancel(args) => print_json(&ctx.reviews.cancel_review(args.review).await?),
    }
}

async fn run_reservation(ctx: &AppContext, command: ReservationSubcommand) -> Result<(), CliError> {
    match command {
        ReservationSubcommand::Show(args) => {
            print_json(&ctx.reservations.get_reservation(args.booking).await?)
        }
        ReservationSubcommand::Reconcile => print_json(&ctx.reservations.reconcile().await?),
    }
}

fn today() -> Date {
    Zoned::now().date()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}
