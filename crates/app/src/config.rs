//! CLI configuration

use clap::{Args, ValueEnum};

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,
}

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Discount amounts and caps, in whole minor units of `currency`.
#[derive(Debug, Clone, Args)]
pub struct PricingConfig {
    /// ISO 4217 currency code all amounts are expressed in
    #[arg(long, env = "PRICING_CURRENCY", default_value = "KRW")]
    pub currency: String,

    /// Discount granted to both parties of a partner code referral
    #[arg(long, env = "REFERRAL_DISCOUNT", default_value_t = 50_000)]
    pub referral_discount: u64,

    /// Discount granted per approved review
    #[arg(long, env = "REVIEW_DISCOUNT", default_value_t = 30_000)]
    pub review_discount: u64,

    /// Maximum number of approved reviews that earn a discount; 0 removes the limit
    #[arg(long, env = "REVIEW_DISCOUNT_MAX_REVIEWS", default_value_t = 2)]
    pub review_discount_max_reviews: u32,

    /// Maximum total review discount
    #[arg(long, env = "REVIEW_DISCOUNT_MAX_AMOUNT")]
    pub review_discount_max_amount: Option<u64>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: "KRW".to_string(),
            referral_discount: 50_000,
            review_discount: 30_000,
            review_discount_max_reviews: 2,
            review_discount_max_amount: None,
        }
    }
}
