use thiserror::Error;

/// Errors surfaced to callers of the library.
///
/// Malformed *parameters* abort the call with one of these; malformed *records*
/// never do (see [`RecordError`]).
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Generic failure while parsing source content (detail in the message)
    #[error("Parse failed: {0}")]
    ParseFailed(String),

    /// The source format is not supported by the loaders
    #[error("Unsupported file format")]
    UnsupportedFormat,

    /// I/O failure while reading a source or configuration file
    #[error("Failed to read file content: {0}")]
    ReadContentFailed(#[from] std::io::Error),

    /// The loader was called without content or a file path
    #[error("Content or filepath is required")]
    MissingContentAndFilepath,

    // ── Parameter errors ────────────────────────────────────────────────────────

    /// Month parameter is not in `YYYY-MM` form
    #[error("Invalid month format: {0:?}, expected YYYY-MM")]
    InvalidMonthFormat(String),

    /// Month number outside 1..=12
    #[error("Month must be between 1 and 12, got {0}")]
    MonthOutOfRange(u32),

    /// Rounding limit must be strictly positive
    #[error("Limit must be positive, got {0}")]
    NonPositiveLimit(i64),

    /// A user supplied search pattern failed to compile
    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    // ── Masking / formatting ────────────────────────────────────────────────────

    #[error("Card number must be a string of 16 digits")]
    InvalidCardNumber,

    #[error("Account number must be a string of at least 4 digits")]
    InvalidAccountNumber,

    #[error("Invalid account info: {0:?}")]
    InvalidAccountInfo(String),

    #[error("Invalid date: {0:?}")]
    InvalidDate(String),

    #[error("Invalid card number range {start}..={end}: start must not exceed end, end must fit in 16 digits")]
    InvalidRange { start: u64, end: u64 },

    // ── Persistence / configuration ─────────────────────────────────────────────

    /// A report artifact could not be written
    #[error("Failed to write report: {0}")]
    WriteFailed(std::io::Error),

    /// A report value could not be turned into JSON
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

/// Per-record validation failure.
///
/// Aggregations log these and skip the record; they never abort a batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Transaction missing required fields: {0:?}")]
    MissingFields(Vec<&'static str>),

    #[error("Invalid operation date: {0:?}")]
    InvalidDate(String),

    #[error("Invalid {field} value: {value:?}")]
    InvalidAmount { field: &'static str, value: String },

    #[error("{0} total overflowed")]
    Overflow(&'static str),
}

/// Convenient alias for results carrying [`AnalyticsError`]
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
