//! Reporting and aggregation over bank transaction history.
//!
//! Load an export with [`TransactionLoader`], then run reports over the
//! borrowed records. Wrap a report in [`Reported`] to also persist each
//! result as a JSON artifact.
//!
//! ```rust,ignore
//! use bank_analytics_rs::{Reported, TransactionLoader, profitable_cashback_categories};
//!
//! let transactions = TransactionLoader::new()
//!     .filename("data/operations.xlsx")
//!     .load()?;
//!
//! let ranking = Reported::new(profitable_cashback_categories)
//!     .call((transactions.as_slice(), 2023, 5));
//! ```
//!
//! The library logs through `tracing` and never installs a subscriber.

mod builder;
mod types;

pub mod analytics;
pub mod config;
pub mod errors;
pub mod fields;
pub mod masks;
pub mod parsers;
pub mod processing;
pub mod report;
pub mod search;

pub use analytics::prelude::*;
pub use builder::{FileFormat, TransactionLoader};
pub use config::ReportConfig;
pub use errors::{AnalyticsError, AnalyticsResult, RecordError};
pub use report::{CallOutcome, FileSink, Logged, MemorySink, ReportOutput, ReportSink, Reported};
pub use types::{Field, Transaction, validate};
