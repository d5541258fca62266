//! Persisting report results as JSON artifacts.
//!
//! Wrap any report function in [`Reported`] and every successful result is
//! also written through a [`ReportSink`]. Persistence failures are logged and
//! never change what the report returns. [`Logged`] wraps the same kind of
//! function and logs each call's outcome instead.

pub mod logged;
pub mod output;
pub mod sink;
pub mod wrapper;

pub use logged::{CallOutcome, Logged};
pub use output::ReportOutput;
pub use sink::{FileSink, MemorySink, ReportSink};
pub use wrapper::{REPORT_SUFFIX, ReportFn, Reported, persist_report, report_name};
