//! Date windows used to select transactions for period reports.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::Transaction;

/// Inclusive date interval; an absent `end` means "up to the latest record".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    /// Everything from `start` onward, `start` included.
    pub fn since(start: NaiveDate) -> Self {
        Self { start, end: None }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// The `days` days before `reference`, both ends included.
    ///
    /// A look-back past the earliest representable date starts at
    /// [`NaiveDate::MIN`].
    pub fn trailing_days(reference: NaiveDate, days: i64) -> Self {
        let start = Duration::try_days(days)
            .and_then(|span| reference.checked_sub_signed(span))
            .unwrap_or(if days < 0 { NaiveDate::MAX } else { NaiveDate::MIN });
        Self::between(start, reference)
    }

    /// Three-month look-back window ending on `reference`.
    pub fn last_three_months(reference: NaiveDate) -> Self {
        Self::trailing_days(reference, 90)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && self.end.is_none_or(|end| date <= end)
    }
}

impl From<NaiveDate> for DateWindow {
    fn from(start: NaiveDate) -> Self {
        Self::since(start)
    }
}

/// Named ranges ending on a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateRange {
    /// From the Monday of the reference week
    #[serde(rename = "W")]
    Week,
    /// From the first day of the reference month
    #[default]
    #[serde(rename = "M")]
    Month,
    /// From 1 January of the reference year
    #[serde(rename = "Y")]
    Year,
    /// All history up to the reference day
    #[serde(rename = "ALL")]
    All,
}

impl DateRange {
    pub fn window(self, reference: NaiveDate) -> DateWindow {
        let start = match self {
            DateRange::Week => {
                reference - Duration::days(reference.weekday().num_days_from_monday() as i64)
            }
            DateRange::Month => reference.with_day(1).unwrap_or(reference),
            DateRange::Year => NaiveDate::from_ymd_opt(reference.year(), 1, 1).unwrap_or(reference),
            DateRange::All => NaiveDate::MIN,
        };
        DateWindow::between(start, reference)
    }
}

/// Transactions dated inside `window`, in input order.
///
/// Records without a readable date are skipped with a warning.
pub fn filter_by_window(transactions: &[Transaction], window: DateWindow) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|txn| match txn.date() {
            Ok(date) => window.contains(date),
            Err(e) => {
                warn!(error = %e, "Skipping transaction outside any window");
                false
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::txn;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_since_is_inclusive_and_open_ended() {
        let window = DateWindow::since(date(2023, 5, 15));
        assert!(window.contains(date(2023, 5, 15)));
        assert!(window.contains(date(2030, 1, 1)));
        assert!(!window.contains(date(2023, 5, 14)));
    }

    #[test]
    fn test_last_three_months() {
        let window = DateWindow::last_three_months(date(2023, 5, 15));
        assert_eq!(window.start, date(2023, 2, 14));
        assert_eq!(window.end, Some(date(2023, 5, 15)));
        assert!(window.contains(date(2023, 5, 15)));
        assert!(!window.contains(date(2023, 5, 16)));
    }

    #[rstest]
    #[case(i64::MAX, NaiveDate::MIN)]
    #[case(1_000_000_000, NaiveDate::MIN)]
    #[case(i64::MIN, NaiveDate::MAX)]
    fn test_trailing_days_clamps_out_of_range_spans(#[case] days: i64, #[case] start: NaiveDate) {
        let window = DateWindow::trailing_days(date(2023, 5, 15), days);
        assert_eq!(window.start, start);
        assert_eq!(window.end, Some(date(2023, 5, 15)));
    }

    #[rstest]
    #[case(DateRange::Week, date(2023, 5, 15))] // reference is a Wednesday
    #[case(DateRange::Month, date(2023, 5, 1))]
    #[case(DateRange::Year, date(2023, 1, 1))]
    #[case(DateRange::All, NaiveDate::MIN)]
    fn test_date_range_windows(#[case] range: DateRange, #[case] start: NaiveDate) {
        let window = range.window(date(2023, 5, 17));
        assert_eq!(window.start, start);
        assert_eq!(window.end, Some(date(2023, 5, 17)));
    }

    #[test]
    fn test_date_range_serialization() {
        let json = serde_json::to_string(&DateRange::All).unwrap();
        assert_eq!(json, "\"ALL\"");
        let parsed: DateRange = serde_json::from_str("\"W\"").unwrap();
        assert_eq!(parsed, DateRange::Week);
        assert_eq!(DateRange::default(), DateRange::Month);
    }

    #[test]
    fn test_filter_by_window_skips_bad_dates() {
        let transactions = vec![
            txn("2023-05-01", "Еда", "10", "0"),
            txn("bad", "Еда", "10", "0"),
            txn("2023-04-30", "Еда", "10", "0"),
        ];

        let filtered = filter_by_window(&transactions, DateWindow::since(date(2023, 5, 1)));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].operation_date.as_deref(), Some("2023-05-01"));
    }
}
