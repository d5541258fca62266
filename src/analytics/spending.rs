//! Spend summaries over a date window: by category keyword, by weekday and
//! by day type.
//!
//! Bucketed reports always return every bucket, empty ones filled with zero,
//! so consumers can rely on a fixed shape.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use tracing::warn;

use super::period::DateWindow;
use crate::fields::checked_sum;
use crate::types::{Field, Transaction};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpending {
    pub category: String,
    pub total: Decimal,
    pub transactions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdaySpending {
    #[serde(serialize_with = "weekday_name")]
    pub weekday: Weekday,
    pub total: Decimal,
    pub transactions: usize,
    pub average: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Workday,
    Weekend,
}

impl DayType {
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => DayType::Weekend,
            _ => DayType::Workday,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayTypeSpending {
    pub day_type: DayType,
    pub total: Decimal,
    pub transactions: usize,
    pub average: Decimal,
}

/// Running sum and count for one bucket.
#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    total: Decimal,
    count: usize,
}

impl Bucket {
    /// Records that would overflow the total are left out.
    fn add(&mut self, amount: Decimal) {
        match checked_sum(Field::Amount.key(), self.total, amount) {
            Ok(total) => {
                self.total = total;
                self.count += 1;
            }
            Err(e) => warn!(error = %e, "Skipping transaction in spending report"),
        }
    }

    fn total(&self) -> Decimal {
        self.total.round_dp(2)
    }

    fn average(&self) -> Decimal {
        if self.count == 0 {
            Decimal::ZERO
        } else {
            (self.total / Decimal::from(self.count)).round_dp(2)
        }
    }
}

/// Dated, valued records of the window.
fn dated_amounts(
    transactions: &[Transaction],
    window: DateWindow,
) -> impl Iterator<Item = (&Transaction, NaiveDate, Decimal)> {
    transactions.iter().filter_map(move |txn| {
        let parsed = txn
            .date()
            .and_then(|date| txn.amount().map(|amount| (date, amount)));
        match parsed {
            Ok((date, amount)) if window.contains(date) => Some((txn, date, amount)),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Skipping transaction in spending report");
                None
            }
        }
    })
}

/// Total spent on records whose description mentions `category`
/// (case-insensitive) inside `window`.
pub fn spending_by_category(
    transactions: &[Transaction],
    category: &str,
    window: DateWindow,
) -> CategorySpending {
    let needle = category.to_lowercase();
    let mut bucket = Bucket::default();

    for (txn, _, amount) in dated_amounts(transactions, window) {
        let matches = txn
            .description
            .as_deref()
            .is_some_and(|description| description.to_lowercase().contains(&needle));
        if matches {
            bucket.add(amount);
        }
    }

    CategorySpending {
        category: category.to_string(),
        total: bucket.total(),
        transactions: bucket.count,
    }
}

/// Spending per weekday, always seven rows from Monday to Sunday.
pub fn spending_by_weekday(transactions: &[Transaction], window: DateWindow) -> Vec<WeekdaySpending> {
    let mut buckets = [Bucket::default(); 7];

    for (_, date, amount) in dated_amounts(transactions, window) {
        buckets[date.weekday().num_days_from_monday() as usize].add(amount);
    }

    WEEK.iter()
        .zip(buckets.iter())
        .map(|(weekday, bucket)| WeekdaySpending {
            weekday: *weekday,
            total: bucket.total(),
            transactions: bucket.count,
            average: bucket.average(),
        })
        .collect()
}

/// Spending on workdays versus weekends, always two rows in that order.
pub fn spending_by_workday(transactions: &[Transaction], window: DateWindow) -> Vec<DayTypeSpending> {
    let mut workday = Bucket::default();
    let mut weekend = Bucket::default();

    for (_, date, amount) in dated_amounts(transactions, window) {
        match DayType::of(date) {
            DayType::Workday => workday.add(amount),
            DayType::Weekend => weekend.add(amount),
        }
    }

    [(DayType::Workday, workday), (DayType::Weekend, weekend)]
        .into_iter()
        .map(|(day_type, bucket)| DayTypeSpending {
            day_type,
            total: bucket.total(),
            transactions: bucket.count,
            average: bucket.average(),
        })
        .collect()
}

fn weekday_name<S: Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    let name = match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    };
    serializer.serialize_str(name)
}
