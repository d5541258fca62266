use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::errors::{AnalyticsError, AnalyticsResult, RecordError};
use crate::fields::checked_sum;
use crate::types::{Field, Transaction, validate};

/// A calendar month written as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMonth {
    pub year: i32,
    pub month: u32,
}

impl ReportMonth {
    pub fn new(year: i32, month: u32) -> AnalyticsResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(AnalyticsError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    pub fn contains<D: Datelike>(&self, date: &D) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl FromStr for ReportMonth {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnalyticsError::InvalidMonthFormat(s.to_string());

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month)
    }
}

impl fmt::Display for ReportMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Money that would be set aside in `month` by rounding every payment up to
/// the next multiple of `limit`.
///
/// An amount already on a multiple still rounds up to the following one.
pub fn investment_bank(
    month: &str,
    transactions: &[Transaction],
    limit: i64,
) -> AnalyticsResult<Decimal> {
    let period: ReportMonth = month.parse().inspect_err(|e| {
        error!(error = %e, "Invalid input parameters");
    })?;
    if limit <= 0 {
        let e = AnalyticsError::NonPositiveLimit(limit);
        error!(error = %e, "Invalid input parameters");
        return Err(e);
    }

    let step = Decimal::from(limit);
    let mut total = Decimal::ZERO;

    for txn in transactions {
        if !validate(txn, &[Field::OperationDate, Field::Amount]) {
            continue;
        }

        let amount = match txn.date().and_then(|date| {
            if period.contains(&date) {
                txn.amount().map(Some)
            } else {
                Ok(None)
            }
        }) {
            Ok(Some(amount)) => amount,
            Ok(None) => continue,
            Err(e) => {
                warn!(error = %e, "Invalid transaction amount");
                continue;
            }
        };

        let saved = round_up_saving(amount, step)
            .and_then(|saving| checked_sum(Field::Amount.key(), total, saving));
        match saved {
            Ok(sum) => total = sum,
            Err(e) => warn!(error = %e, "Skipping transaction in savings"),
        }
    }

    Ok(total.round_dp(2))
}

fn round_up_saving(amount: Decimal, step: Decimal) -> Result<Decimal, RecordError> {
    amount
        .checked_div(step)
        .and_then(|steps| steps.floor().checked_add(Decimal::ONE))
        .and_then(|steps| steps.checked_mul(step))
        .and_then(|rounded| rounded.checked_sub(amount))
        .ok_or(RecordError::Overflow(Field::Amount.key()))
}
