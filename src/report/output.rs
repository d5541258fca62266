use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::analytics::prelude::*;
use crate::search::CategoryCounts;

/// The part of a report function's return value that becomes the artifact.
///
/// `None` means there is nothing to persist (e.g. the report failed).
pub trait ReportOutput {
    fn artifact(&self) -> Option<serde_json::Result<Value>>;
}

fn to_artifact<T: Serialize + ?Sized>(value: &T) -> Option<serde_json::Result<Value>> {
    Some(serde_json::to_value(value))
}

/// Only successful results are persisted; errors reach the caller untouched.
impl<T: ReportOutput, E> ReportOutput for Result<T, E> {
    fn artifact(&self) -> Option<serde_json::Result<Value>> {
        self.as_ref().ok().and_then(ReportOutput::artifact)
    }
}

/// Tabular reports become an array of row objects.
impl<T: Serialize> ReportOutput for Vec<T> {
    fn artifact(&self) -> Option<serde_json::Result<Value>> {
        to_artifact(self)
    }
}

macro_rules! serialized_output {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ReportOutput for $ty {
                fn artifact(&self) -> Option<serde_json::Result<Value>> {
                    to_artifact(self)
                }
            }
        )*
    };
}

serialized_output!(
    Decimal,
    Value,
    CashbackRanking,
    CategoryCounts,
    CategorySpending,
    HomePage,
    OverviewSummary,
);
