use std::fmt::{Debug, Display};

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{Level, enabled, error, info};

use super::wrapper::{ReportFn, report_name};
use crate::analytics::prelude::*;
use crate::search::CategoryCounts;

/// How a call's return value reads in the log.
///
/// `Err` carries the failure message; everything else is a success.
pub trait CallOutcome {
    fn outcome(&self) -> Result<String, String>;
}

impl<T: Debug, E: Display> CallOutcome for Result<T, E> {
    fn outcome(&self) -> Result<String, String> {
        match self {
            Ok(value) => Ok(format!("{value:?}")),
            Err(e) => Err(e.to_string()),
        }
    }
}

impl<T: Debug> CallOutcome for Vec<T> {
    fn outcome(&self) -> Result<String, String> {
        Ok(format!("{self:?}"))
    }
}

impl<T: Debug> CallOutcome for Option<T> {
    fn outcome(&self) -> Result<String, String> {
        Ok(format!("{self:?}"))
    }
}

macro_rules! debug_outcome {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CallOutcome for $ty {
                fn outcome(&self) -> Result<String, String> {
                    Ok(format!("{self:?}"))
                }
            }
        )*
    };
}

debug_outcome!(
    (),
    bool,
    u32,
    u64,
    usize,
    String,
    &'static str,
    Decimal,
    Value,
    CashbackRanking,
    CategoryCounts,
    CategorySpending,
    HomePage,
    OverviewSummary,
);

/// A function whose every call is logged with its outcome.
///
/// Successes log the result at `info`; failures log the error and the inputs
/// at `error`. The return value is handed back unchanged either way.
///
/// ```rust,ignore
/// use bank_analytics_rs::{Logged, investment_bank};
///
/// let logged = Logged::new(investment_bank);
/// let saved = logged.call(("2023-05", transactions.as_slice(), 50))?;
/// ```
pub struct Logged<F> {
    func: F,
    name: String,
}

impl<F> Logged<F> {
    /// Wraps `func`, logging under its function name.
    pub fn new(func: F) -> Self {
        Self {
            func,
            name: report_name::<F>(),
        }
    }

    /// Overrides the name the calls are logged under.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn function_name(&self) -> &str {
        &self.name
    }

    pub fn call<Args>(&self, args: Args) -> F::Output
    where
        F: ReportFn<Args>,
        F::Output: CallOutcome,
        Args: Debug,
    {
        // args move into the call, so inputs are rendered up front
        let inputs = enabled!(Level::ERROR).then(|| format!("{args:?}"));
        let output = self.func.invoke(args);

        match output.outcome() {
            Ok(result) => info!(function = %self.name, %result, "Call succeeded"),
            Err(e) => error!(
                function = %self.name,
                error = %e,
                inputs = %inputs.as_deref().unwrap_or_default(),
                "Call failed"
            ),
        }
        output
    }
}
