//! Reporting and aggregation functions.
//!
//! Every function borrows the transaction slice and never mutates it. Records
//! that miss a field an aggregation needs are logged and skipped; only bad
//! parameters fail a call.

pub mod cashback;
pub mod home;
pub mod overview;
pub mod period;
pub mod savings;
pub mod spending;

pub mod prelude {
    pub use super::cashback::{CashbackRanking, profitable_cashback_categories};
    pub use super::home::{HomePage, TopTransaction, events_page, greeting, home_page};
    pub use super::overview::{
        CardSummary, CategoryAmount, ExpenseSummary, IncomeSummary, OverviewSummary,
        card_summaries, expense_income_summary, top_transactions,
    };
    pub use super::period::{DateRange, DateWindow, filter_by_window};
    pub use super::savings::{ReportMonth, investment_bank};
    pub use super::spending::{
        CategorySpending, DayType, DayTypeSpending, WeekdaySpending, spending_by_category,
        spending_by_weekday, spending_by_workday,
    };
}
