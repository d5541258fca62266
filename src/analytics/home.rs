//! Time-of-day greeting and the month-to-date home page.

use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::Serialize;

use super::overview::{
    CardSummary, OverviewSummary, card_summaries, expense_income_summary, top_transactions,
};
use super::period::DateRange;
use crate::types::Transaction;

pub const MORNING: &str = "Доброе утро";
pub const AFTERNOON: &str = "Добрый день";
pub const EVENING: &str = "Добрый вечер";
pub const NIGHT: &str = "Доброй ночи";

/// How many of the largest transactions the home page lists
pub const HOME_TOP_TRANSACTIONS: usize = 5;

/// Greeting for the hour of `now`: morning from 5, afternoon from 12,
/// evening from 17, night from 23.
pub fn greeting(now: NaiveDateTime) -> &'static str {
    match now.hour() {
        5..=11 => MORNING,
        12..=16 => AFTERNOON,
        17..=22 => EVENING,
        _ => NIGHT,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopTransaction {
    /// `dd.mm.yyyy`
    pub date: String,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
}

impl TopTransaction {
    fn from_transaction(txn: &Transaction) -> Option<Self> {
        Some(Self {
            date: txn.date().ok()?.format("%d.%m.%Y").to_string(),
            amount: txn.amount().ok()?,
            category: txn.category.clone().unwrap_or_default(),
            description: txn.description.clone().unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomePage {
    pub greeting: &'static str,
    pub cards: Vec<CardSummary>,
    pub top_transactions: Vec<TopTransaction>,
}

/// Greeting, per-card totals and the largest transactions from the first of
/// `now`'s month up to `now`'s day.
pub fn home_page(transactions: &[Transaction], now: NaiveDateTime) -> HomePage {
    let window = DateRange::Month.window(now.date());

    HomePage {
        greeting: greeting(now),
        cards: card_summaries(transactions, window),
        top_transactions: top_transactions(transactions, window, HOME_TOP_TRANSACTIONS)
            .into_iter()
            .filter_map(TopTransaction::from_transaction)
            .collect(),
    }
}

/// Expense/income breakdown for `range` ending on `now`'s day.
pub fn events_page(
    transactions: &[Transaction],
    now: NaiveDateTime,
    range: DateRange,
) -> OverviewSummary {
    expense_income_summary(transactions, range.window(now.date()))
}
