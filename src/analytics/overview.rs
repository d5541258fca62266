//! Expense/income breakdown, largest payments and per-card totals for a window.
//!
//! Sign convention: positive amounts are expenses, negative amounts are income.

use std::cmp::Reverse;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use super::period::{DateWindow, filter_by_window};
use crate::errors::RecordError;
use crate::fields::checked_sum;
use crate::types::{Field, Transaction};

pub const CASH_CATEGORY: &str = "Наличные";
pub const TRANSFERS_CATEGORY: &str = "Переводы";
pub const OTHER_CATEGORY: &str = "Остальное";

/// How many expense categories are listed before the rest is folded together
pub const MAIN_CATEGORIES: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseSummary {
    pub total_amount: Decimal,
    pub main: Vec<CategoryAmount>,
    pub transfers_and_cash: Vec<CategoryAmount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeSummary {
    pub total_amount: Decimal,
    pub main: Vec<CategoryAmount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewSummary {
    pub expenses: ExpenseSummary,
    pub income: IncomeSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSummary {
    pub last_digits: String,
    pub total_spent: Decimal,
    pub cashback: Decimal,
}

/// Adds `amount` to `key`, keeping first-seen order.
fn accumulate(
    groups: &mut Vec<(String, Decimal)>,
    key: &str,
    amount: Decimal,
) -> Result<(), RecordError> {
    match groups.iter_mut().find(|(name, _)| name == key) {
        Some((_, total)) => *total = checked_sum(Field::Amount.key(), *total, amount)?,
        None => groups.push((key.to_string(), amount)),
    }
    Ok(())
}

fn into_amounts(groups: Vec<(String, Decimal)>) -> Vec<CategoryAmount> {
    groups
        .into_iter()
        .map(|(category, amount)| CategoryAmount {
            category,
            amount: amount.round_dp(0),
        })
        .collect()
}

fn sort_descending(groups: &mut [(String, Decimal)]) {
    groups.sort_by(|a, b| b.1.cmp(&a.1));
}

/// Checks both sums before touching either, so a rejected record leaves the
/// total and the breakdown consistent.
fn add_expense(
    total: &mut Decimal,
    main: &mut Vec<(String, Decimal)>,
    transfers_and_cash: &mut Vec<(String, Decimal)>,
    category: Option<&str>,
    amount: Decimal,
) -> Result<(), RecordError> {
    let new_total = checked_sum(Field::Amount.key(), *total, amount)?;
    match category {
        Some(c @ (CASH_CATEGORY | TRANSFERS_CATEGORY)) => accumulate(transfers_and_cash, c, amount)?,
        Some(c) => accumulate(main, c, amount)?,
        None => warn!("Expense without category left out of the breakdown"),
    }
    *total = new_total;
    Ok(())
}

fn add_income(
    total: &mut Decimal,
    income: &mut Vec<(String, Decimal)>,
    category: Option<&str>,
    amount: Decimal,
) -> Result<(), RecordError> {
    let new_total = checked_sum(Field::Amount.key(), *total, amount)?;
    match category {
        Some(c) => accumulate(income, c, amount)?,
        None => warn!("Income without category left out of the breakdown"),
    }
    *total = new_total;
    Ok(())
}

/// Expenses and income of `window`, grouped by category.
pub fn expense_income_summary(transactions: &[Transaction], window: DateWindow) -> OverviewSummary {
    let mut expenses_total = Decimal::ZERO;
    let mut income_total = Decimal::ZERO;
    let mut main: Vec<(String, Decimal)> = Vec::new();
    let mut transfers_and_cash: Vec<(String, Decimal)> = Vec::new();
    let mut income: Vec<(String, Decimal)> = Vec::new();

    for txn in filter_by_window(transactions, window) {
        let amount = match txn.amount() {
            Ok(amount) => amount,
            Err(e) => {
                warn!(error = %e, "Skipping transaction in overview");
                continue;
            }
        };
        let category = txn.category.as_deref();

        let added = if amount > Decimal::ZERO {
            add_expense(&mut expenses_total, &mut main, &mut transfers_and_cash, category, amount)
        } else if amount < Decimal::ZERO {
            add_income(&mut income_total, &mut income, category, amount.abs())
        } else {
            Ok(())
        };
        if let Err(e) = added {
            warn!(error = %e, "Skipping transaction in overview");
        }
    }

    sort_descending(&mut main);
    if main.len() > MAIN_CATEGORIES {
        let rest = main
            .split_off(MAIN_CATEGORIES)
            .iter()
            .fold(Decimal::ZERO, |acc, (_, v)| acc.saturating_add(*v));
        main.push((OTHER_CATEGORY.to_string(), rest));
    }
    sort_descending(&mut income);

    OverviewSummary {
        expenses: ExpenseSummary {
            total_amount: expenses_total.round_dp(0),
            main: into_amounts(main),
            transfers_and_cash: into_amounts(transfers_and_cash),
        },
        income: IncomeSummary {
            total_amount: income_total.round_dp(0),
            main: into_amounts(income),
        },
    }
}

/// The `n` largest transactions of `window`, largest first.
pub fn top_transactions(
    transactions: &[Transaction],
    window: DateWindow,
    n: usize,
) -> Vec<&Transaction> {
    let mut valued: Vec<(&Transaction, Decimal)> = filter_by_window(transactions, window)
        .into_iter()
        .filter_map(|txn| txn.amount().ok().map(|amount| (txn, amount)))
        .collect();

    valued.sort_by_key(|(_, amount)| Reverse(*amount));
    valued.into_iter().take(n).map(|(txn, _)| txn).collect()
}

/// Spending per card in `window`; cashback is one percent of the total.
pub fn card_summaries(transactions: &[Transaction], window: DateWindow) -> Vec<CardSummary> {
    let mut cards: Vec<(String, Decimal)> = Vec::new();

    for txn in filter_by_window(transactions, window) {
        let Some(card) = txn.card_number.as_deref() else {
            continue;
        };
        if let Err(e) = txn.amount().and_then(|amount| accumulate(&mut cards, card, amount)) {
            warn!(error = %e, card, "Skipping card transaction");
        }
    }

    cards
        .into_iter()
        .map(|(card, total)| {
            let digits: Vec<char> = card.chars().filter(char::is_ascii_digit).collect();
            let last_digits: String = digits[digits.len().saturating_sub(4)..].iter().collect();
            CardSummary {
                last_digits,
                total_spent: total.round_dp(2),
                cashback: (total / Decimal::ONE_HUNDRED).round_dp(2),
            }
        })
        .collect()
}
