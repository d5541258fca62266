use chrono::Datelike;
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, warn};

use crate::fields::checked_sum;
use crate::types::{Field, Transaction, validate};

/// Category → cashback totals, best category first.
///
/// Serializes as a JSON object that keeps the ranking order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CashbackRanking(Vec<(String, Decimal)>);

impl CashbackRanking {
    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, total)| *total)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(name, total)| (name.as_str(), *total))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<(String, Decimal)> {
        self.0
    }
}

impl Serialize for CashbackRanking {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, total) in &self.0 {
            map.serialize_entry(category, total)?;
        }
        map.end()
    }
}

/// Ranks categories by the cashback they earned in `year`-`month`.
///
/// Only records whose date parses and falls in exactly that month count.
/// Ties keep the order in which the categories were first met.
pub fn profitable_cashback_categories(
    transactions: &[Transaction],
    year: i32,
    month: u32,
) -> CashbackRanking {
    let mut totals: Vec<(String, Decimal)> = Vec::new();

    for txn in transactions {
        if !validate(txn, &[Field::OperationDate, Field::Category]) {
            continue;
        }

        let date = match txn.date() {
            Ok(date) => date,
            Err(e) => {
                warn!(error = %e, "Invalid transaction data");
                continue;
            }
        };
        if date.year() != year || date.month() != month {
            continue;
        }

        let Some(category) = txn.category.as_deref() else {
            continue;
        };
        let cashback = txn.cashback();
        match totals.iter_mut().find(|(name, _)| name == category) {
            Some((_, total)) => match checked_sum(Field::Cashback.key(), *total, cashback) {
                Ok(sum) => *total = sum,
                Err(e) => warn!(error = %e, category, "Skipping cashback"),
            },
            None => totals.push((category.to_string(), cashback)),
        }
    }

    // stable: equal totals stay in encounter order
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    let ranking = totals
        .into_iter()
        .map(|(category, total)| (category, total.round_dp(2)))
        .collect::<Vec<_>>();

    debug!(year, month, categories = ranking.len(), "Cashback ranking computed");
    CashbackRanking(ranking)
}
