use std::cmp::Ordering;

use crate::types::Transaction;

/// Operation state kept by [`filter_by_state`] when the caller has no preference
pub const DEFAULT_STATE: &str = "EXECUTED";

pub fn filter_by_state<'a>(transactions: &'a [Transaction], state: &str) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|txn| txn.state.as_deref() == Some(state))
        .collect()
}

/// Transactions in `currency` (code compared case-insensitively).
pub fn filter_by_currency<'a>(
    transactions: &'a [Transaction],
    currency: &'a str,
) -> impl Iterator<Item = &'a Transaction> {
    transactions.iter().filter(move |txn| {
        txn.currency
            .as_deref()
            .is_some_and(|code| code.eq_ignore_ascii_case(currency))
    })
}

pub fn transaction_descriptions(transactions: &[Transaction]) -> impl Iterator<Item = &str> {
    transactions.iter().filter_map(|txn| txn.description.as_deref())
}

/// Sorts by operation date, newest first when `descending`.
///
/// Records with a missing or unreadable date end up last either way.
pub fn sort_by_date(transactions: &[Transaction], descending: bool) -> Vec<&Transaction> {
    let mut dated: Vec<_> = transactions.iter().map(|txn| (txn.date().ok(), txn)).collect();

    dated.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(a),
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    dated.into_iter().map(|(_, txn)| txn).collect()
}
