use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::errors::AnalyticsResult;
use crate::types::Transaction;

/// Russian mobile numbers: `+7 921 123-45-67`, `+79161234567`, ...
pub const DEFAULT_PHONE_PATTERN: &str = r"\+7\s?\d{3}\s?\d{3}[- ]?\d{2}[- ]?\d{2}";

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_PHONE_PATTERN).expect("default phone pattern compiles"));

static PERSON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[А-ЯЁ][а-яё]+\s[А-ЯЁ]\.$").expect("person pattern compiles"));

/// Which side of a transfer to match a name against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferRole {
    Sender,
    #[default]
    Recipient,
}

/// Transfers where `name` is the sender or recipient, compared case-insensitively.
pub fn find_person_transfers<'a>(
    transactions: &'a [Transaction],
    name: &str,
    role: TransferRole,
) -> Vec<&'a Transaction> {
    let wanted = name.to_lowercase();
    transactions
        .iter()
        .filter(|txn| {
            let party = match role {
                TransferRole::Sender => txn.sender.as_deref(),
                TransferRole::Recipient => txn.recipient.as_deref(),
            };
            party.is_some_and(|party| party.to_lowercase() == wanted)
        })
        .collect()
}

/// Transactions whose description contains a phone number.
///
/// `pattern` overrides [`DEFAULT_PHONE_PATTERN`].
pub fn find_phone_transactions<'a>(
    transactions: &'a [Transaction],
    pattern: Option<&str>,
) -> AnalyticsResult<Vec<&'a Transaction>> {
    let custom;
    let re = match pattern {
        Some(pattern) => {
            custom = Regex::new(pattern)?;
            &custom
        }
        None => &*PHONE_RE,
    };

    Ok(matching_description(transactions, re))
}

/// Case-insensitive search in descriptions.
///
/// `query` is tried as a regular expression first; if it does not compile it
/// is matched as plain text.
pub fn search_transactions_by_description<'a>(
    transactions: &'a [Transaction],
    query: &str,
) -> Vec<&'a Transaction> {
    let re = RegexBuilder::new(query)
        .case_insensitive(true)
        .build()
        .or_else(|e| {
            debug!(error = %e, query, "Query is not a regex, matching literally");
            RegexBuilder::new(&regex::escape(query))
                .case_insensitive(true)
                .build()
        });

    match re {
        Ok(re) => matching_description(transactions, &re),
        // an escaped literal only fails on the size limit
        Err(_) => {
            let needle = query.to_lowercase();
            transactions
                .iter()
                .filter(|txn| {
                    txn.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
                })
                .collect()
        }
    }
}

fn matching_description<'a>(transactions: &'a [Transaction], re: &Regex) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|txn| txn.description.as_deref().is_some_and(|d| re.is_match(d)))
        .collect()
}

/// Occurrences of each allow-listed category, in allow-list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts(Vec<(String, usize)>);

impl CategoryCounts {
    pub fn get(&self, category: &str) -> Option<usize> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CategoryCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, count) in &self.0 {
            map.serialize_entry(category, count)?;
        }
        map.end()
    }
}

/// Counts transactions per category, for categories in `categories` only.
///
/// Categories that never occur are left out.
pub fn count_transactions_by_category<S: AsRef<str>>(
    transactions: &[Transaction],
    categories: &[S],
) -> CategoryCounts {
    let counts = categories
        .iter()
        .filter_map(|category| {
            let wanted: &str = category.as_ref();
            let count = transactions
                .iter()
                .filter(|txn| txn.category.as_deref() == Some(wanted))
                .count();
            (count > 0).then(|| (wanted.to_string(), count))
        })
        .fold(Vec::<(String, usize)>::new(), |mut acc, (name, count)| {
            // repeated allow-list entries count once
            if !acc.iter().any(|(seen, _)| *seen == name) {
                acc.push((name, count));
            }
            acc
        });

    CategoryCounts(counts)
}

/// Whether `text` looks like a person in `Фамилия И.` form.
pub fn is_person_name(text: &str) -> bool {
    PERSON_RE.is_match(text.trim())
}

/// Transfers to individuals: recipient written as a person name.
pub fn find_transfers_to_individuals(transactions: &[Transaction]) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|txn| txn.recipient.as_deref().is_some_and(is_person_name))
        .collect()
}
