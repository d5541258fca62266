use serde_json::{Map, Value};

use crate::types::Transaction;

/// Unified column names and the source headers that feed them.
pub const KNOWN_COLUMNS: &[(&str, &[&str])] = &[
    ("Дата_операции", &["Дата операции", "date"]),
    ("Категория", &["category"]),
    ("Описание", &["description"]),
    ("Сумма_операции", &["Сумма платежа", "Сумма", "amount"]),
    ("Кешбэк", &["cashback"]),
    ("Отправитель", &["sender"]),
    ("Получатель", &["recipient"]),
    ("Статус", &["state"]),
    ("Валюта", &["currency"]),
    ("Номер карты", &["card"]),
];

/// Unified name for `header`, or `None` for columns the loaders ignore.
pub fn canonical_column(header: &str) -> Option<&'static str> {
    let header = header.trim();
    KNOWN_COLUMNS
        .iter()
        .find(|(name, aliases)| *name == header || aliases.contains(&header))
        .map(|(name, _)| *name)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// One source row as header/value pairs, in column order.
#[derive(Debug, Default)]
pub struct RawRow {
    fields: Map<String, Value>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cell. Unknown headers are dropped; when several source columns
    /// map to one field the first non-blank value is kept.
    pub fn push(&mut self, header: &str, value: Value) {
        let Some(column) = canonical_column(header) else {
            return;
        };
        match self.fields.get(column) {
            Some(existing) if !is_blank(existing) => {}
            _ => {
                self.fields.insert(column.to_string(), value);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(is_blank)
    }

    pub fn into_transaction(self) -> Result<Transaction, String> {
        serde_json::from_value(Value::Object(self.fields))
            .map_err(|e| format!("Invalid transaction row: {}", e))
    }
}

impl<K: AsRef<str>> FromIterator<(K, Value)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (header, value) in iter {
            row.push(header.as_ref(), value);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("Дата операции", Some("Дата_операции"))]
    #[case("Дата_операции", Some("Дата_операции"))]
    #[case("Сумма платежа", Some("Сумма_операции"))]
    #[case("  Кешбэк ", Some("Кешбэк"))]
    #[case("Номер карты", Some("Номер карты"))]
    #[case("MCC", None)]
    #[case("Сумма операции с округлением", None)]
    fn test_canonical_column(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(canonical_column(header), expected);
    }

    #[test]
    fn test_first_non_blank_alias_wins() {
        let row: RawRow = [
            ("Сумма_операции", json!("")),
            ("Сумма платежа", json!("-160.89")),
            ("Сумма", json!("-999")),
        ]
        .into_iter()
        .collect();

        let txn = row.into_transaction().unwrap();
        assert_eq!(txn.amount.as_deref(), Some("-160.89"));
    }

    #[test]
    fn test_unknown_columns_are_ignored() {
        let row: RawRow = [("MCC", json!("5411")), ("Категория", json!("Супермаркеты"))]
            .into_iter()
            .collect();

        assert!(!row.is_empty());
        let txn = row.into_transaction().unwrap();
        assert_eq!(txn.category.as_deref(), Some("Супермаркеты"));
    }

    #[test]
    fn test_blank_row() {
        let row: RawRow = [("Категория", json!("  ")), ("Кешбэк", Value::Null)]
            .into_iter()
            .collect();
        assert!(row.is_empty());
    }

    #[test]
    fn test_numbers_become_text() {
        let row: RawRow = [("Сумма платежа", json!(-160.89)), ("Кешбэк", json!(3))]
            .into_iter()
            .collect();

        let txn = row.into_transaction().unwrap();
        assert_eq!(txn.amount.as_deref(), Some("-160.89"));
        assert_eq!(txn.cashback.as_deref(), Some("3"));
    }
}
