use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::RecordError;
use crate::fields::{OperationDate, lenient_string, parse_decimal};

/// One bank transaction with the unified field names used by every loader.
///
/// Fields hold the source text untouched; typed access goes through
/// [`Transaction::date`], [`Transaction::amount`] and [`Transaction::cashback`],
/// which apply the coercion rules of [`crate::fields`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    #[serde(
        rename = "Дата_операции",
        alias = "Дата операции",
        alias = "date",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub operation_date: Option<String>,

    #[serde(
        rename = "Категория",
        alias = "category",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,

    #[serde(
        rename = "Описание",
        alias = "description",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    #[serde(
        rename = "Сумма_операции",
        alias = "Сумма платежа",
        alias = "Сумма",
        alias = "amount",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<String>,

    #[serde(
        rename = "Кешбэк",
        alias = "cashback",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub cashback: Option<String>,

    #[serde(
        rename = "Отправитель",
        alias = "sender",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub sender: Option<String>,

    #[serde(
        rename = "Получатель",
        alias = "recipient",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub recipient: Option<String>,

    #[serde(
        rename = "Статус",
        alias = "state",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub state: Option<String>,

    #[serde(
        rename = "Валюта",
        alias = "currency",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub currency: Option<String>,

    #[serde(
        rename = "Номер карты",
        alias = "card",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub card_number: Option<String>,
}

/// Fields an aggregation may require before it looks at a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    OperationDate,
    Category,
    Description,
    Amount,
    Cashback,
    Sender,
    Recipient,
}

impl Field {
    /// Source key of the field, as it appears in files and logs
    pub fn key(self) -> &'static str {
        match self {
            Field::OperationDate => "Дата_операции",
            Field::Category => "Категория",
            Field::Description => "Описание",
            Field::Amount => "Сумма_операции",
            Field::Cashback => "Кешбэк",
            Field::Sender => "Отправитель",
            Field::Recipient => "Получатель",
        }
    }
}

impl Transaction {
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::OperationDate => &self.operation_date,
            Field::Category => &self.category,
            Field::Description => &self.description,
            Field::Amount => &self.amount,
            Field::Cashback => &self.cashback,
            Field::Sender => &self.sender,
            Field::Recipient => &self.recipient,
        };
        value.as_deref()
    }

    /// Checks that every field in `required` is present.
    pub fn require(&self, required: &[Field]) -> Result<(), RecordError> {
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|field| self.get(**field).is_none())
            .map(|field| field.key())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(RecordError::MissingFields(missing))
        }
    }

    pub fn date(&self) -> Result<NaiveDate, RecordError> {
        let raw = self
            .operation_date
            .as_deref()
            .ok_or_else(|| RecordError::MissingFields(vec![Field::OperationDate.key()]))?;
        OperationDate::new(raw).parse()
    }

    pub fn amount(&self) -> Result<Decimal, RecordError> {
        let raw = self
            .amount
            .as_deref()
            .ok_or_else(|| RecordError::MissingFields(vec![Field::Amount.key()]))?;
        parse_decimal(Field::Amount.key(), raw)
    }

    /// Cashback earned on the transaction; absent or unreadable values count as zero.
    pub fn cashback(&self) -> Decimal {
        match self.cashback.as_deref() {
            None => Decimal::ZERO,
            Some(raw) => parse_decimal(Field::Cashback.key(), raw).unwrap_or_else(|e| {
                warn!(error = %e, "Invalid cashback, counting as zero");
                Decimal::ZERO
            }),
        }
    }
}

/// Validates `required` fields, logging a warning when the record must be skipped.
pub fn validate(transaction: &Transaction, required: &[Field]) -> bool {
    match transaction.require(required) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Skipping transaction");
            false
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[test]
    fn test_transaction_from_json_with_source_keys() {
        let json = r#"{
            "Дата_операции": "2023-05-01",
            "Категория": "Супермаркеты",
            "Кешбэк": 1.0,
            "Описание": "Покупка в магазине",
            "Сумма_операции": "123.45"
        }"#;

        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.operation_date.as_deref(), Some("2023-05-01"));
        assert_eq!(txn.category.as_deref(), Some("Супермаркеты"));
        assert_eq!(txn.cashback(), Decimal::from_str("1").unwrap());
        assert_eq!(txn.amount().unwrap(), Decimal::from_str("123.45").unwrap());
        assert!(txn.sender.is_none());
    }

    #[test]
    fn test_transaction_from_json_with_aliases() {
        let json = r#"{"date": "2024-03-11T02:26:18.671407", "state": "EXECUTED",
                       "Сумма платежа": -160.89, "description": "Visa 1234567812345678"}"#;

        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(
            txn.date().unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );
        assert_eq!(txn.state.as_deref(), Some("EXECUTED"));
        assert_eq!(txn.amount().unwrap(), Decimal::from_str("-160.89").unwrap());
    }

    #[rstest]
    #[case(r#"{"Категория": null}"#)]
    #[case(r#"{"Категория": ""}"#)]
    #[case(r#"{"Категория": "   "}"#)]
    #[case(r#"{}"#)]
    fn test_blank_values_are_absent(#[case] json: &str) {
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert!(txn.category.is_none());
    }

    #[test]
    fn test_require_reports_all_missing_fields() {
        let txn = Transaction {
            category: Some("Еда".into()),
            ..Default::default()
        };

        let err = txn
            .require(&[Field::OperationDate, Field::Category, Field::Amount])
            .unwrap_err();
        assert_eq!(
            err,
            RecordError::MissingFields(vec!["Дата_операции", "Сумма_операции"])
        );
        assert!(!validate(&txn, &[Field::OperationDate]));
        assert!(validate(&txn, &[Field::Category]));
    }

    #[rstest]
    #[case(None, "0")]
    #[case(Some("5.5"), "5.5")]
    #[case(Some("not a number"), "0")]
    fn test_cashback_defaults_to_zero(#[case] raw: Option<&str>, #[case] expected: &str) {
        let txn = Transaction {
            cashback: raw.map(str::to_string),
            ..Default::default()
        };
        assert_eq!(txn.cashback(), Decimal::from_str(expected).unwrap());
    }

    #[test]
    fn test_date_and_amount_errors() {
        let txn = Transaction {
            operation_date: Some("yesterday".into()),
            amount: Some("lots".into()),
            ..Default::default()
        };
        assert!(matches!(txn.date(), Err(RecordError::InvalidDate(_))));
        assert!(matches!(txn.amount(), Err(RecordError::InvalidAmount { .. })));

        let empty = Transaction::default();
        assert!(matches!(empty.date(), Err(RecordError::MissingFields(_))));
        assert!(matches!(empty.amount(), Err(RecordError::MissingFields(_))));
    }

    #[test]
    fn test_transaction_serialization_skips_absent_fields() {
        let txn = fixtures::txn("2023-05-01", "Такси", "250", "2.5");

        let json = serde_json::to_string(&txn).unwrap();
        assert!(json.contains("Дата_операции"));
        assert!(!json.contains("Отправитель"));

        let deserialized: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, txn);
    }
}
