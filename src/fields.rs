//! Coercion rules for the raw text fields of a [`Transaction`](crate::Transaction).

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};

use crate::errors::RecordError;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y"];

/// Operation date as it came from the source file.
///
/// Bank exports mix several layouts:
/// - `2023-05-15` (ISO date)
/// - `2024-03-11T02:26:18.671407` / `2023-05-15 10:00:00` (ISO datetime)
/// - `31.12.2021 16:44:00` / `31.12.2021` (bank spreadsheet export)
///
/// Only the calendar date matters for every report, the time part is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDate<'a>(&'a str);

impl<'a> OperationDate<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self(raw)
    }

    pub fn parse(&self) -> Result<NaiveDate, RecordError> {
        let s = self.0.trim();

        for format in DATETIME_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(datetime.date());
            }
        }
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                return Ok(date);
            }
        }

        Err(RecordError::InvalidDate(self.0.to_string()))
    }
}

impl<'a> From<&'a str> for OperationDate<'a> {
    fn from(value: &'a str) -> Self {
        Self(value)
    }
}

impl TryFrom<OperationDate<'_>> for NaiveDate {
    type Error = RecordError;

    fn try_from(date: OperationDate<'_>) -> Result<Self, Self::Error> {
        date.parse()
    }
}

/// Parses a monetary value the way bank exports write it.
///
/// Accepts `,` as decimal separator, spaces (including no-break spaces) as
/// thousands separators and scientific notation produced by spreadsheet tools.
pub fn parse_decimal(field: &'static str, raw: &str) -> Result<Decimal, RecordError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| RecordError::InvalidAmount {
            field,
            value: raw.to_string(),
        })
}

/// `total + amount`, or [`RecordError::Overflow`] when the sum leaves the
/// range of `Decimal`.
pub fn checked_sum(field: &'static str, total: Decimal, amount: Decimal) -> Result<Decimal, RecordError> {
    total.checked_add(amount).ok_or(RecordError::Overflow(field))
}

/// Deserializes any scalar into its textual form.
///
/// Loaders hand us strings (CSV), numbers (JSON, XLSX) or nulls; all of them
/// end up as `Option<String>`, with blanks mapped to `None`.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientVisitor)
}

struct LenientVisitor;

impl<'de> Visitor<'de> for LenientVisitor {
    type Value = Option<String>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, number, boolean or null")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(trimmed.to_string()))
        }
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        self.visit_str(&value)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        if value.is_nan() {
            // pandas exports empty cells as NaN
            return Ok(None);
        }
        Ok(Some(value.to_string()))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}
