use csv::{ReaderBuilder, Trim};
use serde_json::Value;
use tracing::debug;

use crate::parsers::row::{RawRow, canonical_column};
use crate::parsers::traits::{Parser, decode_text, has_extension};
use crate::types::Transaction;

pub struct CsvParser;

/// `;` when the header line has more semicolons than commas, `,` otherwise.
pub fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > commas { b';' } else { b',' }
}

fn header_has_known_column(content: &str) -> bool {
    let delimiter = char::from(detect_delimiter(content));
    content
        .lines()
        .next()
        .is_some_and(|header| {
            header
                .split(delimiter)
                .any(|column| canonical_column(column.trim_matches('"')).is_some())
        })
}

impl Parser for CsvParser {
    fn is_supported(filename: Option<&str>, content: &[u8]) -> bool {
        let Ok(text) = decode_text(content) else {
            return false;
        };
        if text.trim_start().starts_with('[') {
            return false;
        }

        match filename {
            Some(_) => has_extension(filename, &["csv"]) && header_has_known_column(text),
            None => header_has_known_column(text),
        }
    }

    fn parse(content: &[u8]) -> Result<Vec<Transaction>, String> {
        let text = decode_text(content)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(detect_delimiter(text))
            .trim(Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| format!("CSV header error: {}", e))?
            .clone();

        let mut transactions = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| format!("CSV read error: {}", e))?;
            let row: RawRow = headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| (header, Value::String(value.to_string())))
                .collect();
            if row.is_empty() {
                continue;
            }
            transactions.push(row.into_transaction()?);
        }

        debug!(count = transactions.len(), "CSV transactions loaded");
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SAMPLE_CSV: &str = "\
Дата операции,Номер карты,Статус,Сумма платежа,Валюта,Кешбэк,Категория,Описание
31.12.2021 16:44:00,*7197,OK,-160.89,RUB,,Супермаркеты,Колхоз
31.12.2021 16:42:04,*7197,OK,-64.00,RUB,1,Супермаркеты,Колхоз
";

    const SEMICOLON_CSV: &str = "\
id;state;date;amount;currency_name;currency_code;from;to;description
650703;EXECUTED;2023-09-05T11:30:32Z;16210;Sol;PEN;Счет 58803664561298323391;Счет 39745660563456619397;Перевод организации
";

    #[rstest]
    #[case(Some("operations.csv"), SAMPLE_CSV, true)]
    #[case(Some("OPERATIONS.CSV"), SAMPLE_CSV, true)]
    #[case(None, SAMPLE_CSV, true)]
    #[case(None, SEMICOLON_CSV, true)]
    #[case(Some("operations.json"), SAMPLE_CSV, false)]
    #[case(None, "invalid content", false)]
    #[case(Some("operations.csv"), "", false)]
    #[case(Some("operations.csv"), "a,b,c\n1,2,3", false)]
    #[case(None, "[{\"date\": \"2023-01-01\"}]", false)]
    fn test_is_supported(
        #[case] filename: Option<&str>,
        #[case] content: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(CsvParser::is_supported(filename, content.as_bytes()), expected);
    }

    #[rstest]
    #[case("a,b,c", b',')]
    #[case("a;b;c", b';')]
    #[case("a;b,c;d", b';')]
    #[case("", b',')]
    fn test_detect_delimiter(#[case] content: &str, #[case] expected: u8) {
        assert_eq!(detect_delimiter(content), expected);
    }

    #[test]
    fn test_parse_comma_csv() {
        let result = CsvParser::parse(SAMPLE_CSV.as_bytes());
        assert!(result.is_ok());

        let txns = result.unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].operation_date.as_deref(), Some("31.12.2021 16:44:00"));
        assert_eq!(txns[0].amount.as_deref(), Some("-160.89"));
        assert_eq!(txns[0].cashback, None);
        assert_eq!(txns[0].card_number.as_deref(), Some("*7197"));
        assert_eq!(txns[1].cashback.as_deref(), Some("1"));
        assert_eq!(txns[1].description.as_deref(), Some("Колхоз"));
    }

    #[test]
    fn test_parse_semicolon_csv() {
        let txns = CsvParser::parse(SEMICOLON_CSV.as_bytes()).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].state.as_deref(), Some("EXECUTED"));
        assert_eq!(txns[0].amount.as_deref(), Some("16210"));
        assert_eq!(txns[0].description.as_deref(), Some("Перевод организации"));
    }

    #[test]
    fn test_parse_keeps_leading_zeros_and_skips_blank_rows() {
        let content = "Номер карты,Сумма\n0012,100\n,\n";
        let txns = CsvParser::parse(content.as_bytes()).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].card_number.as_deref(), Some("0012"));
    }

    #[test]
    fn test_parse_with_bom() {
        let content = format!("\u{feff}{}", SAMPLE_CSV);
        let txns = CsvParser::parse(content.as_bytes()).unwrap();
        assert_eq!(txns.len(), 2);
        assert!(txns[0].operation_date.is_some());
    }

    #[test]
    fn test_parse_invalid_utf8() {
        let result = CsvParser::parse(&[0xff, 0xfe, 0x00]);
        assert!(result.is_err());
    }
}
