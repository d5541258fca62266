use serde_json::Value;
use tracing::{debug, warn};

use crate::parsers::row::RawRow;
use crate::parsers::traits::{Parser, decode_text, has_extension};
use crate::types::Transaction;

/// A JSON array of transaction objects.
pub struct JsonParser;

impl Parser for JsonParser {
    fn is_supported(filename: Option<&str>, content: &[u8]) -> bool {
        let looks_like_json = decode_text(content)
            .map(|text| text.trim_start().starts_with('['))
            .unwrap_or(false);

        match filename {
            Some(_) => has_extension(filename, &["json"]) || looks_like_json,
            None => looks_like_json,
        }
    }

    fn parse(content: &[u8]) -> Result<Vec<Transaction>, String> {
        let text = decode_text(content)?;
        let items: Vec<Value> =
            serde_json::from_str(text).map_err(|e| format!("JSON parse error: {}", e))?;

        let mut transactions = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let Value::Object(object) = item else {
                warn!(index, "Skipping non-object JSON entry");
                continue;
            };
            let row: RawRow = object.into_iter().collect();
            if row.is_empty() {
                continue;
            }
            transactions.push(row.into_transaction()?);
        }

        debug!(count = transactions.len(), "JSON transactions loaded");
        Ok(transactions)
    }
}
