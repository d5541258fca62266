use crate::types::Transaction;

/// A source format that can be turned into unified [`Transaction`] records.
pub trait Parser {
    fn parse(content: &[u8]) -> Result<Vec<Transaction>, String>;

    fn is_supported(filename: Option<&str>, content: &[u8]) -> bool;
}

pub(crate) fn has_extension(filename: Option<&str>, extensions: &[&str]) -> bool {
    filename
        .and_then(|name| name.rsplit_once('.'))
        .is_some_and(|(_, ext)| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// UTF-8 text of `content` without a leading byte order mark.
pub(crate) fn decode_text(content: &[u8]) -> Result<&str, String> {
    let text = std::str::from_utf8(content).map_err(|e| format!("Content is not UTF-8: {}", e))?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}
