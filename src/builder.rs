use std::fs;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{errors::AnalyticsError, parsers::prelude::*, types::Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Json,
    Xlsx,
}

impl FileFormat {
    fn parse(&self, content: &[u8]) -> Result<Vec<Transaction>, AnalyticsError> {
        let parsed = match self {
            FileFormat::Csv => CsvParser::parse(content),
            FileFormat::Json => JsonParser::parse(content),
            FileFormat::Xlsx => XlsxParser::parse(content),
        };
        parsed.map_err(AnalyticsError::ParseFailed)
    }

    /// Content sniffing first, file extension second.
    fn detect(filename: Option<&str>, content: Option<&[u8]>) -> Result<Self, AnalyticsError> {
        if let Some(content) = content {
            if JsonParser::is_supported(None, content) {
                return Ok(FileFormat::Json);
            }
            if XlsxParser::is_supported(None, content) {
                return Ok(FileFormat::Xlsx);
            }
            if CsvParser::is_supported(None, content) {
                return Ok(FileFormat::Csv);
            }
        }

        if let Some(filename) = filename {
            let ext = filename.rsplit_once('.').map(|(_, ext)| ext.to_lowercase());
            match ext.as_deref() {
                Some("csv") => return Ok(FileFormat::Csv),
                Some("json") => return Ok(FileFormat::Json),
                Some("xlsx" | "xlsm") => return Ok(FileFormat::Xlsx),
                _ => {}
            }
        }

        Err(AnalyticsError::UnsupportedFormat)
    }
}

/// Loads transactions from CSV, JSON or XLSX sources.
///
/// ```rust,ignore
/// let transactions = TransactionLoader::new()
///     .filename("data/operations.xlsx")
///     .load()?;
/// ```
#[derive(Default)]
pub struct TransactionLoader {
    content: Option<Vec<u8>>,
    filepath: Option<String>,
    format: Option<FileFormat>,
}

impl TransactionLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = Some(content.as_bytes().to_vec());
        self
    }

    /// Raw source bytes, for binary formats such as XLSX.
    pub fn bytes(mut self, content: &[u8]) -> Self {
        self.content = Some(content.to_vec());
        self
    }

    pub fn filename(mut self, filename: &str) -> Self {
        self.filepath = Some(filename.to_string());
        self
    }

    pub fn format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn load(self) -> Result<Vec<Transaction>, AnalyticsError> {
        let content = match self.content {
            Some(content) => content,
            None => {
                let path = self
                    .filepath
                    .as_deref()
                    .ok_or(AnalyticsError::MissingContentAndFilepath)?;
                fs::read(path)?
            }
        };

        let format = match self.format {
            Some(format) => format,
            None => FileFormat::detect(self.filepath.as_deref(), Some(content.as_slice()))?,
        };
        debug!(?format, source = self.filepath.as_deref(), "Loading transactions");

        let transactions = format.parse(&content)?;
        info!(count = transactions.len(), ?format, "Transactions loaded");
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    const SAMPLE_CSV: &str = "\
Дата операции;Сумма платежа;Кешбэк;Категория;Описание
15.05.2023 12:00:00;-250,50;2;Такси;Яндекс Такси
";

    const SAMPLE_JSON: &str = r#"[{"date": "2023-05-15", "amount": -250.5, "category": "Такси"}]"#;

    #[test]
    fn test_builder_new() {
        let builder = TransactionLoader::new();
        assert!(builder.content.is_none());
        assert!(builder.filepath.is_none());
        assert!(builder.format.is_none());
    }

    #[test]
    fn test_builder_chaining() {
        let builder = TransactionLoader::new()
            .content("content")
            .filename("file.csv")
            .format(FileFormat::Csv);

        assert_eq!(builder.content.as_deref(), Some(b"content".as_slice()));
        assert_eq!(builder.filepath.as_deref(), Some("file.csv"));
        assert_eq!(builder.format, Some(FileFormat::Csv));
    }

    #[test]
    fn test_load_without_content_or_path() {
        let result = TransactionLoader::new().format(FileFormat::Csv).load();
        assert!(matches!(result, Err(AnalyticsError::MissingContentAndFilepath)));
    }

    #[rstest]
    #[case(None, Some(SAMPLE_JSON), Ok(FileFormat::Json))]
    #[case(None, Some(SAMPLE_CSV), Ok(FileFormat::Csv))]
    #[case(Some("data.json"), Some(SAMPLE_CSV), Ok(FileFormat::Csv))]
    #[case(Some("operations.XLSX"), None, Ok(FileFormat::Xlsx))]
    #[case(Some("operations.csv"), Some("random"), Ok(FileFormat::Csv))]
    #[case(Some("notes.txt"), Some("random"), Err(()))]
    #[case(None, None, Err(()))]
    fn test_file_format_detect(
        #[case] filename: Option<&str>,
        #[case] content: Option<&str>,
        #[case] expected: Result<FileFormat, ()>,
    ) {
        let result = FileFormat::detect(filename, content.map(str::as_bytes));
        match expected {
            Ok(format) => assert_eq!(result.unwrap(), format),
            Err(()) => assert!(matches!(result, Err(AnalyticsError::UnsupportedFormat))),
        }
    }

    #[rstest]
    #[case(Some(FileFormat::Csv), SAMPLE_CSV)]
    #[case(None, SAMPLE_CSV)]
    #[case(None, SAMPLE_JSON)]
    fn test_load_from_content(#[case] format: Option<FileFormat>, #[case] content: &str) {
        let mut builder = TransactionLoader::new().content(content);
        if let Some(format) = format {
            builder = builder.format(format);
        }

        let result = builder.load();
        assert!(result.is_ok());

        let transactions = result.unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].category.as_deref(), Some("Такси"));
        assert_eq!(
            transactions[0].amount().unwrap(),
            rust_decimal::Decimal::new(-2505, 1)
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", SAMPLE_CSV).unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let transactions = TransactionLoader::new().filename(&path).load().unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].cashback.as_deref(), Some("2"));
    }

    #[test]
    fn test_load_xlsx_bytes_detected_by_signature() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Категория").unwrap();
        worksheet.write_string(0, 1, "Кешбэк").unwrap();
        worksheet.write_string(1, 0, "Такси").unwrap();
        worksheet.write_number(1, 1, 2.5).unwrap();
        let content = workbook.save_to_buffer().unwrap();

        let transactions = TransactionLoader::new().bytes(&content).load().unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].cashback.as_deref(), Some("2.5"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = TransactionLoader::new()
            .filename("/definitely/not/here.csv")
            .load();
        assert!(matches!(result, Err(AnalyticsError::ReadContentFailed(_))));
    }

    #[test]
    fn test_load_invalid_content_with_explicit_format() {
        let result = TransactionLoader::new()
            .content("not json")
            .format(FileFormat::Json)
            .load();
        assert!(matches!(result, Err(AnalyticsError::ParseFailed(_))));
    }

    #[test]
    fn test_load_unsupported_content() {
        let result = TransactionLoader::new().content("random content").load();
        assert!(matches!(result, Err(AnalyticsError::UnsupportedFormat)));
    }

    #[test]
    fn test_file_format_serialization() {
        let json = serde_json::to_string(&FileFormat::Xlsx).unwrap();
        assert_eq!(json, "\"xlsx\"");

        let deserialized: FileFormat = serde_json::from_str("\"csv\"").unwrap();
        assert_eq!(deserialized, FileFormat::Csv);
    }
}
