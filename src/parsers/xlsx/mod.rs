mod parser;

pub mod prelude {
    pub use super::parser::{XlsxParser, excel_serial_to_text};
}
