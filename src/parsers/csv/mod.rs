mod parser;

pub mod prelude {
    pub use super::parser::{CsvParser, detect_delimiter};
}
