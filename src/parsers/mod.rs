//! Source format readers producing unified [`Transaction`](crate::Transaction) records.

pub mod csv;
pub mod json;
pub mod row;
pub mod traits;
pub mod xlsx;

pub mod prelude {
    pub use super::csv::prelude::*;
    pub use super::json::prelude::*;
    pub use super::row::{KNOWN_COLUMNS, RawRow, canonical_column};
    pub use super::traits::Parser;
    pub use super::xlsx::prelude::*;
}
