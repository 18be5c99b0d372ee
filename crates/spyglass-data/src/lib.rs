//! Data loading utilities for spyglass.

pub mod csv;
pub mod error;
pub mod levels;
pub mod source;

pub use self::csv::{load_table_from_path, load_table_from_reader, table_to_csv, CsvLoader};
pub use error::DataError;
pub use levels::parse_level_list;
pub use source::TableSource;
