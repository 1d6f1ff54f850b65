//! Storage module for CSV import/export

mod csv;

pub use csv::{MAX_CSV_FILE_BYTES, escape_csv_field, parse_csv, read_csv, serialize_csv, write_csv};
