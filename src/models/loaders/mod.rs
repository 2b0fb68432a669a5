pub mod csv_loader;

pub use csv_loader::{csv_excerpt, load_params_csv, parse_params_csv, CsvLoad, LoadedRow, CSV_HEADER};
