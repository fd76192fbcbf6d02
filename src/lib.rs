//! tabio - tabular data import/export
//!
//! This library converts in-memory tables into spreadsheet (XLSX,
//! streaming-XLSX) and delimited-text (CSV, fixed-width TXT) files, and
//! parses such files (XLSX, legacy XLS, CSV) back into typed rows. The
//! binary spreadsheet codec is delegated to `rust_xlsxwriter` (write) and
//! `calamine` (read).
//!
//! # Example
//!
//! ```no_run
//! use tabio::exporter::{self, FileType};
//! use tabio::table::{Table, TableCell};
//!
//! let mut table = Table::new("report");
//! table.add_row(vec![TableCell::text("name"), TableCell::text("amount")]);
//! table.add_row(vec![TableCell::text("widget"), TableCell::number(12.5)]);
//!
//! let path = exporter::write_data_to_file(&[table], FileType::Csv, "report.csv", "UTF-8", ';')?;
//! println!("wrote {}", path.display());
//! # Ok::<(), tabio::TabioError>(())
//! ```

pub mod cli;
pub mod convert;
pub mod error;
pub mod exporter;
pub mod importer;
pub mod table;
pub mod txt;
pub mod util;

// Re-export commonly used types
pub use error::{TabioError, TabioResult};
pub use exporter::FileType;
pub use table::{CellStyle, CellValue, Table, TableCell, EMPTY_CELL};
