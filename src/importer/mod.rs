//! Import side: the [`Parser`] contract for reading tabular files back into
//! typed rows, with spreadsheet and delimited-text backends.

mod csv;
mod spreadsheet;

pub use csv::CsvParser;
pub use spreadsheet::{SheetInfo, SpreadsheetParser};

use crate::error::TabioResult;
use crate::exporter::FileType;
use crate::util::is_blank;

/// One typed row object per logical data row.
pub trait FromTableRow: Sized {
    fn from_row(row: &[String]) -> TabioResult<Self>;

    /// Group-aware variant for row types with grouped validation rules.
    /// The default ignores the group.
    fn from_row_in_group(row: &[String], _group: &str) -> TabioResult<Self> {
        Self::from_row(row)
    }
}

/// Raw access: the row as-is.
impl FromTableRow for Vec<String> {
    fn from_row(row: &[String]) -> TabioResult<Self> {
        Ok(row.to_vec())
    }
}

/// Contract for reading a tabular file into typed rows.
///
/// A parser is bound to one sheet at a time. Backends without sheets (CSV)
/// expose the whole file as a single implicit sheet and treat the sheet
/// controls as no-ops. A parser owns its open file handle; it is released
/// when the parser is dropped, whether or not `parse` succeeded. Instances
/// are not safe for concurrent use.
pub trait Parser<T: FromTableRow> {
    /// Produce the ordered typed rows, applying the configured header-skip
    /// count and, when enabled, trimming trailing blank lines.
    fn parse(&mut self) -> TabioResult<Vec<T>>;

    /// Raw pre-conversion rows: no header skip, no blank-line trimming.
    fn lines(&mut self) -> TabioResult<Vec<Vec<String>>>;

    fn file_type(&self) -> FileType;

    fn number_of_sheets(&self) -> usize;
    fn sheet_number(&self) -> usize;
    fn set_sheet_number(&mut self, sheet: usize);
    fn set_last_sheet(&mut self);
    fn set_first_visible_sheet(&mut self);
    fn set_sheet_number_as_first_not_hidden(&mut self);

    fn header_rows(&self) -> usize;
    fn set_header_rows(&mut self, rows: usize);
    fn ignore_blank_lines_at_end(&self) -> bool;
    fn set_ignore_blank_lines_at_end(&mut self, ignore: bool);

    /// Optional validation-group hint; row types may ignore it.
    fn set_group(&mut self, group: &str);
}

/// Shared conversion pipeline: trim trailing blank rows, skip headers, then
/// convert each remaining row.
pub(crate) fn rows_to_typed<T: FromTableRow>(
    mut lines: Vec<Vec<String>>,
    header_rows: usize,
    trim_trailing_blank: bool,
    group: Option<&str>,
) -> TabioResult<Vec<T>> {
    if trim_trailing_blank {
        while lines
            .last()
            .map_or(false, |row| row.iter().all(|s| is_blank(s)))
        {
            lines.pop();
        }
    }
    lines
        .into_iter()
        .skip(header_rows)
        .map(|row| match group {
            Some(g) => T::from_row_in_group(&row, g),
            None => T::from_row(&row),
        })
        .collect()
}
