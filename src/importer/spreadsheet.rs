//! Spreadsheet-backed parser. Reads XLSX and legacy XLS workbooks through
//! calamine; a parser instance is bound to one sheet at a time.

use super::{rows_to_typed, FromTableRow, Parser};
use crate::error::{TabioError, TabioResult};
use crate::exporter::FileType;
use crate::table::format_number;
use calamine::{open_workbook_auto, Data, Reader, Sheets, SheetVisible};
use std::fs::File;
use std::io::BufReader;
use std::marker::PhantomData;
use std::path::Path;
use tracing::debug;

/// Name and visibility of one sheet in a workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInfo {
    pub name: String,
    pub visible: bool,
}

pub struct SpreadsheetParser<T> {
    workbook: Sheets<BufReader<File>>,
    file_type: FileType,
    sheet: usize,
    header_rows: usize,
    ignore_blank_lines_at_end: bool,
    group: Option<String>,
    _marker: PhantomData<T>,
}

impl<T: FromTableRow> SpreadsheetParser<T> {
    /// Open a workbook. The format (XLSX or XLS) is detected from the file
    /// itself; the parser holds the handle until dropped.
    pub fn open(path: impl AsRef<Path>) -> TabioResult<Self> {
        let path = path.as_ref();
        let file_type = FileType::from_path(path).unwrap_or(FileType::Xlsx);
        let workbook = open_workbook_auto(path)?;
        debug!(path = %path.display(), "opened workbook");
        Ok(Self {
            workbook,
            file_type,
            sheet: 0,
            header_rows: 0,
            ignore_blank_lines_at_end: false,
            group: None,
            _marker: PhantomData,
        })
    }

    /// Sheet names with their visibility, in workbook order.
    pub fn sheet_info(&self) -> Vec<SheetInfo> {
        self.workbook
            .sheets_metadata()
            .iter()
            .map(|s| SheetInfo {
                name: s.name.clone(),
                visible: s.visible == SheetVisible::Visible,
            })
            .collect()
    }

    fn active_sheet_name(&self) -> TabioResult<String> {
        self.workbook
            .sheet_names()
            .get(self.sheet)
            .cloned()
            .ok_or_else(|| {
                TabioError::Validation(format!(
                    "sheet index {} out of range ({} sheets)",
                    self.sheet,
                    self.workbook.sheet_names().len()
                ))
            })
    }

    fn raw_lines(&mut self) -> TabioResult<Vec<Vec<String>>> {
        let name = self.active_sheet_name()?;
        let range = self.workbook.worksheet_range(&name)?;
        Ok(range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect())
    }
}

/// Render one workbook cell as its display string. Date cells format as ISO
/// dates; whole numbers drop the decimal point.
fn cell_to_string(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) if d.time() == chrono::NaiveTime::MIN => d.format("%Y-%m-%d").to_string(),
            Some(d) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format_number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{e:?}"),
    }
}

impl<T: FromTableRow> Parser<T> for SpreadsheetParser<T> {
    fn parse(&mut self) -> TabioResult<Vec<T>> {
        let lines = self.raw_lines()?;
        rows_to_typed(
            lines,
            self.header_rows,
            self.ignore_blank_lines_at_end,
            self.group.as_deref(),
        )
    }

    fn lines(&mut self) -> TabioResult<Vec<Vec<String>>> {
        self.raw_lines()
    }

    fn file_type(&self) -> FileType {
        self.file_type
    }

    fn number_of_sheets(&self) -> usize {
        self.workbook.sheet_names().len()
    }

    fn sheet_number(&self) -> usize {
        self.sheet
    }

    fn set_sheet_number(&mut self, sheet: usize) {
        self.sheet = sheet;
    }

    fn set_last_sheet(&mut self) {
        self.sheet = self.number_of_sheets().saturating_sub(1);
    }

    fn set_first_visible_sheet(&mut self) {
        self.sheet = self
            .workbook
            .sheets_metadata()
            .iter()
            .position(|s| s.visible == SheetVisible::Visible)
            .unwrap_or(0);
    }

    fn set_sheet_number_as_first_not_hidden(&mut self) {
        self.sheet = self
            .workbook
            .sheets_metadata()
            .iter()
            .position(|s| s.visible != SheetVisible::Hidden)
            .unwrap_or(0);
    }

    fn header_rows(&self) -> usize {
        self.header_rows
    }

    fn set_header_rows(&mut self, rows: usize) {
        self.header_rows = rows;
    }

    fn ignore_blank_lines_at_end(&self) -> bool {
        self.ignore_blank_lines_at_end
    }

    fn set_ignore_blank_lines_at_end(&mut self, ignore: bool) {
        self.ignore_blank_lines_at_end = ignore;
    }

    fn set_group(&mut self, group: &str) {
        self.group = Some(group.to_string());
    }
}
