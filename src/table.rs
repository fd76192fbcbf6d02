//! Table model: an ordered grid of styled cells with colspan/rowspan,
//! expandable into a rectangular string matrix for text encodings.

use crate::error::{TabioError, TabioResult};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

/// The shared blank placeholder. Mutating it always fails; use a fresh
/// [`TableCell`] when you need a customized cell.
pub const EMPTY_CELL: TableCell = TableCell::Empty;

const BLANK: CellValue = CellValue::Blank;

/// Visual style of a cell, mapped to a workbook format by the XLSX writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStyle {
    Header,
    #[default]
    Body,
    Footer,
}

/// Typed cell content.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Blank,
    Text(String),
    Number(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Blank => "Blank",
            CellValue::Text(_) => "Text",
            CellValue::Number(_) => "Number",
            CellValue::Boolean(_) => "Boolean",
            CellValue::Date(_) => "Date",
            CellValue::DateTime(_) => "DateTime",
        }
    }

    /// Render the value for text encodings (CSV/TXT).
    pub fn display_string(&self) -> String {
        match self {
            CellValue::Blank => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Boolean(b) => b.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Integral values print without a decimal point.
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// A cell in a [`Table`]: content, spans, and style.
///
/// `Empty` is the canonical blank position. It is deliberately a distinct
/// variant so the shared [`EMPTY_CELL`] sentinel cannot be customized: every
/// setter fails with [`TabioError::UnsupportedMutation`] on it.
#[derive(Debug, Clone, PartialEq)]
pub enum TableCell {
    Empty,
    Cell {
        content: CellValue,
        colspan: u32,
        rowspan: u32,
        style: CellStyle,
    },
}

impl TableCell {
    pub fn new(content: CellValue) -> Self {
        TableCell::Cell {
            content,
            colspan: 1,
            rowspan: 1,
            style: CellStyle::default(),
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::new(CellValue::Text(s.into()))
    }

    pub fn number(n: f64) -> Self {
        Self::new(CellValue::Number(n))
    }

    pub fn boolean(b: bool) -> Self {
        Self::new(CellValue::Boolean(b))
    }

    pub fn date(d: NaiveDate) -> Self {
        Self::new(CellValue::Date(d))
    }

    pub fn date_time(dt: NaiveDateTime) -> Self {
        Self::new(CellValue::DateTime(dt))
    }

    pub fn styled(content: CellValue, style: CellStyle) -> Self {
        TableCell::Cell {
            content,
            colspan: 1,
            rowspan: 1,
            style,
        }
    }

    /// Cell spanning `colspan` columns and `rowspan` rows. Spans below 1 are
    /// rejected when the table is expanded into a matrix.
    pub fn spanned(content: CellValue, colspan: u32, rowspan: u32) -> Self {
        TableCell::Cell {
            content,
            colspan,
            rowspan,
            style: CellStyle::default(),
        }
    }

    pub fn content(&self) -> &CellValue {
        match self {
            TableCell::Empty => &BLANK,
            TableCell::Cell { content, .. } => content,
        }
    }

    pub fn colspan(&self) -> u32 {
        match self {
            TableCell::Empty => 1,
            TableCell::Cell { colspan, .. } => *colspan,
        }
    }

    pub fn rowspan(&self) -> u32 {
        match self {
            TableCell::Empty => 1,
            TableCell::Cell { rowspan, .. } => *rowspan,
        }
    }

    pub fn style(&self) -> CellStyle {
        match self {
            TableCell::Empty => CellStyle::Body,
            TableCell::Cell { style, .. } => *style,
        }
    }

    pub fn display_string(&self) -> String {
        self.content().display_string()
    }

    pub fn set_content(&mut self, value: CellValue) -> TabioResult<()> {
        match self {
            TableCell::Empty => Err(TabioError::UnsupportedMutation("set_content")),
            TableCell::Cell { content, .. } => {
                *content = value;
                Ok(())
            }
        }
    }

    pub fn set_colspan(&mut self, span: u32) -> TabioResult<()> {
        match self {
            TableCell::Empty => Err(TabioError::UnsupportedMutation("set_colspan")),
            TableCell::Cell { colspan, .. } => {
                if span < 1 {
                    return Err(TabioError::Validation("colspan must be at least 1".into()));
                }
                *colspan = span;
                Ok(())
            }
        }
    }

    pub fn set_rowspan(&mut self, span: u32) -> TabioResult<()> {
        match self {
            TableCell::Empty => Err(TabioError::UnsupportedMutation("set_rowspan")),
            TableCell::Cell { rowspan, .. } => {
                if span < 1 {
                    return Err(TabioError::Validation("rowspan must be at least 1".into()));
                }
                *rowspan = span;
                Ok(())
            }
        }
    }

    pub fn set_style(&mut self, new_style: CellStyle) -> TabioResult<()> {
        match self {
            TableCell::Empty => Err(TabioError::UnsupportedMutation("set_style")),
            TableCell::Cell { style, .. } => {
                *style = new_style;
                Ok(())
            }
        }
    }
}

/// Position in the expanded grid: either the anchor of a source cell or a
/// blank position covered by a span from an earlier cell or row.
#[derive(Debug, Clone, Copy)]
pub(crate) enum GridSlot<'a> {
    Anchor(&'a TableCell),
    Covered,
}

/// An ordered grid of cells to be exported. Rows and cells are appended in
/// order; span expansion happens at encoding time.
#[derive(Debug, Clone, Default)]
pub struct Table {
    name: String,
    rows: Vec<Vec<TableCell>>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start a new (initially empty) row.
    pub fn new_row(&mut self) {
        self.rows.push(Vec::new());
    }

    /// Append a cell to the current row, opening one if none exists.
    pub fn add(&mut self, cell: TableCell) {
        if self.rows.is_empty() {
            self.rows.push(Vec::new());
        }
        self.rows.last_mut().unwrap().push(cell);
    }

    pub fn add_row(&mut self, cells: Vec<TableCell>) {
        self.rows.push(cells);
    }

    pub fn rows(&self) -> &[Vec<TableCell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Expand spans into a rectangular grid of slots.
    ///
    /// A colspan-N cell anchors at its position and covers the N-1 positions
    /// to its right; a rowspan-M cell additionally reserves its columns in
    /// the M-1 rows below. Malformed spans (span < 1, overlap with a reserved
    /// column, rowspan running past the last row) and ragged rows fail with a
    /// validation error.
    pub(crate) fn grid(&self) -> TabioResult<Vec<Vec<GridSlot<'_>>>> {
        let mut matrix: Vec<Vec<GridSlot>> = Vec::with_capacity(self.rows.len());
        let mut width: Option<usize> = None;
        // col index -> rows still covered below the anchor
        let mut reserved: HashMap<usize, u32> = HashMap::new();

        for (row_idx, row) in self.rows.iter().enumerate() {
            let mut out: Vec<GridSlot> = Vec::new();
            let mut col = 0usize;
            let mut pending: Vec<(usize, u32)> = Vec::new();

            for cell in row {
                while reserved.get(&col).copied().unwrap_or(0) > 0 {
                    out.push(GridSlot::Covered);
                    col += 1;
                }

                let colspan = cell.colspan() as usize;
                let rowspan = cell.rowspan();
                if colspan < 1 || rowspan < 1 {
                    return Err(TabioError::Validation(format!(
                        "invalid span at row {}, column {}: colspan and rowspan must be at least 1",
                        row_idx, col
                    )));
                }
                for c in col..col + colspan {
                    if reserved.get(&c).copied().unwrap_or(0) > 0 {
                        return Err(TabioError::Validation(format!(
                            "cell at row {}, column {} overlaps a rowspan from a previous row",
                            row_idx, c
                        )));
                    }
                }

                out.push(GridSlot::Anchor(cell));
                for _ in 1..colspan {
                    out.push(GridSlot::Covered);
                }
                if rowspan > 1 {
                    for c in col..col + colspan {
                        pending.push((c, rowspan - 1));
                    }
                }
                col += colspan;
            }

            while reserved.get(&col).copied().unwrap_or(0) > 0 {
                out.push(GridSlot::Covered);
                col += 1;
            }

            for v in reserved.values_mut() {
                *v -= 1;
            }
            reserved.retain(|_, v| *v > 0);
            for (c, n) in pending {
                reserved.insert(c, n);
            }

            match width {
                None => width = Some(out.len()),
                Some(w) if w != out.len() => {
                    return Err(TabioError::Validation(format!(
                        "row {} expands to {} columns, expected {}",
                        row_idx,
                        out.len(),
                        w
                    )));
                }
                Some(_) => {}
            }
            matrix.push(out);
        }

        if !reserved.is_empty() {
            return Err(TabioError::Validation(
                "rowspan extends past the last row of the table".into(),
            ));
        }

        Ok(matrix)
    }

    /// Expand the table into a rectangular string matrix. Anchors render
    /// their display string; positions covered by a span render blank.
    pub fn to_string_matrix(&self) -> TabioResult<Vec<Vec<String>>> {
        let grid = self.grid()?;
        Ok(grid
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|slot| match slot {
                        GridSlot::Anchor(cell) => cell.display_string(),
                        GridSlot::Covered => String::new(),
                    })
                    .collect()
            })
            .collect())
    }
}
