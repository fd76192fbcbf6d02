//! XLSX encoding: one worksheet per table, merged ranges for spans, typed
//! cells, and a constant-memory streaming mode.

use crate::error::TabioResult;
use crate::table::{CellStyle, CellValue, GridSlot, Table, TableCell};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet};
use std::io::Write;
use tracing::debug;

/// Serialize tables into a workbook and write it to the stream.
///
/// In streaming mode worksheets are constant-memory: rows are flushed to a
/// temp file as they are written, so memory stays bounded regardless of the
/// row count. Constant-memory worksheets cannot hold merged ranges, so the
/// streaming path writes the expanded string matrix instead of typed cells.
pub(crate) fn write_workbook<W: Write>(
    tables: &[Table],
    mut out: W,
    streaming: bool,
) -> TabioResult<()> {
    let mut workbook = Workbook::new();
    for (idx, table) in tables.iter().enumerate() {
        let worksheet = if streaming {
            workbook.add_worksheet_with_constant_memory()
        } else {
            workbook.add_worksheet()
        };
        let name = sheet_name(table, idx);
        worksheet.set_name(&name)?;
        debug!(sheet = %name, rows = table.row_count(), streaming, "writing sheet");
        if streaming {
            write_sheet_streaming(worksheet, table)?;
        } else {
            write_sheet(worksheet, table)?;
        }
    }
    let buf = workbook.save_to_buffer()?;
    out.write_all(&buf)?;
    out.flush()?;
    Ok(())
}

/// Worksheet names must be non-empty and at most 31 characters.
fn sheet_name(table: &Table, idx: usize) -> String {
    let name = table.name().trim();
    if name.is_empty() {
        format!("Sheet{}", idx + 1)
    } else {
        name.chars().take(31).collect()
    }
}

fn write_sheet(worksheet: &mut Worksheet, table: &Table) -> TabioResult<()> {
    let grid = table.grid()?;
    for (r, row) in grid.iter().enumerate() {
        for (c, slot) in row.iter().enumerate() {
            let cell = match slot {
                GridSlot::Anchor(cell) => cell,
                GridSlot::Covered => continue,
            };
            let colspan = cell.colspan();
            let rowspan = cell.rowspan();
            if colspan > 1 || rowspan > 1 {
                worksheet.merge_range(
                    r as u32,
                    c as u16,
                    r as u32 + rowspan - 1,
                    c as u16 + colspan as u16 - 1,
                    &cell.display_string(),
                    &style_format(cell.style()),
                )?;
            } else {
                write_value(worksheet, r as u32, c as u16, cell)?;
            }
        }
    }
    Ok(())
}

fn write_sheet_streaming(worksheet: &mut Worksheet, table: &Table) -> TabioResult<()> {
    let matrix = table.to_string_matrix()?;
    for (r, row) in matrix.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(r as u32, c as u16, value.as_str())?;
            }
        }
    }
    Ok(())
}

fn write_value(worksheet: &mut Worksheet, row: u32, col: u16, cell: &TableCell) -> TabioResult<()> {
    let format = style_format(cell.style());
    match cell.content() {
        CellValue::Blank => {}
        CellValue::Text(s) => {
            worksheet.write_string_with_format(row, col, s.as_str(), &format)?;
        }
        CellValue::Number(n) => {
            worksheet.write_number_with_format(row, col, *n, &format)?;
        }
        CellValue::Boolean(b) => {
            worksheet.write_boolean_with_format(row, col, *b, &format)?;
        }
        CellValue::Date(d) => {
            let format = format.set_num_format("yyyy-mm-dd");
            worksheet.write_datetime_with_format(row, col, d, &format)?;
        }
        CellValue::DateTime(dt) => {
            let format = format.set_num_format("yyyy-mm-dd hh:mm:ss");
            worksheet.write_datetime_with_format(row, col, dt, &format)?;
        }
    }
    Ok(())
}

fn style_format(style: CellStyle) -> Format {
    match style {
        CellStyle::Header => Format::new()
            .set_bold()
            .set_background_color(Color::RGB(0xD9D9D9))
            .set_border(FormatBorder::Thin),
        CellStyle::Body => Format::new(),
        CellStyle::Footer => Format::new().set_bold(),
    }
}
