//! Export dispatch: one encoder per [`FileType`], plus the fixed-width
//! text writer and single-table convenience wrappers.

mod csv;
mod xlsx;

pub(crate) use self::csv::decode_text;

use crate::error::{TabioError, TabioResult};
use crate::table::Table;
use crate::txt::FileTxt;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Default charset for text encodings.
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Default field separator for CSV output.
pub const DEFAULT_SEPARATOR: char = ';';

/// Supported output/input encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Xlsx,
    /// Streaming XLSX: rows are flushed to disk as they are written instead
    /// of being held in memory.
    Sxlsx,
    Xls,
    Csv,
    Txt,
}

impl FileType {
    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Xlsx | FileType::Sxlsx => "xlsx",
            FileType::Xls => "xls",
            FileType::Csv => "csv",
            FileType::Txt => "txt",
        }
    }

    /// Infer the type from a path extension. Streaming XLSX shares the
    /// `.xlsx` extension and is never inferred.
    pub fn from_path(path: &Path) -> Option<FileType> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("xlsx") | Some("xlsm") => Some(FileType::Xlsx),
            Some("xls") => Some(FileType::Xls),
            Some("csv") => Some(FileType::Csv),
            Some("txt") => Some(FileType::Txt),
            _ => None,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::Xlsx => "XLSX",
            FileType::Sxlsx => "SXLSX",
            FileType::Xls => "XLS",
            FileType::Csv => "CSV",
            FileType::Txt => "TXT",
        };
        f.write_str(name)
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(FileType::Xlsx),
            "sxlsx" => Ok(FileType::Sxlsx),
            "xls" => Ok(FileType::Xls),
            "csv" => Ok(FileType::Csv),
            "txt" => Ok(FileType::Txt),
            other => Err(format!("unknown file type: {other}")),
        }
    }
}

/// Write tables to a stream in the requested encoding.
///
/// Exactly one encoder runs per [`FileType`]. Spreadsheet encodings write
/// each table as a separate sheet; CSV/TXT encode the first table's string
/// matrix and require a non-empty table list. XLS has no writer in the Rust
/// ecosystem and fails with a not-implemented error naming the type (XLS
/// remains readable on the import side).
pub fn write_data<W: Write>(
    tables: &[Table],
    file_type: FileType,
    out: W,
    charset: &str,
    separator: char,
) -> TabioResult<()> {
    debug!(%file_type, tables = tables.len(), "writing tabular data");
    let mut out = BufWriter::new(out);
    match file_type {
        FileType::Xlsx => xlsx::write_workbook(tables, &mut out, false)?,
        FileType::Sxlsx => xlsx::write_workbook(tables, &mut out, true)?,
        FileType::Csv | FileType::Txt => {
            let first = tables
                .first()
                .ok_or_else(|| TabioError::Validation("no tables to export".into()))?;
            csv::write_matrix(&first.to_string_matrix()?, &mut out, charset, separator)?;
        }
        FileType::Xls => return Err(TabioError::NotImplemented(FileType::Xls)),
    }
    out.flush()?;
    Ok(())
}

/// Write tables to a file, resolving the target path first.
///
/// An absolute `filename` is used as-is. A relative one is created under a
/// freshly generated temporary directory, with parent directories created as
/// needed. Returns the resolved path.
pub fn write_data_to_file(
    tables: &[Table],
    file_type: FileType,
    filename: &str,
    charset: &str,
    separator: char,
) -> TabioResult<PathBuf> {
    let path = resolve_output_path(filename)?;
    debug!(path = %path.display(), "resolved output path");
    let file = File::create(&path)?;
    write_data(tables, file_type, file, charset, separator)?;
    Ok(path)
}

fn resolve_output_path(filename: &str) -> TabioResult<PathBuf> {
    let original = Path::new(filename);
    if original.is_absolute() {
        return Ok(original.to_path_buf());
    }
    let dir = tempfile::Builder::new().prefix("tabio-").tempdir()?.into_path();
    let path = dir.join(filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(path)
}

/// Write a [`FileTxt`] as delimited text: each field's value followed by its
/// own separator, the last field of a row only when the trailing-separator
/// policy asks for it, every line terminated with CRLF.
pub fn write_file_txt<W: Write>(file: &FileTxt, charset: &str, mut out: W) -> TabioResult<()> {
    let mut text = String::new();
    for row in file.rows() {
        let last = row.len().saturating_sub(1);
        for (i, field) in row.iter().enumerate() {
            text.push_str(field.value());
            if i < last || file.ends_with_separator() {
                text.push(field.separator().as_char());
            }
        }
        text.push_str("\r\n");
    }
    out.write_all(&csv::encode_text(charset, &text)?)?;
    out.flush()?;
    Ok(())
}

/// Export a single table as CSV to a resolved file path.
pub fn csv_file(
    table: &Table,
    filename: &str,
    charset: &str,
    separator: char,
) -> TabioResult<PathBuf> {
    write_data_to_file(
        std::slice::from_ref(table),
        FileType::Csv,
        filename,
        charset,
        separator,
    )
}

/// Export tables as XLSX to a resolved file path.
pub fn xlsx_file(tables: &[Table], filename: &str) -> TabioResult<PathBuf> {
    write_data_to_file(
        tables,
        FileType::Xlsx,
        filename,
        DEFAULT_CHARSET,
        DEFAULT_SEPARATOR,
    )
}

/// Export tables as streaming XLSX to a resolved file path.
pub fn sxlsx_file(tables: &[Table], filename: &str) -> TabioResult<PathBuf> {
    write_data_to_file(
        tables,
        FileType::Sxlsx,
        filename,
        DEFAULT_CHARSET,
        DEFAULT_SEPARATOR,
    )
}

/// Export a single table as CSV to a stream with the default separator.
pub fn write_csv_to_output<W: Write>(table: &Table, charset: &str, out: W) -> TabioResult<()> {
    write_data(
        std::slice::from_ref(table),
        FileType::Csv,
        out,
        charset,
        DEFAULT_SEPARATOR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableCell;
    use crate::txt::{FieldTxt, SeparatorType};
    use pretty_assertions::assert_eq;

    fn two_by_two() -> Table {
        let mut table = Table::new("data");
        table.add_row(vec![TableCell::text("a"), TableCell::text("b")]);
        table.add_row(vec![TableCell::text("c"), TableCell::text("d")]);
        table
    }

    #[test]
    fn test_write_data_csv() {
        let mut out = Vec::new();
        write_data(&[two_by_two()], FileType::Csv, &mut out, "UTF-8", ';').unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a;b\r\nc;d\r\n");
    }

    #[test]
    fn test_write_data_csv_empty_tables_fails() {
        let mut out = Vec::new();
        let err = write_data(&[], FileType::Csv, &mut out, "UTF-8", ';').unwrap_err();
        assert!(matches!(err, TabioError::Validation(_)));
        assert!(out.is_empty(), "nothing may be written before validation");
    }

    #[test]
    fn test_write_data_xls_not_implemented() {
        let mut out = Vec::new();
        let err = write_data(&[two_by_two()], FileType::Xls, &mut out, "UTF-8", ';').unwrap_err();
        assert!(matches!(err, TabioError::NotImplemented(FileType::Xls)));
        assert!(err.to_string().contains("XLS"));
    }

    #[test]
    fn test_write_data_to_file_relative_uses_temp_dir() {
        let path = write_data_to_file(&[two_by_two()], FileType::Csv, "out.csv", "UTF-8", ';')
            .unwrap();
        assert!(path.is_absolute());
        assert!(path.exists());
        assert!(path.parent().unwrap().exists());
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "a;b\r\nc;d\r\n");
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_write_data_to_file_relative_with_subdir() {
        let path = write_data_to_file(
            &[two_by_two()],
            FileType::Csv,
            "nested/dir/out.csv",
            "UTF-8",
            ';',
        )
        .unwrap();
        assert!(path.exists());
        let _ = fs::remove_dir_all(path.ancestors().nth(3).unwrap());
    }

    #[test]
    fn test_write_data_to_file_absolute() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("abs.csv");
        let path = write_data_to_file(
            &[two_by_two()],
            FileType::Csv,
            target.to_str().unwrap(),
            "UTF-8",
            ';',
        )
        .unwrap();
        assert_eq!(path, target);
        assert!(target.exists());
    }

    #[test]
    fn test_write_file_txt_no_trailing_separator() {
        let mut file = FileTxt::new();
        file.add_row(vec![FieldTxt::new("a"), FieldTxt::new("b")]);
        let mut out = Vec::new();
        write_file_txt(&file, "UTF-8", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a;b\r\n");
    }

    #[test]
    fn test_write_file_txt_single_field_row() {
        // boundary case: one field, no trailing-separator policy
        let mut file = FileTxt::new();
        file.add_row(vec![FieldTxt::new("only")]);
        let mut out = Vec::new();
        write_file_txt(&file, "UTF-8", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "only\r\n");
    }

    #[test]
    fn test_write_file_txt_ends_with_separator() {
        let mut file = FileTxt::new();
        file.set_ends_with_separator(true);
        file.add_row(vec![FieldTxt::new("a"), FieldTxt::new("b")]);
        let mut out = Vec::new();
        write_file_txt(&file, "UTF-8", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a;b;\r\n");
    }

    #[test]
    fn test_write_file_txt_mixed_separators() {
        let mut file = FileTxt::new();
        file.add_row(vec![
            FieldTxt::with_separator("a", SeparatorType::Pipe),
            FieldTxt::with_separator("b", SeparatorType::Comma),
            FieldTxt::new("c"),
        ]);
        let mut out = Vec::new();
        write_file_txt(&file, "UTF-8", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a|b,c\r\n");
    }

    #[test]
    fn test_csv_file_convenience() {
        let path = csv_file(&two_by_two(), "conv.csv", "UTF-8", ',').unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "a,b\r\nc,d\r\n");
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_write_csv_to_output_defaults() {
        let mut out = Vec::new();
        write_csv_to_output(&two_by_two(), "UTF-8", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a;b\r\nc;d\r\n");
    }

    #[test]
    fn test_file_type_display_and_parse() {
        assert_eq!(FileType::Sxlsx.to_string(), "SXLSX");
        assert_eq!("csv".parse::<FileType>().unwrap(), FileType::Csv);
        assert!("pdf".parse::<FileType>().is_err());
    }

    #[test]
    fn test_file_type_from_path() {
        assert_eq!(
            FileType::from_path(Path::new("a/b.XLSX")),
            Some(FileType::Xlsx)
        );
        assert_eq!(FileType::from_path(Path::new("b.xls")), Some(FileType::Xls));
        assert_eq!(FileType::from_path(Path::new("b.csv")), Some(FileType::Csv));
        assert_eq!(FileType::from_path(Path::new("b.dat")), None);
    }
}
