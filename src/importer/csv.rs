//! Delimited-text-backed parser. The whole file is one implicit sheet, so
//! the sheet controls of the [`Parser`] contract are no-ops here.

use super::{rows_to_typed, FromTableRow, Parser};
use crate::error::TabioResult;
use crate::exporter::{FileType, DEFAULT_CHARSET, DEFAULT_SEPARATOR};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::marker::PhantomData;
use std::path::Path;

pub struct CsvParser<T> {
    file: File,
    file_type: FileType,
    separator: char,
    charset: String,
    header_rows: usize,
    ignore_blank_lines_at_end: bool,
    group: Option<String>,
    _marker: PhantomData<T>,
}

impl<T: FromTableRow> CsvParser<T> {
    /// Open a delimited text file with the default separator and charset.
    /// The parser holds the handle until dropped.
    pub fn open(path: impl AsRef<Path>) -> TabioResult<Self> {
        let path = path.as_ref();
        let file_type = match FileType::from_path(path) {
            Some(FileType::Txt) => FileType::Txt,
            _ => FileType::Csv,
        };
        let file = File::open(path)?;
        Ok(Self {
            file,
            file_type,
            separator: DEFAULT_SEPARATOR,
            charset: DEFAULT_CHARSET.to_string(),
            header_rows: 0,
            ignore_blank_lines_at_end: false,
            group: None,
            _marker: PhantomData,
        })
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    fn raw_lines(&mut self) -> TabioResult<Vec<Vec<String>>> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut bytes = Vec::new();
        self.file.read_to_end(&mut bytes)?;
        let text = crate::exporter::decode_text(&self.charset, &bytes)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.separator as u8)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let mut lines = Vec::new();
        for record in reader.records() {
            let record = record?;
            lines.push(record.iter().map(str::to_string).collect());
        }
        Ok(lines)
    }
}

impl<T: FromTableRow> Parser<T> for CsvParser<T> {
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
        1
    }

    fn sheet_number(&self) -> usize {
        0
    }

    // a delimited file is a single implicit sheet; selection is a no-op
    fn set_sheet_number(&mut self, _sheet: usize) {}
    fn set_last_sheet(&mut self) {}
    fn set_first_visible_sheet(&mut self) {}
    fn set_sheet_number_as_first_not_hidden(&mut self) {}

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{CellConverter, IntegerConverter};
    use crate::error::TabioError;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[derive(Debug, PartialEq)]
    struct Person {
        name: String,
        age: i64,
    }

    impl FromTableRow for Person {
        fn from_row(row: &[String]) -> TabioResult<Self> {
            let name = row
                .first()
                .cloned()
                .ok_or_else(|| TabioError::Parse("missing name column".into()))?;
            let age = IntegerConverter
                .from_text(row.get(1).map(String::as_str).unwrap_or(""))?
                .ok_or_else(|| TabioError::Parse("missing age".into()))?;
            Ok(Person { name, age })
        }
    }

    fn write_temp(content: &[u8], ext: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(format!("data.{ext}"));
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_lines_roundtrip() {
        let (_dir, path) = write_temp(b"a;b\r\nc;d\r\n", "csv");
        let mut parser = CsvParser::<Vec<String>>::open(&path).unwrap();
        let lines = parser.lines().unwrap();
        assert_eq!(lines, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_parse_typed_rows_with_header() {
        let (_dir, path) = write_temp(b"name;age\r\nalice;30\r\nbob;41\r\n", "csv");
        let mut parser = CsvParser::<Person>::open(&path).unwrap();
        parser.set_header_rows(1);
        let people = parser.parse().unwrap();
        assert_eq!(
            people,
            vec![
                Person {
                    name: "alice".into(),
                    age: 30
                },
                Person {
                    name: "bob".into(),
                    age: 41
                },
            ]
        );
    }

    #[test]
    fn test_parse_malformed_cell_is_error() {
        let (_dir, path) = write_temp(b"alice;notanumber\r\n", "csv");
        let mut parser = CsvParser::<Person>::open(&path).unwrap();
        assert!(matches!(parser.parse(), Err(TabioError::Parse(_))));
    }

    #[test]
    fn test_custom_separator() {
        let (_dir, path) = write_temp(b"a,b\r\nc,d\r\n", "csv");
        let mut parser = CsvParser::<Vec<String>>::open(&path).unwrap().with_separator(',');
        assert_eq!(parser.lines().unwrap()[0], vec!["a", "b"]);
    }

    #[test]
    fn test_latin1_charset() {
        let (_dir, path) = write_temp(b"caf\xe9;x\r\n", "csv");
        let mut parser = CsvParser::<Vec<String>>::open(&path)
            .unwrap()
            .with_charset("ISO-8859-1");
        assert_eq!(parser.lines().unwrap()[0][0], "café");
    }

    #[test]
    fn test_trailing_blank_lines_trimmed() {
        let (_dir, path) = write_temp(b"a;b\r\n;\r\n;\r\n", "csv");
        let mut parser = CsvParser::<Vec<String>>::open(&path).unwrap();
        parser.set_ignore_blank_lines_at_end(true);
        let rows: Vec<Vec<String>> = parser.parse().unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_sheet_controls_are_noops() {
        let (_dir, path) = write_temp(b"a\r\n", "csv");
        let mut parser = CsvParser::<Vec<String>>::open(&path).unwrap();
        assert_eq!(parser.number_of_sheets(), 1);
        parser.set_sheet_number(7);
        parser.set_last_sheet();
        parser.set_first_visible_sheet();
        parser.set_sheet_number_as_first_not_hidden();
        assert_eq!(parser.sheet_number(), 0);
        assert!(parser.parse().is_ok());
    }

    #[test]
    fn test_txt_extension_detected() {
        let (_dir, path) = write_temp(b"a\r\n", "txt");
        let parser = CsvParser::<Vec<String>>::open(&path).unwrap();
        assert_eq!(parser.file_type(), FileType::Txt);
    }

    #[test]
    fn test_lines_can_be_read_twice() {
        let (_dir, path) = write_temp(b"a;b\r\n", "csv");
        let mut parser = CsvParser::<Vec<String>>::open(&path).unwrap();
        assert_eq!(parser.lines().unwrap().len(), 1);
        assert_eq!(parser.lines().unwrap().len(), 1);
    }
}
