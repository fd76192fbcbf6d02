//! Fixed-width/delimited text model: rows of fields, each field carrying its
//! own separator character.

/// Field separator characters for delimited text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparatorType {
    #[default]
    Semicolon,
    Comma,
    Tab,
    Pipe,
}

impl SeparatorType {
    pub fn as_char(&self) -> char {
        match self {
            SeparatorType::Semicolon => ';',
            SeparatorType::Comma => ',',
            SeparatorType::Tab => '\t',
            SeparatorType::Pipe => '|',
        }
    }

    pub fn as_byte(&self) -> u8 {
        self.as_char() as u8
    }
}

/// A single field: a value followed (or not) by its separator.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTxt {
    value: String,
    separator: SeparatorType,
}

impl FieldTxt {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            separator: SeparatorType::default(),
        }
    }

    pub fn with_separator(value: impl Into<String>, separator: SeparatorType) -> Self {
        Self {
            value: value.into(),
            separator,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn separator(&self) -> SeparatorType {
        self.separator
    }
}

/// A file-as-text: ordered rows of fields plus the trailing-separator policy.
///
/// When `ends_with_separator` is false (the default) the last field of a row
/// is not followed by its separator. Lines always terminate with CRLF.
#[derive(Debug, Clone, Default)]
pub struct FileTxt {
    rows: Vec<Vec<FieldTxt>>,
    ends_with_separator: bool,
}

impl FileTxt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, fields: Vec<FieldTxt>) {
        self.rows.push(fields);
    }

    pub fn rows(&self) -> &[Vec<FieldTxt>] {
        &self.rows
    }

    pub fn ends_with_separator(&self) -> bool {
        self.ends_with_separator
    }

    pub fn set_ends_with_separator(&mut self, ends_with_separator: bool) {
        self.ends_with_separator = ends_with_separator;
    }
}
