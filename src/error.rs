use crate::exporter::FileType;
use thiserror::Error;

pub type TabioResult<T> = Result<T, TabioError>;

#[derive(Error, Debug)]
pub enum TabioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Workbook read error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File type not supported: {0}")]
    NotImplemented(FileType),

    #[error("Unsupported mutation of the empty cell sentinel: {0}")]
    UnsupportedMutation(&'static str),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown charset: {0}")]
    Encoding(String),
}
