use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Cannot read '{path}': {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Header row {row} is out of range (file has {rows} rows)")]
    HeaderRowOutOfRange { row: usize, rows: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
