use std::fmt;

#[derive(Debug)]
pub enum DemandError {
    IoError(std::io::Error),
    CsvError(csv::Error),
    JsonError(serde_json::Error),
    StoreError(rusqlite::Error),
    InvalidData(String),
    Cancelled,
}

pub type DemandResult<T> = Result<T, DemandError>;

impl From<std::io::Error> for DemandError {
    fn from(err: std::io::Error) -> Self {
        DemandError::IoError(err)
    }
}

impl From<csv::Error> for DemandError {
    fn from(err: csv::Error) -> Self {
        DemandError::CsvError(err)
    }
}

impl From<serde_json::Error> for DemandError {
    fn from(err: serde_json::Error) -> Self {
        DemandError::JsonError(err)
    }
}

impl From<rusqlite::Error> for DemandError {
    fn from(err: rusqlite::Error) -> Self {
        DemandError::StoreError(err)
    }
}

impl fmt::Display for DemandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemandError::IoError(e) => write!(f, "IO error: {}", e),
            DemandError::CsvError(e) => write!(f, "CSV error: {}", e),
            DemandError::JsonError(e) => write!(f, "JSON error: {}", e),
            DemandError::StoreError(e) => write!(f, "Store error: {}", e),
            DemandError::InvalidData(s) => write!(f, "Invalid data: {}", s),
            DemandError::Cancelled => write!(f, "Demand run cancelled"),
        }
    }
}

impl std::error::Error for DemandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DemandError::IoError(e) => Some(e),
            DemandError::CsvError(e) => Some(e),
            DemandError::JsonError(e) => Some(e),
            DemandError::StoreError(e) => Some(e),
            DemandError::InvalidData(_) | DemandError::Cancelled => None,
        }
    }
}
