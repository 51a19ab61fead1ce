use crate::RecordId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Record {0} not found")]
    NotFound(RecordId),

    #[error("Record has no id yet, insert it first")]
    Unpersisted,

    #[error("Unsupported store file version {0}")]
    Version(u32),
}

pub type Result<T> = std::result::Result<T, StoreError>;
