use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown payment channel '{value}'")]
    UnknownChannel { value: String },

    #[error("Invalid page size: {size}")]
    InvalidPageSize { size: usize },
}

pub type ScopeResult<T> = Result<T, ScopeError>;
