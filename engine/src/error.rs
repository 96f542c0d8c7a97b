use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    // Bad caller input. Rejected before any computation runs.
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    #[error("Investor not found: {0}")]
    InvestorNotFound(String),

    #[error("Duplicate record: {0}")]
    DuplicateRecord(String),
}

impl EngineError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<EngineError> for tonic::Status {
    fn from(err: EngineError) -> Self {
        tracing::error!("Mapping EngineError to tonic::Status: {:?}", err);
        match err {
            EngineError::InvalidInput { field, reason } => {
                tonic::Status::invalid_argument(format!("Invalid input for '{}': {}", field, reason))
            }
            EngineError::ConfigError(msg) => tonic::Status::failed_precondition(format!("Configuration error: {}", msg)),
            EngineError::CsvSystemError { source } => tonic::Status::invalid_argument(format!("CSV parsing system error: {}", source)),
            EngineError::IoError { source } => tonic::Status::internal(format!("I/O error: {}", source)),
            EngineError::CsvDataFormatError(msg) => tonic::Status::invalid_argument(format!("CSV data format error: {}", msg)),
            EngineError::PropertyNotFound(id) => tonic::Status::not_found(format!("Property not found: {}", id)),
            EngineError::InvestorNotFound(id) => tonic::Status::not_found(format!("Investor not found: {}", id)),
            EngineError::DuplicateRecord(msg) => tonic::Status::already_exists(msg),
        }
    }
}
