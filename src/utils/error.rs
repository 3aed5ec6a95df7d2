use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Object storage request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Database error: {0}")]
    DbError(#[from] tokio_postgres::Error),

    #[error("TLS setup error: {0}")]
    TlsError(#[from] rustls::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Certificate decoding error: {0}")]
    CertDecodeError(#[from] base64::DecodeError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Event rejected: {message}")]
    EventError { message: String },

    #[error("Service binding '{service}' is missing")]
    MissingBindingError { service: String },

    #[error("Token exchange failed: {reason}")]
    AuthError { reason: String },

    #[error("Failed to fetch object '{key}' from bucket '{bucket}': {reason}")]
    FetchError {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("Row {row} is missing required field '{field}'")]
    RecordError { row: usize, field: String },

    #[error("Batch insert finished with {failed} of {total} rows failed")]
    BatchError { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, ImportError>;
