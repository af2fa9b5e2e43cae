use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Schema file error: {0}")]
    SchemaError(#[from] toml::de::Error),

    #[error("Connection probe failed for table '{table}': status {status}: {body}")]
    ConnectionError {
        table: String,
        status: u16,
        body: String,
    },

    #[error("Invalid date in field '{field}': {value}")]
    DateFormatError { field: String, value: String },

    #[error("Batch {batch} write failed with status {status}: {body}")]
    BatchWriteError {
        batch: usize,
        status: u16,
        body: String,
    },

    #[error("Clearing table '{table}' failed with status {status}: {body}")]
    ClearError {
        table: String,
        status: u16,
        body: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, EtlError>;
