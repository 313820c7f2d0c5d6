use thiserror::Error;

/// Error for invalid enum value conversion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {type_name} value: {value}")]
pub struct InvalidEnumValueError {
    type_name: &'static str,
    value: i64,
}

impl InvalidEnumValueError {
    pub fn new(type_name: &'static str, value: impl Into<i64>) -> Self {
        Self {
            type_name,
            value: value.into(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid engine parameters: {0}")]
    InvalidParameters(String),

    #[error("Unsupported format version: {version} (current is {current})")]
    UnsupportedVersion { version: u32, current: u32 },

    #[error("Unexpected end of parameter data: needed {needed} bytes at offset {offset}")]
    UnexpectedEof { offset: usize, needed: usize },

    #[error("Parameter data has {0} trailing bytes")]
    TrailingBytes(usize),

    #[error(transparent)]
    InvalidEnumValue(#[from] InvalidEnumValueError),

    #[error("Invalid chart: {0}")]
    InvalidChart(String),

    #[error("Inputs out of order at index {index}: {time} comes after {previous}")]
    UnorderedInputs { index: usize, previous: f64, time: f64 },

    #[error("Invalid replay: {0}")]
    InvalidReplay(String),

    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Whether the error was raised while building or decoding engine configuration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidParameters(_)
                | Error::UnsupportedVersion { .. }
                | Error::UnexpectedEof { .. }
                | Error::TrailingBytes(_)
                | Error::InvalidEnumValue(_)
        )
    }
}
