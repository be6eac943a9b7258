use std::error::Error;
use std::fmt;
use std::panic::Location;

use polars::error::PolarsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// What went wrong, independent of where.
#[derive(Error, Debug)]
pub enum ErrorKind {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data loading error: {0}")]
    DataLoading(#[from] PolarsError),

    #[error("Column '{column}' not found in {table}")]
    MissingColumn { column: String, table: String },

    #[error("Unknown category '{value}' in column '{column}'")]
    UnknownCategory { column: String, value: String },

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("{0} is not fitted")]
    NotFitted(&'static str),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported artifact: kind '{kind}' version {version}")]
    UnsupportedArtifactVersion { kind: String, version: u32 },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Model error: {0}")]
    Model(String),
}

/// Crate-wide error: an [`ErrorKind`] plus the source location that raised it.
///
/// The location is captured through `#[track_caller]`, so both
/// `PipelineError::new(..)` and a bare `?` on a convertible error record the
/// file and line of the call site.
#[derive(Debug)]
pub struct PipelineError {
    kind: ErrorKind,
    file: &'static str,
    line: u32,
}

impl PipelineError {
    #[track_caller]
    pub fn new(kind: ErrorKind) -> Self {
        let location = Location::caller();
        Self {
            kind,
            file: location.file(),
            line: location.line(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error occurred in script [{}] line number [{}] error message [{}]",
            self.file, self.line, self.kind
        )
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(e) => Some(e),
            ErrorKind::DataLoading(e) => Some(e),
            ErrorKind::Serialization(e) => Some(e),
            ErrorKind::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ErrorKind> for PipelineError {
    #[track_caller]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

macro_rules! located_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for PipelineError {
                #[track_caller]
                fn from(err: $source) -> Self {
                    Self::new(ErrorKind::from(err))
                }
            }
        )*
    };
}

located_from!(
    std::io::Error,
    PolarsError,
    serde_json::Error,
    toml::de::Error,
);

impl From<ndarray::ShapeError> for PipelineError {
    #[track_caller]
    fn from(err: ndarray::ShapeError) -> Self {
        Self::new(ErrorKind::Shape {
            expected: "compatible array dimensions".to_string(),
            actual: err.to_string(),
        })
    }
}
