use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pipeline error types
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Malformed or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required dataset column is missing
    #[error("Schema error: missing required column '{column}'")]
    Schema { column: String },

    /// Malformed input file
    #[error("Parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Feature rows and labels (or feature widths) do not line up
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Text transformation failed on a specific row
    #[error("Transform error at row {row}: {message}")]
    Transform { row: usize, message: String },

    /// Operation preconditions are not met (e.g. non-binary metrics)
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Label value not present in the fitted label encoding
    #[error("Unseen label '{value}' at row {row}")]
    UnseenLabel { value: String, row: usize },

    /// No terms survived vocabulary fitting
    #[error("Empty vocabulary: {0}")]
    EmptyVocabulary(String),

    /// Dataset has no rows where at least one is required
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// Classifier fitting or prediction failed
    #[error("Training error: {0}")]
    Training(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error on a specific file or directory
    #[error("IO error on {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PipelineError {
    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            PipelineError::Config(_) => "CONFIG_ERROR",
            PipelineError::Schema { .. } => "SCHEMA_ERROR",
            PipelineError::Parse { .. } => "PARSE_ERROR",
            PipelineError::ShapeMismatch { .. } => "SHAPE_MISMATCH",
            PipelineError::Transform { .. } => "TRANSFORM_ERROR",
            PipelineError::Unsupported(_) => "UNSUPPORTED",
            PipelineError::UnseenLabel { .. } => "UNSEEN_LABEL",
            PipelineError::EmptyVocabulary(_) => "EMPTY_VOCABULARY",
            PipelineError::EmptyDataset(_) => "EMPTY_DATASET",
            PipelineError::Training(_) => "TRAINING_ERROR",
            PipelineError::Io(_) | PipelineError::File { .. } => "IO_ERROR",
            PipelineError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Build a parse error for the given file
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        PipelineError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Build an I/O error naming the file it happened on
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::File {
            path: path.into(),
            source,
        }
    }

    /// Build a shape mismatch error from two describable shapes
    pub fn shape_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        PipelineError::ShapeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}

/// Conversion from bincode::Error
impl From<bincode::Error> for PipelineError {
    fn from(err: bincode::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for PipelineError {
    fn from(err: config::ConfigError) -> Self {
        PipelineError::Config(err.to_string())
    }
}

/// Attach the path an I/O operation worked on to its error
pub(crate) trait PathContext<T> {
    fn with_path(self, path: &Path) -> Result<T>;
}

impl<T> PathContext<T> for std::io::Result<T> {
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|e| PipelineError::file(path, e))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PipelineError>;
