use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GlyphError>;

#[derive(Debug, Error)]
pub enum GlyphError {
    /// No dataset file name on the command line.
    #[error("Specify fontData file name")]
    MissingArgument,

    #[error("Given filename for fontData doesn't exist")]
    DatasetNotFound { path: PathBuf },

    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: expected feature values followed by a label")]
    MissingLabel { line: usize },

    #[error("line {line}, column {column}: '{token}' is not a number")]
    InvalidNumber { line: usize, column: usize, token: String },

    #[error("line {line}: expected {expected} features, found {found}")]
    RaggedRow { line: usize, expected: usize, found: usize },

    #[error("dataset contains no rows")]
    EmptyDataset,

    #[error("need at least 2 distinct labels to train a classifier, found {found}")]
    TooFewClasses { found: usize },

    #[error("label '{0}' is not known to the encoder")]
    UnknownLabel(String),

    #[error("dataset rows have {found} features but the network expects {expected}")]
    InputWidthMismatch { expected: usize, found: usize },

    #[error("model has no output labels to decode predictions with")]
    UnlabeledModel,

    #[error("invalid network spec: {0}")]
    InvalidSpec(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GlyphError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> GlyphError {
        GlyphError::Io { path: path.into(), source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> GlyphError {
        GlyphError::Json { path: path.into(), source }
    }

    /// Errors caused by how the program was invoked rather than by the data.
    pub fn is_usage(&self) -> bool {
        matches!(self, GlyphError::MissingArgument | GlyphError::DatasetNotFound { .. })
    }
}
