use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Spreadsheet error: {message}")]
    Sheets { message: String },

    #[error("Authentication error: {message}")]
    Auth { message: String },

    #[error("Row shape mismatch: {message}")]
    RowShape { message: String },

    #[error("Empty dataset: {message}")]
    EmptyDataset { message: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io {
            message: err.to_string(),
        }
    }
}

impl From<diesel::result::Error> for SyncError {
    fn from(err: diesel::result::Error) -> Self {
        SyncError::Database {
            message: err.to_string(),
        }
    }
}

/// One of the six sequential pipeline steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Clear,
    Fetch,
    WriteSheet,
    ReadSheet,
    Clean,
    Insert,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Clear => "clear",
            Stage::Fetch => "fetch",
            Stage::WriteSheet => "write-sheet",
            Stage::ReadSheet => "read-sheet",
            Stage::Clean => "clean",
            Stage::Insert => "insert",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pipeline failure tagged with the stage it occurred in. The run aborts at
/// the first `StageError`; `main` is the only place it is consumed.
#[derive(Error, Debug)]
#[error("stage {stage} failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: SyncError,
}

impl StageError {
    pub fn new(stage: Stage, source: SyncError) -> Self {
        Self { stage, source }
    }
}
