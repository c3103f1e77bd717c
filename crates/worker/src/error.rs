use storyframe_core::error::CoreError;

/// Errors that abort a worker run.
///
/// Generation and continuity problems never surface here; they are
/// recorded on the individual shot outputs instead.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// A required variable is missing or a value is malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type WorkerResult<T> = Result<T, WorkerError>;
