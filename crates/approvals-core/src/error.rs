use std::path::PathBuf;

/// Errors from setting up a confirmation flow (loading requests, locales,
/// fetching remote lists). Nothing in the render or state-machine path
/// returns these; those paths degrade instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP request to {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("Unknown request type: {0}")]
    UnknownRequestType(String),
}

impl CoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        CoreError::Json {
            context: context.into(),
            source,
        }
    }
}
