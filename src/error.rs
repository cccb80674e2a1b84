//! Error taxonomy for the search engine and its data source.

use thiserror::Error;

/// Errors that can occur while loading or evaluating dossier data.
#[derive(Debug, Error)]
pub enum WooError {
    /// Input data does not have the expected record shape.
    #[error("Unexpected data shape: {0}")]
    DataShape(String),

    /// The data source is unreachable or returned a non-success status.
    #[error("Unable to load results: {0}")]
    Fetch(String),

    /// A dossier lookup by identifier yielded no record.
    #[error("Dossier not found: {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse category of a [`WooError`], used by the view layer to pick a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DataShape,
    Fetch,
    NotFound,
    Config,
}

impl WooError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WooError::DataShape(_) => ErrorKind::DataShape,
            WooError::Fetch(_) | WooError::Http(_) | WooError::Io(_) => ErrorKind::Fetch,
            WooError::NotFound(_) => ErrorKind::NotFound,
            WooError::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        WooError::DataShape(msg.into())
    }
}

impl From<serde_json::Error> for WooError {
    fn from(e: serde_json::Error) -> Self {
        WooError::DataShape(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WooError>;
