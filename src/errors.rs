use thiserror::Error;

use crate::keychain::StoreError;

/// All errors that can occur in the token helper.
#[derive(Debug, Error)]
pub enum HelperError {
    // --- Startup errors ---
    #[error("failed to determine current user: {0}")]
    Identity(String),

    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- Input errors ---
    #[error("failed to read value from stdin: {0}")]
    ReadInput(#[source] std::io::Error),

    // --- Credential store errors ---
    /// A store operation failed; `context` names the attempted operation.
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    /// The store reported a duplicate on insert but the follow-up query
    /// found nothing.
    #[error("no results")]
    NoResults,

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HelperError {
    /// Wrap a store error with a short description of the attempted operation.
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { context, source }
    }
}

/// Convenience type alias for token helper results.
pub type Result<T> = std::result::Result<T, HelperError>;
