//! Settings error types.

use portal_core::CatalogError;
use thiserror::Error;

/// Errors that can occur when loading or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read the settings file from disk.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse JSON in the settings file.
    #[error("failed to parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The page origin is not an absolute http(s) URL.
    #[error("invalid page origin {origin:?}: {reason}")]
    InvalidOrigin { origin: String, reason: String },
    /// The navigation catalog cannot be used.
    #[error("invalid navigation catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
