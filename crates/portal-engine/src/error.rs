use portal_core::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid page origin: {0}")]
    InvalidOrigin(String),

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
