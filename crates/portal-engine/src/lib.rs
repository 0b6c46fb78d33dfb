pub mod content;
pub mod error;
pub mod http;
pub mod loader;
pub mod mock;
pub mod navigation;
pub mod site;

pub use content::{Content, ContentArea, Generation};
pub use error::EngineError;
pub use http::HttpFetcher;
pub use loader::ContentLoader;
pub use navigation::{LoadHandle, NavItemView, NavigationController, SELECTION_KEY};
pub use site::{SiteUrls, BACKEND_PORT};
