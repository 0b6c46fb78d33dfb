pub mod errors;
pub mod fetch;
pub mod messages;
pub mod nav;
pub mod profile;
pub mod template;

pub use errors::{CatalogError, FetchError, LoadError};
pub use fetch::Fetcher;
pub use messages::Locale;
pub use nav::{NavId, NavigationItem};
pub use profile::{AggregateProfile, Endpoint};
pub use template::{FalsyPolicy, TemplateRenderer};
