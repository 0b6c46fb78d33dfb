//! # portal-settings
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`PortalSettings::default()`]
//! 2. **User file**: `~/.portal/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `PORTAL_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, portal_dir, settings_path};
pub use types::*;
