//! Settings loading with deep merge and environment variable overrides.
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use portal_core::{FalsyPolicy, Locale};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::PortalSettings;

/// `~/.portal`, or `/tmp/.portal` when `HOME` is unset.
pub fn portal_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".portal")
}

/// Resolve the path to the settings file (`~/.portal/settings.json`).
pub fn settings_path() -> PathBuf {
    portal_dir().join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<PortalSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults; invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<PortalSettings> {
    let mut settings = load_file_layer(path)?;
    apply_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn load_file_layer(path: &Path) -> Result<PortalSettings> {
    let defaults = serde_json::to_value(PortalSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `PORTAL_*` overrides read through `lookup`.
///
/// Invalid values are logged and ignored, leaving the file/default value.
pub fn apply_overrides(settings: &mut PortalSettings, lookup: impl Fn(&str) -> Option<String>) {
    let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = read("PORTAL_PAGE_ORIGIN") {
        settings.page_origin = v;
    }
    if let Some(v) = read("PORTAL_LOCALE") {
        match v.parse::<Locale>() {
            Ok(locale) => settings.locale = locale,
            Err(e) => warn!(key = "PORTAL_LOCALE", value = %v, error = %e, "ignoring env var"),
        }
    }
    if let Some(v) = read("PORTAL_DB_PATH") {
        settings.db_path = Some(v);
    }
    if let Some(v) = read("PORTAL_REQUEST_TIMEOUT_SECS") {
        match parse_u64_range(&v, 1, 3_600) {
            Some(secs) => settings.request_timeout_secs = Some(secs),
            None => warn!(
                key = "PORTAL_REQUEST_TIMEOUT_SECS",
                value = %v,
                "invalid u64 env var, ignoring"
            ),
        }
    }
    if let Some(v) = read("PORTAL_RENDER_FALSY") {
        match parse_falsy_policy(&v) {
            Some(policy) => settings.falsy_policy = policy,
            None => warn!(
                key = "PORTAL_RENDER_FALSY",
                value = %v,
                "expected blank or literal, ignoring"
            ),
        }
    }
    if let Some(v) = read("PORTAL_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read("PORTAL_LOG_JSON") {
        match parse_bool(&v) {
            Some(json) => settings.logging.json = json,
            None => warn!(key = "PORTAL_LOG_JSON", value = %v, "invalid boolean env var, ignoring"),
        }
    }
}

/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

pub fn parse_falsy_policy(val: &str) -> Option<FalsyPolicy> {
    match val.to_lowercase().as_str() {
        "blank" => Some(FalsyPolicy::Blank),
        "literal" => Some(FalsyPolicy::Literal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::errors::SettingsError;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({"logging": {"level": "info", "json": false}});
        let source = serde_json::json!({"logging": {"json": true}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["logging"]["level"], "info");
        assert_eq!(merged["logging"]["json"], true);
    }

    #[test]
    fn merge_array_replace() {
        let target = serde_json::json!({"items": [1, 2, 3]});
        let source = serde_json::json!({"items": [4]});
        assert_eq!(deep_merge(target, source)["items"], serde_json::json!([4]));
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    // ── load_settings_from_path ─────────────────────────────────────

    #[test]
    fn load_missing_file_returns_defaults() {
        let settings = load_file_layer(Path::new("/nonexistent/settings.json")).unwrap();
        assert_eq!(settings.page_origin, PortalSettings::default().page_origin);
        assert_eq!(settings.navigation.items.len(), 5);
    }

    #[test]
    fn load_partial_json_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"pageOrigin": "https://portal.example.com", "logging": {"json": true}}"#,
        )
        .unwrap();

        let settings = load_file_layer(&path).unwrap();
        assert_eq!(settings.page_origin, "https://portal.example.com");
        assert!(settings.logging.json);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.locale, Locale::Ru);
    }

    #[test]
    fn file_catalog_replaces_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"navigation": {"defaultItem": "home", "items": [
                {"id": "home", "title": "Home", "iconDefault": "h.svg",
                 "iconSelected": "h2.svg", "dynamic": true}
            ]}}"#,
        )
        .unwrap();

        let settings = load_file_layer(&path).unwrap();
        assert_eq!(settings.navigation.items.len(), 1);
        assert_eq!(settings.navigation.default_item.as_str(), "home");
        settings.validate().unwrap();
    }

    #[test]
    fn load_invalid_json_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not valid json").unwrap();

        let result = load_file_layer(&path);
        assert!(matches!(result.unwrap_err(), SettingsError::Json(_)));
    }

    // ── env overrides ───────────────────────────────────────────────

    #[test]
    fn env_overrides_apply() {
        let mut settings = PortalSettings::default();
        apply_overrides(
            &mut settings,
            env(&[
                ("PORTAL_PAGE_ORIGIN", "http://10.0.0.5:3000"),
                ("PORTAL_LOCALE", "en"),
                ("PORTAL_DB_PATH", "/tmp/p.db"),
                ("PORTAL_REQUEST_TIMEOUT_SECS", "15"),
                ("PORTAL_RENDER_FALSY", "literal"),
                ("PORTAL_LOG_JSON", "yes"),
            ]),
        );
        assert_eq!(settings.page_origin, "http://10.0.0.5:3000");
        assert_eq!(settings.locale, Locale::En);
        assert_eq!(settings.db_path.as_deref(), Some("/tmp/p.db"));
        assert_eq!(settings.request_timeout_secs, Some(15));
        assert_eq!(settings.falsy_policy, FalsyPolicy::Literal);
        assert!(settings.logging.json);
    }

    #[test]
    fn invalid_env_values_ignored() {
        let mut settings = PortalSettings::default();
        apply_overrides(
            &mut settings,
            env(&[
                ("PORTAL_LOCALE", "klingon"),
                ("PORTAL_REQUEST_TIMEOUT_SECS", "0"),
                ("PORTAL_RENDER_FALSY", "sometimes"),
                ("PORTAL_LOG_JSON", "maybe"),
                ("PORTAL_PAGE_ORIGIN", ""),
            ]),
        );
        let defaults = PortalSettings::default();
        assert_eq!(settings.locale, defaults.locale);
        assert_eq!(settings.request_timeout_secs, None);
        assert_eq!(settings.falsy_policy, FalsyPolicy::Blank);
        assert!(!settings.logging.json);
        assert_eq!(settings.page_origin, defaults.page_origin);
    }

    #[test]
    fn parse_helpers() {
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("2"), None);
        assert_eq!(parse_u64_range("30", 1, 60), Some(30));
        assert_eq!(parse_u64_range("61", 1, 60), None);
        assert_eq!(parse_falsy_policy("Blank"), Some(FalsyPolicy::Blank));
    }
}
