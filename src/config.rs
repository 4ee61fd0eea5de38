//! Application configuration.
//!
//! Layers, later wins: built-in defaults, compile-time environment
//! (`LP_ANALYZER_API_URL`, `LP_ANALYZER_LOG`), the optional
//! `window.__LP_ANALYZER_CONFIG__` object set by the hosting page, and finally
//! the backend URL the user saved on the Settings page.

use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::error::ConfigError;
use crate::storage::{KeyValueStore, API_BASE_URL_KEY};
use crate::validation::MAX_UPLOAD_BYTES;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const RUNTIME_CONFIG_GLOBAL: &str = "__LP_ANALYZER_CONFIG__";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub max_upload_bytes: u64,
    pub session_poll_ms: u32,
    pub status_poll_ms: u32,
    pub session_list_poll_ms: u32,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            session_poll_ms: 5_000,
            status_poll_ms: 2_000,
            session_list_poll_ms: 30_000,
            log_filter: "info".to_string(),
        }
    }
}

/// Partial config; every field optional so a layer only overrides what it sets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub max_upload_bytes: Option<u64>,
    pub session_poll_ms: Option<u32>,
    pub status_poll_ms: Option<u32>,
    pub session_list_poll_ms: Option<u32>,
    pub log_filter: Option<String>,
}

impl ConfigOverrides {
    /// Values baked in at build time.
    pub fn from_build_env() -> Self {
        Self {
            api_base_url: option_env!("LP_ANALYZER_API_URL").map(str::to_string),
            log_filter: option_env!("LP_ANALYZER_LOG").map(str::to_string),
            ..Self::default()
        }
    }

    /// Decode `window.__LP_ANALYZER_CONFIG__`, if the page defines one.
    pub fn from_window() -> Option<Result<Self, ConfigError>> {
        let window = web_sys::window()?;
        let value = js_sys::Reflect::get(&window, &JsValue::from_str(RUNTIME_CONFIG_GLOBAL)).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
        Some(
            serde_wasm_bindgen::from_value(value).map_err(|e| ConfigError::MalformedRuntimeConfig {
                global: RUNTIME_CONFIG_GLOBAL.to_string(),
                message: e.to_string(),
            }),
        )
    }
}

impl AppConfig {
    /// Resolve the configuration the running app should use.
    ///
    /// Runs before logging is installed, so skipped layers are returned for
    /// the caller to report.
    pub fn load(store: &impl KeyValueStore) -> (Self, Vec<ConfigError>) {
        let mut layers = vec![Ok(ConfigOverrides::from_build_env())];
        layers.extend(ConfigOverrides::from_window());
        Self::from_layers(layers, store)
    }

    /// Like [`AppConfig::resolve`], skipping layers that failed to decode.
    pub fn from_layers(
        layers: impl IntoIterator<Item = Result<ConfigOverrides, ConfigError>>,
        store: &impl KeyValueStore,
    ) -> (Self, Vec<ConfigError>) {
        let mut problems = Vec::new();
        let mut usable = Vec::new();
        for layer in layers {
            match layer {
                Ok(overrides) => usable.push(overrides),
                Err(e) => problems.push(e),
            }
        }
        (Self::resolve(usable, store), problems)
    }

    pub fn resolve(layers: impl IntoIterator<Item = ConfigOverrides>, store: &impl KeyValueStore) -> Self {
        let mut config = Self::default();
        for layer in layers {
            config.apply(layer);
        }
        if let Some(url) = store.get(API_BASE_URL_KEY) {
            config.apply(ConfigOverrides {
                api_base_url: Some(url),
                ..ConfigOverrides::default()
            });
        }
        config
    }

    fn apply(&mut self, layer: ConfigOverrides) {
        if let Some(url) = layer.api_base_url.map(|u| normalize_base_url(&u)) {
            if !url.is_empty() {
                self.api_base_url = url;
            }
        }
        if let Some(bytes) = layer.max_upload_bytes.filter(|b| *b > 0) {
            self.max_upload_bytes = bytes;
        }
        if let Some(ms) = layer.session_poll_ms.filter(|ms| *ms > 0) {
            self.session_poll_ms = ms;
        }
        if let Some(ms) = layer.status_poll_ms.filter(|ms| *ms > 0) {
            self.status_poll_ms = ms;
        }
        if let Some(ms) = layer.session_list_poll_ms.filter(|ms| *ms > 0) {
            self.session_list_poll_ms = ms;
        }
        if let Some(filter) = layer.log_filter.filter(|f| !f.trim().is_empty()) {
            self.log_filter = filter;
        }
    }
}

/// Trim whitespace and trailing slashes so paths can be appended with `/`.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults() {
        let config = AppConfig::resolve(Vec::new(), &MemoryStore::new());
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.max_upload_bytes, 100 * 1024 * 1024);
        assert_eq!(config.status_poll_ms, 2_000);
        assert_eq!(config.session_poll_ms, 5_000);
        assert_eq!(config.session_list_poll_ms, 30_000);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_later_layers_win() {
        let first = ConfigOverrides {
            api_base_url: Some("https://one.example".into()),
            status_poll_ms: Some(1_000),
            ..Default::default()
        };
        let second = ConfigOverrides {
            api_base_url: Some("https://two.example/".into()),
            ..Default::default()
        };
        let config = AppConfig::resolve(vec![first, second], &MemoryStore::new());
        assert_eq!(config.api_base_url, "https://two.example");
        assert_eq!(config.status_poll_ms, 1_000);
    }

    #[test]
    fn test_stored_preference_overrides_layers() {
        let store = MemoryStore::new();
        store.set(API_BASE_URL_KEY, "https://api.example.com//").unwrap();
        let layer = ConfigOverrides {
            api_base_url: Some("https://build.example".into()),
            ..Default::default()
        };
        let config = AppConfig::resolve(vec![layer], &store);
        assert_eq!(config.api_base_url, "https://api.example.com");
    }

    #[test]
    fn test_zero_and_blank_values_are_ignored() {
        let layer = ConfigOverrides {
            api_base_url: Some("  / ".into()),
            max_upload_bytes: Some(0),
            session_poll_ms: Some(0),
            log_filter: Some(" ".into()),
            ..Default::default()
        };
        let config = AppConfig::resolve(vec![layer], &MemoryStore::new());
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_malformed_layer_is_skipped_and_reported() {
        let good = ConfigOverrides {
            status_poll_ms: Some(1_500),
            ..Default::default()
        };
        let bad = ConfigError::MalformedRuntimeConfig {
            global: RUNTIME_CONFIG_GLOBAL.to_string(),
            message: "invalid type: string, expected u32".to_string(),
        };
        let (config, problems) = AppConfig::from_layers(vec![Ok(good), Err(bad.clone())], &MemoryStore::new());
        assert_eq!(config.status_poll_ms, 1_500);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(problems, vec![bad]);
        assert!(problems[0].to_string().starts_with("Ignoring malformed __LP_ANALYZER_CONFIG__"));
    }

    #[test]
    fn test_overrides_deserialize_partially() {
        let overrides: ConfigOverrides =
            serde_json::from_str(r#"{"api_base_url":"https://x.example","status_poll_ms":3000}"#).unwrap();
        assert_eq!(overrides.api_base_url.as_deref(), Some("https://x.example"));
        assert_eq!(overrides.status_poll_ms, Some(3000));
        assert_eq!(overrides.log_filter, None);
    }
}
