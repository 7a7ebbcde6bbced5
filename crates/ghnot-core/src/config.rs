use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    API_URL, APP_DIR, CACHE_FILE, CONFIG_FILE, DEFAULT_CACHE_TTL_HOURS, DEFAULT_MAX_PAGES,
    DEFAULT_PER_PAGE,
};
use crate::error::ConfigError;
use crate::rules::Rule;

/// Configuration document, loaded from a JSON file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub cache: CacheConfig,
    pub endpoint: EndpointConfig,
    /// Applied in declared order.
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheConfig {
    /// Cache document location; defaults to the platform cache dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub ttl_in_hours: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: None,
            ttl_in_hours: DEFAULT_CACHE_TTL_HOURS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndpointConfig {
    pub api_url: String,
    pub per_page: u32,
    pub max_pages: u32,
    /// Fetch each subject to fill author, state and web URL.
    pub enrich: bool,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            api_url: API_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
            enrich: true,
        }
    }
}

impl Config {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` if given (it must exist), otherwise from the default
    /// location, falling back to built-in defaults when no file is there.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_path = Self::default_path()?;
        if default_path.exists() {
            Self::load(&default_path)
        } else {
            tracing::debug!("config: no file at {}, using defaults", default_path.display());
            Ok(Self::default())
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Configured cache path, else `<cache dir>/ghnot/notifications.json`,
    /// else a file in the working directory.
    pub fn cache_path(&self) -> PathBuf {
        if let Some(path) = &self.cache.path {
            return path.clone();
        }
        dirs::cache_dir()
            .map(|dir| dir.join(APP_DIR).join(CACHE_FILE))
            .unwrap_or_else(|| PathBuf::from(CACHE_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_config_minimal() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.cache.ttl_in_hours, 1);
        assert_eq!(config.endpoint.api_url, "https://api.github.com");
        assert!(config.endpoint.enrich);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_parse_config_full() {
        let json = r#"{
            "cache": {"path": "/tmp/ghnot/cache.json", "ttlInHours": 6},
            "endpoint": {"perPage": 20, "maxPages": 2, "enrich": false},
            "rules": [
                {
                    "name": "close reviews",
                    "filters": [".reason == \"review_requested\"", ".unread"],
                    "action": "done"
                },
                {"name": "tag", "filters": [], "action": "tag", "args": ["+seen"]}
            ]
        }"#;
        let config = Config::from_json(json).unwrap();

        assert_eq!(config.cache_path(), PathBuf::from("/tmp/ghnot/cache.json"));
        assert_eq!(config.cache.ttl_in_hours, 6);
        assert_eq!(config.endpoint.per_page, 20);
        assert_eq!(config.endpoint.api_url, "https://api.github.com");
        assert!(!config.endpoint.enrich);
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[0].filters.len(), 2);
        assert!(config.rules[0].args.is_empty());
        assert_eq!(config.rules[1].args, vec!["+seen"]);
    }

    #[test]
    fn test_load_errors_name_the_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            Config::load(&missing),
            Err(ConfigError::Read { path, .. }) if path == missing
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ rules: ").unwrap();
        assert!(matches!(Config::load(&broken), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            Config::load_or_default(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        let mut config = Config::default();
        config.cache.ttl_in_hours = 3;
        std::fs::write(&path, config.to_json().unwrap()).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
