use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Default location of the REST API
pub const DEFAULT_API_URL: &str = "https://readthedocs.org/api/v3/";

/// Default location of the dashboard (the site's web UI)
pub const DEFAULT_DASHBOARD_URL: &str = "https://readthedocs.org/dashboard/";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    JsonError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to determine home directory")]
    HomeDirNotFound,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_dashboard_url() -> String {
    DEFAULT_DASHBOARD_URL.to_string()
}

/// Number of results requested per page from paginated endpoints
fn default_page_size() -> u32 {
    100
}

/// Client configuration, read from `~/.rtd/config.json` and overridden by
/// command line flags and environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RtdConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,
    /// API token, sent as `Authorization: Token <token>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Value of the dashboard's `sessionid` cookie. Only needed to change
    /// maintainers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for RtdConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            dashboard_url: default_dashboard_url(),
            token: None,
            session_id: None,
            page_size: default_page_size(),
        }
    }
}

/// Values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub dashboard_url: Option<String>,
    pub token: Option<String>,
    pub session_id: Option<String>,
}

impl RtdConfig {
    /// Apply overrides; empty strings count as unset.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        fn non_empty(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        if let Some(api_url) = non_empty(overrides.api_url) {
            self.api_url = api_url;
        }
        if let Some(dashboard_url) = non_empty(overrides.dashboard_url) {
            self.dashboard_url = dashboard_url;
        }
        if let Some(token) = non_empty(overrides.token) {
            self.token = Some(token);
        }
        if let Some(session_id) = non_empty(overrides.session_id) {
            self.session_id = Some(session_id);
        }
        self
    }
}

/// Get the path to the user's config directory (~/.rtd)
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| ConfigError::HomeDirNotFound)?;

    Ok(PathBuf::from(home).join(".rtd"))
}

/// Get the path to the default config file (~/.rtd/config.json)
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    Ok(get_config_dir()?.join("config.json"))
}

/// Read a config file, returning `None` if it does not exist
pub async fn read_config(config_path: &Path) -> Result<Option<RtdConfig>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(config_path)
        .await
        .map_err(|source| ConfigError::IoError {
            path: config_path.to_path_buf(),
            source,
        })?;
    let config: RtdConfig =
        serde_json::from_str(&content).map_err(|source| ConfigError::JsonError {
            path: config_path.to_path_buf(),
            source,
        })?;
    Ok(Some(config))
}

/// Load the effective configuration.
///
/// An explicitly given path must exist; the default path is optional, and a
/// missing home directory simply means defaults.
pub async fn load_config(
    explicit_path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<RtdConfig, ConfigError> {
    let from_file = match explicit_path {
        Some(path) => Some(read_config(path).await?.ok_or_else(|| ConfigError::IoError {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
        })?),
        None => match get_config_path() {
            Ok(path) => read_config(&path).await?,
            Err(ConfigError::HomeDirNotFound) => None,
            Err(e) => return Err(e),
        },
    };

    Ok(from_file.unwrap_or_default().with_overrides(overrides))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: RtdConfig = serde_json::from_str(r#"{"token": "abc"}"#).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.dashboard_url, DEFAULT_DASHBOARD_URL);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert!(config.session_id.is_none());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = RtdConfig {
            token: Some("from-file".to_string()),
            ..Default::default()
        }
        .with_overrides(ConfigOverrides {
            token: Some("from-env".to_string()),
            session_id: Some("  ".to_string()),
            ..Default::default()
        });

        assert_eq!(config.token.as_deref(), Some("from-env"));
        assert!(config.session_id.is_none());
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[tokio::test]
    async fn test_read_config_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = read_config(&temp_dir.path().join("config.json")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_load_config_explicit_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"apiUrl": "http://localhost:8000/api/v3/", "pageSize": 5}"#)
            .unwrap();

        let config = load_config(Some(&path), ConfigOverrides::default())
            .await
            .unwrap();
        assert_eq!(config.api_url, "http://localhost:8000/api/v3/");
        assert_eq!(config.page_size, 5);
    }

    #[tokio::test]
    async fn test_load_config_explicit_path_must_exist() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = load_config(
            Some(&temp_dir.path().join("nope.json")),
            ConfigOverrides::default(),
        )
        .await;
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[tokio::test]
    async fn test_read_config_invalid_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = read_config(&path).await;
        assert!(matches!(result, Err(ConfigError::JsonError { .. })));
    }
}
