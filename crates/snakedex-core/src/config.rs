//! Configuration management for Snakedex.
//!
//! Loads configuration from ${SNAKEDEX_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable that overrides `api_base_url`.
pub const API_URL_ENV: &str = "SNAKEDEX_API_URL";

/// Returns the default config template with comments.
///
/// Embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Merges user config values into the default template.
///
/// New comments and sections from the template are always present, while the
/// user's values win.
fn merge_with_template(user_config: &str) -> Result<String> {
    use toml_edit::DocumentMut;

    let mut doc: DocumentMut = default_config_template()
        .parse()
        .context("Failed to parse default config template")?;

    let user_doc: DocumentMut = user_config.parse().context("Failed to parse user config")?;

    merge_items(doc.as_table_mut(), user_doc.as_table());

    Ok(doc.to_string())
}

/// Recursively merges items from source table into target table.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for Snakedex configuration and data files.
    //!
    //! SNAKEDEX_HOME resolution order:
    //! 1. SNAKEDEX_HOME environment variable (if set)
    //! 2. ~/.config/snakedex (default)
    //! 3. ./.snakedex when no home directory can be determined

    use std::path::PathBuf;

    pub fn snakedex_home() -> PathBuf {
        if let Ok(home) = std::env::var("SNAKEDEX_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".snakedex"),
            |h| h.join(".config").join("snakedex"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        snakedex_home().join("config.toml")
    }

    /// Returns the path to the persisted session/theme slots.
    pub fn storage_path() -> PathBuf {
        snakedex_home().join("storage.json")
    }

    /// Returns the directory for TUI log files.
    pub fn logs_dir() -> PathBuf {
        snakedex_home().join("logs")
    }
}

/// Durations of transient notifications and delayed navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub login_ack_ms: u64,
    pub auth_toast_ms: u64,
    pub reset_redirect_ms: u64,
    pub catalog_toast_ms: u64,
}

impl NotificationConfig {
    pub fn login_ack(&self) -> Duration {
        Duration::from_millis(self.login_ack_ms)
    }

    pub fn auth_toast(&self) -> Duration {
        Duration::from_millis(self.auth_toast_ms)
    }

    pub fn reset_redirect(&self) -> Duration {
        Duration::from_millis(self.reset_redirect_ms)
    }

    pub fn catalog_toast(&self) -> Duration {
        Duration::from_millis(self.catalog_toast_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            login_ack_ms: 1500,
            auth_toast_ms: 3000,
            reset_redirect_ms: 2000,
            catalog_toast_ms: 5000,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the catalog API
    pub api_base_url: String,

    /// Path used for record creation
    pub create_path: String,

    /// HTTP timeout in seconds (0 disables)
    pub request_timeout_secs: u64,

    /// Default tracing filter when SNAKEDEX_LOG is unset
    pub log_level: String,

    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl Config {
    pub const DEFAULT_API_BASE_URL: &str = "https://backendsnake.onrender.com";
    const DEFAULT_CREATE_PATH: &str = "/addsnake";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_LOG_LEVEL: &str = "info";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Effective API base URL: `SNAKEDEX_API_URL`, then config, then the default.
    pub fn effective_api_base_url(&self) -> Result<Url> {
        let from_env = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());
        self.resolve_api_base_url(from_env.as_deref())
    }

    fn resolve_api_base_url(&self, env_override: Option<&str>) -> Result<Url> {
        let raw = env_override
            .map(str::trim)
            .or_else(|| Some(self.api_base_url.trim()).filter(|s| !s.is_empty()))
            .unwrap_or(Self::DEFAULT_API_BASE_URL);
        parse_base_url(raw)
    }

    /// Create path, always starting with `/`.
    pub fn effective_create_path(&self) -> String {
        let trimmed = self.create_path.trim();
        if trimmed.is_empty() {
            Self::DEFAULT_CREATE_PATH.to_string()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.request_timeout_secs))
        }
    }

    /// Saves only the api_base_url field to a specific config file path.
    ///
    /// Creates the file with the default template if it doesn't exist.
    /// If the file exists, merges user values into the latest template.
    pub fn save_api_base_url_to(path: &Path, url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let parsed = parse_base_url(url)?;

        let contents = if path.exists() {
            let user_config = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            merge_with_template(&user_config)?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["api_base_url"] = value(parsed.as_str().trim_end_matches('/'));

        Self::write_config(path, &doc.to_string())
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            create_path: Self::DEFAULT_CREATE_PATH.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
            notifications: NotificationConfig::default(),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("Invalid API base URL: {raw}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("API base URL must use http or https: {raw}");
    }
    if url.cannot_be_a_base() {
        anyhow::bail!("API base URL cannot be used as a base: {raw}");
    }
    Ok(url)
}
