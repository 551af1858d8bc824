//! Configuration types for orderdash.
//!
//! [`Config::load`] layers, lowest priority first: the embedded defaults, the
//! config file (`~/.config/orderdash/config.toml`, created with the defaults
//! if it does not yet exist, or an explicit path), then environment variables
//! of the form `ORDERDASH__SOURCE__URI`. [`Config::defaults`] returns the
//! embedded defaults without touching the filesystem (useful in tests).

use crate::metrics::{DashboardOptions, SortKey};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[source]
kind       = "mongodb"
uri        = "mongodb://localhost:27017"
database   = "orders"
collection = "orders"
path       = "orders.json"

[refresh]
cache_ttl_secs    = 30
auto_refresh_secs = 30

[dashboard]
top_items           = 10
recent_orders       = 50
revenue_bucket_secs = 60
currency_symbol     = "$"

[ui]
timestamp_format = "%Y-%m-%d %H:%M:%S"
theme            = "default"

[server]
bind = "127.0.0.1:8080"

[keybindings]
refresh   = "r"
sort_next = "s"
sort_flip = "S"
"#;

const ENV_PREFIX: &str = "ORDERDASH";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

/// Which document source backs the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Mongodb,
    File,
}

/// `[source]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_kind")]
    pub kind: SourceKind,
    #[serde(default = "default_uri")]
    pub uri: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    /// JSON file read when `kind = "file"`.
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

fn default_source_kind() -> SourceKind { SourceKind::Mongodb }
fn default_uri() -> String { "mongodb://localhost:27017".to_string() }
fn default_database() -> String { "orders".to_string() }
fn default_collection() -> String { "orders".to_string() }
fn default_path() -> PathBuf { PathBuf::from("orders.json") }

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: default_source_kind(),
            uri: default_uri(),
            database: default_database(),
            collection: default_collection(),
            path: default_path(),
        }
    }
}

/// `[refresh]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// How long a fetched batch is served before the source is queried again.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Timer interval between automatic refreshes.
    #[serde(default = "default_auto_refresh_secs")]
    pub auto_refresh_secs: u64,
}

fn default_cache_ttl_secs() -> u64 { 30 }
fn default_auto_refresh_secs() -> u64 { 30 }

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            auto_refresh_secs: default_auto_refresh_secs(),
        }
    }
}

impl RefreshConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn auto_refresh(&self) -> Duration {
        Duration::from_secs(self.auto_refresh_secs.max(1))
    }
}

/// `[dashboard]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_top_items")]
    pub top_items: usize,
    #[serde(default = "default_recent_orders")]
    pub recent_orders: usize,
    #[serde(default = "default_revenue_bucket_secs")]
    pub revenue_bucket_secs: u32,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_top_items() -> usize { 10 }
fn default_recent_orders() -> usize { 50 }
fn default_revenue_bucket_secs() -> u32 { 60 }
fn default_currency_symbol() -> String { "$".to_string() }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_items: default_top_items(),
            recent_orders: default_recent_orders(),
            revenue_bucket_secs: default_revenue_bucket_secs(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl DashboardConfig {
    pub fn options(&self) -> DashboardOptions {
        DashboardOptions {
            top_items: self.top_items,
            recent_orders: self.recent_orders,
            revenue_bucket: chrono::Duration::seconds(i64::from(self.revenue_bucket_secs)),
            sort: SortKey::default(),
        }
    }
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_timestamp_format() -> String { "%Y-%m-%d %H:%M:%S".to_string() }
fn default_theme() -> String { "default".to_string() }

impl Default for UiConfig {
    fn default() -> Self {
        Self { timestamp_format: default_timestamp_format(), theme: default_theme() }
    }
}

/// `[server]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "127.0.0.1:8080".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

/// `[keybindings]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct KeybindingsConfig {
    #[serde(default = "default_refresh_key")]
    pub refresh: String,
    #[serde(default = "default_sort_next_key")]
    pub sort_next: String,
    #[serde(default = "default_sort_flip_key")]
    pub sort_flip: String,
}

fn default_refresh_key() -> String { "r".to_string() }
fn default_sort_next_key() -> String { "s".to_string() }
fn default_sort_flip_key() -> String { "S".to_string() }

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            refresh: default_refresh_key(),
            sort_next: default_sort_next_key(),
            sort_flip: default_sort_flip_key(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load configuration, layered on top of the built-in defaults.
    ///
    /// With `path = None` the user config file is used and created with the
    /// defaults if it does not exist. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => {
                let path = config_path();
                if !path.exists() {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
                }
                config::File::from(path).required(false)
            }
        };

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("orderdash")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
