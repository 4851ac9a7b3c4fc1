//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: `LIBRARY_`, nested keys split on `__`,
//!    e.g. `LIBRARY_PAGING__MAX_PAGE_SIZE=50`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/library-api/{service_name}/config.toml
//! 4. System directory: /etc/library-api/{service_name}/config.toml
//! 5. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{Error, Result};

const ENV_PREFIX: &str = "LIBRARY_";
const CONFIG_DIR_PREFIX: &str = "library-api";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Collection paging limits and defaults
    #[serde(default)]
    pub paging: PagingConfig,

    /// Hypermedia link settings
    #[serde(default)]
    pub links: LinkConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Log level or `EnvFilter` directive (e.g. `info,library_api=debug`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

/// Collection paging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Page size when the client sends none
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,

    /// Largest page size a client may ask for; larger requests are clamped
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,

    /// Sort applied when the client sends no `orderBy`
    #[serde(default = "default_order_by")]
    pub default_order_by: String,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            default_order_by: default_order_by(),
        }
    }
}

/// Hypermedia link configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Scheme, host and optional path prefix that link hrefs are built on
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// `Accept` media type that selects hypermedia responses
    #[serde(default = "default_hypermedia_media_type")]
    pub hypermedia_media_type: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            hypermedia_media_type: default_hypermedia_media_type(),
        }
    }
}

impl LinkConfig {
    /// The parsed base URL
    pub fn parsed_base_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_page_size() -> u64 {
    10
}

fn default_max_page_size() -> u64 {
    20
}

fn default_order_by() -> String {
    "name".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_hypermedia_media_type() -> String {
    "application/vnd.library.hateoas+json".to_string()
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Environment variables (`LIBRARY_` prefix) override all file-based configs.
    pub fn load() -> Result<Self> {
        let service_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| CONFIG_DIR_PREFIX.to_string());

        Self::load_for_service(&service_name)
    }

    /// Load configuration for a specific service name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so later files override earlier ones
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Bypasses the XDG and system directories. Environment variables still
    /// apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the handlers cannot work with
    pub fn validate(&self) -> Result<()> {
        let paging = &self.paging;
        if paging.max_page_size == 0 {
            return Err(Error::InvalidConfig(
                "paging.max_page_size must be at least 1".to_string(),
            ));
        }
        if paging.default_page_size == 0 || paging.default_page_size > paging.max_page_size {
            return Err(Error::InvalidConfig(format!(
                "paging.default_page_size must be between 1 and {}",
                paging.max_page_size
            )));
        }
        if paging.default_order_by.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "paging.default_order_by must not be empty".to_string(),
            ));
        }
        self.links.parsed_base_url()?;
        Ok(())
    }

    /// Possible config file paths for a service, highest priority first
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX);
        let config_file_path = Path::new(service_name).join("config.toml");
        if let Ok(path) = xdg_dirs.place_config_file(&config_file_path) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc")
                .join(CONFIG_DIR_PREFIX)
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: CONFIG_DIR_PREFIX.to_string(),
                log_level: default_log_level(),
                environment: default_environment(),
            },
            paging: PagingConfig::default(),
            links: LinkConfig::default(),
        }
    }
}
