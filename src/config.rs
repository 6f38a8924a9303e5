use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const APP_USER_AGENT: &str = concat!("property-scout/", env!("CARGO_PKG_VERSION"));

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub endpoints: EndpointsConfig,
    pub search: SearchConfig,
    pub suggestions: SuggestionConfig,
    pub storage: StorageConfig,
    /// Serve listings from the built-in fake source instead of the metered API
    pub use_mock_data: bool,
}

/// External service locations and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub nominatim_url: String,
    pub postcodes_url: String,
    pub listings_url: String,
    pub listings_host: String,
    pub listings_api_key: Option<String>,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            nominatim_url: "https://nominatim.openstreetmap.org".into(),
            postcodes_url: "https://api.postcodes.io".into(),
            listings_url: "https://zoopla.p.rapidapi.com".into(),
            listings_host: "zoopla.p.rapidapi.com".into(),
            listings_api_key: None,
            user_agent: APP_USER_AGENT.into(),
            timeout_secs: 30,
        }
    }
}

impl EndpointsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Throttling and filtering for the search orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub rate_limit_ms: u64,
    pub max_searches_per_session: u32,
    pub page_size: u32,
    pub filters: FilterPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            rate_limit_ms: 2000,
            max_searches_per_session: 5,
            page_size: 40,
            filters: FilterPolicy::default(),
        }
    }
}

impl SearchConfig {
    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}

/// Which optional bounds are enforced when filtering results
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterPolicy {
    pub bathrooms: bool,
    pub square_footage: bool,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            bathrooms: true,
            square_footage: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    pub debounce_ms: u64,
    pub min_chars: usize,
    pub limit: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_chars: 2,
            limit: 5,
        }
    }
}

impl SuggestionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Local storage file; defaults to the platform data directory
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load from an optional TOML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("PROPERTY_SCOUT_LISTINGS_API_KEY").filter(|k| !k.is_empty()) {
            self.endpoints.listings_api_key = Some(key);
        }
        if let Some(flag) = var("PROPERTY_SCOUT_MOCK_DATA") {
            self.use_mock_data = matches!(flag.as_str(), "1" | "true" | "yes");
        }
        if let Some(path) = var("PROPERTY_SCOUT_STORAGE") {
            self.storage.path = Some(PathBuf::from(path));
        }
    }

    /// Resolve the local storage file path
    pub fn storage_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.storage.path {
            return Ok(path.clone());
        }
        let dirs = directories::ProjectDirs::from("dev", "property-scout", "property-scout")
            .ok_or(ConfigError::NoDataDir)?;
        Ok(dirs.data_dir().join("local_storage.json"))
    }
}
