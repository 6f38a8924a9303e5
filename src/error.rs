use thiserror::Error;

/// Why a search attempt was turned away before reaching the listings API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchRejection {
    #[error("Please enter a location to search")]
    EmptyTerm,
    #[error("Please wait {wait_secs} seconds before searching again")]
    RateLimited { wait_secs: u64 },
    #[error("Search limit reached ({max} searches this session). Reload to reset.")]
    SessionCapReached { max: u32 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Could not determine a data directory for local storage")]
    NoDataDir,
}
