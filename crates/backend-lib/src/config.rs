// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::auth::password::DEFAULT_BCRYPT_COST;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// HTTP server settings
    pub server: ServerSettings,
    /// Storage settings
    pub storage: StorageSettings,
    /// Logging settings
    pub log: LogSettings,
    /// Token and password-hashing settings
    pub auth: AuthSettings,
    /// Rate limiting settings
    pub rate_limit: RateLimitSettings,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Server bind address
    pub bind_addr: SocketAddr,
}

/// Storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Data directory path
    pub data_dir: PathBuf,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

/// Token and password-hashing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Shared secret used to sign bearer tokens
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_ttl_secs: u64,
    /// bcrypt cost factor (4..=31)
    pub bcrypt_cost: u32,
}

/// Rate limiting settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Window length in seconds
    pub window_secs: u64,
    /// Maximum requests per client per window
    pub max_requests: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                bind_addr: "127.0.0.1:3000".parse().unwrap(),
            },
            storage: StorageSettings {
                data_dir: PathBuf::from("data"),
            },
            log: LogSettings {
                level: "info".to_string(),
            },
            auth: AuthSettings::default(),
            rate_limit: RateLimitSettings::default(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: "local-development-secret-change-in-production".to_string(),
            token_ttl_secs: 60 * 60 * 24, // 24 hours
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_requests: 100,
        }
    }
}

impl Settings {
    /// Load settings from config files and environment variables
    ///
    /// Later sources override earlier ones: defaults, then `config.toml` /
    /// `config.yaml` / `config.json`, then `REELSEARCH_`-prefixed environment
    /// variables (`__` separates nesting, e.g. `REELSEARCH_AUTH__JWT_SECRET`).
    pub fn load() -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"))
            .merge(Yaml::file("config.yaml"))
            .merge(Json::file("config.json"))
            .merge(Env::prefixed("REELSEARCH_").split("__"))
            .extract()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from an explicit TOML file plus the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("REELSEARCH_").split("__"))
            .extract()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject configurations the server cannot safely run with
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            LOG_LEVELS.contains(&self.log.level.as_str()),
            "log.level must be one of {LOG_LEVELS:?}"
        );
        anyhow::ensure!(
            !self.auth.jwt_secret.is_empty(),
            "auth.jwt_secret must not be empty"
        );
        anyhow::ensure!(
            (4..=31).contains(&self.auth.bcrypt_cost),
            "auth.bcrypt_cost must be between 4 and 31"
        );
        anyhow::ensure!(
            self.auth.token_ttl_secs > 0,
            "auth.token_ttl_secs must be positive"
        );
        anyhow::ensure!(
            self.rate_limit.window_secs > 0,
            "rate_limit.window_secs must be positive"
        );
        anyhow::ensure!(
            self.rate_limit.max_requests > 0,
            "rate_limit.max_requests must be positive"
        );
        Ok(())
    }
}
