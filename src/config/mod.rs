//! Configuration loading and management
//!
//! Settings come from an optional YAML file named by `LOGISTICS_CONFIG`,
//! then environment variables override individual values:
//!
//! | Variable | Setting |
//! |---|---|
//! | `HOST` | `server.host` |
//! | `PORT` | `server.port` |
//! | `MONGO_URI` | `storage.mongo_uri` |
//! | `MONGO_DATABASE` | `storage.database` |
//! | `JWT_SECRET` | `auth.jwt_secret` |
//! | `GOOGLE_PLACES_API_KEY` | `places.api_key` |

use crate::core::error::ConfigError;
use crate::core::query::PaginationPolicy;
use crate::places::GOOGLE_PLACES_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the YAML configuration file
pub const CONFIG_PATH_ENV: &str = "LOGISTICS_CONFIG";

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Where records live; without `mongo_uri` the in-memory backend is used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub mongo_uri: Option<String>,
    pub database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mongo_uri: None,
            database: "logistics".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me".to_string(),
            token_ttl_minutes: 30,
            bcrypt_cost: 10,
        }
    }
}

/// Place lookup settings; without `api_key` a static lookup is used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: GOOGLE_PLACES_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        let policy = PaginationPolicy::default();
        Self {
            default_limit: policy.default_limit,
            max_limit: policy.max_limit,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub places: PlacesConfig,
    pub pagination: PaginationConfig,
}

impl AppConfig {
    /// Load from `LOGISTICS_CONFIG` (if set) and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_yaml_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })
    }

    /// Apply overrides from a variable source; empty values are ignored
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "PORT".to_string(),
                value: port.clone(),
                message: "must be a port number between 0 and 65535".to_string(),
            })?;
        }
        if let Some(uri) = var("MONGO_URI") {
            self.storage.mongo_uri = Some(uri);
        }
        if let Some(database) = var("MONGO_DATABASE") {
            self.storage.database = database;
        }
        if let Some(secret) = var("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(key) = var("GOOGLE_PLACES_API_KEY") {
            self.places.api_key = Some(key);
        }
        Ok(())
    }

    /// Reject settings no component can work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, value: String, message: &str| ConfigError::InvalidValue {
            field: field.to_string(),
            value,
            message: message.to_string(),
        };

        if self.auth.jwt_secret.is_empty() {
            return Err(invalid("auth.jwt_secret", String::new(), "must not be empty"));
        }
        if self.auth.token_ttl_minutes <= 0 {
            return Err(invalid(
                "auth.token_ttl_minutes",
                self.auth.token_ttl_minutes.to_string(),
                "must be positive",
            ));
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(invalid(
                "auth.bcrypt_cost",
                self.auth.bcrypt_cost.to_string(),
                "must be between 4 and 31",
            ));
        }
        if self.pagination.default_limit == 0 {
            return Err(invalid("pagination.default_limit", "0".to_string(), "must be positive"));
        }
        if self.pagination.max_limit < self.pagination.default_limit {
            return Err(invalid(
                "pagination.max_limit",
                self.pagination.max_limit.to_string(),
                "must not be below pagination.default_limit",
            ));
        }
        Ok(())
    }

    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn pagination_policy(&self) -> PaginationPolicy {
        PaginationPolicy {
            default_limit: self.pagination.default_limit,
            max_limit: self.pagination.max_limit,
        }
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.auth.token_ttl_minutes)
    }
}
