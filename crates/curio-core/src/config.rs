//! Configuration module
//!
//! This module provides configuration structures for the API server,
//! including database, authentication, item store and media backend settings.

use std::env;
use std::str::FromStr;

use crate::storage_types::MediaBackendKind;

// Common constants
const SERVER_PORT: u16 = 8000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_SIZE_BYTES: usize = 10 * 1024 * 1024;
const CLOUD_API_BASE: &str = "https://api.cloudinary.com/v1_1";
const LOCAL_UPLOAD_ROOT: &str = "uploads";
const LOCAL_UPLOAD_BASE_URL: &str = "/uploads";
const MEDIA_FOLDER: &str = "items";

/// Base configuration for the HTTP server
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub environment: String,
    pub log_format: String,
}

/// Which item store backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStoreKind {
    Postgres,
    Memory,
}

impl FromStr for ItemStoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(ItemStoreKind::Postgres),
            "memory" => Ok(ItemStoreKind::Memory),
            _ => Err(anyhow::anyhow!("Invalid item store: {}", s)),
        }
    }
}

/// Credentials for the hosted media backend.
#[derive(Clone)]
pub struct CloudCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for CloudCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Upload limits and media backend settings
#[derive(Clone, Debug)]
pub struct MediaSettings {
    /// Present only when all of CLOUD_NAME, CLOUD_KEY and CLOUD_SECRET are set.
    pub cloud: Option<CloudCredentials>,
    /// True when some but not all cloud variables were set.
    pub cloud_partially_configured: bool,
    pub cloud_api_base: String,
    pub max_upload_size_bytes: usize,
    pub local_upload_root: String,
    pub local_upload_base_url: String,
    pub media_folder: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            cloud: None,
            cloud_partially_configured: false,
            cloud_api_base: CLOUD_API_BASE.to_string(),
            max_upload_size_bytes: MAX_UPLOAD_SIZE_BYTES,
            local_upload_root: LOCAL_UPLOAD_ROOT.to_string(),
            local_upload_base_url: LOCAL_UPLOAD_BASE_URL.to_string(),
            media_folder: MEDIA_FOLDER.to_string(),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub item_store: ItemStoreKind,
    pub database_url: Option<String>,
    pub media: MediaSettings,
}

/// Read the first non-empty variable among `names`.
fn env_any(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;

        let item_store = match env::var("ITEM_STORE") {
            Ok(value) => value.parse::<ItemStoreKind>()?,
            Err(_) => ItemStoreKind::Postgres,
        };

        let base = BaseConfig {
            server_port: env_parse("SERVER_PORT", SERVER_PORT),
            cors_origins,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: env_parse("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            jwt_secret,
            environment,
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        };

        let cloud_name = env_any(&["CLOUD_NAME", "CLOUDINARY_CLOUD_NAME"]);
        let cloud_key = env_any(&["CLOUD_KEY", "CLOUDINARY_API_KEY"]);
        let cloud_secret = env_any(&["CLOUD_SECRET", "CLOUDINARY_API_SECRET"]);
        let (cloud, cloud_partially_configured) = Self::cloud_credentials(
            cloud_name,
            cloud_key,
            cloud_secret,
        );

        let media = MediaSettings {
            cloud,
            cloud_partially_configured,
            cloud_api_base: env::var("CLOUD_API_BASE")
                .unwrap_or_else(|_| CLOUD_API_BASE.to_string()),
            max_upload_size_bytes: env_parse("MAX_UPLOAD_SIZE_BYTES", MAX_UPLOAD_SIZE_BYTES),
            local_upload_root: env::var("LOCAL_UPLOAD_ROOT")
                .unwrap_or_else(|_| LOCAL_UPLOAD_ROOT.to_string()),
            local_upload_base_url: env::var("LOCAL_UPLOAD_BASE_URL")
                .unwrap_or_else(|_| LOCAL_UPLOAD_BASE_URL.to_string()),
            media_folder: env::var("MEDIA_FOLDER").unwrap_or_else(|_| MEDIA_FOLDER.to_string()),
        };

        let config = Config {
            base,
            item_store,
            database_url: env::var("DATABASE_URL").ok(),
            media,
        };

        config.validate()?;
        Ok(config)
    }

    /// All-or-nothing: the cloud backend is only selected when every credential is present.
    pub fn cloud_credentials(
        cloud_name: Option<String>,
        api_key: Option<String>,
        api_secret: Option<String>,
    ) -> (Option<CloudCredentials>, bool) {
        match (cloud_name, api_key, api_secret) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => (
                Some(CloudCredentials {
                    cloud_name,
                    api_key,
                    api_secret,
                }),
                false,
            ),
            (None, None, None) => (None, false),
            _ => (None, true),
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if self.item_store == ItemStoreKind::Postgres {
            match self.database_url.as_deref() {
                Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {}
                _ => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ));
                }
            }
        }

        if self.media.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_UPLOAD_SIZE_BYTES must be greater than zero"
            ));
        }

        if self.media.media_folder.contains("..") || self.media.media_folder.starts_with('/') {
            return Err(anyhow::anyhow!(
                "MEDIA_FOLDER must be a relative folder name"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Backend selected by configuration presence.
    pub fn media_backend(&self) -> MediaBackendKind {
        if self.media.cloud.is_some() {
            MediaBackendKind::Cloud
        } else {
            MediaBackendKind::Local
        }
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.base.jwt_secret
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.base.db_timeout_seconds
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn log_format(&self) -> &str {
        &self.base.log_format
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.media.max_upload_size_bytes
    }

    pub fn local_upload_root(&self) -> &str {
        &self.media.local_upload_root
    }

    pub fn local_upload_base_url(&self) -> &str {
        &self.media.local_upload_base_url
    }

    pub fn media_folder(&self) -> &str {
        &self.media.media_folder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            base: BaseConfig {
                server_port: 8000,
                cors_origins: vec!["*".to_string()],
                db_max_connections: 5,
                db_timeout_seconds: 30,
                jwt_secret: "a".repeat(32),
                environment: "development".to_string(),
                log_format: "compact".to_string(),
            },
            item_store: ItemStoreKind::Memory,
            database_url: None,
            media: MediaSettings::default(),
        }
    }

    #[test]
    fn test_cloud_requires_all_three_credentials() {
        let (creds, partial) = Config::cloud_credentials(
            Some("demo".to_string()),
            Some("key".to_string()),
            Some("secret".to_string()),
        );
        assert!(creds.is_some());
        assert!(!partial);

        let (creds, partial) =
            Config::cloud_credentials(Some("demo".to_string()), None, Some("secret".to_string()));
        assert!(creds.is_none());
        assert!(partial);

        let (creds, partial) = Config::cloud_credentials(None, None, None);
        assert!(creds.is_none());
        assert!(!partial);
    }

    #[test]
    fn test_media_backend_selection() {
        let mut config = test_config();
        assert_eq!(config.media_backend(), MediaBackendKind::Local);

        config.media.cloud = Some(CloudCredentials {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        });
        assert_eq!(config.media_backend(), MediaBackendKind::Cloud);
    }

    #[test]
    fn test_media_defaults() {
        let media = MediaSettings::default();
        assert_eq!(media.max_upload_size_bytes, 10 * 1024 * 1024);
        assert_eq!(media.local_upload_root, "uploads");
        assert_eq!(media.media_folder, "items");
    }

    #[test]
    fn test_validate_rejects_short_jwt_secret() {
        let mut config = test_config();
        config.base.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_database_url_for_postgres() {
        let mut config = test_config();
        config.item_store = ItemStoreKind::Postgres;
        assert!(config.validate().is_err());

        config.database_url = Some("postgresql://localhost/curio".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_traversal_in_media_folder() {
        let mut config = test_config();
        config.media.media_folder = "../etc".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = CloudCredentials {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "topsecret".to_string(),
        };
        assert!(!format!("{:?}", creds).contains("topsecret"));
    }
}
