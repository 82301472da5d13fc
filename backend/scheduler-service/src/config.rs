/// Configuration management for scheduler-service
///
/// This module handles loading and managing configuration from environment
/// variables.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Storage backend selection
    pub storage: StorageConfig,
    /// Object storage (S3) configuration
    pub media: MediaConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Which backing store to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// PostgreSQL plus S3 object storage
    Postgres,
    /// In-process stores, no external services (local development and tests)
    Memory,
}

/// Storage backend selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub mode: StorageMode,
}

/// Object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// S3 bucket holding uploaded media
    pub bucket: String,
    /// Base URL under which stored objects are publicly reachable
    pub public_base_url: String,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret used to validate bearer tokens
    pub jwt_secret: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let is_production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("SCHEDULER_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("SCHEDULER_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8086),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if is_production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if is_production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/scheduler".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            storage: {
                let raw = std::env::var("STORAGE_MODE").unwrap_or_else(|_| "postgres".to_string());
                let mode = match raw.to_ascii_lowercase().as_str() {
                    "postgres" => StorageMode::Postgres,
                    "memory" => StorageMode::Memory,
                    other => return Err(format!("Unknown STORAGE_MODE '{}'", other)),
                };
                if is_production && mode == StorageMode::Memory {
                    return Err("STORAGE_MODE=memory is not allowed in production".to_string());
                }
                StorageConfig { mode }
            },
            media: MediaConfig {
                bucket: std::env::var("MEDIA_BUCKET").unwrap_or_else(|_| "scheduler-media".to_string()),
                public_base_url: std::env::var("MEDIA_PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:9000/scheduler-media".to_string()),
            },
            auth: {
                let jwt_secret = match std::env::var("JWT_SECRET") {
                    Ok(value) if !value.trim().is_empty() => value,
                    _ if is_production => {
                        return Err("JWT_SECRET must be set in production".to_string())
                    }
                    _ => "dev-only-secret".to_string(),
                };
                AuthConfig { jwt_secret }
            },
        })
    }
}
