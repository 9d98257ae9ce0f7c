use shared_types::{AppConfig, FeatureFlags};

/// Path to the feature-flag file, relative to the working directory.
const CONFIG_PATH: &str = "config.toml";

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";
const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Which browser origins may call the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Development mode: every origin is accepted.
    AllowAny,
    /// Only the listed origins are accepted.
    Origins(Vec<String>),
}

impl CorsPolicy {
    /// Build the policy from a comma-separated origin list and the
    /// deployment environment name.
    pub fn from_settings(origins: &str, environment: Option<&str>) -> Self {
        let origins: Vec<String> = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        if environment == Some("development") || origins.iter().any(|o| o == "*") {
            CorsPolicy::AllowAny
        } else {
            CorsPolicy::Origins(origins)
        }
    }
}

/// Process-wide settings, read once at startup and handed to the router.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: String,
    pub cors: CorsPolicy,
    pub features: FeatureFlags,
}

impl ServerConfig {
    /// Read configuration from the environment (and `.env` if present) plus
    /// the feature flags in `config.toml`.
    pub fn from_env() -> Self {
        // Load .env file if present (ignored in production where env vars are set directly).
        let _ = dotenvy::dotenv();

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let origins =
            std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string());
        let environment = std::env::var("ENVIRONMENT").ok();
        let cors = CorsPolicy::from_settings(&origins, environment.as_deref());

        Self {
            database_url,
            max_connections,
            bind_addr,
            cors,
            features: load_feature_flags(CONFIG_PATH),
        }
    }

    /// Configuration for tests and embedding: in-memory database, default
    /// origins, no optional features.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            bind_addr: "127.0.0.1:0".to_string(),
            cors: CorsPolicy::from_settings(DEFAULT_CORS_ORIGINS, None),
            features: FeatureFlags::default(),
        }
    }
}

/// Parse feature flags from a TOML file. A missing or unparseable file
/// disables every flag.
pub fn load_feature_flags(path: &str) -> FeatureFlags {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
            Ok(config) => {
                tracing::info!(flags = ?config.features, "Loaded feature flags from {path}");
                config.features
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse {path}, defaulting all flags off");
                FeatureFlags::default()
            }
        },
        Err(e) => {
            tracing::info!(error = %e, "{path} not found, defaulting all flags off");
            FeatureFlags::default()
        }
    }
}
