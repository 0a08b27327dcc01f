use axum::http::HeaderValue;
use axum_helpers::parse_allowed_origins;
use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, env_parse_or, server::ServerConfig};
use database::mongodb::MongoConfig;
use domain_items::mongodb::DEFAULT_COLLECTION;
use std::path::PathBuf;

pub use core_config::Environment;

const DEFAULT_UPLOAD_MAX_BYTES: usize = 10 * 1024 * 1024;

/// Where item photos are written and how large a form may be
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

impl FromEnv for UploadConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dir: PathBuf::from(env_or_default("UPLOAD_DIR", "uploads")),
            max_bytes: env_parse_or("UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES)?,
        })
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub uploads: UploadConfig,
    /// Directory holding the landing page
    pub static_dir: PathBuf,
    pub items_collection: String,
    /// Empty means any origin
    pub allowed_origins: Vec<HeaderValue>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let app = app_info!();
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?.with_app_name(app.name);
        let server = ServerConfig::from_env()?;
        let uploads = UploadConfig::from_env()?;

        let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGIN") {
            Ok(raw) => parse_allowed_origins(&raw)
                .map_err(|e| eyre::eyre!("Invalid CORS_ALLOWED_ORIGIN: {e}"))?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            app,
            mongodb,
            server,
            environment,
            uploads,
            static_dir: PathBuf::from(env_or_default("STATIC_DIR", "static")),
            items_collection: env_or_default("ITEMS_COLLECTION", DEFAULT_COLLECTION),
            allowed_origins,
        })
    }
}
