//! Configuration module
//!
//! `StoreConfig` carries everything the store itself consumes; `Config` wraps
//! it with the settings of the HTTP service (port, auth backend, CORS, logging).
//! Both are read from the environment, with `.env` loaded through `dotenvy`.

use std::env;
use std::path::PathBuf;

use crate::models::SizeLabel;

// Common constants
const SERVER_PORT: u16 = 3000;
const MAX_FILE_SIZE_MB: usize = 10;
const MAX_CONCURRENT_PROCESSING: usize = 4;
const AUTH_TIMEOUT_SECS: u64 = 5;
const DEFAULT_RESOURCES: &str = "models,vehicles";
const DEFAULT_IMAGE_SIZES: &str = "500x400,400x300";
const DEFAULT_IMAGE_EXTENSIONS: &str = "png,jpg,jpeg,gif,webp";
const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Settings consumed by the image store core.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Filesystem root under which resource directories live.
    pub store_root: PathBuf,
    pub allowed_resources: Vec<String>,
    /// Ordered list of derivative sizes generated on upload.
    pub size_labels: Vec<SizeLabel>,
    /// Extension mask used by the catalog to recognize originals.
    pub image_extensions: Vec<String>,
    pub jpeg_quality: u8,
    pub max_file_size_bytes: usize,
    /// Upper bound on decode/encode work running at once.
    pub max_concurrent_processing: usize,
}

impl StoreConfig {
    /// Defaults matching the stock deployment, rooted at `store_root`.
    pub fn new(store_root: impl Into<PathBuf>) -> Self {
        Self {
            store_root: store_root.into(),
            allowed_resources: split_list(DEFAULT_RESOURCES),
            size_labels: vec![SizeLabel::new(500, 400), SizeLabel::new(400, 300)],
            image_extensions: split_list(DEFAULT_IMAGE_EXTENSIONS),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            max_concurrent_processing: MAX_CONCURRENT_PROCESSING,
        }
    }

    pub fn with_sizes(mut self, size_labels: Vec<SizeLabel>) -> Self {
        self.size_labels = size_labels;
        self
    }

    pub fn with_resources(mut self, resources: &[&str]) -> Self {
        self.allowed_resources = resources.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.allowed_resources.is_empty() {
            return Err(anyhow::anyhow!("RESOURCES must name at least one resource type"));
        }

        if let Some(bad) = self
            .allowed_resources
            .iter()
            .find(|r| r.is_empty() || r.contains(['/', '\\']) || r.as_str() == "..")
        {
            return Err(anyhow::anyhow!("Invalid resource type name: '{}'", bad));
        }

        if self.size_labels.is_empty() {
            return Err(anyhow::anyhow!("IMAGE_SIZES must contain at least one WIDTHxHEIGHT label"));
        }

        if let Some(empty) = self.size_labels.iter().find(|l| l.is_empty()) {
            return Err(anyhow::anyhow!("Size label {} has a zero dimension", empty));
        }

        if self.image_extensions.is_empty() {
            return Err(anyhow::anyhow!("IMAGE_EXTENSIONS must not be empty"));
        }

        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(anyhow::anyhow!("JPEG_QUALITY must be between 1 and 100"));
        }

        if self.max_concurrent_processing == 0 {
            return Err(anyhow::anyhow!("MAX_CONCURRENT_PROCESSING must be at least 1"));
        }

        Ok(())
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    /// URL prefix prepended to asset paths in listings.
    pub public_base_url: String,
    pub log_format: LogFormat,
    pub auth_enabled: bool,
    pub auth_backend_url: String,
    pub auth_timeout_secs: u64,
    pub store: StoreConfig,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid port number, got '{}'", port))?,
            None => SERVER_PORT,
        };

        let cors_origins = split_list(&lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string()));

        let public_dir = lookup("PUBLIC_DIR").unwrap_or_else(|| "./public".to_string());
        let store_root = lookup("IMAGES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(&public_dir).join("images"));

        let public_base_url = lookup("PUBLIC_BASE_URL").unwrap_or_else(|| "/images".to_string());

        let log_format = match lookup("LOG_FORMAT").map(|f| f.to_lowercase()).as_deref() {
            None | Some("pretty") | Some("text") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(anyhow::anyhow!("Invalid LOG_FORMAT: {}", other)),
        };

        let auth_enabled = lookup("AUTH_ENABLED")
            .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no" | "off"))
            .unwrap_or(true);

        let auth_backend_url = lookup("AUTH_BACKEND_URL")
            .or_else(|| lookup("BACK_HOST"))
            .unwrap_or_else(|| "http://localhost:3000".to_string());

        let auth_timeout_secs = lookup("AUTH_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(AUTH_TIMEOUT_SECS);

        let size_labels = SizeLabel::parse_list(
            &lookup("IMAGE_SIZES").unwrap_or_else(|| DEFAULT_IMAGE_SIZES.to_string()),
        )
        .map_err(|e| anyhow::anyhow!("IMAGE_SIZES: {}", e))?;

        let jpeg_quality = match lookup("JPEG_QUALITY") {
            Some(q) => parse_jpeg_quality(&q)?,
            None => DEFAULT_JPEG_QUALITY,
        };

        let max_file_size_mb = lookup("MAX_FILE_SIZE_MB")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(MAX_FILE_SIZE_MB);

        let max_concurrent_processing = lookup("MAX_CONCURRENT_PROCESSING")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(MAX_CONCURRENT_PROCESSING);

        let store = StoreConfig {
            store_root,
            allowed_resources: split_list(
                &lookup("RESOURCES").unwrap_or_else(|| DEFAULT_RESOURCES.to_string()),
            ),
            size_labels,
            image_extensions: split_list(
                &lookup("IMAGE_EXTENSIONS")
                    .unwrap_or_else(|| DEFAULT_IMAGE_EXTENSIONS.to_string()),
            )
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect(),
            jpeg_quality,
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            max_concurrent_processing,
        };

        Ok(Config {
            environment,
            server_port,
            cors_origins,
            public_base_url,
            log_format,
            auth_enabled,
            auth_backend_url,
            auth_timeout_secs,
            store,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.is_production() && !self.auth_enabled {
            return Err(anyhow::anyhow!("AUTH_ENABLED=false is not allowed in production"));
        }

        self.store.validate()
    }
}

/// Map a quality preset name or a plain number onto a JPEG quality.
pub fn parse_jpeg_quality(s: &str) -> Result<u8, anyhow::Error> {
    match s.trim().to_lowercase().as_str() {
        "normal" => Ok(75),
        "better" => Ok(85),
        "best" => Ok(95),
        "lighter" => Ok(65),
        "lightest" => Ok(50),
        other => other
            .parse::<u8>()
            .ok()
            .filter(|q| (1..=100).contains(q))
            .ok_or_else(|| anyhow::anyhow!("Invalid JPEG_QUALITY: {}", s)),
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}
