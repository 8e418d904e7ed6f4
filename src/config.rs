use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::Error;
use crate::types::Result;

/// Global application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// REST API settings
    pub api: ApiConfig,
    /// Issuance log settings
    pub storage: StorageConfig,
    /// Revocation-status service settings
    pub revocation: RevocationConfig,
    /// Bearer credential settings
    pub auth: AuthConfig,
    /// Index export settings
    #[serde(default)]
    pub index: IndexConfig,
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Application name
    pub app_name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines
    pub structured_logging: bool,
}

/// REST API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Listen address
    pub listen_addr: String,
    /// Listen port
    pub listen_port: u16,
    /// API path prefix
    pub path_prefix: String,
    /// Page size used when only `page` is supplied
    pub default_per_page: u32,
}

/// Issuance log settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database holding `realm_signing_log`
    pub database_path: PathBuf,
}

/// Revocation-status service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevocationConfig {
    /// Base URL; `/all` and `/update` are resolved against it
    pub base_url: String,
    /// Per-call timeout in seconds
    pub timeout_seconds: u64,
}

/// Bearer credential settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// ECDSA P-256 public key (PEM) used to verify tokens
    pub public_key_path: PathBuf,
    /// The single subject allowed to use the API
    pub allowed_subject: String,
    /// Token issuer that `/login` forwards to
    pub issuer_url: Option<String>,
    /// Skip TLS verification when talking to the token issuer
    pub issuer_accept_invalid_certs: bool,
}

/// Index export settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Where to write the index file at startup
    pub path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            general: GeneralConfig {
                app_name: "letsrevoke".to_string(),
                log_level: "info".to_string(),
                structured_logging: false,
            },
            api: ApiConfig {
                listen_addr: "127.0.0.1".to_string(),
                listen_port: 8888,
                path_prefix: "/api/v0".to_string(),
                default_per_page: 10,
            },
            storage: StorageConfig {
                database_path: PathBuf::from("./letswifi-dev.sqlite"),
            },
            revocation: RevocationConfig {
                base_url: "http://localhost:8889".to_string(),
                timeout_seconds: 30,
            },
            auth: AuthConfig {
                public_key_path: PathBuf::from("./jwt_public.pem"),
                allowed_subject: String::new(),
                issuer_url: None,
                issuer_accept_invalid_certs: false,
            },
            index: IndexConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, config file and environment
    ///
    /// The file is taken from `LETSREVOKE_CONFIG` or, failing that, the optional
    /// `config/default.*`.
    pub fn load() -> Result<Self> {
        let path = env::var("LETSREVOKE_CONFIG").ok();
        Self::load_from(path.as_deref())
    }

    /// Load configuration using an explicit config file
    pub fn load_from(path: Option<&str>) -> Result<Self> {
        use config::{Config as ConfigBuilder, Environment, File};

        let defaults = Config::default();
        let mut builder = ConfigBuilder::builder()
            .set_default("general.app_name", defaults.general.app_name)?
            .set_default("general.log_level", defaults.general.log_level)?
            .set_default("general.structured_logging", defaults.general.structured_logging)?
            .set_default("api.listen_addr", defaults.api.listen_addr)?
            .set_default("api.listen_port", i64::from(defaults.api.listen_port))?
            .set_default("api.path_prefix", defaults.api.path_prefix)?
            .set_default("api.default_per_page", i64::from(defaults.api.default_per_page))?
            .set_default("storage.database_path", defaults.storage.database_path.display().to_string())?
            .set_default("revocation.base_url", defaults.revocation.base_url)?
            .set_default("revocation.timeout_seconds", defaults.revocation.timeout_seconds as i64)?
            .set_default("auth.public_key_path", defaults.auth.public_key_path.display().to_string())?
            .set_default("auth.allowed_subject", defaults.auth.allowed_subject)?
            .set_default("auth.issuer_accept_invalid_certs", false)?;

        match path {
            Some(path) => {
                debug!("Loading configuration from {}", path);
                builder = builder.add_source(File::with_name(path));
            }
            None => {
                builder = builder.add_source(File::with_name("config/default").required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("LETSREVOKE")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: Config = builder.build()?.try_deserialize()?;

        apply_env_overrides(&mut config)?;
        validate_config(&config)?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Full REST API address
    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api.listen_addr, self.api.listen_port)
    }

    /// Timeout applied to each call to the revocation service
    pub fn revocation_timeout(&self) -> Duration {
        Duration::from_secs(self.revocation.timeout_seconds)
    }
}

/// Apply the environment variable names used by earlier deployments
fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Ok(url) = env::var("OCSP_URL") {
        config.revocation.base_url = url;
    }

    if let Ok(user) = env::var("JWT_USER") {
        config.auth.allowed_subject = user;
    }

    if let Ok(per_page) = env::var("PER_PAGE") {
        config.api.default_per_page = parse_per_page(&per_page)?;
    }

    if let Ok(url) = env::var("JWT_URL") {
        config.auth.issuer_url = Some(url);
    }

    Ok(())
}

fn parse_per_page(raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("Invalid PER_PAGE value: {:?}", raw)))
}

/// Validate configuration values
fn validate_config(config: &Config) -> Result<()> {
    if config.revocation.base_url.is_empty() {
        return Err(Error::Config("Revocation service URL cannot be empty".into()));
    }

    url::Url::parse(&config.revocation.base_url)
        .map_err(|e| Error::Config(format!("Invalid revocation service URL: {}", e)))?;

    if config.revocation.timeout_seconds == 0 {
        return Err(Error::Config("Revocation service timeout cannot be zero".into()));
    }

    if config.auth.allowed_subject.is_empty() {
        return Err(Error::Config("Allowed subject cannot be empty".into()));
    }

    if config.auth.public_key_path.as_os_str().is_empty() {
        return Err(Error::Config("Public key path cannot be empty".into()));
    }

    if config.api.default_per_page == 0 {
        return Err(Error::Config("Default page size must be positive".into()));
    }

    Ok(())
}
