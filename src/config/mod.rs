#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{
    parse_required_integer, validate_positive_number, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Large enough that a single request returns every server.
pub const DEFAULT_PER_PAGE: u64 = 99_999_999_999_999;
pub const DEFAULT_CONFIG_OPTION_ID: i64 = 1;
pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_KEY: &str = "PTERO_API_KEY";
pub const ENV_PANEL_URL: &str = "PTERO_URL";
pub const ENV_PER_PAGE: &str = "PTERO_PER_PAGE";
pub const ENV_SERVER_ID: &str = "PTERODACTYL_WHMCS_SERVER_ID";
pub const ENV_CONFIG_OPTION_ID: &str = "WHMCS_CONFIGOPTION_ID";
pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_PORT: &str = "DB_PORT";
pub const ENV_DB_NAME: &str = "DB_NAME";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_DB_CONNECT_TIMEOUT: &str = "DB_CONNECT_TIMEOUT";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub provisioning: ProvisioningConfig,
    pub billing: BillingConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// `tblhosting.server` of the panel this job mirrors.
    pub server_id: i64,
    /// `configid` of the memory configurable option group.
    #[serde(default = "default_config_option_id")]
    pub config_option_id: i64,
    /// How long to keep retrying the initial connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_per_page() -> u64 {
    DEFAULT_PER_PAGE
}

fn default_db_port() -> u16 {
    DEFAULT_DB_PORT
}

fn default_config_option_id() -> i64 {
    DEFAULT_CONFIG_OPTION_ID
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl fmt::Debug for ProvisioningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisioningConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("per_page", &self.per_page)
            .finish()
    }
}

impl fmt::Debug for BillingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BillingConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("server_id", &self.server_id)
            .field("config_option_id", &self.config_option_id)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// Seeds the process environment from `./.env` when one exists.
pub fn load_dotenv() {
    load_dotenv_from(None);
}

/// Seeds the process environment from `path`, or from `./.env` when `None`.
/// Variables already set are not overridden.
pub fn load_dotenv_from(path: Option<&Path>) {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|_| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match loaded {
        Ok(path) => tracing::debug!("Loaded .env file from {}", path.display()),
        Err(dotenvy::Error::Io(ref err)) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(".env file not found, continuing without it");
        }
        Err(e) => tracing::warn!("Couldn't load .env file: {}", e),
    }
}

impl SyncConfig {
    /// Seeds the environment from `./.env`, then reads `config_path` (TOML)
    /// or, without one, the environment itself.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_from(config_path, None)
    }

    /// Like [`SyncConfig::load`] with an explicit `.env` location. The `.env`
    /// file is applied first either way, so `${VAR}` placeholders in the TOML
    /// file can resolve from it.
    pub fn load_from(config_path: Option<&Path>, dotenv_path: Option<&Path>) -> Result<Self> {
        load_dotenv_from(dotenv_path);
        match config_path {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                Self::from_file(path)
            }
            None => Self::from_env(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Only the backend id is required;
    /// other missing values surface later as request or connection failures.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_id = parse_required_integer(ENV_SERVER_ID, lookup(ENV_SERVER_ID).as_deref())?;

        let config_option_id = match lookup(ENV_CONFIG_OPTION_ID) {
            Some(raw) => parse_required_integer(ENV_CONFIG_OPTION_ID, Some(&raw))?,
            None => DEFAULT_CONFIG_OPTION_ID,
        };

        let per_page = match lookup(ENV_PER_PAGE) {
            Some(raw) => parse_unsigned(ENV_PER_PAGE, &raw)?,
            None => DEFAULT_PER_PAGE,
        };

        let port = match lookup(ENV_DB_PORT) {
            Some(raw) => parse_unsigned(ENV_DB_PORT, &raw)?,
            None => DEFAULT_DB_PORT,
        };

        let connect_timeout_secs = match lookup(ENV_DB_CONNECT_TIMEOUT) {
            Some(raw) => parse_unsigned(ENV_DB_CONNECT_TIMEOUT, &raw)?,
            None => DEFAULT_CONNECT_TIMEOUT_SECS,
        };

        Ok(Self {
            provisioning: ProvisioningConfig {
                base_url: lookup(ENV_PANEL_URL).unwrap_or_default(),
                api_key: lookup(ENV_API_KEY).unwrap_or_default(),
                per_page,
            },
            billing: BillingConfig {
                host: lookup(ENV_DB_HOST).unwrap_or_default(),
                port,
                database: lookup(ENV_DB_NAME).unwrap_or_default(),
                username: lookup(ENV_DB_USER).unwrap_or_default(),
                password: lookup(ENV_DB_PASSWORD).unwrap_or_default(),
                server_id,
                config_option_id,
                connect_timeout_secs,
            },
        })
    }
}

fn parse_unsigned<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| SyncError::InvalidConfigValueError {
            field: field.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<()> {
        validate_url("provisioning.base_url", &self.provisioning.base_url)?;
        validate_positive_number(
            "provisioning.per_page",
            i64::try_from(self.provisioning.per_page).unwrap_or(i64::MAX),
            1,
        )?;
        validate_positive_number("billing.config_option_id", self.billing.config_option_id, 1)?;
        Ok(())
    }
}
