//! Configuration read from environment variables.

use std::time::Duration;

use clap::Parser;
use secrecy::{ExposeSecret, SecretString};

use crate::client::{Auth, LookupClient, LookupError};
use crate::domain::{LookupMethod, ValidationError};
use crate::telemetry::TelemetryConfig;

/// Name reported as the program name to the argument parser.
const SERVICE_NAME: &str = "phone-lookup";

/// Lookup function configuration.
///
/// Only environment variables are read; the hosting platform passes no arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = SERVICE_NAME, about = "Phone number lookup function")]
pub struct Config {
    /// Twilio account SID
    #[arg(long, env = "TWILIO_ACCOUNT_SID")]
    pub account_sid: Option<String>,

    /// Twilio auth token
    #[arg(long, env = "TWILIO_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<SecretString>,

    /// Twilio API key SID (used instead of the auth token when set with a secret)
    #[arg(long, env = "TWILIO_API_KEY")]
    pub api_key: Option<String>,

    /// Twilio API key secret
    #[arg(long, env = "TWILIO_API_SECRET", hide_env_values = true)]
    pub api_secret: Option<SecretString>,

    /// Lookup API base URL
    #[arg(long, env = "LOOKUP_BASE_URL", default_value = "https://lookups.twilio.com")]
    pub base_url: String,

    /// Lookup methods tried in order (comma-separated)
    #[arg(
        long,
        env = "LOOKUP_METHODS",
        value_delimiter = ',',
        default_values = ["v2-line-type", "v2-basic", "v1-carrier"]
    )]
    pub methods: Vec<LookupMethod>,

    /// Per-request timeout in seconds
    #[arg(long, env = "LOOKUP_TIMEOUT_SECS", default_value = "10")]
    pub timeout_secs: u64,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(long, env = "LOG_LEVEL", default_value = "INFO")]
    pub log_level: String,

    /// Use JSON log format
    #[arg(long, env = "JSON_LOGS", default_value = "false")]
    pub json_logs: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] clap::Error),
    #[error("lookup credentials not configured (set TWILIO_ACCOUNT_SID and TWILIO_AUTH_TOKEN)")]
    MissingCredentials,
    #[error("invalid credentials: {0}")]
    InvalidCredentials(#[from] ValidationError),
    #[error("lookup timeout must be > 0")]
    InvalidTimeout,
    #[error("failed to build lookup client: {0}")]
    Client(#[from] LookupError),
}

impl Config {
    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::try_parse_from([SERVICE_NAME])?)
    }

    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig {
            log_level: self.log_level.clone(),
            json_logs: self.json_logs,
        }
    }

    #[inline]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Credentials to use: an API key pair when both parts are set, else the auth token.
    pub fn auth(&self) -> Result<Auth, ConfigError> {
        if let (Some(key), Some(secret)) = (&self.api_key, &self.api_secret) {
            return Ok(Auth::api_key(key, secret.expose_secret())?);
        }
        match (&self.account_sid, &self.auth_token) {
            (Some(sid), Some(token)) => Ok(Auth::account(sid, token.expose_secret())?),
            _ => Err(ConfigError::MissingCredentials),
        }
    }

    /// Validate the configuration and build the lookup client.
    pub fn build_client(&self) -> Result<LookupClient, ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        let client = LookupClient::builder(self.auth()?)
            .base_url(&self.base_url)
            .methods(self.methods.iter().copied())
            .timeout(self.timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }
}
