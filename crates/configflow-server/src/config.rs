//! Server configuration.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use configflow_core::{AuthConfig, StorageConfig};
use thiserror::Error;

/// ConfigFlow server command line arguments. Every flag can also be set
/// through the environment.
#[derive(Parser)]
#[command(name = "configflow-server")]
#[command(about = "ConfigFlow configuration management server")]
#[command(version)]
pub struct Args {
    /// Address to bind to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Directory holding the sled database.
    #[arg(long, env = "CONFIGFLOW_DATA_PATH", default_value = "./configflow_data")]
    pub data_path: PathBuf,

    /// HMAC key used to sign and verify session tokens.
    #[arg(long, env = "JWT_SIGNING_KEY", hide_env_values = true)]
    pub jwt_signing_key: String,

    /// Issuer embedded in and required of session tokens.
    #[arg(long, env = "JWT_ISSUER", default_value = "configflow")]
    pub jwt_issuer: String,

    /// Audience embedded in and required of session tokens.
    #[arg(long, env = "JWT_AUDIENCE", default_value = "configflow")]
    pub jwt_audience: String,

    /// Session token lifetime in seconds.
    #[arg(long, env = "TOKEN_TTL_SECS", default_value_t = configflow_core::auth::DEFAULT_TOKEN_TTL_SECS)]
    pub token_ttl_secs: u64,

    /// Clock skew tolerated past token expiry, in seconds.
    #[arg(long, env = "TOKEN_LEEWAY_SECS", default_value_t = 0)]
    pub token_leeway_secs: u64,

    /// Per-request deadline in seconds.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Username of an administrator to create at startup if missing.
    #[arg(long, env = "BOOTSTRAP_ADMIN_USERNAME")]
    pub bootstrap_admin_username: Option<String>,

    /// Password of the bootstrap administrator.
    #[arg(long, env = "BOOTSTRAP_ADMIN_PASSWORD", hide_env_values = true)]
    pub bootstrap_admin_password: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT signing key must not be empty")]
    EmptySigningKey,

    #[error("bootstrap admin username and password must be set together")]
    IncompleteBootstrap,

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Credentials of the administrator created at startup.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated, immutable server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_path: PathBuf,
    pub auth: AuthConfig,
    pub request_timeout: Duration,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub log_level: String,
}

impl ServerConfig {
    /// Address to bind the listener to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig::new(&self.data_path)
    }
}

impl TryFrom<Args> for ServerConfig {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if args.jwt_signing_key.is_empty() {
            return Err(ConfigError::EmptySigningKey);
        }
        if args.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let bootstrap_admin = match (args.bootstrap_admin_username, args.bootstrap_admin_password) {
            (Some(username), Some(password)) => Some(BootstrapAdmin { username, password }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteBootstrap),
        };

        let auth = AuthConfig::new(args.jwt_signing_key)
            .with_issuer(args.jwt_issuer)
            .with_audience(args.jwt_audience)
            .with_token_ttl(Duration::from_secs(args.token_ttl_secs))
            .with_leeway(Duration::from_secs(args.token_leeway_secs));

        Ok(Self {
            host: args.host,
            port: args.port,
            data_path: args.data_path,
            auth,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            bootstrap_admin,
            log_level: args.log_level,
        })
    }
}
