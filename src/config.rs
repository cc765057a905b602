//! Runtime configuration for the webhook binary.
//!
//! Every setting has a default suitable for an in-cluster deployment and can
//! be overridden from the environment.

use std::path::PathBuf;

use thiserror::Error;

/// Default path to webhook TLS certificate
pub const WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to webhook TLS private key
pub const WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";
/// Default webhook server port
pub const WEBHOOK_PORT: u16 = 9443;
/// Default health server port
pub const HEALTH_PORT: u16 = 8080;

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A port variable did not hold a valid port number
    #[error("invalid value {value:?} for {name}: expected a port number")]
    InvalidPort { name: &'static str, value: String },
}

/// Webhook settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebhookConfig {
    /// HTTPS port serving admission reviews
    pub webhook_port: u16,
    /// HTTP port serving probes and metrics
    pub health_port: u16,
    /// PEM certificate presented by the webhook
    pub cert_path: PathBuf,
    /// PEM private key of the webhook certificate
    pub key_path: PathBuf,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            webhook_port: WEBHOOK_PORT,
            health_port: HEALTH_PORT,
            cert_path: PathBuf::from(WEBHOOK_CERT_PATH),
            key_path: PathBuf::from(WEBHOOK_KEY_PATH),
        }
    }
}

impl WebhookConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through `lookup`, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            webhook_port: port(&lookup, "WEBHOOK_PORT", defaults.webhook_port)?,
            health_port: port(&lookup, "HEALTH_PORT", defaults.health_port)?,
            cert_path: lookup("WEBHOOK_CERT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.cert_path),
            key_path: lookup("WEBHOOK_KEY_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.key_path),
        })
    }

    /// Whether both TLS files exist on disk
    pub fn certificates_present(&self) -> bool {
        self.cert_path.exists() && self.key_path.exists()
    }
}

fn port<F>(lookup: &F, name: &'static str, default: u16) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<u16>() {
            Ok(port) if port != 0 => Ok(port),
            _ => Err(ConfigError::InvalidPort { name, value }),
        },
    }
}
