//! Service configuration loaded via OrthoConfig.
//!
//! Every value can come from a CLI flag, a `STOCKSYNC_*` environment variable,
//! or a config file. [`AppSettings`] is the raw, all-optional layer;
//! [`AppSettings::validate`] turns it into [`ValidatedSettings`] or reports
//! the first problem as a [`SettingsError`].

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 4242;
const DEFAULT_PAYMENT_API_URL: &str = "https://api.stripe.com";
const DEFAULT_SIGNATURE_TOLERANCE_SECS: u64 = 300;

/// Raw configuration values.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STOCKSYNC")]
pub struct AppSettings {
    /// Payment provider secret key used to list line items.
    pub payment_secret_key: Option<String>,
    /// Shared secret used to verify webhook signatures.
    pub webhook_secret: Option<String>,
    /// Catalog base URL, e.g. `http://cms:1337`.
    pub catalog_url: Option<String>,
    /// Catalog API token with read and update rights on products.
    pub catalog_token: Option<String>,
    /// Listen address.
    pub host: Option<String>,
    /// Listen port.
    pub port: Option<u16>,
    /// Payment provider API origin.
    pub payment_api_url: Option<String>,
    /// Accepted clock skew for signature timestamps, in seconds.
    pub signature_tolerance_secs: Option<u64>,
    /// Overall timeout for outbound requests, in seconds. Unset keeps the
    /// HTTP client's default.
    pub request_timeout_secs: Option<u64>,
}

impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("AppSettings")
            .field("payment_secret_key", &redact(&self.payment_secret_key))
            .field("webhook_secret", &redact(&self.webhook_secret))
            .field("catalog_url", &self.catalog_url)
            .field("catalog_token", &redact(&self.catalog_token))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("payment_api_url", &self.payment_api_url)
            .field("signature_tolerance_secs", &self.signature_tolerance_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Configuration problems detected at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("missing required setting {key}")]
    Missing { key: &'static str },
    #[error("setting {key} is not a valid http(s) URL ({value}): {reason}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("setting host is not an IP address: {value}")]
    InvalidHost { value: String },
    #[error("setting {key} is invalid: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Configuration after validation; secrets are zeroed on drop.
pub struct ValidatedSettings {
    pub bind_addr: SocketAddr,
    pub payment_secret_key: Zeroizing<String>,
    pub webhook_secret: Zeroizing<String>,
    pub catalog_url: Url,
    pub catalog_token: Zeroizing<String>,
    pub payment_api_url: Url,
    pub signature_tolerance: Duration,
    pub request_timeout: Option<Duration>,
}

fn required_secret(
    value: &Option<String>,
    key: &'static str,
) -> Result<Zeroizing<String>, SettingsError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|secret| !secret.is_empty())
        .map(|secret| Zeroizing::new(secret.to_owned()))
        .ok_or(SettingsError::Missing { key })
}

fn http_url(value: &str, key: &'static str) -> Result<Url, SettingsError> {
    let invalid = |reason: String| SettingsError::InvalidUrl {
        key,
        value: value.to_owned(),
        reason,
    };
    let url = Url::parse(value.trim()).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    Ok(url)
}

impl AppSettings {
    /// Validate the raw values and apply defaults.
    ///
    /// # Errors
    /// Returns the first missing or malformed setting.
    pub fn validate(&self) -> Result<ValidatedSettings, SettingsError> {
        let payment_secret_key = required_secret(&self.payment_secret_key, "payment_secret_key")?;
        let webhook_secret = required_secret(&self.webhook_secret, "webhook_secret")?;
        let catalog_token = required_secret(&self.catalog_token, "catalog_token")?;
        let catalog_url = self
            .catalog_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::Missing { key: "catalog_url" })
            .and_then(|url| http_url(url, "catalog_url"))?;
        let payment_api_url = http_url(
            self.payment_api_url
                .as_deref()
                .unwrap_or(DEFAULT_PAYMENT_API_URL),
            "payment_api_url",
        )?;

        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host.trim().parse().map_err(|_| SettingsError::InvalidHost {
            value: host.to_owned(),
        })?;
        let bind_addr = SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT));

        let signature_tolerance = Duration::from_secs(
            self.signature_tolerance_secs
                .unwrap_or(DEFAULT_SIGNATURE_TOLERANCE_SECS),
        );
        let request_timeout = match self.request_timeout_secs {
            Some(0) => {
                return Err(SettingsError::InvalidValue {
                    key: "request_timeout_secs",
                    reason: "must be greater than zero when set".to_owned(),
                });
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(ValidatedSettings {
            bind_addr,
            payment_secret_key,
            webhook_secret,
            catalog_url,
            catalog_token,
            payment_api_url,
            signature_tolerance,
            request_timeout,
        })
    }
}
