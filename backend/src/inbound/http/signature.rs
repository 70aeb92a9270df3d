//! Payment-provider webhook signature verification.
//!
//! The provider signs `"{timestamp}.{raw body}"` with HMAC-SHA256 under the
//! shared webhook secret and sends
//! `Stripe-Signature: t=<unix seconds>,v1=<hex mac>[,v1=<hex mac>...]`.
//! Any `v1` entry matching the recomputed MAC is accepted; other schemes
//! (`v0`, unknown keys) are ignored. The timestamp must sit within the
//! tolerance window of the local clock in either direction.

use std::sync::Arc;
use std::time::Duration;

use hmac::{Hmac, Mac};
use mockable::Clock;
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the timestamp and signatures.
pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// Replay window applied when none is configured.
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(300);

/// Reasons a delivery fails verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("missing Stripe-Signature header")]
    MissingHeader,
    #[error("malformed Stripe-Signature header: {0}")]
    MalformedHeader(&'static str),
    #[error("signature timestamp outside the tolerance window")]
    TimestampOutsideTolerance,
    #[error("no signature matches the payload")]
    Mismatch,
}

impl SignatureError {
    /// Short reason code for logs and error details.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_header",
            Self::MalformedHeader(_) => "malformed_header",
            Self::TimestampOutsideTolerance => "timestamp_outside_tolerance",
            Self::Mismatch => "mismatch",
        }
    }
}

struct ParsedHeader {
    timestamp: i64,
    signatures: Vec<Vec<u8>>,
}

fn parse_header(header: &str) -> Result<ParsedHeader, SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => {
                let parsed = value
                    .parse::<i64>()
                    .map_err(|_| SignatureError::MalformedHeader("timestamp is not an integer"))?;
                timestamp = Some(parsed);
            }
            "v1" => {
                if let Ok(bytes) = hex::decode(value) {
                    signatures.push(bytes);
                }
            }
            _ => {}
        }
    }
    let timestamp = timestamp.ok_or(SignatureError::MalformedHeader("no timestamp"))?;
    if signatures.is_empty() {
        return Err(SignatureError::MalformedHeader("no v1 signature"));
    }
    Ok(ParsedHeader {
        timestamp,
        signatures,
    })
}

fn keyed_mac(secret: &str, timestamp: i64, payload: &[u8]) -> Result<HmacSha256, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::MalformedHeader("unusable signing secret"))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Build a `Stripe-Signature` header value for `payload`.
///
/// Used by tests and local tooling to produce deliveries the verifier accepts.
///
/// # Examples
/// ```
/// use stocksync::inbound::http::signature::sign_payload;
///
/// let header = sign_payload("whsec_test", 1_700_000_000, b"{}").expect("sign");
/// assert!(header.starts_with("t=1700000000,v1="));
/// ```
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String, SignatureError> {
    let mac = keyed_mac(secret, timestamp, payload)?;
    Ok(format!(
        "t={timestamp},v1={}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Verifies webhook deliveries against the shared signing secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: Arc<Zeroizing<String>>,
    tolerance: Duration,
    clock: Arc<dyn Clock>,
}

impl SignatureVerifier {
    pub fn new(secret: Zeroizing<String>, tolerance: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret: Arc::new(secret),
            tolerance,
            clock,
        }
    }

    /// Check `header` against the raw request body.
    ///
    /// # Errors
    /// Returns a [`SignatureError`] describing the first failed check.
    pub fn verify(&self, payload: &[u8], header: Option<&str>) -> Result<(), SignatureError> {
        let header = header.ok_or(SignatureError::MissingHeader)?;
        let parsed = parse_header(header)?;

        let now = self.clock.utc().timestamp();
        let skew = now.saturating_sub(parsed.timestamp).unsigned_abs();
        if skew > self.tolerance.as_secs() {
            return Err(SignatureError::TimestampOutsideTolerance);
        }

        let mac = keyed_mac(self.secret.as_str(), parsed.timestamp, payload)?;
        let matched = parsed
            .signatures
            .iter()
            .any(|candidate| mac.clone().verify_slice(candidate).is_ok());
        if matched {
            Ok(())
        } else {
            Err(SignatureError::Mismatch)
        }
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("secret", &"<redacted>")
            .field("tolerance", &self.tolerance)
            .finish_non_exhaustive()
    }
}
