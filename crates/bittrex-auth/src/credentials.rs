//! API credentials
//!
//! # Security
//!
//! The API secret is stored using the `secrecy` crate which:
//! - Zeroizes memory on drop (prevents memory scanning)
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use secrecy::{ExposeSecret, SecretBox};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AuthError, AuthResult};
use crate::signer::{self, V3Signature};

/// Guards nonce monotonicity when two requests land in the same millisecond
static LAST_NONCE: AtomicU64 = AtomicU64::new(0);

/// API credentials for authenticated requests
///
/// The API key may be empty for public-only use; the secret is the raw HMAC
/// key and is zeroized when the credentials are dropped.
pub struct Credentials {
    /// API key (public)
    api_key: String,
    /// API secret (HMAC key, zeroized on drop)
    api_secret: SecretBox<String>,
}

impl Credentials {
    /// Create new credentials from an API key and secret
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretBox::new(Box::new(api_secret.into())),
        }
    }

    /// Create credentials from environment variables
    ///
    /// Reads `BITTREX_API_KEY` and `BITTREX_API_SECRET` from the environment.
    pub fn from_env() -> AuthResult<Self> {
        let api_key = std::env::var("BITTREX_API_KEY")
            .map_err(|_| AuthError::EnvVarNotSet("BITTREX_API_KEY".to_string()))?;
        let api_secret = std::env::var("BITTREX_API_SECRET")
            .map_err(|_| AuthError::EnvVarNotSet("BITTREX_API_SECRET".to_string()))?;

        Ok(Self::new(api_key, api_secret))
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Generate a nonce for this request
    ///
    /// Nonces must be strictly increasing. The value is the integer
    /// millisecond timestamp, bumped through an atomic so that rapid
    /// successive requests never repeat or regress.
    pub fn generate_nonce() -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_millis() as u64;

        let prev = LAST_NONCE
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .expect("nonce update closure always returns Some");

        now.max(prev + 1)
    }

    /// Sign a complete request URL (v1.1 / v2.0 scheme)
    ///
    /// The digest covers the full URL including query string and nonce, and
    /// goes in the `apisign` header.
    pub fn sign_url(&self, url: &str) -> String {
        signer::hmac_sha512_hex(self.api_secret.expose_secret(), url)
    }

    /// Sign a v3 request
    ///
    /// The signed message is `nonce + url + METHOD + SHA512(body)`, where
    /// `body` is the serialized JSON body or the empty string. Returns the
    /// signature together with the content hash, since v3 carries both in
    /// separate headers.
    pub fn sign_v3(&self, nonce: u64, url: &str, method: &str, body: &str) -> V3Signature {
        signer::sign_v3(self.api_secret.expose_secret(), nonce, url, method, body)
    }
}

impl Clone for Credentials {
    /// Clone credentials (creates a new SecretBox with the same content)
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            api_secret: SecretBox::new(Box::new(self.api_secret.expose_secret().clone())),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "api_key",
                &format!("{}...", &self.api_key[..8.min(self.api_key.len())]),
            )
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_strictly_increasing() {
        let a = Credentials::generate_nonce();
        let b = Credentials::generate_nonce();
        let c = Credentials::generate_nonce();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_nonce_is_millisecond_scale() {
        let nonce = Credentials::generate_nonce();
        // 2020-01-01 in ms; sanity check the unit, not the exact value
        assert!(nonce > 1_577_836_800_000);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("test_api_key", "test_api_secret");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("test_api_secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_clone_signs_identically() {
        let creds = Credentials::new("key", "secret");
        let url = "https://api.bittrex.com/api/v1.1/account/getbalances?nonce=1";
        assert_eq!(creds.sign_url(url), creds.clone().sign_url(url));
    }
}
