//! HMAC-SHA512 signing primitives
//!
//! v1.1/v2.0 sign the complete request URL; v3 signs
//! `nonce + url + METHOD + SHA512(body)`. Both produce lowercase hex
//! digests. All functions here are deterministic and side-effect free.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha512};

type HmacSha512 = Hmac<Sha512>;

/// Signature material for a v3 request
///
/// v3 carries the content hash and the signature in separate headers
/// (`Api-Content-Hash` and `Api-Signature`), so both are returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V3Signature {
    /// Hex SHA-512 of the serialized request body (or of the empty string)
    pub content_hash: String,
    /// Hex HMAC-SHA512 over `nonce + url + METHOD + content_hash`
    pub signature: String,
}

/// HMAC-SHA512 of `message` keyed with `secret`, as lowercase hex
pub fn hmac_sha512_hex(secret: &str, message: &str) -> String {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// SHA-512 of `message`, as lowercase hex
pub fn sha512_hex(message: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(message.as_bytes());
    hex::encode(hasher.finalize())
}

/// Sign a v3 request
pub fn sign_v3(secret: &str, nonce: u64, url: &str, method: &str, body: &str) -> V3Signature {
    let content_hash = sha512_hex(body);
    let message = format!("{}{}{}{}", nonce, url, method, content_hash);

    V3Signature {
        signature: hmac_sha512_hex(secret, &message),
        content_hash,
    }
}
