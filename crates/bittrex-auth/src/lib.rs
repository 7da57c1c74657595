//! Credentials and request signing for the Bittrex REST API
//!
//! The exchange has used two signing schemes over its API generations:
//!
//! - **v1.1 / v2.0**: HMAC-SHA512 over the complete request URL (query
//!   string and nonce included), hex encoded, sent in the `apisign` header.
//! - **v3**: HMAC-SHA512 over `nonce + url + METHOD + SHA512(body)`, hex
//!   encoded, sent alongside the nonce, API key and content hash in
//!   dedicated `Api-*` headers.
//!
//! Both digests are pure functions of their inputs; nothing here performs
//! I/O or holds request state.
//!
//! # Example
//!
//! ```
//! use bittrex_auth::Credentials;
//!
//! let creds = Credentials::new("key", "secret");
//! let sig = creds.sign_url("https://api.bittrex.com/api/v1.1/market/cancel?nonce=1");
//! assert_eq!(sig.len(), 128); // hex-encoded SHA-512 output
//! ```

mod credentials;
mod error;
mod signer;

pub use credentials::Credentials;
pub use error::{AuthError, AuthResult};
pub use signer::{hmac_sha512_hex, sha512_hex, V3Signature};
