//! REST API client for the Bittrex cryptocurrency exchange
//!
//! This crate covers all three API generations behind one client:
//! v1.1 (legacy), v2.0 (undocumented) and v3 (current). They differ in
//! endpoint naming, authentication scheme and response envelope; the shared
//! request core handles retrying, proxy rotation and envelope validation
//! uniformly, and each version client contributes its own URL and signing
//! conventions.
//!
//! # Example
//!
//! ```no_run
//! use bittrex_rest::{BittrexClient, ClientConfig, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public market data (no auth required)
//!     let client = BittrexClient::new();
//!     let ticker = client.v3.get_ticker("USDT-BTC").await?;
//!     println!("BTC/USDT: {ticker}");
//!
//!     // Private endpoints (auth required)
//!     let client = BittrexClient::with_config(
//!         ClientConfig::new()
//!             .with_credentials(Credentials::from_env()?)
//!             .with_max_attempts(5),
//!     );
//!     let balances = client.v3.get_balances().await?;
//!     println!("balances: {balances}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Failure model
//!
//! Every per-attempt failure (network error, unexpected HTTP status,
//! unparseable body, vendor rejection, missing payload path) is soft: the
//! engine sleeps and retries until the attempt budget is spent, then
//! returns [`RestError::NoResultAfterRetries`] wrapping the final cause.
//! Note that vendor rejections of well-formed but invalid requests (say, a
//! malformed market symbol) are retried too, matching the behavior clients
//! of this exchange have historically relied on.
//!
//! # Proxies
//!
//! An optional proxy pool is rotated per request: each proxy carries at
//! most 20 requests per trailing 60 seconds, selection prefers the first
//! eligible proxy in configured order, and a fully saturated pool falls
//! back to direct connection.

pub mod client;
pub mod endpoints;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod params;
pub mod proxy;
pub mod urls;

// Re-export main types
pub use client::{BittrexClient, ClientConfig};
pub use endpoints::{NewCancelOrder, NewConditionalOrder, NewOrder, PageQuery, V1Client, V2Client, V3Client};
pub use engine::{RawResponse, RequestEngine, RequestMethod, RetryPolicy, Transport, TransportRequest};
pub use envelope::{ExtractionSpec, PathSegment};
pub use error::{RestError, RestResult};
pub use params::{ParamValue, Params};
pub use proxy::ProxyRotator;
pub use urls::Urls;

// Re-export for convenience
pub use bittrex_auth::Credentials;
pub use bittrex_types as types;
