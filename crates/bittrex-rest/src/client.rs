//! Main REST client

use crate::engine::{ReqwestTransport, RequestEngine, RetryPolicy, Transport};
use crate::endpoints::{V1Client, V2Client, V3Client};
use crate::proxy::ProxyRotator;
use bittrex_auth::Credentials;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Bittrex REST client
///
/// Bundles the three API generations over one shared request engine, so
/// retry policy, proxy rotation state and diagnostics settings are
/// configured once per client.
///
/// # Example
///
/// ```no_run
/// use bittrex_rest::{BittrexClient, Credentials};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Public endpoints only
///     let client = BittrexClient::new();
///     let markets = client.v3.get_markets().await?;
///
///     // With authentication for private endpoints
///     let creds = Credentials::from_env()?;
///     let auth_client = BittrexClient::with_credentials(creds);
///     let balances = auth_client.v3.get_balances().await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct BittrexClient {
    /// v1.1 API (legacy, GET-only)
    pub v1: V1Client,
    /// v2.0 API (undocumented, GET-only)
    pub v2: V2Client,
    /// v3 API (current)
    pub v3: V3Client,
}

impl BittrexClient {
    /// Create a new client without authentication
    ///
    /// Only public endpoints will be available.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with credentials
    ///
    /// All endpoints (public and private) will be available.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self::with_config(ClientConfig::default().with_credentials(credentials))
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        let transport = Arc::new(ReqwestTransport::new(config.timeout_secs));
        Self::with_transport(config, transport)
    }

    /// Create a client over a custom transport
    ///
    /// Intended for tests and instrumentation; everything above the
    /// transport seam (signing, retries, proxy rotation, envelope
    /// validation) runs unchanged.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let engine = Arc::new(RequestEngine::new(
            transport,
            RetryPolicy {
                max_attempts: config.max_attempts.max(1),
                delay: Duration::from_secs_f64(config.delay_secs.max(0.0)),
            },
            ProxyRotator::new(config.proxies),
            config.debug_level,
        ));

        info!("Created Bittrex REST client");

        Self {
            v1: V1Client::new(engine.clone(), config.credentials.clone()),
            v2: V2Client::new(engine.clone(), config.credentials.clone()),
            v3: V3Client::new(engine, config.credentials),
        }
    }

    /// Check if the client has credentials for private endpoints
    pub fn has_credentials(&self) -> bool {
        self.v3.has_credentials()
    }
}

impl Default for BittrexClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API credentials (optional)
    pub credentials: Option<Credentials>,
    /// Attempts per logical request (≥ 1)
    pub max_attempts: u32,
    /// Sleep between attempts, in seconds
    pub delay_secs: f64,
    /// Diagnostic verbosity (0–3); affects logging only, never behavior
    pub debug_level: u8,
    /// Outbound proxy pool, in rotation-priority order
    pub proxies: Vec<String>,
    /// Per-call HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            max_attempts: 3,
            delay_secs: 7.5,
            debug_level: 1,
            proxies: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the retry attempt budget
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the sleep between attempts
    pub fn with_delay_secs(mut self, delay_secs: f64) -> Self {
        self.delay_secs = delay_secs;
        self
    }

    /// Set diagnostic verbosity (0–3)
    pub fn with_debug_level(mut self, debug_level: u8) -> Self {
        self.debug_level = debug_level;
        self
    }

    /// Route requests through a single proxy
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxies = vec![proxy.into()];
        self
    }

    /// Route requests through a rotating proxy pool
    pub fn with_proxies(mut self, proxies: Vec<String>) -> Self {
        self.proxies = proxies;
        self
    }

    /// Set the per-call HTTP timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
