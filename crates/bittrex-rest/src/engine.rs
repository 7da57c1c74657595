//! Retrying HTTP request engine
//!
//! One logical request is a strictly sequential loop: select a proxy, issue
//! the call, validate the envelope, and on any soft failure sleep and try
//! again until the attempt budget runs out. Transport errors, unexpected
//! HTTP statuses, unparseable bodies and envelope rejections are all soft
//! failures; the engine never raises mid-loop.
//!
//! The engine is stateless apart from the proxy usage history, so any
//! number of logical requests may run concurrently on one engine.

use crate::envelope::ExtractionSpec;
use crate::error::{RestError, RestResult};
use crate::proxy::{strip_scheme, ProxyRotator};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// HTTP methods the exchange API uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Delete,
}

impl RequestMethod {
    /// Method name as signed into v3 requests
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// Everything the transport needs to issue one HTTP call
#[derive(Debug)]
pub struct TransportRequest<'a> {
    /// Full URL, query string included
    pub url: &'a str,
    pub method: RequestMethod,
    pub headers: &'a [(String, String)],
    /// JSON body (v3 POST), serialized by the transport
    pub body: Option<&'a Value>,
    /// Scheme-stripped proxy address to route through
    pub proxy: Option<&'a str>,
}

/// Raw HTTP response, before any envelope handling
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Transport boundary
///
/// The engine only needs "issue this request, give me status and body";
/// tests script this seam to exercise the retry loop deterministically.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: TransportRequest<'_>) -> RestResult<RawResponse>;
}

/// Production transport backed by [`reqwest`]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout_secs: u64) -> Self {
        let timeout = Duration::from_secs(timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self { client, timeout }
    }

    /// Build a client routing through `proxy` for all schemes
    fn proxied_client(&self, proxy: &str) -> RestResult<reqwest::Client> {
        let proxy = reqwest::Proxy::all(format!("http://{}", proxy))
            .map_err(|e| RestError::Transport(format!("invalid proxy address: {}", e)))?;

        reqwest::Client::builder()
            .timeout(self.timeout)
            .proxy(proxy)
            .build()
            .map_err(|e| RestError::Transport(e.to_string()))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest<'_>) -> RestResult<RawResponse> {
        let client = match request.proxy {
            Some(proxy) => self.proxied_client(proxy)?,
            None => self.client.clone(),
        };

        let mut builder = match request.method {
            RequestMethod::Get => client.get(request.url),
            RequestMethod::Post => client.post(request.url),
            RequestMethod::Delete => client.delete(request.url),
        };

        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RestError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RestError::Transport(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

/// Retry behavior applied uniformly to every request
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts per logical request, at least 1
    pub max_attempts: u32,
    /// Sleep between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs_f64(7.5),
        }
    }
}

/// Retrying request executor shared by all API version clients
pub struct RequestEngine {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    rotator: ProxyRotator,
    debug_level: u8,
}

impl RequestEngine {
    pub fn new(
        transport: Arc<dyn Transport>,
        retry: RetryPolicy,
        rotator: ProxyRotator,
        debug_level: u8,
    ) -> Self {
        Self {
            transport,
            retry,
            rotator,
            debug_level,
        }
    }

    /// Execute one logical request through the retry loop
    ///
    /// Returns the extracted payload of the first successful attempt, or
    /// [`RestError::NoResultAfterRetries`] wrapping the final failure.
    pub async fn request(
        &self,
        url: &str,
        method: RequestMethod,
        headers: &[(String, String)],
        body: Option<&Value>,
        spec: &ExtractionSpec,
    ) -> RestResult<Value> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut last = RestError::Transport("no attempt performed".to_string());

        for attempt in 1..=max_attempts {
            match self.attempt(url, method, headers, body, spec).await {
                Ok(payload) => return Ok(payload),
                Err(err) => {
                    if self.debug_level >= 1 {
                        warn!(attempt, max_attempts, error = %err, "request attempt failed");
                    }

                    last = err;

                    if attempt < max_attempts {
                        tokio::time::sleep(self.retry.delay).await;
                    }
                }
            }
        }

        Err(RestError::NoResultAfterRetries {
            attempts: max_attempts,
            last: Box::new(last),
        })
    }

    async fn attempt(
        &self,
        url: &str,
        method: RequestMethod,
        headers: &[(String, String)],
        body: Option<&Value>,
        spec: &ExtractionSpec,
    ) -> RestResult<Value> {
        let proxy = self.rotator.select_proxy();

        if let Some(proxy) = &proxy {
            self.rotator.record_usage(proxy);
        }

        if self.debug_level >= 2 {
            debug!(%url, method = method.as_str(), proxy = proxy.as_deref(), "issuing request");
        }

        let response = self
            .transport
            .execute(TransportRequest {
                url,
                method,
                headers,
                body,
                proxy: proxy.as_deref().map(strip_scheme),
            })
            .await?;

        if !matches!(response.status, 200 | 201) {
            return Err(RestError::Protocol(response.status));
        }

        if self.debug_level >= 3 {
            trace!(status = response.status, body = %response.body, "raw response");
        }

        let json: Value = serde_json::from_str(&response.body).map_err(|e| {
            RestError::EnvelopeRejected(format!("response body is not valid JSON: {}", e))
        })?;

        spec.validate(json)
    }
}

impl std::fmt::Debug for RequestEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestEngine")
            .field("retry", &self.retry)
            .field("debug_level", &self.debug_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Transport that replays a script of canned outcomes
    struct ScriptedTransport {
        script: Mutex<Vec<RestResult<RawResponse>>>,
        calls: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<RestResult<RawResponse>>) -> Self {
            Self {
                script: Mutex::new(script),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn ok(body: &str) -> RestResult<RawResponse> {
            Ok(RawResponse {
                status: 200,
                body: body.to_string(),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn execute(&self, request: TransportRequest<'_>) -> RestResult<RawResponse> {
            self.calls
                .lock()
                .push(request.proxy.map(|p| p.to_string()));
            let mut script = self.script.lock();
            if script.is_empty() {
                return Err(RestError::Transport("script exhausted".to_string()));
            }
            script.remove(0)
        }
    }

    fn engine_with(transport: Arc<ScriptedTransport>, delay: Duration) -> RequestEngine {
        RequestEngine::new(
            transport,
            RetryPolicy {
                max_attempts: 3,
                delay,
            },
            ProxyRotator::new(Vec::new()),
            0,
        )
    }

    #[tokio::test]
    async fn test_success_returns_immediately() {
        let transport = Arc::new(ScriptedTransport::new(vec![ScriptedTransport::ok(
            r#"{"success": true, "result": {"x": 1}}"#,
        )]));
        let engine = engine_with(transport.clone(), Duration::ZERO);

        let payload = engine
            .request(
                "https://api.bittrex.com/api/v1.1/public/getmarkets",
                RequestMethod::Get,
                &[],
                None,
                &ExtractionSpec::legacy(),
            )
            .await
            .unwrap();

        assert_eq!(payload, serde_json::json!({"x": 1}));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_attempts_and_sleeps_between_them() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Err(RestError::Transport("connection refused".to_string())),
            Err(RestError::Transport("connection refused".to_string())),
            Err(RestError::Transport("connection refused".to_string())),
        ]));
        let engine = engine_with(transport.clone(), Duration::from_secs_f64(7.5));

        let started = tokio::time::Instant::now();
        let err = engine
            .request(
                "https://api.bittrex.com/v3/ping",
                RequestMethod::Get,
                &[],
                None,
                &ExtractionSpec::v3(),
            )
            .await
            .unwrap_err();

        assert_eq!(transport.call_count(), 3);
        // Two sleeps between three attempts, none after the last
        assert_eq!(started.elapsed(), Duration::from_secs(15));
        match err {
            RestError::NoResultAfterRetries { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, RestError::Transport(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_two_failures() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Err(RestError::Transport("timeout".to_string())),
            ScriptedTransport::ok(r#"{"success": false}"#),
            ScriptedTransport::ok(r#"{"success": true, "result": [1]}"#),
        ]));
        let engine = engine_with(transport.clone(), Duration::from_secs_f64(7.5));

        let started = tokio::time::Instant::now();
        let payload = engine
            .request(
                "https://api.bittrex.com/api/v1.1/public/getmarkets",
                RequestMethod::Get,
                &[],
                None,
                &ExtractionSpec::legacy(),
            )
            .await
            .unwrap();

        assert_eq!(payload, serde_json::json!([1]));
        assert_eq!(transport.call_count(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_non_2xx_status_is_soft_failure() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(RawResponse {
                status: 503,
                body: "unavailable".to_string(),
            }),
            ScriptedTransport::ok(r#"{"serverTime": 1}"#),
        ]));
        let engine = engine_with(transport.clone(), Duration::ZERO);

        let payload = engine
            .request(
                "https://api.bittrex.com/v3/ping",
                RequestMethod::Get,
                &[],
                None,
                &ExtractionSpec::v3(),
            )
            .await
            .unwrap();

        assert_eq!(payload["serverTime"], 1);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_created_status_accepted() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(RawResponse {
            status: 201,
            body: r#"{"id": "abc"}"#.to_string(),
        })]));
        let engine = engine_with(transport, Duration::ZERO);

        let payload = engine
            .request(
                "https://api.bittrex.com/v3/orders",
                RequestMethod::Post,
                &[],
                None,
                &ExtractionSpec::v3(),
            )
            .await
            .unwrap();

        assert_eq!(payload["id"], "abc");
    }

    #[tokio::test]
    async fn test_unparseable_body_is_soft_failure() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            ScriptedTransport::ok("<html>gateway error</html>"),
            ScriptedTransport::ok("[]"),
        ]));
        let engine = engine_with(transport.clone(), Duration::ZERO);

        let payload = engine
            .request(
                "https://api.bittrex.com/v3/markets",
                RequestMethod::Get,
                &[],
                None,
                &ExtractionSpec::v3(),
            )
            .await
            .unwrap();

        assert_eq!(payload, serde_json::json!([]));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_proxy_selected_stripped_and_recorded() {
        let transport = Arc::new(ScriptedTransport::new(vec![ScriptedTransport::ok("[]")]));
        let engine = RequestEngine::new(
            transport.clone(),
            RetryPolicy {
                max_attempts: 1,
                delay: Duration::ZERO,
            },
            ProxyRotator::new(vec!["http://1.2.3.4:8080".to_string()]),
            0,
        );

        engine
            .request(
                "https://api.bittrex.com/v3/markets",
                RequestMethod::Get,
                &[],
                None,
                &ExtractionSpec::v3(),
            )
            .await
            .unwrap();

        assert_eq!(
            transport.calls.lock().as_slice(),
            &[Some("1.2.3.4:8080".to_string())]
        );
    }

    #[tokio::test]
    async fn test_saturated_pool_proceeds_without_proxy() {
        let transport = Arc::new(ScriptedTransport::new(vec![ScriptedTransport::ok("[]")]));
        let rotator = ProxyRotator::with_limits(
            vec!["http://1.2.3.4:8080".to_string()],
            1,
            Duration::from_secs(60),
        );
        rotator.record_usage("http://1.2.3.4:8080");

        let engine = RequestEngine::new(
            transport.clone(),
            RetryPolicy {
                max_attempts: 1,
                delay: Duration::ZERO,
            },
            rotator,
            0,
        );

        engine
            .request(
                "https://api.bittrex.com/v3/markets",
                RequestMethod::Get,
                &[],
                None,
                &ExtractionSpec::v3(),
            )
            .await
            .unwrap();

        assert_eq!(transport.calls.lock().as_slice(), &[None]);
    }
}
