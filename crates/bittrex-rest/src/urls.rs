//! Request URL construction
//!
//! Joins base URLs with path segments and appends insertion-ordered query
//! strings. No percent-encoding happens at any point: the legacy exchange
//! API expects raw values and the v1/v2 signature is computed over the URL
//! exactly as sent.

use crate::params::Params;
use bittrex_auth::Credentials;

/// URL builder bound to a versioned base endpoint
#[derive(Debug, Clone)]
pub struct Urls {
    base_url: String,
}

impl Urls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_matches('/').to_string(),
        }
    }

    /// Get the base URL (no trailing separator)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join path components with single separators
    ///
    /// Each component is stripped of leading/trailing `/` before joining,
    /// so callers never produce duplicate or missing separators.
    pub fn join<'a>(components: impl IntoIterator<Item = &'a str>) -> String {
        components
            .into_iter()
            .map(|c| c.trim_matches('/'))
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Build a full request URL from path segments and parameters
    ///
    /// With `use_nonce` set, a `nonce` parameter holding the integer
    /// millisecond timestamp is appended unless the caller already supplied
    /// one. Parameters serialize in insertion order with the nonce last.
    pub fn url(&self, segments: &[&str], params: &Params, use_nonce: bool) -> String {
        let mut url = Self::join(std::iter::once(self.base_url.as_str()).chain(segments.iter().copied()));

        let mut query = params.to_query();

        if use_nonce && !params.contains_key("nonce") {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(&format!("nonce={}", Credentials::generate_nonce()));
        }

        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_normalizes_separators() {
        assert_eq!(
            Urls::join(["https://api.example.com/", "/v3/", "markets"]),
            "https://api.example.com/v3/markets"
        );
    }

    #[test]
    fn test_join_skips_empty_components() {
        assert_eq!(Urls::join(["a", "", "/", "b"]), "a/b");
    }

    #[test]
    fn test_url_without_params() {
        let urls = Urls::new("https://api.bittrex.com/v3/");
        assert_eq!(
            urls.url(&["markets", "BTC-USD", "ticker"], &Params::new(), false),
            "https://api.bittrex.com/v3/markets/BTC-USD/ticker"
        );
    }

    #[test]
    fn test_url_appends_query_in_order() {
        let urls = Urls::new("https://api.bittrex.com/api/v1.1");
        let params = Params::new().with("market", "BTC-LTC").with("type", "buy");
        assert_eq!(
            urls.url(&["public/getorderbook"], &params, false),
            "https://api.bittrex.com/api/v1.1/public/getorderbook?market=BTC-LTC&type=buy"
        );
    }

    #[test]
    fn test_url_injects_nonce_when_missing() {
        let urls = Urls::new("https://api.bittrex.com/api/v1.1");
        let params = Params::new().with("currency", "BTC");
        let url = urls.url(&["account/getbalance"], &params, true);
        assert!(url.contains("currency=BTC&nonce="));
    }

    #[test]
    fn test_url_keeps_caller_nonce() {
        let urls = Urls::new("https://api.bittrex.com/api/v1.1");
        let params = Params::new().with("nonce", 42u64);
        let url = urls.url(&["market/cancel"], &params, true);
        assert_eq!(
            url,
            "https://api.bittrex.com/api/v1.1/market/cancel?nonce=42"
        );
    }

    #[test]
    fn test_url_nonce_on_empty_params() {
        let urls = Urls::new("https://bittrex.com/api/v2.0");
        let url = urls.url(&["auth/orders/GetOrderHistory"], &Params::new(), true);
        assert!(url.starts_with("https://bittrex.com/api/v2.0/auth/orders/GetOrderHistory?nonce="));
    }
}
