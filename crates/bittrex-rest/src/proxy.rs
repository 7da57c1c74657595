//! Outbound proxy rotation
//!
//! Each configured proxy may carry at most [`PROXY_USAGE_CAP`] requests per
//! trailing [`PROXY_USAGE_WINDOW`]. Selection walks the pool in configured
//! order and returns the first proxy under its cap; when every proxy is
//! saturated the request proceeds without one (the cap is a soft limit).
//!
//! Usage history is instance state behind a mutex, so one client's rotation
//! never bleeds into another's and concurrent requests cannot lose updates.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Trailing window over which proxy usage is counted
pub const PROXY_USAGE_WINDOW: Duration = Duration::from_secs(60);

/// Maximum uses of a single proxy within the window
pub const PROXY_USAGE_CAP: usize = 20;

/// Sliding-window proxy selector
#[derive(Debug)]
pub struct ProxyRotator {
    pool: Vec<String>,
    cap: usize,
    window: Duration,
    history: Mutex<HashMap<String, Vec<Instant>>>,
}

impl ProxyRotator {
    /// Create a rotator over `pool` with the default cap and window
    pub fn new(pool: Vec<String>) -> Self {
        Self::with_limits(pool, PROXY_USAGE_CAP, PROXY_USAGE_WINDOW)
    }

    /// Create a rotator with custom limits
    pub fn with_limits(pool: Vec<String>, cap: usize, window: Duration) -> Self {
        Self {
            pool,
            cap,
            window,
            history: Mutex::new(HashMap::new()),
        }
    }

    /// True when no proxies are configured
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Select a proxy for the next request, or `None`
    ///
    /// Returns the configured address (scheme prefix and all); strip it
    /// with [`strip_scheme`] before handing the address to the transport.
    pub fn select_proxy(&self) -> Option<String> {
        self.select_at(Instant::now())
    }

    /// Record that a request was issued through `proxy`
    pub fn record_usage(&self, proxy: &str) {
        self.record_at(proxy, Instant::now());
    }

    fn select_at(&self, now: Instant) -> Option<String> {
        if self.pool.is_empty() {
            return None;
        }

        let mut history = self.history.lock();

        for proxy in &self.pool {
            let used = history.entry(proxy.clone()).or_default();
            // Lazy pruning: drop entries that fell out of the window
            used.retain(|t| now.duration_since(*t) < self.window);

            if used.len() < self.cap {
                return Some(proxy.clone());
            }
        }

        None
    }

    fn record_at(&self, proxy: &str, now: Instant) {
        self.history
            .lock()
            .entry(proxy.to_string())
            .or_default()
            .push(now);
    }
}

/// Strip a scheme prefix from a proxy address
///
/// The transport layer wraps the bare address into per-scheme proxy URLs
/// itself, so a configured `http://1.2.3.4:8080` must come out as
/// `1.2.3.4:8080`.
pub fn strip_scheme(address: &str) -> &str {
    for prefix in ["http://", "https://", "ftp://"] {
        if let Some(stripped) = address.strip_prefix(prefix) {
            return stripped;
        }
    }

    address
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(addresses: &[&str]) -> Vec<String> {
        addresses.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_pool_selects_none() {
        let rotator = ProxyRotator::new(Vec::new());
        assert_eq!(rotator.select_proxy(), None);
    }

    #[test]
    fn test_first_eligible_wins() {
        let rotator = ProxyRotator::new(pool(&["p1:8080", "p2:8080"]));
        assert_eq!(rotator.select_proxy().as_deref(), Some("p1:8080"));
        // Selection alone never consumes budget
        assert_eq!(rotator.select_proxy().as_deref(), Some("p1:8080"));
    }

    #[test]
    fn test_cap_one_blocks_after_single_use() {
        let rotator = ProxyRotator::with_limits(pool(&["p1:8080"]), 1, PROXY_USAGE_WINDOW);
        rotator.record_usage("p1:8080");
        assert_eq!(rotator.select_proxy(), None);
    }

    #[test]
    fn test_selection_never_exceeds_cap() {
        let rotator = ProxyRotator::new(pool(&["p1:8080"]));
        for _ in 0..PROXY_USAGE_CAP {
            assert!(rotator.select_proxy().is_some());
            rotator.record_usage("p1:8080");
        }
        assert_eq!(rotator.select_proxy(), None);
    }

    #[test]
    fn test_saturated_proxy_skipped_for_next_in_pool() {
        let rotator = ProxyRotator::new(pool(&["p1:8080", "p2:8080"]));
        for _ in 0..PROXY_USAGE_CAP {
            rotator.record_usage("p1:8080");
        }
        assert_eq!(rotator.select_proxy().as_deref(), Some("p2:8080"));
    }

    #[test]
    fn test_history_pruned_after_window() {
        let rotator = ProxyRotator::with_limits(pool(&["p1:8080"]), 1, PROXY_USAGE_WINDOW);
        let start = Instant::now();
        rotator.record_at("p1:8080", start);

        assert_eq!(rotator.select_at(start + Duration::from_secs(59)), None);
        assert_eq!(
            rotator.select_at(start + Duration::from_secs(61)).as_deref(),
            Some("p1:8080")
        );
    }

    #[test]
    fn test_strip_scheme() {
        assert_eq!(strip_scheme("http://1.2.3.4:8080"), "1.2.3.4:8080");
        assert_eq!(strip_scheme("https://proxy.example.com:3128"), "proxy.example.com:3128");
        assert_eq!(strip_scheme("ftp://1.2.3.4"), "1.2.3.4");
        assert_eq!(strip_scheme("1.2.3.4:8080"), "1.2.3.4:8080");
    }
}
