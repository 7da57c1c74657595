//! v3 API endpoints
//!
//! The current API generation: RESTful paths, JSON bodies, native DELETE,
//! and the richer signing scheme (nonce + url + method + body hash, all in
//! `Api-*` headers). Errors arrive as an HTTP status with a `code` field in
//! the body instead of the legacy success flag.
//!
//! Market symbols are passed in quote-base order and reversed to the
//! base-quote form v3 expects, so the same symbol strings work against all
//! three API generations.

use crate::endpoints::string_payload;
use crate::engine::{RequestEngine, RequestMethod};
use crate::envelope::ExtractionSpec;
use crate::error::{RestError, RestResult};
use crate::params::Params;
use crate::urls::Urls;
use bittrex_auth::Credentials;
use bittrex_types::{
    CancelOrderType, CandleInterval, ConditionalOrderOperand, DepositStatus, OrderDirection,
    OrderType, TimeInForce, WithdrawalStatus,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

const BASE_URL: &str = "https://api.bittrex.com/v3";

/// Order to create (POST `/orders`, or nested in a conditional order)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub market_symbol: String,
    pub direction: OrderDirection,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    /// Required for non-ceiling orders, excluded for ceiling orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    /// Required for ceiling orders, excluded for non-ceiling orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<Decimal>,
    /// Required for LIMIT orders, excluded for MARKET orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    /// Pay commission with exchange credits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_awards: Option<bool>,
}

impl NewOrder {
    /// A limit order
    pub fn limit(
        market_symbol: impl Into<String>,
        direction: OrderDirection,
        quantity: Decimal,
        limit: Decimal,
    ) -> Self {
        Self {
            market_symbol: market_symbol.into(),
            direction,
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::GoodTilCancelled,
            quantity: Some(quantity),
            ceiling: None,
            limit: Some(limit),
            client_order_id: None,
            use_awards: None,
        }
    }

    /// A market order
    pub fn market(
        market_symbol: impl Into<String>,
        direction: OrderDirection,
        quantity: Decimal,
    ) -> Self {
        Self {
            market_symbol: market_symbol.into(),
            direction,
            order_type: OrderType::Market,
            time_in_force: TimeInForce::ImmediateOrCancel,
            quantity: Some(quantity),
            ceiling: None,
            limit: None,
            client_order_id: None,
            use_awards: None,
        }
    }

    /// Set the time in force
    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = time_in_force;
        self
    }

    /// Set a client-provided order id for advanced tracking
    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }
}

/// Order (or conditional order) a triggered conditional order cancels
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCancelOrder {
    #[serde(rename = "type")]
    pub cancel_type: CancelOrderType,
    pub id: String,
}

/// Conditional order to create (POST `/conditional-orders`)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConditionalOrder {
    pub market_symbol: String,
    /// Either this or `trailing_stop_percent` must be set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operand: Option<ConditionalOrderOperand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_stop_percent: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_to_create: Option<NewOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_to_cancel: Option<NewCancelOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_conditional_order_id: Option<String>,
}

/// Pagination window shared by the closed-entity listings
///
/// `next_page_token` and `previous_page_token` are mutually exclusive;
/// dates are ISO 8601 with one-second precision.
#[derive(Debug, Clone, Default)]
pub struct PageQuery {
    pub next_page_token: Option<String>,
    pub previous_page_token: Option<String>,
    /// 1–200, defaults to 100 server-side
    pub page_size: Option<u32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl PageQuery {
    fn apply(&self, params: Params) -> Params {
        params
            .with_opt("nextPageToken", self.next_page_token.as_deref())
            .with_opt("previousPageToken", self.previous_page_token.as_deref())
            .with_opt("pageSize", self.page_size)
            .with_opt("startDate", self.start_date.as_deref())
            .with_opt("endDate", self.end_date.as_deref())
    }
}

/// Client for the v3 API
#[derive(Debug)]
pub struct V3Client {
    engine: Arc<RequestEngine>,
    urls: Urls,
    credentials: Option<Credentials>,
}

impl V3Client {
    pub(crate) fn new(engine: Arc<RequestEngine>, credentials: Option<Credentials>) -> Self {
        Self {
            engine,
            urls: Urls::new(BASE_URL),
            credentials,
        }
    }

    /// Check if private endpoints are available
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    // ========================================================================
    // Public
    // ========================================================================

    /// Ping the service; the payload carries the server time
    #[instrument(skip(self))]
    pub async fn ping(&self) -> RestResult<Value> {
        self.get(&["ping"], Params::new(), false).await
    }

    /// List all currencies
    #[instrument(skip(self))]
    pub async fn get_currencies(&self) -> RestResult<Value> {
        self.get(&["currencies"], Params::new(), false).await
    }

    /// Get info on one currency
    #[instrument(skip(self))]
    pub async fn get_currency(&self, currency: &str) -> RestResult<Value> {
        self.get(&["currencies", currency], Params::new(), false).await
    }

    /// List all markets
    #[instrument(skip(self))]
    pub async fn get_markets(&self) -> RestResult<Value> {
        self.get(&["markets"], Params::new(), false).await
    }

    /// Get info on one market
    #[instrument(skip(self))]
    pub async fn get_market(&self, market: &str) -> RestResult<Value> {
        self.get(&["markets", &reversed_market(market)], Params::new(), false)
            .await
    }

    /// List 24-hour summaries for all markets
    #[instrument(skip(self))]
    pub async fn get_market_summaries(&self) -> RestResult<Value> {
        self.get(&["markets", "summaries"], Params::new(), false).await
    }

    /// Get the 24-hour summary of one market
    #[instrument(skip(self))]
    pub async fn get_market_summary(&self, market: &str) -> RestResult<Value> {
        self.get(
            &["markets", &reversed_market(market), "summary"],
            Params::new(),
            false,
        )
        .await
    }

    /// List tickers for all markets
    #[instrument(skip(self))]
    pub async fn get_tickers(&self) -> RestResult<Value> {
        self.get(&["markets", "tickers"], Params::new(), false).await
    }

    /// Get the ticker of one market
    #[instrument(skip(self))]
    pub async fn get_ticker(&self, market: &str) -> RestResult<Value> {
        self.get(
            &["markets", &reversed_market(market), "ticker"],
            Params::new(),
            false,
        )
        .await
    }

    /// Get the order book of one market
    ///
    /// Allowed depths are 1, 25 and 500; the server default is 25.
    #[instrument(skip(self))]
    pub async fn get_orderbook(&self, market: &str, depth: Option<u32>) -> RestResult<Value> {
        self.get(
            &["markets", &reversed_market(market), "orderbook"],
            Params::new().with_opt("depth", depth),
            false,
        )
        .await
    }

    /// List recent trades of one market
    #[instrument(skip(self))]
    pub async fn get_trades(&self, market: &str) -> RestResult<Value> {
        self.get(
            &["markets", &reversed_market(market), "trades"],
            Params::new(),
            false,
        )
        .await
    }

    /// List recent candles of one market
    #[instrument(skip(self))]
    pub async fn get_candles(
        &self,
        market: &str,
        interval: Option<CandleInterval>,
    ) -> RestResult<Value> {
        self.get(
            &["markets", &reversed_market(market), "candles"],
            Params::new().with_opt("candleInterval", interval.map(|i| i.as_str())),
            false,
        )
        .await
    }

    /// List recent candles of one market at a specific interval
    #[instrument(skip(self))]
    pub async fn get_recent_candles(
        &self,
        market: &str,
        interval: CandleInterval,
    ) -> RestResult<Value> {
        self.get(
            &[
                "markets",
                &reversed_market(market),
                "candles",
                interval.as_str(),
                "recent",
            ],
            Params::new(),
            false,
        )
        .await
    }

    /// List historical candles starting at a given date
    ///
    /// Month and day are omitted for the coarser intervals.
    #[instrument(skip(self))]
    pub async fn get_historical_candles(
        &self,
        market: &str,
        interval: CandleInterval,
        year: u32,
        month: Option<u32>,
        day: Option<u32>,
    ) -> RestResult<Value> {
        let market = reversed_market(market);
        let year = year.to_string();
        let month = month.map(|m| m.to_string());
        let day = day.map(|d| d.to_string());

        let mut segments: Vec<&str> = vec![
            "markets",
            market.as_str(),
            "candles",
            interval.as_str(),
            "historical",
            year.as_str(),
        ];
        if let Some(month) = &month {
            segments.push(month.as_str());
        }
        if let Some(day) = &day {
            segments.push(day.as_str());
        }

        self.get(&segments, Params::new(), false).await
    }

    // ========================================================================
    // Account (signed)
    // ========================================================================

    /// Get account info
    #[instrument(skip(self))]
    pub async fn get_account(&self) -> RestResult<Value> {
        self.get(&["account"], Params::new(), true).await
    }

    /// Get 30-day trading volume
    #[instrument(skip(self))]
    pub async fn get_account_volume(&self) -> RestResult<Value> {
        self.get(&["account", "volume"], Params::new(), true).await
    }

    /// List deposit addresses
    #[instrument(skip(self))]
    pub async fn get_addresses(&self) -> RestResult<Value> {
        self.get(&["addresses"], Params::new(), true).await
    }

    /// Get the deposit address of one currency
    #[instrument(skip(self))]
    pub async fn get_address(&self, currency: &str) -> RestResult<Value> {
        self.get(&["addresses", currency], Params::new(), true).await
    }

    /// Request provisioning of a deposit address for a currency
    #[instrument(skip(self))]
    pub async fn create_address(&self, currency: &str) -> RestResult<Value> {
        self.request(
            &["addresses"],
            RequestMethod::Post,
            Params::new(),
            Some(serde_json::json!({ "currencySymbol": currency })),
            true,
        )
        .await
    }

    /// List balances for all currencies
    #[instrument(skip(self))]
    pub async fn get_balances(&self) -> RestResult<Value> {
        self.get(&["balances"], Params::new(), true).await
    }

    /// Get the balance of one currency
    #[instrument(skip(self))]
    pub async fn get_balance(&self, currency: &str) -> RestResult<Value> {
        self.get(&["balances", currency], Params::new(), true).await
    }

    // ========================================================================
    // Deposits and withdrawals (signed)
    // ========================================================================

    /// List open deposits, optionally filtered
    #[instrument(skip(self))]
    pub async fn get_open_deposits(
        &self,
        status: Option<DepositStatus>,
        currency: Option<&str>,
    ) -> RestResult<Value> {
        self.get(
            &["deposits", "open"],
            Params::new()
                .with_opt("status", status.map(|s| s.as_str()))
                .with_opt("currencySymbol", currency),
            true,
        )
        .await
    }

    /// List closed deposits, optionally filtered and paginated
    #[instrument(skip(self))]
    pub async fn get_closed_deposits(
        &self,
        status: Option<DepositStatus>,
        currency: Option<&str>,
        page: &PageQuery,
    ) -> RestResult<Value> {
        self.get(
            &["deposits", "closed"],
            page.apply(
                Params::new()
                    .with_opt("status", status.map(|s| s.as_str()))
                    .with_opt("currencySymbol", currency),
            ),
            true,
        )
        .await
    }

    /// List deposits with a given blockchain transaction id
    #[instrument(skip(self))]
    pub async fn get_deposits_by_tx_id(&self, tx_id: &str) -> RestResult<Value> {
        self.get(&["deposits", "ByTxId", tx_id], Params::new(), true).await
    }

    /// Get one deposit by id
    #[instrument(skip(self))]
    pub async fn get_deposit(&self, deposit_id: &str) -> RestResult<Value> {
        self.get(&["deposits", deposit_id], Params::new(), true).await
    }

    /// List open withdrawals, optionally filtered
    #[instrument(skip(self))]
    pub async fn get_open_withdrawals(
        &self,
        status: Option<WithdrawalStatus>,
        currency: Option<&str>,
    ) -> RestResult<Value> {
        self.get(
            &["withdrawals", "open"],
            Params::new()
                .with_opt("status", status.map(|s| s.as_str()))
                .with_opt("currencySymbol", currency),
            true,
        )
        .await
    }

    /// List closed withdrawals, optionally filtered and paginated
    #[instrument(skip(self))]
    pub async fn get_closed_withdrawals(
        &self,
        status: Option<WithdrawalStatus>,
        currency: Option<&str>,
        page: &PageQuery,
    ) -> RestResult<Value> {
        self.get(
            &["withdrawals", "closed"],
            page.apply(
                Params::new()
                    .with_opt("status", status.map(|s| s.as_str()))
                    .with_opt("currencySymbol", currency),
            ),
            true,
        )
        .await
    }

    /// List withdrawals with a given blockchain transaction id
    #[instrument(skip(self))]
    pub async fn get_withdrawals_by_tx_id(&self, tx_id: &str) -> RestResult<Value> {
        self.get(&["withdrawals", "ByTxId", tx_id], Params::new(), true).await
    }

    /// Get one withdrawal by id
    #[instrument(skip(self))]
    pub async fn get_withdrawal(&self, withdrawal_id: &str) -> RestResult<Value> {
        self.get(&["withdrawals", withdrawal_id], Params::new(), true).await
    }

    // ========================================================================
    // Orders (signed)
    // ========================================================================

    /// List open orders, optionally filtered by market
    #[instrument(skip(self))]
    pub async fn get_open_orders(&self, market: Option<&str>) -> RestResult<Value> {
        self.get(
            &["orders", "open"],
            Params::new().with_opt("marketSymbol", market.map(reversed_market)),
            true,
        )
        .await
    }

    /// List closed orders, optionally filtered and paginated
    ///
    /// Sorted and paginated in inverse order of the `closedAt` field.
    #[instrument(skip(self))]
    pub async fn get_closed_orders(
        &self,
        market: Option<&str>,
        page: &PageQuery,
    ) -> RestResult<Value> {
        self.get(
            &["orders", "closed"],
            page.apply(Params::new().with_opt("marketSymbol", market.map(reversed_market))),
            true,
        )
        .await
    }

    /// Get one order by id
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: &str) -> RestResult<Value> {
        self.get(&["orders", order_id], Params::new(), true).await
    }

    /// Cancel an order
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: &str) -> RestResult<Value> {
        self.request(
            &["orders", order_id],
            RequestMethod::Delete,
            Params::new(),
            None,
            true,
        )
        .await
    }

    /// Place a new order
    #[instrument(skip(self, order), fields(market = %order.market_symbol, direction = ?order.direction))]
    pub async fn post_order(&self, order: &NewOrder) -> RestResult<Value> {
        self.request(
            &["orders"],
            RequestMethod::Post,
            Params::new(),
            Some(body_json(order)?),
            true,
        )
        .await
    }

    /// Place a new order and return just its id
    #[instrument(skip(self, order))]
    pub async fn post_order_id(&self, order: &NewOrder) -> RestResult<String> {
        let payload = self.post_order(order).await?;
        string_payload(payload.get("id").cloned().unwrap_or(Value::Null))
    }

    // ========================================================================
    // Conditional orders (signed)
    // ========================================================================

    /// Get one conditional order by id
    #[instrument(skip(self))]
    pub async fn get_conditional_order(&self, conditional_order_id: &str) -> RestResult<Value> {
        self.get(
            &["conditional-orders", conditional_order_id],
            Params::new(),
            true,
        )
        .await
    }

    /// Cancel a conditional order
    #[instrument(skip(self))]
    pub async fn cancel_conditional_order(&self, conditional_order_id: &str) -> RestResult<Value> {
        self.request(
            &["conditional-orders", conditional_order_id],
            RequestMethod::Delete,
            Params::new(),
            None,
            true,
        )
        .await
    }

    /// List open conditional orders, optionally filtered by market
    #[instrument(skip(self))]
    pub async fn get_open_conditional_orders(&self, market: Option<&str>) -> RestResult<Value> {
        self.get(
            &["conditional-orders", "open"],
            Params::new().with_opt("marketSymbol", market.map(reversed_market)),
            true,
        )
        .await
    }

    /// List closed conditional orders, optionally filtered and paginated
    #[instrument(skip(self))]
    pub async fn get_closed_conditional_orders(
        &self,
        market: Option<&str>,
        page: &PageQuery,
    ) -> RestResult<Value> {
        self.get(
            &["conditional-orders", "closed"],
            page.apply(Params::new().with_opt("marketSymbol", market.map(reversed_market))),
            true,
        )
        .await
    }

    /// Create a conditional order
    #[instrument(skip(self, order), fields(market = %order.market_symbol))]
    pub async fn create_conditional_order(
        &self,
        order: &NewConditionalOrder,
    ) -> RestResult<Value> {
        self.request(
            &["conditional-orders"],
            RequestMethod::Post,
            Params::new(),
            Some(body_json(order)?),
            true,
        )
        .await
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn get(&self, segments: &[&str], params: Params, signed: bool) -> RestResult<Value> {
        self.request(segments, RequestMethod::Get, params, None, signed).await
    }

    /// Issue a v3 request
    ///
    /// Signed requests carry `Api-Timestamp`, `Api-Key`, `Api-Content-Hash`
    /// and `Api-Signature` headers. The nonce and signature are computed
    /// once per logical request and shared by every retry attempt.
    async fn request(
        &self,
        segments: &[&str],
        method: RequestMethod,
        params: Params,
        body: Option<Value>,
        signed: bool,
    ) -> RestResult<Value> {
        let url = self.urls.url(segments, &params, false);
        let mut headers = vec![(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )];

        if signed {
            let creds = self.credentials.as_ref().ok_or(RestError::AuthRequired)?;
            let nonce = Credentials::generate_nonce();
            let content = body.as_ref().map(|b| b.to_string()).unwrap_or_default();
            let signature = creds.sign_v3(nonce, &url, method.as_str(), &content);

            headers.push(("Api-Timestamp".to_string(), nonce.to_string()));
            headers.push(("Api-Key".to_string(), creds.api_key().to_string()));
            headers.push(("Api-Content-Hash".to_string(), signature.content_hash));
            headers.push(("Api-Signature".to_string(), signature.signature));
        }

        self.engine
            .request(&url, method, &headers, body.as_ref(), &ExtractionSpec::v3())
            .await
    }
}

/// Reverse a quote-base market symbol into the base-quote form v3 expects
///
/// `"USDT-BTC"` (v1-style) becomes `"BTC-USDT"`.
pub fn reversed_market(market: &str) -> String {
    market.rsplit('-').collect::<Vec<_>>().join("-")
}

fn body_json<T: Serialize>(body: &T) -> RestResult<Value> {
    serde_json::to_value(body)
        .map_err(|e| RestError::EnvelopeRejected(format!("failed to serialize request body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reversed_market() {
        assert_eq!(reversed_market("USDT-BTC"), "BTC-USDT");
        assert_eq!(reversed_market("BTC"), "BTC");
    }

    #[test]
    fn test_new_order_serializes_wire_keys() {
        let order = NewOrder::limit("BTC-USDT", OrderDirection::Buy, dec!(0.5), dec!(20000))
            .with_client_order_id("my-id");
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["marketSymbol"], "BTC-USDT");
        assert_eq!(json["direction"], "BUY");
        assert_eq!(json["type"], "LIMIT");
        assert_eq!(json["timeInForce"], "GOOD_TIL_CANCELLED");
        assert_eq!(json["quantity"], "0.5");
        assert_eq!(json["limit"], "20000");
        assert_eq!(json["clientOrderId"], "my-id");
    }

    #[test]
    fn test_new_order_omits_unset_fields() {
        let order = NewOrder::market("BTC-USDT", OrderDirection::Sell, dec!(1));
        let json = serde_json::to_value(&order).unwrap();
        let object = json.as_object().unwrap();

        assert!(!object.contains_key("ceiling"));
        assert!(!object.contains_key("limit"));
        assert!(!object.contains_key("clientOrderId"));
        assert!(!object.contains_key("useAwards"));
        assert_eq!(json["timeInForce"], "IMMEDIATE_OR_CANCEL");
    }

    #[test]
    fn test_conditional_order_body() {
        let conditional = NewConditionalOrder {
            market_symbol: "BTC-USDT".to_string(),
            operand: Some(ConditionalOrderOperand::Lte),
            trigger_price: Some(dec!(18000)),
            trailing_stop_percent: None,
            order_to_create: Some(NewOrder::limit(
                "BTC-USDT",
                OrderDirection::Buy,
                dec!(0.1),
                dec!(17900),
            )),
            order_to_cancel: Some(NewCancelOrder {
                cancel_type: CancelOrderType::Order,
                id: "some-uuid".to_string(),
            }),
            client_conditional_order_id: None,
        };
        let json = serde_json::to_value(&conditional).unwrap();

        assert_eq!(json["operand"], "LTE");
        assert_eq!(json["orderToCancel"]["type"], "ORDER");
        assert_eq!(json["orderToCreate"]["direction"], "BUY");
        assert!(!json.as_object().unwrap().contains_key("trailingStopPercent"));
    }

    #[test]
    fn test_page_query_applies_only_set_fields() {
        let page = PageQuery {
            page_size: Some(50),
            ..Default::default()
        };
        let params = page.apply(Params::new());
        assert_eq!(params.to_query(), "pageSize=50");
    }
}
