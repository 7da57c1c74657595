//! v2.0 API endpoints
//!
//! The undocumented intermediate API generation. Same GET-only transport
//! and URL-signing scheme as v1.1, but different endpoint naming, PascalCase
//! parameter keys for trade calls, and a `signature` header instead of
//! `apisign`. Several responses nest the interesting value a few levels
//! deep, which is where extraction paths earn their keep.

use crate::engine::{RequestEngine, RequestMethod};
use crate::envelope::ExtractionSpec;
use crate::error::{RestError, RestResult};
use crate::params::Params;
use crate::urls::Urls;
use bittrex_auth::Credentials;
use bittrex_types::{ConditionType, TickInterval, TimeInEffect, TradeOrderType};
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

const BASE_URL: &str = "https://bittrex.com/api/v2.0";

/// Client for the v2.0 API
#[derive(Debug)]
pub struct V2Client {
    engine: Arc<RequestEngine>,
    urls: Urls,
    credentials: Option<Credentials>,
}

impl V2Client {
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

    /// Get the BTC price in USD
    #[instrument(skip(self))]
    pub async fn get_btc_price(&self) -> RestResult<f64> {
        let payload = self
            .request(
                "pub/currencies/GetBTCPrice",
                Params::new(),
                false,
                ExtractionSpec::new()
                    .need_eq("success", true)
                    .at("result")
                    .at("bpi")
                    .at("USD")
                    .at("rate_float"),
            )
            .await?;

        payload.as_f64().ok_or_else(|| {
            RestError::EnvelopeRejected("rate_float is not a number".to_string())
        })
    }

    /// List all supported currencies
    #[instrument(skip(self))]
    pub async fn get_currencies(&self) -> RestResult<Value> {
        self.request(
            "pub/currencies/GetCurrencies",
            Params::new(),
            false,
            ExtractionSpec::legacy(),
        )
        .await
    }

    /// Get extended info for one currency
    #[instrument(skip(self))]
    pub async fn get_currency(&self, currency: &str) -> RestResult<Value> {
        self.request(
            "pub/currencies/GetCurrencyInfo",
            Params::new().with("currencyName", currency),
            false,
            ExtractionSpec::legacy(),
        )
        .await
    }

    /// List wallet health for all currencies
    #[instrument(skip(self))]
    pub async fn get_wallet_health(&self) -> RestResult<Value> {
        self.request(
            "pub/currencies/getwallethealth",
            Params::new(),
            false,
            ExtractionSpec::legacy(),
        )
        .await
    }

    /// List summaries for all markets
    #[instrument(skip(self))]
    pub async fn get_market_summaries(&self) -> RestResult<Value> {
        self.request(
            "pub/markets/GetMarketSummaries",
            Params::new(),
            false,
            ExtractionSpec::legacy(),
        )
        .await
    }

    /// Get the summary of one market
    #[instrument(skip(self))]
    pub async fn get_market_summary(&self, market: &str) -> RestResult<Value> {
        self.request(
            "pub/market/GetMarketSummary",
            Params::new().with("marketName", market),
            false,
            ExtractionSpec::legacy(),
        )
        .await
    }

    /// Get candles for a market
    #[instrument(skip(self))]
    pub async fn get_ticks(&self, market: &str, interval: TickInterval) -> RestResult<Value> {
        self.request(
            "pub/market/GetTicks",
            Params::new()
                .with("marketName", market)
                .with("tickInterval", interval.as_str()),
            false,
            ExtractionSpec::legacy(),
        )
        .await
    }

    /// Get the latest candle for a market
    #[instrument(skip(self))]
    pub async fn get_latest_tick(&self, market: &str, interval: TickInterval) -> RestResult<Value> {
        self.request(
            "pub/market/GetLatestTick",
            Params::new()
                .with("marketName", market)
                .with("tickInterval", interval.as_str()),
            false,
            ExtractionSpec::legacy().at(0usize),
        )
        .await
    }

    // ========================================================================
    // Auth (signed)
    // ========================================================================

    /// Place a buy order
    #[instrument(skip(self, quantity, rate))]
    #[allow(clippy::too_many_arguments)]
    pub async fn trade_buy(
        &self,
        market: &str,
        quantity: Decimal,
        rate: Decimal,
        order_type: TradeOrderType,
        time_in_effect: TimeInEffect,
        condition_type: ConditionType,
        target: u64,
    ) -> RestResult<Value> {
        self.trade("auth/market/TradeBuy", market, quantity, rate, order_type, time_in_effect, condition_type, target)
            .await
    }

    /// Place a sell order
    #[instrument(skip(self, quantity, rate))]
    #[allow(clippy::too_many_arguments)]
    pub async fn trade_sell(
        &self,
        market: &str,
        quantity: Decimal,
        rate: Decimal,
        order_type: TradeOrderType,
        time_in_effect: TimeInEffect,
        condition_type: ConditionType,
        target: u64,
    ) -> RestResult<Value> {
        self.trade("auth/market/TradeSell", market, quantity, rate, order_type, time_in_effect, condition_type, target)
            .await
    }

    /// Cancel an open order
    #[instrument(skip(self))]
    pub async fn trade_cancel(&self, uuid: &str) -> RestResult<bool> {
        let payload = self
            .request(
                "auth/market/TradeCancel",
                Params::new().with("uuid", uuid),
                true,
                ExtractionSpec::new().need_eq("success", true).at("success"),
            )
            .await?;

        Ok(payload == Value::Bool(true))
    }

    /// List order history
    #[instrument(skip(self))]
    pub async fn get_order_history(&self) -> RestResult<Value> {
        self.request(
            "auth/orders/GetOrderHistory",
            Params::new(),
            true,
            ExtractionSpec::legacy(),
        )
        .await
    }

    // ========================================================================
    // Internals
    // ========================================================================

    #[allow(clippy::too_many_arguments)]
    async fn trade(
        &self,
        endpoint: &str,
        market: &str,
        quantity: Decimal,
        rate: Decimal,
        order_type: TradeOrderType,
        time_in_effect: TimeInEffect,
        condition_type: ConditionType,
        target: u64,
    ) -> RestResult<Value> {
        self.request(
            endpoint,
            Params::new()
                .with("marketName", market)
                .with("Quantity", quantity)
                .with("Rate", rate)
                .with("OrderType", order_type.as_str())
                .with("TimeInEffect", time_in_effect.as_str())
                .with("ConditionType", condition_type.as_str())
                .with("Target", target),
            true,
            ExtractionSpec::legacy(),
        )
        .await
    }

    /// Issue a v2 request
    ///
    /// Identical to the v1 flow except for the `signature` header name.
    async fn request(
        &self,
        endpoint: &str,
        mut params: Params,
        signed: bool,
        spec: ExtractionSpec,
    ) -> RestResult<Value> {
        if signed {
            let creds = self.credentials.as_ref().ok_or(RestError::AuthRequired)?;
            params.push("apikey", creds.api_key());

            let url = self.urls.url(&[endpoint], &params, true);
            let headers = vec![("signature".to_string(), creds.sign_url(&url))];

            self.engine
                .request(&url, RequestMethod::Get, &headers, None, &spec)
                .await
        } else {
            let url = self.urls.url(&[endpoint], &params, false);

            self.engine
                .request(&url, RequestMethod::Get, &[], None, &spec)
                .await
        }
    }
}
