//! v1.1 API endpoints
//!
//! The oldest public API generation: every call is a GET, authenticated
//! calls carry `apikey` and a nonce in the query string and an `apisign`
//! header holding the HMAC-SHA512 of the full URL. Responses use the
//! legacy `{"success": ..., "result": ...}` envelope.

use crate::endpoints::string_payload;
use crate::engine::{RequestEngine, RequestMethod};
use crate::envelope::ExtractionSpec;
use crate::error::{RestError, RestResult};
use crate::params::Params;
use crate::urls::Urls;
use bittrex_auth::Credentials;
use bittrex_types::OrderBookSide;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

const BASE_URL: &str = "https://api.bittrex.com/api/v1.1";

/// Client for the v1.1 API
#[derive(Debug)]
pub struct V1Client {
    engine: Arc<RequestEngine>,
    urls: Urls,
    credentials: Option<Credentials>,
}

impl V1Client {
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

    /// List all markets
    #[instrument(skip(self))]
    pub async fn get_markets(&self) -> RestResult<Value> {
        self.request("public/getmarkets", Params::new(), false, ExtractionSpec::legacy())
            .await
    }

    /// List all supported currencies
    #[instrument(skip(self))]
    pub async fn get_currencies(&self) -> RestResult<Value> {
        self.request("public/getcurrencies", Params::new(), false, ExtractionSpec::legacy())
            .await
    }

    /// Get the current bid, ask and last price for a market
    #[instrument(skip(self))]
    pub async fn get_ticker(&self, market: &str) -> RestResult<Value> {
        self.request(
            "public/getticker",
            Params::new().with("market", market),
            false,
            ExtractionSpec::legacy(),
        )
        .await
    }

    /// List the last 24 hours of activity for all markets
    #[instrument(skip(self))]
    pub async fn get_market_summaries(&self) -> RestResult<Value> {
        self.request(
            "public/getmarketsummaries",
            Params::new(),
            false,
            ExtractionSpec::legacy(),
        )
        .await
    }

    /// Get the last 24 hours of activity for one market
    ///
    /// The API answers with a one-element array; the summary object itself
    /// is returned.
    #[instrument(skip(self))]
    pub async fn get_market_summary(&self, market: &str) -> RestResult<Value> {
        self.request(
            "public/getmarketsummary",
            Params::new().with("market", market),
            false,
            ExtractionSpec::legacy().at(0usize),
        )
        .await
    }

    /// Get the order book for a market
    #[instrument(skip(self))]
    pub async fn get_order_book(
        &self,
        market: &str,
        side: OrderBookSide,
    ) -> RestResult<Value> {
        self.request(
            "public/getorderbook",
            Params::new().with("market", market).with("type", side.as_str()),
            false,
            ExtractionSpec::legacy(),
        )
        .await
    }

    /// Get the latest trades for a market
    #[instrument(skip(self))]
    pub async fn get_market_history(&self, market: &str) -> RestResult<Value> {
        self.request(
            "public/getmarkethistory",
            Params::new().with("market", market),
            false,
            ExtractionSpec::legacy(),
        )
        .await
    }

    // ========================================================================
    // Market (signed)
    // ========================================================================

    /// Place a limit buy order, returning the order uuid
    #[instrument(skip(self))]
    pub async fn buy_limit(
        &self,
        market: &str,
        quantity: Decimal,
        rate: Decimal,
    ) -> RestResult<String> {
        self.buy_sell("market/buylimit", market, quantity, rate).await
    }

    /// Place a limit sell order, returning the order uuid
    #[instrument(skip(self))]
    pub async fn sell_limit(
        &self,
        market: &str,
        quantity: Decimal,
        rate: Decimal,
    ) -> RestResult<String> {
        self.buy_sell("market/selllimit", market, quantity, rate).await
    }

    /// Cancel an open order
    #[instrument(skip(self))]
    pub async fn cancel(&self, uuid: &str) -> RestResult<bool> {
        let payload = self
            .request(
                "market/cancel",
                Params::new().with("uuid", uuid),
                true,
                ExtractionSpec::new().need_eq("success", true).at("success"),
            )
            .await?;

        Ok(payload == Value::Bool(true))
    }

    /// List open orders, optionally filtered by market
    #[instrument(skip(self))]
    pub async fn get_open_orders(&self, market: Option<&str>) -> RestResult<Value> {
        self.request(
            "market/getopenorders",
            Params::new().with_opt("market", market),
            true,
            ExtractionSpec::legacy(),
        )
        .await
    }

    // ========================================================================
    // Account (signed)
    // ========================================================================

    /// List balances for all currencies
    #[instrument(skip(self))]
    pub async fn get_balances(&self) -> RestResult<Value> {
        self.request(
            "account/getbalances",
            Params::new(),
            true,
            ExtractionSpec::legacy(),
        )
        .await
    }

    /// Get the balance of one currency
    #[instrument(skip(self))]
    pub async fn get_balance(&self, currency: &str) -> RestResult<Value> {
        self.request(
            "account/getbalance",
            Params::new().with("currency", currency),
            true,
            ExtractionSpec::legacy(),
        )
        .await
    }

    /// Get or generate the deposit address for a currency
    #[instrument(skip(self))]
    pub async fn get_deposit_address(&self, currency: &str) -> RestResult<Value> {
        self.request(
            "account/getdepositaddress",
            Params::new().with("currency", currency),
            true,
            ExtractionSpec::legacy(),
        )
        .await
    }

    /// Withdraw funds, returning the withdrawal uuid
    ///
    /// `payment_id` is the memo/tag field used by currencies that route
    /// deposits through a shared address.
    #[instrument(skip(self, quantity))]
    pub async fn withdraw(
        &self,
        currency: &str,
        quantity: Decimal,
        address: &str,
        payment_id: Option<&str>,
    ) -> RestResult<String> {
        let payload = self
            .request(
                "account/withdraw",
                Params::new()
                    .with("currency", currency)
                    .with("quantity", quantity)
                    .with("address", address)
                    .with_opt("paymentid", payment_id),
                true,
                ExtractionSpec::new().need_eq("success", true).at("result").at("uuid"),
            )
            .await?;

        string_payload(payload)
    }

    /// Get a single order by uuid
    #[instrument(skip(self))]
    pub async fn get_order(&self, uuid: &str) -> RestResult<Value> {
        self.request(
            "account/getorder",
            Params::new().with("uuid", uuid),
            true,
            ExtractionSpec::legacy(),
        )
        .await
    }

    /// List order history, optionally filtered by market
    #[instrument(skip(self))]
    pub async fn get_order_history(&self, market: Option<&str>) -> RestResult<Value> {
        self.request(
            "account/getorderhistory",
            Params::new().with_opt("market", market),
            true,
            ExtractionSpec::legacy(),
        )
        .await
    }

    /// List withdrawal history, optionally filtered by currency
    #[instrument(skip(self))]
    pub async fn get_withdrawal_history(&self, currency: Option<&str>) -> RestResult<Value> {
        self.request(
            "account/getwithdrawalhistory",
            Params::new().with_opt("currency", currency),
            true,
            ExtractionSpec::legacy(),
        )
        .await
    }

    /// List deposit history, optionally filtered by currency
    #[instrument(skip(self))]
    pub async fn get_deposit_history(&self, currency: Option<&str>) -> RestResult<Value> {
        self.request(
            "account/getdeposithistory",
            Params::new().with_opt("currency", currency),
            true,
            ExtractionSpec::legacy(),
        )
        .await
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn buy_sell(
        &self,
        endpoint: &str,
        market: &str,
        quantity: Decimal,
        rate: Decimal,
    ) -> RestResult<String> {
        let payload = self
            .request(
                endpoint,
                Params::new()
                    .with("market", market)
                    .with("quantity", quantity)
                    .with("rate", rate),
                true,
                ExtractionSpec::new().need_eq("success", true).at("result").at("uuid"),
            )
            .await?;

        string_payload(payload)
    }

    /// Issue a v1 request
    ///
    /// Signed requests append `apikey` and a nonce to the query string and
    /// carry the URL signature in the `apisign` header.
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
            let headers = vec![("apisign".to_string(), creds.sign_url(&url))];

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
