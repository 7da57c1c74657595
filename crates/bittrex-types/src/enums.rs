//! Enumerated wire values for the v1.1, v2.0 and v3 APIs
//!
//! The exchange is case-sensitive about these strings and the three API
//! generations disagree on casing conventions (v1 lowercase, v2 mixed,
//! v3 SCREAMING_SNAKE), so each enum maps to its wire form explicitly.

use serde::{Deserialize, Serialize};

// ============================================================================
// v3 enums
// ============================================================================

/// Order direction (v3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderDirection {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl OrderDirection {
    /// Returns the wire string used in request bodies and responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }

    /// Returns the opposite direction
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

/// Order type (v3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Limit order
    Limit,
    /// Market order
    Market,
    /// Ceiling limit order (spend-based limit)
    CeilingLimit,
    /// Ceiling market order (spend-based market)
    CeilingMarket,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
            Self::Market => "MARKET",
            Self::CeilingLimit => "CEILING_LIMIT",
            Self::CeilingMarket => "CEILING_MARKET",
        }
    }

    /// Returns true for the ceiling variants, which take a `ceiling`
    /// amount instead of a `quantity`
    pub fn is_ceiling(&self) -> bool {
        matches!(self, Self::CeilingLimit | Self::CeilingMarket)
    }
}

/// Time in force (v3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    GoodTilCancelled,
    ImmediateOrCancel,
    FillOrKill,
    PostOnlyGoodTilCancelled,
    BuyNow,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoodTilCancelled => "GOOD_TIL_CANCELLED",
            Self::ImmediateOrCancel => "IMMEDIATE_OR_CANCEL",
            Self::FillOrKill => "FILL_OR_KILL",
            Self::PostOnlyGoodTilCancelled => "POST_ONLY_GOOD_TIL_CANCELLED",
            Self::BuyNow => "BUY_NOW",
        }
    }
}

/// Kind of order a conditional order cancels when triggered (v3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancelOrderType {
    Order,
    ConditionalOrder,
}

impl CancelOrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "ORDER",
            Self::ConditionalOrder => "CONDITIONAL_ORDER",
        }
    }
}

/// Trigger comparison for conditional orders (v3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionalOrderOperand {
    /// Trigger at or below the trigger price
    Lte,
    /// Trigger at or above the trigger price
    Gte,
}

impl ConditionalOrderOperand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lte => "LTE",
            Self::Gte => "GTE",
        }
    }
}

/// Candle interval (v3)
///
/// The maximum age of returned candles depends on the interval
/// (MINUTE_1/MINUTE_5: 1 day, HOUR_1: 31 days, DAY_1: 366 days).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandleInterval {
    #[serde(rename = "MINUTE_1")]
    Minute1,
    #[serde(rename = "MINUTE_5")]
    Minute5,
    #[serde(rename = "HOUR_1")]
    Hour1,
    #[serde(rename = "DAY_1")]
    Day1,
}

impl CandleInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "MINUTE_1",
            Self::Minute5 => "MINUTE_5",
            Self::Hour1 => "HOUR_1",
            Self::Day1 => "DAY_1",
        }
    }
}

/// Deposit status filter (v3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepositStatus {
    Pending,
    Completed,
    Orphaned,
    Invalidated,
}

impl DepositStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Orphaned => "ORPHANED",
            Self::Invalidated => "INVALIDATED",
        }
    }
}

/// Withdrawal status filter (v3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalStatus {
    Requested,
    Authorized,
    Pending,
    Completed,
    ErrorInvalidAddress,
    Cancelled,
}

impl WithdrawalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Authorized => "AUTHORIZED",
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::ErrorInvalidAddress => "ERROR_INVALID_ADDRESS",
            Self::Cancelled => "CANCELLED",
        }
    }
}

// ============================================================================
// v2 enums
// ============================================================================

/// Candlestick interval (v2 `GetTicks`/`GetLatestTick`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickInterval {
    #[serde(rename = "oneMin")]
    OneMin,
    #[serde(rename = "fiveMin")]
    FiveMin,
    #[serde(rename = "thirtyMin")]
    ThirtyMin,
    #[serde(rename = "hour")]
    Hour,
    #[serde(rename = "day")]
    Day,
}

impl TickInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMin => "oneMin",
            Self::FiveMin => "fiveMin",
            Self::ThirtyMin => "thirtyMin",
            Self::Hour => "hour",
            Self::Day => "day",
        }
    }
}

/// Order type accepted by the v2 trade endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeOrderType {
    Limit,
    Market,
}

impl TradeOrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
            Self::Market => "MARKET",
        }
    }
}

/// Time in effect for v2 trade orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInEffect {
    GoodTilCancelled,
    ImmediateOrCancel,
    FillOrKill,
}

impl TimeInEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoodTilCancelled => "GOOD_TIL_CANCELLED",
            Self::ImmediateOrCancel => "IMMEDIATE_OR_CANCEL",
            Self::FillOrKill => "FILL_OR_KILL",
        }
    }
}

/// Trigger condition for v2 conditional trades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionType {
    None,
    GreaterThan,
    LessThan,
    StopLossFixed,
    StopLossPercentage,
}

impl ConditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::GreaterThan => "GREATER_THAN",
            Self::LessThan => "LESS_THAN",
            Self::StopLossFixed => "STOP_LOSS_FIXED",
            Self::StopLossPercentage => "STOP_LOSS_PERCENTAGE",
        }
    }
}

// ============================================================================
// v1 enums
// ============================================================================

/// Which side(s) of the book `public/getorderbook` returns (v1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderBookSide {
    Buy,
    Sell,
    #[default]
    Both,
}

impl OrderBookSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Both => "both",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v3_wire_strings() {
        assert_eq!(OrderDirection::Buy.as_str(), "BUY");
        assert_eq!(OrderDirection::Sell.as_str(), "SELL");
        assert_eq!(OrderType::CeilingLimit.as_str(), "CEILING_LIMIT");
        assert_eq!(
            TimeInForce::PostOnlyGoodTilCancelled.as_str(),
            "POST_ONLY_GOOD_TIL_CANCELLED"
        );
        assert_eq!(CancelOrderType::ConditionalOrder.as_str(), "CONDITIONAL_ORDER");
        assert_eq!(ConditionalOrderOperand::Gte.as_str(), "GTE");
        assert_eq!(CandleInterval::Minute5.as_str(), "MINUTE_5");
        assert_eq!(DepositStatus::Orphaned.as_str(), "ORPHANED");
        assert_eq!(
            WithdrawalStatus::ErrorInvalidAddress.as_str(),
            "ERROR_INVALID_ADDRESS"
        );
    }

    #[test]
    fn test_v2_wire_strings() {
        assert_eq!(TickInterval::OneMin.as_str(), "oneMin");
        assert_eq!(TickInterval::ThirtyMin.as_str(), "thirtyMin");
        assert_eq!(TradeOrderType::Limit.as_str(), "LIMIT");
        assert_eq!(TimeInEffect::GoodTilCancelled.as_str(), "GOOD_TIL_CANCELLED");
        assert_eq!(ConditionType::StopLossPercentage.as_str(), "STOP_LOSS_PERCENTAGE");
    }

    #[test]
    fn test_v1_wire_strings() {
        assert_eq!(OrderBookSide::Buy.as_str(), "buy");
        assert_eq!(OrderBookSide::Both.as_str(), "both");
        assert_eq!(OrderBookSide::default(), OrderBookSide::Both);
    }

    #[test]
    fn test_serde_agrees_with_as_str() {
        // The serde rename attributes and as_str() must describe the same
        // wire format; a drift between them would sign one string and send
        // another.
        let cases = [
            serde_json::to_string(&OrderDirection::Buy).unwrap(),
            serde_json::to_string(&OrderType::CeilingMarket).unwrap(),
            serde_json::to_string(&TimeInForce::BuyNow).unwrap(),
            serde_json::to_string(&CandleInterval::Hour1).unwrap(),
            serde_json::to_string(&TickInterval::FiveMin).unwrap(),
            serde_json::to_string(&OrderBookSide::Sell).unwrap(),
        ];
        let expected = [
            "\"BUY\"",
            "\"CEILING_MARKET\"",
            "\"BUY_NOW\"",
            "\"HOUR_1\"",
            "\"fiveMin\"",
            "\"sell\"",
        ];
        assert_eq!(cases, expected);
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(OrderDirection::Buy.opposite(), OrderDirection::Sell);
    }
}
