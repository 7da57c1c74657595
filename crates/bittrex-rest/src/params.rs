//! Query and body parameters
//!
//! The legacy API is sensitive to parameter order (the signature covers the
//! raw URL), so parameters keep their insertion order rather than living in
//! a map. `None` values are kept as placeholders and skipped during
//! serialization, which lets endpoint methods pass optional arguments
//! through unconditionally.

use rust_decimal::Decimal;
use std::fmt;

/// A single parameter value, serialized to its exact wire string
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Decimal(Decimal),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{}", i),
            Self::UInt(u) => write!(f, "{}", u),
            Self::Float(x) => write!(f, "{}", x),
            Self::Decimal(d) => write!(f, "{}", d),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::UInt(value as u64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Decimal> for ParamValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Insertion-ordered request parameters
#[derive(Debug, Clone, Default)]
pub struct Params {
    entries: Vec<(String, Option<ParamValue>)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.entries.push((key.into(), Some(value.into())));
        self
    }

    /// Append an optional parameter; `None` is omitted from serialization
    pub fn with_opt<V: Into<ParamValue>>(
        mut self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        self.entries.push((key.into(), value.map(Into::into)));
        self
    }

    /// Append a parameter in place
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.push((key.into(), Some(value.into())));
    }

    /// True when no parameter has a value
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_none())
    }

    /// True when a non-null value exists for `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .iter()
            .any(|(k, v)| k == key && v.is_some())
    }

    /// Iterate over the non-null parameters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    /// Serialize to a `k=v&k2=v2` query string, without percent-encoding
    ///
    /// The legacy API never URL-encodes reserved characters and the v1/v2
    /// signature covers the raw string, so neither do we.
    pub fn to_query(&self) -> String {
        let mut query = String::new();

        for (key, value) in self.iter() {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(key);
            query.push('=');
            query.push_str(&value.to_string());
        }

        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_none_values_omitted() {
        let params = Params::new()
            .with_opt::<ParamValue>("a", None)
            .with("b", 2i64);
        assert_eq!(params.to_query(), "b=2");
    }

    #[test]
    fn test_insertion_order_preserved() {
        let params = Params::new()
            .with("market", "BTC-LTC")
            .with("type", "both")
            .with("depth", 25u32);
        assert_eq!(params.to_query(), "market=BTC-LTC&type=both&depth=25");
    }

    #[test]
    fn test_no_percent_encoding() {
        let params = Params::new().with("memo", "a b&c");
        assert_eq!(params.to_query(), "memo=a b&c");
    }

    #[test]
    fn test_decimal_and_bool_forms() {
        let params = Params::new()
            .with("quantity", dec!(0.30802438))
            .with("useAwards", true);
        assert_eq!(params.to_query(), "quantity=0.30802438&useAwards=true");
    }

    #[test]
    fn test_contains_key_ignores_null_entries() {
        let params = Params::new().with_opt::<ParamValue>("nonce", None);
        assert!(!params.contains_key("nonce"));
        assert!(params.is_empty());
    }
}
