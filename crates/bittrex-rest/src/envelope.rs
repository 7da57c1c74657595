//! Response envelope validation and payload extraction
//!
//! The exchange wraps payloads in vendor envelopes that changed shape across
//! API generations. v1/v2 responses carry `{"success": bool, "result": ...}`
//! and signal business errors with `success: false` under HTTP 200; v3
//! returns the payload bare and signals errors with an HTTP status plus a
//! `code` field in the body. [`ExtractionSpec`] describes what a valid
//! envelope must (and must not) contain and where the caller's payload
//! lives inside it.

use crate::error::{RestError, RestResult};
use serde_json::Value;

/// One step of a payload extraction path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// Array index
    Index(usize),
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Envelope requirements and payload location for one request
#[derive(Debug, Clone, Default)]
pub struct ExtractionSpec {
    /// Fields that must be present; with a value, it must also compare equal
    needed_values: Vec<(String, Option<Value>)>,
    /// Fields whose mere presence invalidates the response
    unwanted_values: Vec<String>,
    /// Where the payload lives inside the validated envelope
    path: Vec<PathSegment>,
    /// Return `true` instead of failing when `result` is absent or null
    /// (v1/v2 calls that answer with a bare success flag)
    boolean_success_sentinel: bool,
}

impl ExtractionSpec {
    /// A spec with no requirements that returns the whole body
    pub fn new() -> Self {
        Self::default()
    }

    /// The v1/v2 envelope: `success == true`, payload under `result`,
    /// boolean-success sentinel when `result` is absent or null
    pub fn legacy() -> Self {
        Self::new()
            .need_eq("success", true)
            .with_sentinel()
            .at("result")
    }

    /// The v3 envelope: bare payload, rejected when the error `code`
    /// field is present
    pub fn v3() -> Self {
        Self::new().forbid("code")
    }

    /// Require `key` to be present
    pub fn need(mut self, key: impl Into<String>) -> Self {
        self.needed_values.push((key.into(), None));
        self
    }

    /// Require `key` to be present and equal to `value`
    pub fn need_eq(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.needed_values.push((key.into(), Some(value.into())));
        self
    }

    /// Reject the response when `key` is present
    pub fn forbid(mut self, key: impl Into<String>) -> Self {
        self.unwanted_values.push(key.into());
        self
    }

    /// Append one step to the extraction path
    pub fn at(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path.push(segment.into());
        self
    }

    /// Replace the extraction path
    pub fn with_path(mut self, path: Vec<PathSegment>) -> Self {
        self.path = path;
        self
    }

    /// Enable the boolean-success sentinel
    pub fn with_sentinel(mut self) -> Self {
        self.boolean_success_sentinel = true;
        self
    }

    /// Validate an envelope and extract the payload
    ///
    /// Never panics: every missing key, value mismatch, forbidden field or
    /// path miss comes back as an `Err` for the engine to retry.
    pub fn validate(&self, json: Value) -> RestResult<Value> {
        if json.is_null() {
            return Err(RestError::EnvelopeRejected("response body is null".to_string()));
        }

        if !self.needed_values.is_empty() || !self.unwanted_values.is_empty() {
            let object = json.as_object().ok_or_else(|| {
                RestError::EnvelopeRejected("response body is not a JSON object".to_string())
            })?;

            for (key, expected) in &self.needed_values {
                let actual = object.get(key).ok_or_else(|| {
                    RestError::EnvelopeRejected(format!("`{}` not found in response", key))
                })?;

                if let Some(expected) = expected {
                    if actual != expected {
                        return Err(RestError::EnvelopeRejected(format!(
                            "`{}` is {}, expected {}",
                            key, actual, expected
                        )));
                    }
                }
            }

            for key in &self.unwanted_values {
                if object.contains_key(key) {
                    return Err(RestError::EnvelopeRejected(format!(
                        "found error field `{}` in response: {}",
                        key, object[key]
                    )));
                }
            }
        }

        if self.boolean_success_sentinel {
            match json.get("result") {
                None | Some(Value::Null) => return Ok(Value::Bool(true)),
                Some(_) => {}
            }
        }

        if self.path.is_empty() {
            return Ok(json);
        }

        let mut current = &json;

        for segment in &self.path {
            let next = match segment {
                PathSegment::Key(key) => current.get(key),
                PathSegment::Index(index) => current.get(index),
            };

            current = next.ok_or_else(|| RestError::ExtractionFailed(self.path_display()))?;
        }

        Ok(current.clone())
    }

    fn path_display(&self) -> String {
        self.path
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_nested_payload() {
        let spec = ExtractionSpec::new()
            .need_eq("success", true)
            .at("result")
            .at("x");
        let payload = spec
            .validate(json!({"success": true, "result": {"x": 1}}))
            .unwrap();
        assert_eq!(payload, json!(1));
    }

    #[test]
    fn test_rejects_success_false() {
        let spec = ExtractionSpec::new().need_eq("success", true);
        let err = spec.validate(json!({"success": false})).unwrap_err();
        assert!(matches!(err, RestError::EnvelopeRejected(_)));
    }

    #[test]
    fn test_rejects_missing_required_field() {
        let spec = ExtractionSpec::new().need("success");
        let err = spec.validate(json!({"result": []})).unwrap_err();
        assert!(err.to_string().contains("success"));
    }

    #[test]
    fn test_presence_only_check_accepts_any_value() {
        let spec = ExtractionSpec::new().need("result");
        assert!(spec.validate(json!({"result": null})).is_ok());
    }

    #[test]
    fn test_rejects_forbidden_field() {
        let spec = ExtractionSpec::v3();
        let err = spec
            .validate(json!({"code": "INSUFFICIENT_FUNDS"}))
            .unwrap_err();
        assert!(err.to_string().contains("INSUFFICIENT_FUNDS"));
    }

    #[test]
    fn test_v3_passes_bare_payload_through() {
        let spec = ExtractionSpec::v3();
        let payload = spec.validate(json!([{"symbol": "BTC-USD"}])).unwrap();
        assert_eq!(payload, json!([{"symbol": "BTC-USD"}]));
    }

    #[test]
    fn test_null_body_rejected() {
        let err = ExtractionSpec::new().validate(Value::Null).unwrap_err();
        assert!(matches!(err, RestError::EnvelopeRejected(_)));
    }

    #[test]
    fn test_path_miss_is_extraction_failure() {
        let spec = ExtractionSpec::new().at("result").at("uuid");
        let err = spec.validate(json!({"result": {}})).unwrap_err();
        assert!(matches!(err, RestError::ExtractionFailed(p) if p == "result.uuid"));
    }

    #[test]
    fn test_index_segment_descends_arrays() {
        let spec = ExtractionSpec::new().at("result").at(0usize);
        let payload = spec.validate(json!({"result": [{"High": 2}]})).unwrap();
        assert_eq!(payload, json!({"High": 2}));
    }

    #[test]
    fn test_index_out_of_bounds_fails() {
        let spec = ExtractionSpec::new().at("result").at(0usize);
        assert!(spec.validate(json!({"result": []})).is_err());
    }

    #[test]
    fn test_legacy_sentinel_on_missing_result() {
        let spec = ExtractionSpec::legacy();
        assert_eq!(spec.validate(json!({"success": true})).unwrap(), json!(true));
    }

    #[test]
    fn test_legacy_sentinel_on_null_result() {
        let spec = ExtractionSpec::legacy();
        assert_eq!(
            spec.validate(json!({"success": true, "result": null})).unwrap(),
            json!(true)
        );
    }

    #[test]
    fn test_legacy_extracts_result_when_present() {
        let spec = ExtractionSpec::legacy();
        assert_eq!(
            spec.validate(json!({"success": true, "result": [1, 2]})).unwrap(),
            json!([1, 2])
        );
    }

    #[test]
    fn test_legacy_rejects_failure_despite_result() {
        let spec = ExtractionSpec::legacy();
        assert!(spec
            .validate(json!({"success": false, "result": [1]}))
            .is_err());
    }
}
