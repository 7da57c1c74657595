//! Per-version API endpoint implementations

pub mod v1;
pub mod v2;
pub mod v3;

pub use v1::V1Client;
pub use v2::V2Client;
pub use v3::{NewCancelOrder, NewConditionalOrder, NewOrder, PageQuery, V3Client};

use crate::error::{RestError, RestResult};
use serde_json::Value;

/// Interpret an extracted payload as a string (order/withdrawal uuids)
pub(crate) fn string_payload(payload: Value) -> RestResult<String> {
    match payload {
        Value::String(s) => Ok(s),
        other => Err(RestError::EnvelopeRejected(format!(
            "expected string payload, got {}",
            other
        ))),
    }
}
