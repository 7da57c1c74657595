//! Error types for REST API operations
//!
//! Every per-attempt failure mode has its own variant so tests and logs can
//! tell a dead network from a vendor rejection. After the retry budget is
//! spent the engine folds the last cause into [`RestError::NoResultAfterRetries`];
//! callers that only care about presence can treat any `Err` as "no result".

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Network-level failure (DNS, connect, timeout)
    #[error("transport error: {0}")]
    Transport(String),

    /// HTTP status outside the accepted {200, 201} set
    #[error("unexpected HTTP status {0}")]
    Protocol(u16),

    /// The vendor envelope failed validation (success flag, error-code
    /// field, missing required field, or an unparseable body)
    #[error("envelope rejected: {0}")]
    EnvelopeRejected(String),

    /// The requested path does not exist in an otherwise valid envelope
    #[error("no value at response path `{0}`")]
    ExtractionFailed(String),

    /// Missing API credentials for a private endpoint
    #[error("authentication required for this endpoint")]
    AuthRequired,

    /// All attempts exhausted; wraps the failure of the final attempt
    #[error("no result after {attempts} attempts, last error: {last}")]
    NoResultAfterRetries {
        /// Number of attempts performed
        attempts: u32,
        /// The failure of the final attempt
        last: Box<RestError>,
    },
}

impl RestError {
    /// The innermost cause, unwrapping the terminal retry wrapper
    pub fn last_cause(&self) -> &RestError {
        match self {
            Self::NoResultAfterRetries { last, .. } => last.last_cause(),
            other => other,
        }
    }

    /// True for per-attempt failures the engine retries
    pub fn is_soft(&self) -> bool {
        !matches!(self, Self::AuthRequired | Self::NoResultAfterRetries { .. })
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_error_reports_last_cause() {
        let err = RestError::NoResultAfterRetries {
            attempts: 3,
            last: Box::new(RestError::Protocol(503)),
        };
        assert!(matches!(err.last_cause(), RestError::Protocol(503)));
        assert!(err.to_string().contains("3 attempts"));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_soft_failure_classification() {
        assert!(RestError::Transport("connection refused".into()).is_soft());
        assert!(RestError::Protocol(429).is_soft());
        assert!(RestError::EnvelopeRejected("success is false".into()).is_soft());
        assert!(!RestError::AuthRequired.is_soft());
    }
}
