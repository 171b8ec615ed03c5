//! Error taxonomy for translation and forwarding.

use std::error::Error as StdError;
use std::fmt::Write as _;

use reqwest::StatusCode;
use thiserror::Error;

/// Boxed underlying cause kept as the error source.
pub type Cause = Box<dyn StdError + Send + Sync + 'static>;

/// Errors raised while turning an invocation into an origin exchange.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Envelope text is not JSON, not an object, or a field has the wrong shape.
    #[error("malformed input: {reason}")]
    MalformedInput {
        reason: String,
        #[source]
        source: Option<Cause>,
    },

    /// Origin did not answer within the timeout budget.
    #[error("upstream timed out after {0} ms")]
    UpstreamTimeout(u64),

    /// Any other transport failure reaching the origin.
    #[error("upstream unreachable: {reason}")]
    UpstreamUnreachable {
        reason: String,
        #[source]
        source: Option<Cause>,
    },

    /// Invocation protocol violation. Never converted into an envelope.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Result type for proxy operations.
pub type ProxyResult<T> = Result<T, ProxyError>;

impl ProxyError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
            source: None,
        }
    }

    pub fn malformed_from<E>(reason: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::MalformedInput {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self::UpstreamUnreachable {
            reason: reason.into(),
            source: None,
        }
    }

    pub fn unreachable_from<E>(reason: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::UpstreamUnreachable {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Status code of the error envelope this error is surfaced as.
    ///
    /// `None` for `InvalidArgument`, which propagates to the host instead.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::MalformedInput { .. } => Some(StatusCode::BAD_REQUEST),
            Self::UpstreamTimeout(_) | Self::UpstreamUnreachable { .. } => {
                Some(StatusCode::BAD_GATEWAY)
            }
            Self::InvalidArgument(_) => None,
        }
    }

    /// Short stable name, used as a log field and by the host.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedInput { .. } => "MalformedInput",
            Self::UpstreamTimeout(_) => "UpstreamTimeout",
            Self::UpstreamUnreachable { .. } => "UpstreamUnreachable",
            Self::InvalidArgument(_) => "InvalidArgument",
        }
    }

    /// Full diagnostic text: the error itself followed by its source chain.
    pub fn detail(&self) -> String {
        let mut out = format!("{}: {}", self.kind(), self);
        let mut cause = self.source();
        while let Some(err) = cause {
            let _ = write!(out, "\n  caused by: {}", err);
            cause = err.source();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ProxyError::malformed("x").status(),
            Some(StatusCode::BAD_REQUEST)
        );
        assert_eq!(
            ProxyError::UpstreamTimeout(10_000).status(),
            Some(StatusCode::BAD_GATEWAY)
        );
        assert_eq!(
            ProxyError::unreachable("refused").status(),
            Some(StatusCode::BAD_GATEWAY)
        );
        assert_eq!(ProxyError::InvalidArgument("request").status(), None);
    }

    #[test]
    fn test_detail_includes_source_chain() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = ProxyError::malformed_from("envelope is not valid JSON", parse_err);

        let detail = err.detail();
        assert!(detail.starts_with("MalformedInput: malformed input: envelope is not valid JSON"));
        assert!(detail.contains("caused by: key must be a string"));
    }

    #[test]
    fn test_error_display() {
        let err = ProxyError::UpstreamTimeout(10_000);
        assert_eq!(err.to_string(), "upstream timed out after 10000 ms");
    }
}
