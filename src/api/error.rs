//! API error types for the Qase client

use std::fmt;

/// Errors that can occur when talking to the Qase API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 401 Unauthorized - token invalid or expired
    Unauthorized,
    /// 403 Forbidden - token lacks access to the project
    Forbidden,
    /// 429 Rate Limited
    RateLimited { retry_after_secs: Option<u64> },
    /// Network or timeout error
    NetworkError { message: String },
    /// Other HTTP errors, or a response with `status: false`
    HttpError { status: u16, message: String },
    /// Response body did not have the expected shape
    ParseError { message: String },
    /// Required setting missing (token or project code)
    NotConfigured { missing: &'static str },
}

impl ApiError {
    /// Check if this is an authentication error (401 or 403)
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::Forbidden)
    }

    /// Check if this is a rate limiting error
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }

    /// Transient failures worth retrying: network, rate limit and 5xx
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::NetworkError { .. } | ApiError::RateLimited { .. } => true,
            ApiError::HttpError { status, .. } => (500..600).contains(status),
            _ => false,
        }
    }

    /// Get retry-after seconds if rate limited
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            ApiError::RateLimited { retry_after_secs } => *retry_after_secs,
            _ => None,
        }
    }

    /// Create a rate limited error
    pub fn rate_limited(retry_after: Option<u64>) -> Self {
        ApiError::RateLimited {
            retry_after_secs: retry_after,
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::NetworkError {
            message: message.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        ApiError::HttpError {
            status,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        ApiError::ParseError {
            message: message.into(),
        }
    }

    /// Create a not configured error naming the missing setting
    pub fn not_configured(missing: &'static str) -> Self {
        ApiError::NotConfigured { missing }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => {
                write!(f, "qase: Unauthorized (401) - check QASE_API_TOKEN")
            }
            ApiError::Forbidden => {
                write!(f, "qase: Forbidden (403) - insufficient permissions")
            }
            ApiError::RateLimited { retry_after_secs } => {
                if let Some(secs) = retry_after_secs {
                    write!(f, "qase: Rate limited - retry after {}s", secs)
                } else {
                    write!(f, "qase: Rate limited")
                }
            }
            ApiError::NetworkError { message } => {
                write!(f, "qase: Network error - {}", message)
            }
            ApiError::HttpError { status, message } => {
                write!(f, "qase: HTTP {} - {}", status, message)
            }
            ApiError::ParseError { message } => {
                write!(f, "qase: Parse error - {}", message)
            }
            ApiError::NotConfigured { missing } => {
                write!(f, "qase: Not configured (missing {})", missing)
            }
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_auth_error() {
        assert!(ApiError::Unauthorized.is_auth_error());
        assert!(ApiError::Forbidden.is_auth_error());
        assert!(!ApiError::rate_limited(None).is_auth_error());
        assert!(!ApiError::network("timeout").is_auth_error());
    }

    #[test]
    fn test_is_retryable() {
        assert!(ApiError::network("connection reset").is_retryable());
        assert!(ApiError::rate_limited(Some(2)).is_retryable());
        assert!(ApiError::http(503, "unavailable").is_retryable());
        assert!(!ApiError::http(422, "title is required").is_retryable());
        assert!(!ApiError::Unauthorized.is_retryable());
        assert!(!ApiError::parse("bad json").is_retryable());
    }

    #[test]
    fn test_retry_after() {
        assert_eq!(ApiError::rate_limited(Some(30)).retry_after(), Some(30));
        assert_eq!(ApiError::Forbidden.retry_after(), None);
    }

    #[test]
    fn test_display() {
        let err = ApiError::rate_limited(Some(30));
        assert_eq!(err.to_string(), "qase: Rate limited - retry after 30s");

        let err = ApiError::not_configured("QASE_API_TOKEN");
        assert_eq!(err.to_string(), "qase: Not configured (missing QASE_API_TOKEN)");

        let err = ApiError::http(404, "Project not found");
        assert_eq!(err.to_string(), "qase: HTTP 404 - Project not found");
    }
}
