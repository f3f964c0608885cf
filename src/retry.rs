//! Error classification and the single automatic retry
//!
//! Client errors are sorted into categories that decide whether a failed
//! call is worth repeating and how long to wait first.

use std::future::Future;
use std::time::Duration;

use crate::error::{ApiError, Error, Result};

/// Upper bound for any computed retry delay
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Cause-based error category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Timeout,
    RateLimit,
    Server,
    Authentication,
    Permission,
    NotFound,
    Validation,
    Unknown,
}

impl ErrorCategory {
    /// Whether a failure in this category may succeed when repeated
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::RateLimit
                | ErrorCategory::Server
                | ErrorCategory::Unknown
        )
    }

    fn base_delay(&self) -> Duration {
        match self {
            ErrorCategory::Network => Duration::from_secs(2),
            ErrorCategory::Timeout => Duration::from_secs(3),
            ErrorCategory::RateLimit => Duration::from_secs(10),
            ErrorCategory::Server => Duration::from_secs(5),
            _ => Duration::from_secs(1),
        }
    }

    /// Short user-facing hint for the category
    pub fn hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your network connection and try again.",
            ErrorCategory::Timeout => "The server took too long to respond. Try again shortly.",
            ErrorCategory::RateLimit => "Too many requests. Wait a moment before retrying.",
            ErrorCategory::Server => "The server hit an error. Try again in a few seconds.",
            ErrorCategory::Authentication => "Run `forgeml init` to configure a valid API token.",
            ErrorCategory::Permission => "Your token does not have access to this resource.",
            ErrorCategory::NotFound => "Check the ID and try again.",
            ErrorCategory::Validation => "Fix the request and try again.",
            ErrorCategory::Unknown => "Try again; if it keeps failing, run with --debug.",
        }
    }
}

/// Sort an API error into a category.
///
/// Typed variants map directly. Free-form messages from `Remote` and
/// `Network` errors fall back to keyword matching.
pub fn classify(error: &ApiError) -> ErrorCategory {
    match error {
        ApiError::Unauthorized => ErrorCategory::Authentication,
        ApiError::Forbidden => ErrorCategory::Permission,
        ApiError::NotFound(_) => ErrorCategory::NotFound,
        ApiError::RateLimit(_) => ErrorCategory::RateLimit,
        ApiError::ServerError(_) => ErrorCategory::Server,
        ApiError::Validation(_) => ErrorCategory::Validation,
        ApiError::InvalidResponse(_) => ErrorCategory::Unknown,
        ApiError::Network(message) => {
            classify_message(message).unwrap_or(ErrorCategory::Network)
        }
        ApiError::Remote { status, message } => match status {
            408 => ErrorCategory::Timeout,
            400 | 422 => ErrorCategory::Validation,
            _ => classify_message(message).unwrap_or(ErrorCategory::Unknown),
        },
    }
}

fn classify_message(message: &str) -> Option<ErrorCategory> {
    let message = message.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| message.contains(n));

    if has(&["timed out", "timeout"]) {
        Some(ErrorCategory::Timeout)
    } else if has(&["rate limit", "too many requests"]) {
        Some(ErrorCategory::RateLimit)
    } else if has(&["unauthorized", "unauthenticated", "invalid token"]) {
        Some(ErrorCategory::Authentication)
    } else if has(&["permission", "forbidden", "access denied"]) {
        Some(ErrorCategory::Permission)
    } else if has(&["not found"]) {
        Some(ErrorCategory::NotFound)
    } else if has(&["invalid", "validation", "required"]) {
        Some(ErrorCategory::Validation)
    } else if has(&["connect", "connection", "network", "dns"]) {
        Some(ErrorCategory::Network)
    } else {
        None
    }
}

/// Category of a top-level error; non-API errors are `Unknown`
pub fn classify_error(error: &Error) -> ErrorCategory {
    match error {
        Error::Api(api) => classify(api),
        _ => ErrorCategory::Unknown,
    }
}

/// Delay before retry number `attempt` (starting at 0).
///
/// The category's base delay doubles per attempt and never exceeds
/// [`MAX_RETRY_DELAY`]. Rate limits honor the server's retry-after.
pub fn retry_delay(error: &ApiError, attempt: u32) -> Duration {
    if let ApiError::RateLimit(retry_after) = error
        && !retry_after.is_zero()
    {
        return (*retry_after).min(MAX_RETRY_DELAY);
    }

    let base = classify(error).base_delay();
    let factor = 2u32.saturating_pow(attempt.min(16));
    base.saturating_mul(factor).min(MAX_RETRY_DELAY)
}

/// Run `op`; on a retryable failure wait the computed delay and run it once more.
pub async fn retry_once<T, F, Fut>(operation: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match op().await {
        Ok(value) => Ok(value),
        Err(Error::Api(err)) if classify(&err).is_retryable() => {
            let delay = retry_delay(&err, 0);
            log::warn!(
                "{} failed ({}), retrying in {:.1}s",
                operation,
                err,
                delay.as_secs_f64()
            );
            tokio::time::sleep(delay).await;
            op().await
        }
        Err(err) => {
            log::debug!("{} failed with non-retryable error: {}", operation, err);
            Err(err)
        }
    }
}
