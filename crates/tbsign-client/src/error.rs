use thiserror::Error;

/// Errors raised while talking to the forum site.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A page or response body did not match the expected shape.
    #[error("parse error in {context}: {reason}")]
    Parse { context: String, reason: String },

    /// The sign endpoint returned a non-zero `error_code`.
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    /// Listing pagination never terminated.
    #[error("pagination limit reached: exceeded {max_pages} listing pages")]
    PaginationLimit { max_pages: usize },

    /// A configured base URL could not be parsed.
    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ClientError {
    /// Whether a manual re-attempt is worth surfacing for this error.
    ///
    /// Transport failures and API-level rejections are transient; a parse
    /// failure means the markup contract broke, and retrying returns the
    /// same bytes.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Http(_) | ClientError::Api { .. })
    }

    pub(crate) fn parse(context: &str, reason: impl Into<String>) -> Self {
        ClientError::Parse {
            context: context.to_owned(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_is_retryable() {
        let err = ClientError::Api {
            code: 2_280_006,
            message: "too fast".to_owned(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn parse_error_is_not_retryable() {
        assert!(!ClientError::parse("forum page", "missing block").is_retryable());
    }

    #[test]
    fn pagination_limit_is_not_retryable() {
        assert!(!ClientError::PaginationLimit { max_pages: 100 }.is_retryable());
    }
}
