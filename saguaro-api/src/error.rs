use thiserror::Error;

/// Failure modes of one upstream API call. Every variant is recoverable and
/// maps to a chat-facing message via [`ApiError::user_message`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API key is not configured")]
    NotConfigured,

    #[error("upstream API rejected the API key")]
    Unauthorized,

    #[error("upstream API rate limit exceeded")]
    RateLimited,

    #[error("timed out waiting for the upstream API")]
    Timeout,

    #[error("network error talking to the upstream API: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("upstream API returned HTTP {0}")]
    Status(u16),

    #[error("upstream API error: {message}")]
    Upstream {
        code: Option<String>,
        message: String,
    },

    #[error("upstream API response has an unexpected shape")]
    MalformedResponse,
}

impl ApiError {
    /// Classify a transport-level reqwest failure. Timeouts are reported
    /// separately from connection errors.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(err)
        }
    }

    /// The message shown to the chat user. Always a complete sentence, no
    /// internals leaked.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotConfigured => {
                "❌ API key is not configured. Contact the administrator.".to_string()
            }
            ApiError::Unauthorized => "❌ API authorization error. Check the API key.".to_string(),
            ApiError::RateLimited => "⏳ Too many requests. Try again later.".to_string(),
            ApiError::Timeout => "⏰ Timed out waiting for the API. Try again later.".to_string(),
            ApiError::Transport(_) => "🌐 Network connection error.".to_string(),
            ApiError::Status(status) => format!("❌ API server error: {status}"),
            ApiError::Upstream { code, message } => match code.as_deref() {
                Some("FORBIDDEN") => format!("🔒 IP address confirmation required: {message}"),
                Some(code) => format!("❌ API error ({code}): {message}"),
                None => format!("❌ API error: {message}"),
            },
            ApiError::MalformedResponse => "❌ Unexpected response format from the API.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_self_contained() {
        assert!(
            ApiError::NotConfigured
                .user_message()
                .contains("not configured")
        );
        assert!(ApiError::Status(502).user_message().contains("502"));
    }

    #[test]
    fn test_forbidden_code_gets_ip_notice() {
        let err = ApiError::Upstream {
            code: Some("FORBIDDEN".to_string()),
            message: "confirm your IP".to_string(),
        };
        assert!(err.user_message().starts_with("🔒"));
        assert!(err.user_message().contains("confirm your IP"));
    }

    #[test]
    fn test_plain_upstream_error_message() {
        let err = ApiError::Upstream {
            code: None,
            message: "player data unavailable".to_string(),
        };
        assert_eq!(err.user_message(), "❌ API error: player data unavailable");
    }
}
