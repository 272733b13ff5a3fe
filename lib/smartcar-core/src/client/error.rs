use std::fmt::Debug;

/// Maximum length of a response body kept inside an error.
pub(crate) const BODY_MAX_LENGTH: usize = 1024;

/// Errors that can occur when talking to the Smartcar API.
///
/// The variants follow where the failure was detected: before any request
/// ([`Configuration`](Self::Configuration)), at the token endpoint
/// ([`Authentication`](Self::Authentication)), at a resource endpoint
/// ([`Api`](Self::Api)) or in the transport ([`Network`](Self::Network)).
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum SmartcarError {
    /// Invalid or missing client configuration.
    ///
    /// Detected before any network call.
    #[display("Configuration error: {reason}")]
    #[from(skip)]
    Configuration {
        /// Description of the configuration issue.
        reason: String,
    },

    /// The token endpoint answered with a non-2xx status.
    ///
    /// A `401` usually means the client credentials are wrong, a `400` that the
    /// code or refresh token is no longer valid and the user must re-authorize.
    #[display("Authentication failed with status {status_code}: {body}")]
    #[from(skip)]
    Authentication {
        /// The HTTP status code received.
        status_code: u16,
        /// The response body, possibly truncated.
        body: String,
    },

    /// A resource endpoint answered with a non-2xx status.
    #[display("API request failed with status {status_code}: {body}")]
    #[from(skip)]
    Api {
        /// The HTTP status code received.
        status_code: u16,
        /// The response body, possibly truncated.
        body: String,
    },

    /// Transport-level failure: DNS, connection refused, timeout.
    #[display("Network error: {_0}")]
    Network(reqwest::Error),

    /// A successful response whose body is not the expected JSON.
    #[display("Failed to deserialize JSON at '{path}': {error}\n{body}")]
    #[from(skip)]
    InvalidResponse {
        /// The JSON path where decoding failed.
        path: String,
        /// The underlying JSON parsing error.
        error: serde_json::Error,
        /// The response body that failed to parse.
        body: String,
    },

    /// A credential or token cannot be sent as an HTTP header value.
    #[display("Invalid header value: {reason}")]
    #[from(skip)]
    InvalidHeader {
        /// Description of the invalid characters or format issue.
        reason: String,
    },
}

impl SmartcarError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Returns the HTTP status code for errors produced by a server answer.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { status_code, .. } | Self::Api { status_code, .. } => {
                Some(*status_code)
            }
            Self::Network(error) => error.status().map(|status| status.as_u16()),
            Self::Configuration { .. } | Self::InvalidResponse { .. } | Self::InvalidHeader { .. } => {
                None
            }
        }
    }

    /// Returns `true` when the server rejected the credentials (HTTP 401).
    ///
    /// On a resource endpoint this means the access token should be refreshed.
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }
}

/// Truncates a response body so errors stay readable.
pub(crate) fn truncate_body(mut text: String) -> String {
    if text.len() > BODY_MAX_LENGTH {
        let mut end = BODY_MAX_LENGTH;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
        text.push_str("... (truncated)");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_be_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<SmartcarError>();
        assert_sync::<SmartcarError>();
    }

    #[test]
    fn should_display_authentication_error() {
        let error = SmartcarError::Authentication {
            status_code: 401,
            body: r#"{"error":"invalid_client"}"#.to_string(),
        };
        assert_eq!(
            error.to_string(),
            r#"Authentication failed with status 401: {"error":"invalid_client"}"#
        );
        assert_eq!(error.status_code(), Some(401));
        assert!(error.is_unauthorized());
    }

    #[test]
    fn should_display_configuration_error() {
        let error = SmartcarError::configuration("client_id is required");
        assert_eq!(
            error.to_string(),
            "Configuration error: client_id is required"
        );
        assert_eq!(error.status_code(), None);
        assert!(!error.is_unauthorized());
    }

    #[test]
    fn should_not_flag_server_errors_as_unauthorized() {
        let error = SmartcarError::Api {
            status_code: 500,
            body: String::new(),
        };
        assert_eq!(error.status_code(), Some(500));
        assert!(!error.is_unauthorized());
    }

    #[test]
    fn should_truncate_long_body() {
        let body = "x".repeat(BODY_MAX_LENGTH + 10);
        let truncated = truncate_body(body);
        assert_eq!(truncated.len(), BODY_MAX_LENGTH + "... (truncated)".len());
        assert!(truncated.ends_with("... (truncated)"));

        let short = truncate_body("short".to_string());
        assert_eq!(short, "short");
    }

    #[test]
    fn should_truncate_on_char_boundary() {
        // 'é' is two bytes, so byte 1024 falls inside a char
        let body = format!("a{}", "é".repeat(BODY_MAX_LENGTH));
        let truncated = truncate_body(body);
        assert!(truncated.ends_with("... (truncated)"));
    }
}
