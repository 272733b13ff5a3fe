use std::fmt;

use base64::Engine;
use http::HeaderValue;
use http::header::{AUTHORIZATION, HeaderName};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::SmartcarError;

/// Secure wrapper for sensitive string data that automatically zeroes memory on drop.
///
/// Used for the client secret and for access/refresh tokens. The value is
/// redacted in `Debug` and masked in `Display`, so it is safe to log.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Creates a new secure string from the provided value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner string value.
    ///
    /// # Security Note
    /// The returned reference should not be stored for extended periods
    /// to minimize exposure time of sensitive data.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the wrapped value is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the `SecureString` and returns the inner `String`.
    pub fn into_string(mut self) -> String {
        std::mem::take(&mut self.0)
    }

    fn mask_sensitive(value: &str) -> String {
        let len = value.len();
        match (value.get(..4), value.get(len.saturating_sub(4)..)) {
            (Some(head), Some(tail)) if len > 8 => format!("{head}...{tail}"),
            _ => "***".to_string(),
        }
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::mask_sensitive(&self.0))
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl Serialize for SecureString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Credentials attached to an outgoing request.
///
/// The token endpoint takes [`Basic`](Self::Basic) with the application
/// credentials; resource endpoints take [`Bearer`](Self::Bearer) with an
/// access token.
#[derive(Clone)]
pub enum Authentication {
    /// Adds `Authorization: Bearer <token>` header.
    Bearer(SecureString),

    /// Adds `Authorization: Basic <base64(username:password)>` header.
    Basic {
        /// The username, i.e. the client id.
        username: String,
        /// The password, i.e. the client secret.
        password: SecureString,
    },
}

impl Authentication {
    /// Converts the authentication into an HTTP header.
    ///
    /// # Errors
    ///
    /// Returns [`SmartcarError::Configuration`] if a Basic username contains a
    /// colon, and [`SmartcarError::InvalidHeader`] if the value contains
    /// characters not allowed in an HTTP header.
    pub fn to_header(&self) -> Result<(HeaderName, HeaderValue), SmartcarError> {
        let header_value = match self {
            Self::Bearer(token) => format!("Bearer {}", token.as_str()),
            Self::Basic { username, password } => {
                if username.contains(':') {
                    return Err(SmartcarError::configuration(
                        "client_id cannot contain colon (:) character",
                    ));
                }
                let credentials = format!("{username}:{}", password.as_str());
                let credentials = base64::engine::general_purpose::STANDARD.encode(credentials);
                format!("Basic {credentials}")
            }
        };

        let mut value =
            HeaderValue::from_str(&header_value).map_err(|err| SmartcarError::InvalidHeader {
                reason: format!("{}: {err}", self.kind()),
            })?;
        value.set_sensitive(true);
        Ok((AUTHORIZATION, value))
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Bearer(_) => "bearer token",
            Self::Basic { .. } => "basic credentials",
        }
    }
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"[REDACTED]").finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

impl fmt::Display for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(token) => write!(f, "Bearer {token}"),
            Self::Basic { username, .. } => write!(f, "Basic (username: {username})"),
        }
    }
}
