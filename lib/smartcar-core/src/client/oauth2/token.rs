//! Token records returned by the token endpoint.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::error::truncate_body;
use crate::client::{Authentication, SecureString, SmartcarError};

/// Refresh token lifetime used when the server does not send `refresh_expires_in`.
pub const DEFAULT_REFRESH_EXPIRES_IN: u64 = 60 * 24 * 60 * 60;

/// Returns `true` if `expiration` is now or in the past.
pub fn is_expired(expiration: Timestamp) -> bool {
    is_expired_at(expiration, Timestamp::now())
}

/// Returns `true` if `expiration` is at or before `now`.
pub fn is_expired_at(expiration: Timestamp, now: Timestamp) -> bool {
    expiration <= now
}

/// Raw body of a successful token endpoint response.
///
/// Only `expires_in` is needed to compute the record; every other field is
/// taken as sent.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    access_token: Option<SecureString>,
    #[serde(default)]
    token_type: Option<String>,
    expires_in: u64,
    #[serde(default)]
    refresh_token: Option<SecureString>,
    #[serde(default)]
    refresh_expires_in: Option<u64>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Access and refresh tokens obtained from an exchange, with computed expirations.
///
/// `expiration` and `refresh_expiration` are relative to the moment the
/// response was received. The record never changes after creation: call
/// [`AuthClient::exchange_refresh_token`](super::AuthClient::exchange_refresh_token)
/// to get a new one.
///
/// Fields the server sends besides the standard ones are kept in
/// [`extra`](Self::extra) and serialized back unchanged, so the record can be
/// persisted as JSON.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<SecureString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<SecureString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_type: Option<String>,
    expires_in: u64,
    expiration: Timestamp,
    refresh_expires_in: u64,
    refresh_expiration: Timestamp,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TokenRecord {
    pub(crate) fn from_response(
        response: TokenResponse,
        received_at: Timestamp,
        raw_body: &str,
    ) -> Result<Self, SmartcarError> {
        let TokenResponse {
            access_token,
            token_type,
            expires_in,
            refresh_token,
            refresh_expires_in,
            mut extra,
        } = response;

        let refresh_expires_in = refresh_expires_in.unwrap_or(DEFAULT_REFRESH_EXPIRES_IN);
        let expiration = expires_at(received_at, "expires_in", expires_in, raw_body)?;
        let refresh_expiration =
            expires_at(received_at, "refresh_expires_in", refresh_expires_in, raw_body)?;

        // computed fields would be emitted twice
        extra.remove("expiration");
        extra.remove("refresh_expiration");

        Ok(Self {
            access_token,
            refresh_token,
            token_type,
            expires_in,
            expiration,
            refresh_expires_in,
            refresh_expiration,
            extra,
        })
    }

    /// Returns the access token if the server sent one.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_ref().map(SecureString::as_str)
    }

    /// Returns the refresh token if the server sent one.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_ref().map(SecureString::as_str)
    }

    /// Returns the token type, usually `Bearer`.
    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref()
    }

    /// Access token lifetime in seconds, as sent by the server.
    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }

    /// When the access token expires.
    pub fn expiration(&self) -> Timestamp {
        self.expiration
    }

    /// Refresh token lifetime in seconds.
    pub fn refresh_expires_in(&self) -> u64 {
        self.refresh_expires_in
    }

    /// When the refresh token expires.
    pub fn refresh_expiration(&self) -> Timestamp {
        self.refresh_expiration
    }

    /// Other fields returned by the server.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Returns a field returned by the server besides the standard ones.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Checks if the access token is expired.
    pub fn is_expired(&self) -> bool {
        is_expired(self.expiration)
    }

    /// Checks if the refresh token is expired.
    ///
    /// Once it is, the user has to go through the authorization flow again.
    pub fn is_refresh_expired(&self) -> bool {
        is_expired(self.refresh_expiration)
    }

    /// The access token as bearer credentials for resource calls.
    pub fn bearer(&self) -> Option<Authentication> {
        self.access_token.clone().map(Authentication::Bearer)
    }
}

impl fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRecord")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("expiration", &self.expiration)
            .field("refresh_expires_in", &self.refresh_expires_in)
            .field("refresh_expiration", &self.refresh_expiration)
            .field("extra", &self.extra)
            .finish()
    }
}

fn expires_at(
    received_at: Timestamp,
    field: &str,
    seconds: u64,
    raw_body: &str,
) -> Result<Timestamp, SmartcarError> {
    i64::try_from(seconds)
        .ok()
        .and_then(|seconds| received_at.checked_add(SignedDuration::from_secs(seconds)).ok())
        .ok_or_else(|| SmartcarError::InvalidResponse {
            path: field.to_string(),
            error: serde::de::Error::custom(format!("{seconds} seconds is out of range")),
            body: truncate_body(raw_body.to_string()),
        })
}
