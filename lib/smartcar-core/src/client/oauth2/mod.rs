//! OAuth2 authorization code flow.
//!
//! The flow has two steps:
//!
//! 1. send the user to [`AuthClient::auth_url`]; after approval Smartcar
//!    redirects to the configured redirect URI with a `code`
//! 2. exchange it with [`AuthClient::exchange_code`] for a [`TokenRecord`]
//!
//! Access tokens are short-lived: check [`TokenRecord::is_expired`] and call
//! [`AuthClient::exchange_refresh_token`] to get a new record. Token storage
//! is left to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use smartcar_core::{AuthClient, AuthClientConfig, AuthUrlOptions};
//!
//! let config = AuthClientConfig::builder("client-id", "client-secret", "https://example.com/callback")
//!     .add_scopes(["read_vehicle_info", "read_odometer"])
//!     .build()?;
//! let client = AuthClient::new(config)?;
//!
//! let url = client.auth_url(&AuthUrlOptions::new().with_force(true))?;
//! // ... redirect the user, receive `code` ...
//! let mut tokens = client.exchange_code(&code).await?;
//!
//! if tokens.is_expired() {
//!     let refresh_token = tokens.refresh_token().unwrap_or_default().to_owned();
//!     tokens = client.exchange_refresh_token(&refresh_token).await?;
//! }
//! ```

mod config;
mod provider;
mod token;

pub use self::config::{AuthClientConfig, AuthClientConfigBuilder};
pub use self::provider::{AuthClient, AuthUrlOptions};
pub use self::token::{DEFAULT_REFRESH_EXPIRES_IN, TokenRecord, is_expired, is_expired_at};
