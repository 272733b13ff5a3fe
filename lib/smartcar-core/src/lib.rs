//! # Smartcar Core
//!
//! Client for the Smartcar vehicle API.
//!
//! It covers the OAuth2 authorization code flow and the account-level endpoints:
//! - **[`AuthClient`]** - builds the authorization URL and exchanges codes and
//!   refresh tokens for a [`TokenRecord`]
//! - **[`ApiClient`]** - lists the user's vehicle ids and returns the user id,
//!   authenticated with an access token
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smartcar_core::{ApiClient, AuthClient, AuthClientConfig, AuthUrlOptions, VehicleIdsQuery};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuthClientConfig::builder("client-id", "client-secret", "https://example.com/callback")
//!     .add_scopes(["read_vehicle_info", "read_odometer"])
//!     .with_test_mode(true)
//!     .build()?;
//! let auth = AuthClient::new(config)?;
//!
//! // 1. Send the user to the authorization page
//! let url = auth.auth_url(&AuthUrlOptions::new().with_force(true).with_state("csrf"))?;
//! println!("open {url}");
//!
//! // 2. Exchange the code received on the redirect URI
//! # let code = "code";
//! let tokens = auth.exchange_code(code).await?;
//!
//! // 3. Call the API
//! let access_token = tokens.access_token().ok_or("no access token")?;
//! let api = ApiClient::builder().build()?;
//! let vehicles = api.get_vehicle_ids(access_token, VehicleIdsQuery::new(10, 0)).await?;
//! let user_id = api.get_user_id(access_token).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Test mode
//!
//! Test mode sends users to simulated vehicles: the authorization URL gets a
//! `mode=test` parameter, and requests go to the sandbox [`Environment`] when
//! one is configured. See [`AuthClientConfigBuilder`] for how
//! `with_test_mode` and `with_development` combine.
//!
//! ## Errors
//!
//! Every fallible operation returns [`SmartcarError`]. Errors carrying a
//! server answer expose the status code, so a caller can tell a token to
//! refresh ([`SmartcarError::is_unauthorized`] on an API call) from a user
//! to re-authorize (an [`SmartcarError::Authentication`] on refresh).
//!
//! ## Logging
//!
//! Requests are traced with [`tracing`] at `debug` level, rejections at
//! `warn`. Credentials are never logged.

mod client;

pub use self::client::{
    ApiClient, ApiClientBuilder, AuthClient, AuthClientConfig, AuthClientConfigBuilder,
    AuthUrlOptions, Authentication, Environment, SecureString, SmartcarError, TokenRecord,
    VehicleIdsQuery, get_user_id, get_vehicle_ids, is_expired, is_expired_at, oauth2,
};
