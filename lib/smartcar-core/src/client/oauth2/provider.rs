//! OAuth2 authorization code flow: authorization URL and token exchanges.

use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method};
use tracing::debug;
use url::Url;

use super::config::AuthClientConfig;
use super::token::{TokenRecord, TokenResponse};
use crate::client::transport::{EndpointKind, build_http_client, send};
use crate::client::{Authentication, SmartcarError};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Options for [`AuthClient::auth_url`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthUrlOptions {
    /// Always show the approval dialog, even if the user already granted access.
    pub force: bool,
    /// Opaque value returned to the redirect URI, e.g. for CSRF protection.
    pub state: Option<String>,
}

impl AuthUrlOptions {
    /// Creates default options: `approval_prompt=auto`, no state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `approval_prompt=force`.
    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Sets the `state` parameter.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }
}

/// Client for the Smartcar authorization flow.
///
/// Holds only the immutable [`AuthClientConfig`] and an HTTP client, so it
/// can be shared between tasks freely.
///
/// ```rust,no_run
/// use smartcar_core::{AuthClient, AuthClientConfig, AuthUrlOptions};
///
/// # async fn example() -> Result<(), smartcar_core::SmartcarError> {
/// let config = AuthClientConfig::builder("client-id", "client-secret", "https://redirect.uri")
///     .add_scopes(["read_vehicle_info"])
///     .build()?;
/// let client = AuthClient::new(config)?;
///
/// // Send the user to this URL, then receive the code on the redirect URI
/// let url = client.auth_url(&AuthUrlOptions::new().with_state("csrf-token"))?;
/// # let code = "code";
///
/// let tokens = client.exchange_code(code).await?;
/// if let Some(access_token) = tokens.access_token() {
///     let vehicles = smartcar_core::get_vehicle_ids(access_token, None, None).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AuthClient {
    config: AuthClientConfig,
    http: reqwest::Client,
}

impl AuthClient {
    /// Creates a client, applying the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SmartcarError::Network`] if the HTTP client cannot be initialized.
    pub fn new(config: AuthClientConfig) -> Result<Self, SmartcarError> {
        let http = build_http_client(config.timeout)?;
        Ok(Self { config, http })
    }

    /// Creates a client that reuses an existing HTTP client.
    ///
    /// The configured timeout is not applied: it belongs to `http`.
    pub fn with_http_client(config: AuthClientConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// The client configuration.
    pub fn config(&self) -> &AuthClientConfig {
        &self.config
    }

    /// Builds the URL the user is sent to in order to grant access.
    ///
    /// Parameters appear in this order: `response_type`, `client_id`,
    /// `redirect_uri`, `approval_prompt`, `mode` (test mode only), `scope`,
    /// `state` (when set).
    ///
    /// # Errors
    ///
    /// Returns [`SmartcarError::Configuration`] if the connect URL cannot be a
    /// base. Empty client ids and redirect URIs are already rejected by
    /// [`AuthClientConfigBuilder::build`](super::AuthClientConfigBuilder::build).
    pub fn auth_url(&self, options: &AuthUrlOptions) -> Result<Url, SmartcarError> {
        let config = &self.config;
        let mut url = config.active_environment().authorize_endpoint()?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &config.client_id)
                .append_pair("redirect_uri", &config.redirect_uri)
                .append_pair(
                    "approval_prompt",
                    if options.force { "force" } else { "auto" },
                );
            if config.test_mode {
                query.append_pair("mode", "test");
            }
            query.append_pair("scope", &config.scope.join(" "));
            if let Some(state) = &options.state {
                query.append_pair("state", state);
            }
        }

        Ok(url)
    }

    /// Exchanges an authorization code for tokens.
    ///
    /// # Errors
    ///
    /// - [`SmartcarError::Authentication`] if the token endpoint answers with a non-2xx status
    /// - [`SmartcarError::Network`] on transport failure
    /// - [`SmartcarError::InvalidResponse`] if the body is not a token response
    /// - [`SmartcarError::Configuration`] if the client secret is empty
    pub async fn exchange_code(&self, code: &str) -> Result<TokenRecord, SmartcarError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        self.request_token(&form).await
    }

    /// Exchanges a refresh token for a new set of tokens.
    ///
    /// # Errors
    ///
    /// Same as [`exchange_code`](Self::exchange_code).
    pub async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenRecord, SmartcarError> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        self.request_token(&form).await
    }

    fn basic_auth(&self) -> Result<Authentication, SmartcarError> {
        if self.config.client_secret.is_empty() {
            return Err(SmartcarError::configuration(
                "client_secret is required to exchange tokens",
            ));
        }
        Ok(Authentication::Basic {
            username: self.config.client_id.clone(),
            password: self.config.client_secret.clone(),
        })
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenRecord, SmartcarError> {
        let (auth_name, auth_value) = self.basic_auth()?.to_header()?;
        let url = self.config.active_environment().token_endpoint()?;
        let body = serde_urlencoded::to_string(form).map_err(|err| {
            SmartcarError::configuration(format!("cannot encode token request: {err}"))
        })?;

        let request = self
            .http
            .request(Method::POST, url)
            .header(auth_name, auth_value)
            .header(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED))
            .body(body)
            .build()?;

        let received = send::<TokenResponse>(&self.http, request, EndpointKind::Token).await?;
        let record =
            TokenRecord::from_response(received.body, received.received_at, &received.raw)?;
        debug!(expiration = %record.expiration(), "token acquired");

        Ok(record)
    }
}
