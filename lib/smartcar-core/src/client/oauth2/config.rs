//! Application credentials and their builder.

use std::fmt;
use std::time::Duration;

use crate::client::{Environment, SecureString, SmartcarError};

/// Application configuration for the OAuth2 authorization code flow.
///
/// Use [`AuthClientConfigBuilder`] to create instances. Once built, the
/// configuration is immutable.
#[derive(Clone)]
pub struct AuthClientConfig {
    pub(crate) client_id: String,
    pub(crate) client_secret: SecureString,
    pub(crate) redirect_uri: String,
    pub(crate) scope: Vec<String>,
    pub(crate) test_mode: bool,
    pub(crate) environment: Environment,
    pub(crate) sandbox_environment: Option<Environment>,
    pub(crate) timeout: Option<Duration>,
}

impl AuthClientConfig {
    /// Creates a builder with the required credentials.
    pub fn builder(
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
        redirect_uri: impl Into<String>,
    ) -> AuthClientConfigBuilder {
        AuthClientConfigBuilder::new(client_id, client_secret, redirect_uri)
    }

    /// The application client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The redirect URI registered for the application.
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// The requested permissions, in request order.
    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    /// Whether the client runs against test (simulated) vehicles.
    pub fn is_test_mode(&self) -> bool {
        self.test_mode
    }

    /// The timeout applied to each request, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The environment requests are sent to.
    ///
    /// In test mode the sandbox environment is used when one was configured.
    pub fn active_environment(&self) -> &Environment {
        match &self.sandbox_environment {
            Some(sandbox) if self.test_mode => sandbox,
            _ => &self.environment,
        }
    }
}

impl fmt::Debug for AuthClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("test_mode", &self.test_mode)
            .field("environment", &self.environment)
            .field("sandbox_environment", &self.sandbox_environment)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for [`AuthClientConfig`].
///
/// Test mode can be requested two ways, kept for parity with older client
/// libraries: [`with_test_mode`](Self::with_test_mode) and
/// [`with_development`](Self::with_development). They resolve once, in
/// [`build`](Self::build):
///
/// 1. an explicit `with_test_mode(value)` wins, whether `value` is `true` or `false`
/// 2. otherwise `with_development(value)`
/// 3. otherwise test mode is off
///
/// ```rust
/// use smartcar_core::AuthClientConfig;
///
/// # fn example() -> Result<(), smartcar_core::SmartcarError> {
/// let config = AuthClientConfig::builder("client-id", "client-secret", "https://redirect.uri")
///     .add_scopes(["read_vehicle_info", "read_odometer"])
///     .with_development(true)
///     .with_test_mode(false)
///     .build()?;
///
/// assert!(!config.is_test_mode());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AuthClientConfigBuilder {
    client_id: String,
    client_secret: SecureString,
    redirect_uri: String,
    scope: Vec<String>,
    test_mode: Option<bool>,
    development: Option<bool>,
    environment: Environment,
    sandbox_environment: Option<Environment>,
    timeout: Option<Duration>,
}

impl AuthClientConfigBuilder {
    /// Creates a new builder with required parameters.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scope: Vec::new(),
            test_mode: None,
            development: None,
            environment: Environment::production(),
            sandbox_environment: None,
            timeout: None,
        }
    }

    /// Adds a scope.
    #[must_use]
    pub fn add_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope.push(scope.into());
        self
    }

    /// Adds multiple scopes.
    #[must_use]
    pub fn add_scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scope.extend(scopes.into_iter().map(Into::into));
        self
    }

    /// Explicitly enables or disables test mode.
    #[must_use]
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = Some(test_mode);
        self
    }

    /// Enables or disables test mode, unless [`with_test_mode`](Self::with_test_mode) is also set.
    #[must_use]
    pub fn with_development(mut self, development: bool) -> Self {
        self.development = Some(development);
        self
    }

    /// Sets the environment used outside test mode.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Sets the environment used when test mode is on.
    #[must_use]
    pub fn with_sandbox_environment(mut self, environment: Environment) -> Self {
        self.sandbox_environment = Some(environment);
        self
    }

    /// Sets a timeout for each request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SmartcarError::Configuration`] if `client_id` or
    /// `redirect_uri` is empty.
    pub fn build(self) -> Result<AuthClientConfig, SmartcarError> {
        if self.client_id.trim().is_empty() {
            return Err(SmartcarError::configuration("client_id is required"));
        }
        if self.redirect_uri.trim().is_empty() {
            return Err(SmartcarError::configuration("redirect_uri is required"));
        }

        let test_mode = self.test_mode.or(self.development).unwrap_or(false);

        Ok(AuthClientConfig {
            client_id: self.client_id,
            client_secret: self.client_secret,
            redirect_uri: self.redirect_uri,
            scope: self.scope,
            test_mode,
            environment: self.environment,
            sandbox_environment: self.sandbox_environment,
            timeout: self.timeout,
        })
    }
}

impl fmt::Debug for AuthClientConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthClientConfigBuilder")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("test_mode", &self.test_mode)
            .field("development", &self.development)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn builder() -> AuthClientConfigBuilder {
        AuthClientConfig::builder("client-id", "client-secret", "https://redirect.uri")
    }

    #[test]
    fn should_create_config() {
        let config = builder()
            .add_scopes(["a", "b"])
            .add_scope("c")
            .build()
            .expect("Should build config");

        assert_eq!(config.client_id(), "client-id");
        assert_eq!(config.redirect_uri(), "https://redirect.uri");
        assert_eq!(config.scope(), ["a", "b", "c"]);
        assert!(!config.is_test_mode());
        assert_eq!(config.timeout(), None);
    }

    #[rstest]
    #[case::nothing(None, None, false)]
    #[case::test_mode_on(Some(true), None, true)]
    #[case::test_mode_off(Some(false), None, false)]
    #[case::development_on(None, Some(true), true)]
    #[case::development_off(None, Some(false), false)]
    #[case::explicit_off_beats_development(Some(false), Some(true), false)]
    #[case::explicit_on_beats_development(Some(true), Some(false), true)]
    fn should_resolve_test_mode(
        #[case] test_mode: Option<bool>,
        #[case] development: Option<bool>,
        #[case] expected: bool,
    ) {
        let mut builder = builder();
        if let Some(development) = development {
            builder = builder.with_development(development);
        }
        if let Some(test_mode) = test_mode {
            builder = builder.with_test_mode(test_mode);
        }
        let config = builder.build().expect("Should build config");

        assert_eq!(config.is_test_mode(), expected);
    }

    #[test]
    fn should_resolve_test_mode_regardless_of_call_order() {
        let config = builder()
            .with_test_mode(false)
            .with_development(true)
            .build()
            .expect("Should build config");

        assert!(!config.is_test_mode());
    }

    #[rstest]
    #[case::client_id("", "https://redirect.uri", "client_id")]
    #[case::redirect_uri("client-id", "  ", "redirect_uri")]
    fn should_reject_missing_fields(
        #[case] client_id: &str,
        #[case] redirect_uri: &str,
        #[case] field: &str,
    ) {
        let result = AuthClientConfig::builder(client_id, "secret", redirect_uri).build();

        match result.expect_err("Should fail") {
            SmartcarError::Configuration { reason } => assert!(reason.contains(field)),
            other => panic!("Expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn should_use_sandbox_only_in_test_mode() {
        let sandbox = Environment::single_host("http://sandbox.local").expect("valid URL");

        let config = builder()
            .with_sandbox_environment(sandbox.clone())
            .build()
            .expect("Should build config");
        assert_eq!(config.active_environment(), &Environment::production());

        let config = builder()
            .with_sandbox_environment(sandbox.clone())
            .with_test_mode(true)
            .build()
            .expect("Should build config");
        assert_eq!(config.active_environment(), &sandbox);
    }

    #[test]
    fn should_keep_environment_in_test_mode_without_sandbox() {
        let config = builder()
            .with_development(true)
            .build()
            .expect("Should build config");

        assert_eq!(config.active_environment(), &Environment::production());
    }

    #[test]
    fn should_redact_debug_output() {
        let config = AuthClientConfig::builder("client-id", "super-secret", "https://redirect.uri")
            .build()
            .expect("Should build config");

        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("super-secret"));

        let debug_str = format!("{:?}", builder());
        assert!(!debug_str.contains("client-secret"));
    }
}
