//! Base URLs of the Smartcar services.

use url::Url;

use super::SmartcarError;

const CONNECT_URL: &str = "https://connect.smartcar.com";
const AUTH_URL: &str = "https://auth.smartcar.com";
const API_URL: &str = "https://api.smartcar.com/v1.0";

/// The three hosts a client talks to.
///
/// - `connect_url`: where the user is sent to grant access (`/oauth/authorize`)
/// - `auth_url`: the token endpoint host (`/oauth/token`)
/// - `api_url`: the resource API, including its version prefix
///
/// [`Environment::production`] is the default. Point all three at a local
/// server to test against a mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub(crate) connect_url: Url,
    pub(crate) auth_url: Url,
    pub(crate) api_url: Url,
}

impl Environment {
    /// Creates an environment from three base URLs.
    ///
    /// # Errors
    ///
    /// Returns [`SmartcarError::Configuration`] if a URL cannot be parsed or
    /// cannot be used as a base.
    pub fn new(
        connect_url: impl AsRef<str>,
        auth_url: impl AsRef<str>,
        api_url: impl AsRef<str>,
    ) -> Result<Self, SmartcarError> {
        Ok(Self {
            connect_url: parse_base("connect", connect_url.as_ref())?,
            auth_url: parse_base("auth", auth_url.as_ref())?,
            api_url: parse_base("api", api_url.as_ref())?,
        })
    }

    /// Creates an environment where every service lives under the same base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SmartcarError::Configuration`] if the URL is invalid.
    pub fn single_host(base_url: impl AsRef<str>) -> Result<Self, SmartcarError> {
        let base_url = base_url.as_ref();
        Self::new(base_url, base_url, base_url)
    }

    /// The public Smartcar environment.
    pub fn production() -> Self {
        Self {
            connect_url: known_url(CONNECT_URL),
            auth_url: known_url(AUTH_URL),
            api_url: known_url(API_URL),
        }
    }

    /// The connect (authorization) base URL.
    pub fn connect_url(&self) -> &Url {
        &self.connect_url
    }

    /// The token endpoint base URL.
    pub fn auth_url(&self) -> &Url {
        &self.auth_url
    }

    /// The resource API base URL.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub(crate) fn authorize_endpoint(&self) -> Result<Url, SmartcarError> {
        endpoint(&self.connect_url, &["oauth", "authorize"])
    }

    pub(crate) fn token_endpoint(&self) -> Result<Url, SmartcarError> {
        endpoint(&self.auth_url, &["oauth", "token"])
    }

    pub(crate) fn api_endpoint(&self, segment: &str) -> Result<Url, SmartcarError> {
        endpoint(&self.api_url, &[segment])
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::production()
    }
}

#[allow(clippy::expect_used)]
fn known_url(url: &'static str) -> Url {
    Url::parse(url).expect("hard-coded URL is valid")
}

fn parse_base(name: &str, url: &str) -> Result<Url, SmartcarError> {
    let parsed = Url::parse(url)
        .map_err(|err| SmartcarError::configuration(format!("invalid {name} URL '{url}': {err}")))?;
    if parsed.cannot_be_a_base() {
        return Err(SmartcarError::configuration(format!(
            "{name} URL '{url}' cannot be used as a base"
        )));
    }
    Ok(parsed)
}

/// Appends path segments to a base URL, keeping any path prefix like `/v1.0`.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, SmartcarError> {
    let mut url = base.clone();
    url.set_query(None);
    url.path_segments_mut()
        .map_err(|()| SmartcarError::configuration(format!("URL '{base}' cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
