//! Account-level resource endpoints.

use std::time::Duration;

use http::Method;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::transport::{EndpointKind, build_http_client, send};
use super::{Authentication, Environment, SmartcarError};

/// Paging for [`ApiClient::get_vehicle_ids`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VehicleIdsQuery {
    /// Maximum number of vehicle ids to return.
    pub limit: Option<u32>,
    /// Index of the first vehicle id to return.
    pub offset: Option<u32>,
}

impl VehicleIdsQuery {
    /// Creates a query with both a limit and an offset.
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// Creates a query from optional paging values.
    pub fn from_options(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self { limit, offset }
    }

    fn apply(self, url: &mut Url) {
        if self.limit.is_none() && self.offset.is_none() {
            return;
        }
        let mut query = url.query_pairs_mut();
        if let Some(limit) = self.limit {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(offset) = self.offset {
            query.append_pair("offset", &offset.to_string());
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
}

/// Client for resource endpoints authenticated with an access token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    environment: Environment,
}

impl ApiClient {
    /// Creates a builder targeting the production environment.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// The environment requests are sent to.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Lists the ids of the vehicles the user granted access to.
    ///
    /// Returns the decoded response body unchanged, e.g.
    /// `{"vehicles": [...], "paging": {"count": 2, "offset": 0}}`.
    ///
    /// # Errors
    ///
    /// - [`SmartcarError::Api`] if the endpoint answers with a non-2xx status
    /// - [`SmartcarError::Network`] on transport failure
    /// - [`SmartcarError::InvalidHeader`] if the token is not a valid header value
    pub async fn get_vehicle_ids(
        &self,
        access_token: &str,
        query: VehicleIdsQuery,
    ) -> Result<Value, SmartcarError> {
        let mut url = self.environment.api_endpoint("vehicles")?;
        query.apply(&mut url);
        self.get(access_token, url).await
    }

    /// Returns the id of the user who granted access.
    ///
    /// # Errors
    ///
    /// Same as [`get_vehicle_ids`](Self::get_vehicle_ids), plus
    /// [`SmartcarError::InvalidResponse`] if the body has no string `id`.
    pub async fn get_user_id(&self, access_token: &str) -> Result<String, SmartcarError> {
        let url = self.environment.api_endpoint("user")?;
        let user: UserResponse = self.get(access_token, url).await?;
        Ok(user.id)
    }

    async fn get<T>(&self, access_token: &str, url: Url) -> Result<T, SmartcarError>
    where
        T: serde::de::DeserializeOwned,
    {
        let (auth_name, auth_value) = Authentication::Bearer(access_token.into()).to_header()?;
        let request = self
            .http
            .request(Method::GET, url)
            .header(auth_name, auth_value)
            .build()?;

        let received = send(&self.http, request, EndpointKind::Resource).await?;
        Ok(received.body)
    }
}

/// Builder for [`ApiClient`].
#[derive(Debug, Clone, Default)]
pub struct ApiClientBuilder {
    environment: Environment,
    timeout: Option<Duration>,
    http: Option<reqwest::Client>,
}

impl ApiClientBuilder {
    /// Sets the environment, e.g. a sandbox or a local mock.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Sets a timeout for each request.
    ///
    /// Ignored when an HTTP client is provided with [`with_http_client`](Self::with_http_client).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reuses an existing HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`SmartcarError::Network`] if the HTTP client cannot be initialized.
    pub fn build(self) -> Result<ApiClient, SmartcarError> {
        let http = match self.http {
            Some(http) => http,
            None => build_http_client(self.timeout)?,
        };
        Ok(ApiClient {
            http,
            environment: self.environment,
        })
    }
}

/// Lists vehicle ids using the production environment.
///
/// See [`ApiClient::get_vehicle_ids`].
///
/// # Errors
///
/// See [`ApiClient::get_vehicle_ids`].
pub async fn get_vehicle_ids(
    access_token: &str,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<Value, SmartcarError> {
    ApiClient::builder()
        .build()?
        .get_vehicle_ids(access_token, VehicleIdsQuery::from_options(limit, offset))
        .await
}

/// Returns the user id using the production environment.
///
/// # Errors
///
/// See [`ApiClient::get_user_id`].
pub async fn get_user_id(access_token: &str) -> Result<String, SmartcarError> {
    ApiClient::builder().build()?.get_user_id(access_token).await
}
