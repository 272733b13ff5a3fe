//! Request execution shared by the OAuth2 and resource clients.

use std::time::Duration;

use jiff::Timestamp;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::SmartcarError;
use super::error::truncate_body;

/// Which family of endpoint a request targets.
///
/// Decides the error variant raised on a non-2xx status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EndpointKind {
    Token,
    Resource,
}

/// A decoded response body with the instant it was received.
#[derive(Debug)]
pub(crate) struct Received<T> {
    pub(crate) body: T,
    pub(crate) raw: String,
    pub(crate) received_at: Timestamp,
}

/// Builds the underlying HTTP client, applying the optional timeout.
pub(crate) fn build_http_client(
    timeout: Option<Duration>,
) -> Result<reqwest::Client, SmartcarError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Executes the request, checks the status and decodes the JSON body.
pub(crate) async fn send<T>(
    client: &reqwest::Client,
    request: reqwest::Request,
    kind: EndpointKind,
) -> Result<Received<T>, SmartcarError>
where
    T: DeserializeOwned,
{
    let method = request.method().clone();
    let url = request.url().clone();

    debug!(%method, %url, "sending...");
    let response = client.execute(request).await?;
    let received_at = Timestamp::now();
    let status = response.status();
    debug!(%method, %url, %status, "...receiving");

    let text = response.text().await?;

    if !status.is_success() {
        warn!(%method, %url, %status, "request rejected");
        let status_code = status.as_u16();
        let body = truncate_body(text);
        return Err(match kind {
            EndpointKind::Token => SmartcarError::Authentication { status_code, body },
            EndpointKind::Resource => SmartcarError::Api { status_code, body },
        });
    }

    let mut deserializer = serde_json::Deserializer::from_str(&text);
    let body = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        SmartcarError::InvalidResponse {
            path: err.path().to_string(),
            error: err.into_inner(),
            body: truncate_body(text.clone()),
        }
    })?;
    // only whitespace may follow the value
    deserializer
        .end()
        .map_err(|error| SmartcarError::InvalidResponse {
            path: ".".to_string(),
            error,
            body: truncate_body(text.clone()),
        })?;

    Ok(Received {
        body,
        raw: text,
        received_at,
    })
}
