//! Shared plumbing for the HTTP adapters.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::{RecommendationError, Result};

/// Body wrapper used by the identity and ticketing services.
///
/// The `data` key is required even when `T` is an `Option`: an explicit
/// `"data": null` decodes to `None`, a missing key is a decode failure.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(
        deserialize_with = "required",
        bound(deserialize = "T: Deserialize<'de>")
    )]
    data: T,
}

fn required<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer)
}

/// Builds the client shared by every adapter; `timeout` bounds each call.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}

/// Identifies one upstream call in errors and logs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Call<'a> {
    pub service: &'static str,
    pub operation: &'static str,
    pub key: &'a str,
}

impl Call<'_> {
    pub fn unavailable(&self, reason: impl Into<String>) -> RecommendationError {
        let reason = reason.into();
        tracing::warn!(
            service = self.service,
            operation = self.operation,
            key = %self.key,
            reason = %reason,
            "upstream call failed"
        );
        RecommendationError::unavailable(self.service, self.operation, self.key, reason)
    }

    pub fn not_found(&self) -> RecommendationError {
        RecommendationError::NotFound {
            service: self.service,
            operation: self.operation,
            key: self.key.to_string(),
        }
    }
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Sends a GET request, mapping transport failures and timeouts to
/// `Unavailable`. The status is left for the caller to inspect.
pub(crate) async fn send(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
    call: Call<'_>,
) -> Result<Response> {
    client
        .get(url)
        .query(query)
        .send()
        .await
        // Query strings may carry tokens; keep them out of error text.
        .map_err(|e| {
            if e.is_timeout() {
                call.unavailable("request timed out")
            } else {
                call.unavailable(format!("request failed: {}", e.without_url()))
            }
        })
}

/// Decodes an enveloped body, mapping decode failures to `Unavailable`.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response, call: Call<'_>) -> Result<T> {
    response
        .json::<Envelope<T>>()
        .await
        .map(|envelope| envelope.data)
        .map_err(|e| call.unavailable(format!("undecodable response body: {}", e.without_url())))
}

/// GETs an enveloped resource: 404 is `NotFound`, any other non-2xx is
/// `Unavailable`.
pub(crate) async fn get_data<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
    call: Call<'_>,
) -> Result<T> {
    let response = send(client, url, query, call).await?;
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(call.not_found());
    }
    if !status.is_success() {
        return Err(call.unavailable(format!("unexpected status {status}")));
    }
    decode(response, call).await
}
