//! HTTP client for the ESL management API.
//!
//! Wraps `reqwest` with the two calls a sync run needs: fetching a bearer
//! token from `/proxy/token` and posting one batch of items to
//! `/proxy/integration/{customer}/{store}`.

use std::time::Duration;

use eslsync_core::{EslSettings, UpdateRecord};
use reqwest::{Client, Url};
use serde::Serialize;

use crate::batch::Batch;
use crate::error::EslError;
use crate::types::{ResponseBody, SubmissionResult};

/// Client for the ESL integration API.
///
/// Built from an [`EslSettings`] once per process; holds no token between
/// runs.
pub struct EslClient {
    client: Client,
    token_url: Url,
    integration_url: Url,
    username: String,
    password: String,
    customer_code: String,
    store_code: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchPayload<'a> {
    customer_store_code: &'a str,
    store_code: &'a str,
    batch_no: &'a str,
    items: &'a [UpdateRecord],
}

impl EslClient {
    /// Creates a client for the API described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`EslError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`EslError::InvalidBaseUrl`] if `base_url` is not a
    /// usable base URL.
    pub fn new(settings: &EslSettings) -> Result<Self, EslError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("eslsync/0.1 (shelf-label-sync)")
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()?;

        let invalid = |reason: String| EslError::InvalidBaseUrl {
            url: settings.base_url.clone(),
            reason,
        };
        let base = Url::parse(&settings.base_url).map_err(|e| invalid(e.to_string()))?;

        let token_url = endpoint(&base, &["proxy", "token"])
            .ok_or_else(|| invalid("URL cannot be a base".into()))?;
        let integration_url = endpoint(
            &base,
            &[
                "proxy",
                "integration",
                &settings.customer_code,
                &settings.store_code,
            ],
        )
        .ok_or_else(|| invalid("URL cannot be a base".into()))?;

        Ok(Self {
            client,
            token_url,
            integration_url,
            username: settings.username.clone(),
            password: settings.password.clone(),
            customer_code: settings.customer_code.clone(),
            store_code: settings.store_code.clone(),
        })
    }

    /// Requests a fresh bearer token with the service's basic-auth
    /// credentials.
    ///
    /// # Errors
    ///
    /// Returns [`EslError::Authentication`] if the request fails in transit,
    /// the endpoint answers with a non-2xx status, or the body has no
    /// non-empty `access_token` string.
    pub async fn fetch_token(&self) -> Result<String, EslError> {
        let response = self
            .client
            .post(self.token_url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| EslError::Authentication(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EslError::Authentication(format!(
                "token endpoint returned HTTP {status}"
            )));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            EslError::Authentication(format!("token response is not valid JSON: {e}"))
        })?;

        body.get("access_token")
            .and_then(serde_json::Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| {
                EslError::Authentication("token response has no access_token".to_owned())
            })
    }

    /// Posts one batch to the integration endpoint.
    ///
    /// Any HTTP response is a successful call from this method's point of
    /// view: the status and body are recorded verbatim, and a body that is
    /// not JSON becomes [`ResponseBody::Undecodable`].
    ///
    /// # Errors
    ///
    /// Returns [`EslError::Http`] only when no response was received
    /// (connection failure, timeout). A status whose body cannot be read is
    /// still recorded, with an empty [`ResponseBody::Undecodable`].
    pub async fn submit_batch(
        &self,
        batch: &Batch,
        token: &str,
    ) -> Result<SubmissionResult, EslError> {
        let payload = BatchPayload {
            customer_store_code: &self.customer_code,
            store_code: &self.store_code,
            batch_no: &batch.batch_no,
            items: &batch.records,
        };

        let response = self
            .client
            .post(self.integration_url.clone())
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(text) => decode_body(text),
            Err(e) => {
                tracing::warn!(
                    batch_no = %batch.batch_no,
                    status,
                    error = %e,
                    "could not read integration response body"
                );
                ResponseBody::Undecodable {
                    decode_error: format!("failed to read response body: {e}"),
                    raw: String::new(),
                }
            }
        };

        Ok(SubmissionResult {
            batch_index: batch.index,
            batch_no: batch.batch_no.clone(),
            item_count: batch.records.len(),
            status: Some(status),
            response: Some(body),
            error: None,
        })
    }
}

fn decode_body(text: String) -> ResponseBody {
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(value) => ResponseBody::Json(value),
        Err(e) => ResponseBody::Undecodable {
            decode_error: e.to_string(),
            raw: text,
        },
    }
}

/// Appends percent-encoded path segments to `base`, dropping a trailing
/// empty segment. Returns `None` for cannot-be-a-base URLs.
fn endpoint(base: &Url, segments: &[&str]) -> Option<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(segments);
    Some(url)
}
