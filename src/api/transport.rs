//! The three HTTP exchanges the deployment needs, and their reqwest implementation

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::time::Duration;

use super::constants::headers;

/// Status code and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Raw HTTP capability used by the Business Central calls.
///
/// An `Err` means the exchange did not complete (DNS, TLS, timeout...);
/// any response that arrived, whatever its status, is an `Ok`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST an `application/x-www-form-urlencoded` body
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse>;

    /// GET with a bearer token, accepting JSON
    async fn get_json(&self, url: &str, bearer: &str) -> Result<HttpResponse>;

    /// PATCH a binary body with a bearer token and extra headers
    async fn patch_binary(
        &self,
        url: &str,
        bearer: &str,
        extra_headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> Result<HttpResponse>;
}

/// reqwest-backed transport with connection pooling
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("bc-pte-deploy/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http_client })
    }

    /// Create a transport around an existing client
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    async fn finish(response: reqwest::Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;
        debug!("Response status: {} ({} bytes)", status, body.len());
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse> {
        debug!("POST {}", url);
        let response = self
            .http_client
            .post(url)
            .form(form)
            .send()
            .await
            .context("POST request failed")?;
        Self::finish(response).await
    }

    async fn get_json(&self, url: &str, bearer: &str) -> Result<HttpResponse> {
        debug!("GET {}", url);
        let response = self
            .http_client
            .get(url)
            .bearer_auth(bearer)
            .header(reqwest::header::ACCEPT, headers::ACCEPT_JSON)
            .send()
            .await
            .context("GET request failed")?;
        Self::finish(response).await
    }

    async fn patch_binary(
        &self,
        url: &str,
        bearer: &str,
        extra_headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> Result<HttpResponse> {
        debug!("PATCH {} ({} bytes)", url, body.len());
        let mut request = self.http_client.patch(url).bearer_auth(bearer).body(body);
        for (name, value) in extra_headers {
            request = request.header(*name, *value);
        }
        let response = request.send().await.context("PATCH request failed")?;
        Self::finish(response).await
    }
}
