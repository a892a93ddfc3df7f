//! reqwest executor for the core's plain-data requests.

use std::time::Duration;

use hidrosafe_core::{ApiError, HidroClient, HttpMethod, HttpRequest, HttpResponse};
use log::debug;

/// Pairs a `HidroClient` with a pooled reqwest client that performs the
/// round trips it describes.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: HidroClient,
    http: reqwest::Client,
}

impl HttpTransport {
    /// `timeout` of `None` leaves requests bounded only by the network stack.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client: HidroClient::new(base_url),
            http,
        })
    }

    pub fn client(&self) -> &HidroClient {
        &self.client
    }

    /// Execute one request. Non-2xx statuses come back as data; only
    /// transport failures are errors here.
    pub async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };
        let mut builder = self.http.request(method, &req.path);
        for (key, value) in &req.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        debug!("{} {} -> {}", req.method.as_str(), req.path, status);

        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read response body: {e}")))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
