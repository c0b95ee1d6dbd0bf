use std::time::Duration;

use async_trait::async_trait;
use service_dispatch_application::{HttpRequest, HttpResponse, HttpTransport};
use service_dispatch_core::{DispatchError, DispatchResult, TransportError};
use service_dispatch_domain::HttpMethod;

/// HTTP transport backed by a shared `reqwest` client.
///
/// Statuses outside 2xx are reported as [`TransportError::Status`].
#[derive(Debug, Clone)]
pub struct ReqwestHttpTransport {
    http_client: reqwest::Client,
}

impl ReqwestHttpTransport {
    /// Wraps an existing `reqwest` client.
    #[must_use]
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// Builds a transport whose calls give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> DispatchResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                DispatchError::Validation(format!("failed to build HTTP client: {error}"))
            })?;

        Ok(Self::new(http_client))
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .http_client
            .request(reqwest_method(request.method), request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|error| TransportError::Connection(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| TransportError::Body(error.to_string()))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(HttpResponse {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}
