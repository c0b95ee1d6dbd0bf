use async_trait::async_trait;
use serde_json::Value;
use service_dispatch_core::TransportError;
use service_dispatch_domain::HttpMethod;
use url::Url;

/// Outbound HTTP call prepared by the dispatch client.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Absolute target URL.
    pub url: Url,
    /// Header name/value pairs in insertion order.
    pub headers: Vec<(String, String)>,
    /// JSON body, when the call carries one.
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Returns the first header value matching `name` case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header_name, _)| header_name.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Response returned by a transport for a successful exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

/// Port performing HTTP exchanges for the dispatch client.
///
/// Implementations own timeouts, connection reuse and the decision of which
/// statuses count as failures.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Executes one request/response exchange.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
