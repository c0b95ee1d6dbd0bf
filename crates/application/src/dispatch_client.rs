use std::sync::Arc;

use serde_json::{Map, Value, json};
use service_dispatch_core::{
    BearerToken, CLIENT_VERSION, CLIENT_VERSION_HEADER, DispatchError, DispatchResult,
};
use service_dispatch_domain::{
    CreateTransactionBody, DispatchRequest, DispatchResponse, HttpMethod,
};
use url::Url;

use crate::client_config::ClientConfig;
use crate::dispatch_ports::{DispatchLogger, HttpRequest, HttpTransport, NoopDispatchLogger};

/// Client for the remote dispatch service.
///
/// Every operation is one request/response exchange through the injected
/// transport. Nothing is retried.
#[derive(Clone)]
pub struct DispatchClient {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    logger: Arc<dyn DispatchLogger>,
}

impl DispatchClient {
    /// Creates a client that logs nothing.
    #[must_use]
    pub fn new(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            transport,
            logger: Arc::new(NoopDispatchLogger),
        }
    }

    /// Replaces the logging sink.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn DispatchLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the versioned create-transaction path.
    #[must_use]
    pub fn create_path() -> String {
        format!("v{CLIENT_VERSION}/create")
    }

    /// Creates an async transaction; targets are always called in parallel.
    pub async fn send_async(
        &self,
        method: &str,
        target_type: &str,
        action: &str,
        payload: Option<Map<String, Value>>,
        external_id: Option<&str>,
        callback_url: Option<&str>,
    ) -> DispatchResult<Option<Value>> {
        let body = CreateTransactionBody::asynchronous(
            target_type,
            action,
            payload,
            external_id,
            callback_url,
        );

        self.request(method, Self::create_path().as_str(), Some(body.into_params()))
            .await
    }

    /// Creates a transaction and waits for every target to answer.
    pub async fn send_sync(
        &self,
        method: &str,
        target_type: &str,
        action: &str,
        payload: Option<Map<String, Value>>,
        external_id: Option<&str>,
        parallel: bool,
    ) -> DispatchResult<Option<Value>> {
        let body =
            CreateTransactionBody::synchronous(target_type, action, payload, external_id, parallel);

        self.request(method, Self::create_path().as_str(), Some(body.into_params()))
            .await
    }

    /// Sends a full request descriptor and decodes the per-target outcomes.
    ///
    /// A reply without a JSON body decodes to an empty envelope.
    pub async fn send_request(
        &self,
        request: &DispatchRequest,
    ) -> DispatchResult<DispatchResponse> {
        let params = CreateTransactionBody::from(request).into_params();
        let raw = self
            .request(
                request.method().as_str(),
                Self::create_path().as_str(),
                Some(params),
            )
            .await?;

        Ok(raw.map(DispatchResponse::from_value).unwrap_or_default())
    }

    /// Probes the service root.
    ///
    /// Returns `true` only when the call succeeds and the body is an object
    /// holding the configured marker key. Never fails.
    pub async fn ping(&self) -> bool {
        let marker = self.config.ping_marker_key();

        match self.request(HttpMethod::Get.as_str(), "", None).await {
            Ok(Some(Value::Object(body))) if body.contains_key(marker) => true,
            Ok(_) => {
                if self.config.debug() {
                    self.logger.warning(
                        "dispatch ping response is missing the marker key",
                        &json!({ "marker_key": marker }),
                    );
                }
                false
            }
            Err(error) => {
                if self.config.debug() {
                    self.logger.error(
                        "dispatch ping failed",
                        &json!({ "code": error.code(), "error": error.to_string() }),
                    );
                }
                false
            }
        }
    }

    /// Lists transactions known to the service.
    pub async fn transactions(&self) -> DispatchResult<Option<Value>> {
        self.request(HttpMethod::Get.as_str(), "transactions", None)
            .await
    }

    /// Looks one transaction up by its id, or by the caller's external id.
    pub async fn transaction(
        &self,
        transaction_id: &str,
        by_external_id: bool,
    ) -> DispatchResult<Option<Value>> {
        let url = if by_external_id {
            let mut url = self.config.endpoint("transaction")?;
            url.query_pairs_mut()
                .append_pair("external_id", transaction_id);
            url
        } else {
            let mut url = self.config.endpoint("transaction/")?;
            url.path_segments_mut()
                .map_err(|()| {
                    DispatchError::Validation(format!(
                        "base address '{}' cannot carry path segments",
                        self.config.base_url()
                    ))
                })?
                .pop_if_empty()
                .push(transaction_id);
            url
        };

        self.send(HttpMethod::Get, url, None).await
    }

    /// Performs one authenticated call against `path` under the base URL.
    ///
    /// An empty or non-JSON body yields `None`.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        params: Option<Map<String, Value>>,
    ) -> DispatchResult<Option<Value>> {
        let method = HttpMethod::parse(method)?;
        let url = self.config.endpoint(path)?;
        self.send(method, url, params).await
    }

    async fn send(
        &self,
        method: HttpMethod,
        url: Url,
        params: Option<Map<String, Value>>,
    ) -> DispatchResult<Option<Value>> {
        let headers = self.headers();

        if self.config.debug() {
            self.logger.debug(
                "dispatch request headers",
                &json!({
                    "method": method.as_str(),
                    "url": url.as_str(),
                    "headers": redacted_headers(&headers),
                }),
            );
            let keys: Vec<&str> = params
                .iter()
                .flat_map(|params| params.keys().map(String::as_str))
                .collect();
            self.logger
                .debug("dispatch request params", &json!({ "keys": keys }));
        }

        let target = url.to_string();
        let request = HttpRequest {
            method,
            url,
            headers,
            body: params.map(Value::Object),
        };

        match self.transport.execute(request).await {
            Ok(response) => Ok(decode_body(response.body.as_slice())),
            Err(error) => {
                self.logger.error(
                    "dispatch transport call failed",
                    &json!({
                        "method": method.as_str(),
                        "url": target,
                        "error": error.to_string(),
                    }),
                );
                Err(DispatchError::from(error))
            }
        }
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Content-Type".to_owned(), "application/json".to_owned()),
            (CLIENT_VERSION_HEADER.to_owned(), CLIENT_VERSION.to_owned()),
            (
                "Authorization".to_owned(),
                self.config.token().authorization_value(),
            ),
        ]
    }
}

fn redacted_headers(headers: &[(String, String)]) -> Map<String, Value> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if name.eq_ignore_ascii_case("authorization") {
                BearerToken::REDACTED_VALUE.to_owned()
            } else {
                value.clone()
            };
            (name.clone(), Value::String(value))
        })
        .collect()
}

fn decode_body(body: &[u8]) -> Option<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    serde_json::from_slice::<Value>(body)
        .ok()
        .filter(|value| !value.is_null())
}
