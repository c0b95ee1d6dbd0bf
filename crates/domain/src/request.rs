use serde_json::{Map, Value};

use crate::HttpMethod;

/// One dispatch intent handed to the client.
///
/// Carries no transport state: headers and credentials are attached by the
/// client at call time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchRequest {
    method: HttpMethod,
    target_type: Option<String>,
    action: Option<String>,
    payload: Option<Map<String, Value>>,
    external_id: Option<String>,
    service: Option<String>,
    is_async: bool,
    parallel: bool,
    callback_url: Option<String>,
}

impl DispatchRequest {
    /// Creates an empty `GET` request with synchronous, sequential routing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP verb.
    #[must_use]
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the target-type selector.
    #[must_use]
    pub fn with_target_type(mut self, target_type: impl Into<String>) -> Self {
        self.target_type = Some(target_type.into());
        self
    }

    /// Sets the action invoked on targets.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Sets the JSON object forwarded to targets.
    #[must_use]
    pub fn with_payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Sets the caller correlation id.
    #[must_use]
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Restricts dispatch to one named service.
    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Sets whether the service answers before targets finish.
    #[must_use]
    pub fn with_async(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }

    /// Sets whether targets are called concurrently.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the URL called back once an async transaction resolves.
    #[must_use]
    pub fn with_callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    /// Replaces the HTTP verb.
    pub fn set_method(&mut self, method: HttpMethod) {
        self.method = method;
    }

    /// Replaces the target-type selector.
    pub fn set_target_type(&mut self, target_type: Option<String>) {
        self.target_type = target_type;
    }

    /// Replaces the action name.
    pub fn set_action(&mut self, action: Option<String>) {
        self.action = action;
    }

    /// Replaces the payload.
    pub fn set_payload(&mut self, payload: Option<Map<String, Value>>) {
        self.payload = payload;
    }

    /// Replaces the caller correlation id.
    pub fn set_external_id(&mut self, external_id: Option<String>) {
        self.external_id = external_id;
    }

    /// Replaces the single-service restriction.
    pub fn set_service(&mut self, service: Option<String>) {
        self.service = service;
    }

    /// Replaces the async flag.
    pub fn set_async(&mut self, is_async: bool) {
        self.is_async = is_async;
    }

    /// Replaces the parallel flag.
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// Replaces the callback URL.
    pub fn set_callback_url(&mut self, callback_url: Option<String>) {
        self.callback_url = callback_url;
    }

    /// Returns the HTTP verb.
    #[must_use]
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the target-type selector.
    #[must_use]
    pub fn target_type(&self) -> Option<&str> {
        self.target_type.as_deref()
    }

    /// Returns the action name.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// Returns the payload object.
    #[must_use]
    pub fn payload(&self) -> Option<&Map<String, Value>> {
        self.payload.as_ref()
    }

    /// Returns the caller correlation id.
    #[must_use]
    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    /// Returns the single-service restriction.
    #[must_use]
    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    /// Returns whether the service answers before targets finish.
    #[must_use]
    pub fn is_async(&self) -> bool {
        self.is_async
    }

    /// Returns whether targets are called concurrently.
    #[must_use]
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Returns the callback URL.
    #[must_use]
    pub fn callback_url(&self) -> Option<&str> {
        self.callback_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, json};

    use super::DispatchRequest;
    use crate::HttpMethod;

    #[test]
    fn new_request_uses_defaults() {
        let request = DispatchRequest::new();

        assert_eq!(request.method(), HttpMethod::Get);
        assert!(!request.is_async());
        assert!(!request.is_parallel());
        assert_eq!(request.target_type(), None);
        assert_eq!(request.callback_url(), None);
    }

    #[test]
    fn builder_and_setters_update_fields() {
        let mut payload = Map::new();
        payload.insert("order_id".to_owned(), json!(42));

        let mut request = DispatchRequest::new()
            .with_method(HttpMethod::Post)
            .with_target_type("orders")
            .with_action("sync")
            .with_payload(payload)
            .with_service("billing")
            .with_async(true);
        request.set_external_id(Some("ext-1".to_owned()));
        request.set_service(None);

        assert_eq!(request.method(), HttpMethod::Post);
        assert_eq!(request.target_type(), Some("orders"));
        assert_eq!(request.action(), Some("sync"));
        assert_eq!(
            request.payload().and_then(|payload| payload.get("order_id")),
            Some(&json!(42))
        );
        assert_eq!(request.external_id(), Some("ext-1"));
        assert_eq!(request.service(), None);
        assert!(request.is_async());
    }
}
