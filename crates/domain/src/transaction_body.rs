use serde_json::{Map, Value};

use crate::DispatchRequest;

/// JSON body of a create-transaction call.
///
/// Absent optionals go on the wire as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTransactionBody {
    /// Fan out to targets concurrently.
    pub parallel: bool,
    /// Answer before targets finish.
    pub is_async: bool,
    /// Target-type selector.
    pub target_type: Option<String>,
    /// Caller correlation id.
    pub external_id: Option<String>,
    /// Action invoked on targets.
    pub action: Option<String>,
    /// Payload forwarded to targets.
    pub payload: Option<Map<String, Value>>,
    /// Single-service restriction.
    pub service: Option<String>,
    /// Callback for async transactions.
    pub callback_url: Option<String>,
}

impl CreateTransactionBody {
    /// Builds an async body; async mode always fans out in parallel.
    #[must_use]
    pub fn asynchronous(
        target_type: &str,
        action: &str,
        payload: Option<Map<String, Value>>,
        external_id: Option<&str>,
        callback_url: Option<&str>,
    ) -> Self {
        Self {
            parallel: true,
            is_async: true,
            target_type: Some(target_type.to_owned()),
            external_id: external_id.map(str::to_owned),
            action: Some(action.to_owned()),
            payload,
            service: None,
            callback_url: callback_url.map(str::to_owned),
        }
    }

    /// Builds a blocking body with the caller's parallel choice.
    #[must_use]
    pub fn synchronous(
        target_type: &str,
        action: &str,
        payload: Option<Map<String, Value>>,
        external_id: Option<&str>,
        parallel: bool,
    ) -> Self {
        Self {
            parallel,
            is_async: false,
            target_type: Some(target_type.to_owned()),
            external_id: external_id.map(str::to_owned),
            action: Some(action.to_owned()),
            payload,
            service: None,
            callback_url: None,
        }
    }

    /// Converts the body into the wire object.
    #[must_use]
    pub fn into_params(self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("parallel".to_owned(), Value::Bool(self.parallel));
        params.insert("async".to_owned(), Value::Bool(self.is_async));
        params.insert("type".to_owned(), optional_string(self.target_type));
        params.insert("external_id".to_owned(), optional_string(self.external_id));
        params.insert("action".to_owned(), optional_string(self.action));
        params.insert(
            "payload".to_owned(),
            self.payload.map_or(Value::Null, Value::Object),
        );
        params.insert("service".to_owned(), optional_string(self.service));
        params.insert("callback_url".to_owned(), optional_string(self.callback_url));
        params
    }
}

impl From<&DispatchRequest> for CreateTransactionBody {
    fn from(request: &DispatchRequest) -> Self {
        Self {
            parallel: request.is_parallel(),
            is_async: request.is_async(),
            target_type: request.target_type().map(str::to_owned),
            external_id: request.external_id().map(str::to_owned),
            action: request.action().map(str::to_owned),
            payload: request.payload().cloned(),
            service: request.service().map(str::to_owned),
            callback_url: request.callback_url().map(str::to_owned),
        }
    }
}

fn optional_string(value: Option<String>) -> Value {
    value.map_or(Value::Null, Value::String)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::{Value, json};

    use super::CreateTransactionBody;
    use crate::DispatchRequest;

    #[test]
    fn into_params_writes_every_wire_key() {
        let params = CreateTransactionBody::synchronous("orders", "sync", None, None, false)
            .into_params();

        assert_eq!(
            Value::Object(params),
            json!({
                "parallel": false,
                "async": false,
                "type": "orders",
                "external_id": null,
                "action": "sync",
                "payload": null,
                "service": null,
                "callback_url": null,
            })
        );
    }

    #[test]
    fn request_conversion_keeps_service_and_callback() {
        let request = DispatchRequest::new()
            .with_target_type("orders")
            .with_action("sync")
            .with_service("billing")
            .with_async(true)
            .with_callback_url("https://caller.test/hook");

        let params = CreateTransactionBody::from(&request).into_params();

        assert_eq!(params.get("service"), Some(&json!("billing")));
        assert_eq!(
            params.get("callback_url"),
            Some(&json!("https://caller.test/hook"))
        );
        assert_eq!(params.get("async"), Some(&json!(true)));
        assert_eq!(params.get("parallel"), Some(&json!(false)));
    }

    proptest! {
        #[test]
        fn asynchronous_body_always_runs_async_and_parallel(
            target_type in "[a-z]{1,12}",
            action in "[a-z_]{1,12}",
            external_id in proptest::option::of("[a-z0-9-]{1,16}"),
        ) {
            let params = CreateTransactionBody::asynchronous(
                target_type.as_str(),
                action.as_str(),
                None,
                external_id.as_deref(),
                None,
            )
            .into_params();

            prop_assert_eq!(params.get("async"), Some(&Value::Bool(true)));
            prop_assert_eq!(params.get("parallel"), Some(&Value::Bool(true)));
        }

        #[test]
        fn synchronous_body_passes_parallel_through(parallel in any::<bool>()) {
            let params = CreateTransactionBody::synchronous("orders", "sync", None, None, parallel)
                .into_params();

            prop_assert_eq!(params.get("async"), Some(&Value::Bool(false)));
            prop_assert_eq!(params.get("parallel"), Some(&Value::Bool(parallel)));
        }
    }
}
