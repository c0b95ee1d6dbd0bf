use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Outcome reported for one target service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ItemOutcome {
    /// The target answered successfully.
    Success,
    /// The target answered with a failure.
    Failure,
    /// No answer yet: timed out, or an async transaction still running.
    #[default]
    Unknown,
}

impl ItemOutcome {
    /// Maps the wire flag; anything other than a boolean is `Unknown`.
    #[must_use]
    pub fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Self::Success,
            Some(false) => Self::Failure,
            None => Self::Unknown,
        }
    }

    /// Returns the wire flag.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Success => Some(true),
            Self::Failure => Some(false),
            Self::Unknown => None,
        }
    }
}

impl Serialize for ItemOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_flag().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ItemOutcome {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_flag(value.as_bool()))
    }
}

/// Result of the dispatch to one target service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseItem {
    #[serde(deserialize_with = "lenient")]
    transaction_item_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    service: Option<String>,
    success: ItemOutcome,
    #[serde(deserialize_with = "lenient")]
    status_code: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    content_type: Option<String>,
    #[serde(deserialize_with = "lenient")]
    response: Option<String>,
}

impl ResponseItem {
    /// Returns the server-side item identifier.
    #[must_use]
    pub fn transaction_item_id(&self) -> Option<&str> {
        self.transaction_item_id.as_deref()
    }

    /// Returns the target service name.
    #[must_use]
    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    /// Returns the tri-state outcome.
    #[must_use]
    pub fn outcome(&self) -> ItemOutcome {
        self.success
    }

    /// Returns the target's own status code.
    #[must_use]
    pub fn status_code(&self) -> Option<i64> {
        self.status_code
    }

    /// Returns the content type of the target body.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the raw body returned by the target.
    #[must_use]
    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    fn matches_service(&self, name: &str) -> bool {
        self.service
            .as_deref()
            .is_some_and(|service| service.to_lowercase() == name.to_lowercase())
    }
}

/// Decoded result of one dispatch transaction.
///
/// Built only by decoding a server reply. Fields that are missing or carry
/// the wrong JSON type decode as absent instead of failing the whole reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchResponse {
    #[serde(deserialize_with = "lenient")]
    transaction_id: Option<String>,
    #[serde(deserialize_with = "lenient_items")]
    items: Vec<ResponseItem>,
}

impl DispatchResponse {
    /// Decodes a reply body. Non-object bodies yield an empty envelope.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }

        serde_json::from_value(value).unwrap_or_default()
    }

    /// Returns the server-side transaction identifier.
    #[must_use]
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    /// Returns the number of items.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Returns items in server order.
    #[must_use]
    pub fn items(&self) -> &[ResponseItem] {
        self.items.as_slice()
    }

    /// Returns items whose target answered successfully.
    #[must_use]
    pub fn success_items(&self) -> Vec<&ResponseItem> {
        self.items_with_outcome(ItemOutcome::Success)
    }

    /// Returns items whose target answered with a failure.
    #[must_use]
    pub fn failed_items(&self) -> Vec<&ResponseItem> {
        self.items_with_outcome(ItemOutcome::Failure)
    }

    /// Returns items with no answer from their target.
    #[must_use]
    pub fn no_response_items(&self) -> Vec<&ResponseItem> {
        self.items_with_outcome(ItemOutcome::Unknown)
    }

    /// Returns items for one service, compared case-insensitively.
    #[must_use]
    pub fn items_by_service(&self, name: &str) -> Vec<&ResponseItem> {
        self.items
            .iter()
            .filter(|item| item.matches_service(name))
            .collect()
    }

    fn items_with_outcome(&self, outcome: ItemOutcome) -> Vec<&ResponseItem> {
        self.items
            .iter()
            .filter(|item| item.outcome() == outcome)
            .collect()
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<ResponseItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(values) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(values
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect())
}
