//! Status-tagged response envelope and opaque error buckets

use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Discriminator value the server uses for a successful call
pub const STATUS_SUCCESS: &str = "success";

/// Opaque field -> message map returned by the server for a failed call.
///
/// Displayed as-is. A bare string error is normalized to `{"message": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct ErrorBucket(IndexMap<String, Value>);

impl ErrorBucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_message(message: impl Into<String>) -> Self {
        let mut fields = IndexMap::new();
        fields.insert("message".to_string(), Value::String(message.into()));
        Self(fields)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The single display message, if the bucket carries one.
    ///
    /// Borrow and return failures use `Message`; everything else uses `message`.
    pub fn message(&self) -> Option<&str> {
        self.0
            .get("Message")
            .or_else(|| self.0.get("message"))
            .and_then(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Value> for ErrorBucket {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map.into_iter().collect()),
            Value::Null => Self::default(),
            Value::String(s) => Self::from_message(s),
            other => Self::from_message(other.to_string()),
        }
    }
}

impl std::fmt::Display for ErrorBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, value) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            match value {
                Value::String(s) => write!(f, "{}: {}", field, s)?,
                other => write!(f, "{}: {}", field, other)?,
            }
        }
        Ok(())
    }
}

/// A single response from the remote API, tagged by its `status` field.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply<T> {
    Success(T),
    Failure(ErrorBucket),
}

impl<T> ApiReply<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiReply::Success(_))
    }
}

impl<T: DeserializeOwned> ApiReply<T> {
    /// Decode a raw JSON body. Only the `status` field decides the variant;
    /// HTTP status codes are not consulted.
    pub fn from_value(mut value: Value) -> Result<Self, serde_json::Error> {
        let success = value.get("status").and_then(Value::as_str) == Some(STATUS_SUCCESS);
        if success {
            return T::deserialize(value).map(ApiReply::Success);
        }

        let error = value
            .as_object_mut()
            .and_then(|body| body.remove("error"))
            .unwrap_or(Value::Null);
        Ok(ApiReply::Failure(ErrorBucket::from(error)))
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ApiReply<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// Payload of calls that only report success
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Ack {}
