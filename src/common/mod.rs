pub mod config;

use serde::{Deserialize, Serialize};

/// Error codes the server puts into the `error` member of a failed API call.
pub const ERROR_INVALID_VALUE: &str = "value:invalid";
pub const ERROR_PERMISSION: &str = "permission:forbidden";
pub const ERROR_INTERNAL: &str = "server:internal_error";

/// Flat, ordered list of form fields. Repeated names are kept, like a
/// serialized html form.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Fields(Vec<(String, String)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// First value submitted under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Body of a POST request, either structured fields or a form that was
/// already url-encoded by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    Fields(Fields),
    Encoded(String),
}

impl Payload {
    /// Encode any serializable form struct, e.g. `CreateCommentParams`.
    pub fn from_form<T: Serialize>(form: &T) -> Result<Self, serde_urlencoded::ser::Error> {
        Ok(Payload::Encoded(serde_urlencoded::to_string(form)?))
    }

    pub fn encode(&self) -> Result<String, serde_urlencoded::ser::Error> {
        match self {
            Payload::Fields(fields) => serde_urlencoded::to_string(fields),
            Payload::Encoded(encoded) => Ok(encoded.clone()),
        }
    }
}

impl From<Fields> for Payload {
    fn from(value: Fields) -> Self {
        Payload::Fields(value)
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Encoded(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Encoded(value.to_string())
    }
}

/// Failure envelope returned by the API: `{"error": .., "data": .., "message": ..}`.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    InvalidValue,
    PermissionDenied,
    Internal,
    Other(String),
}

impl ApiErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn kind(&self) -> ApiErrorKind {
        match self.error.as_str() {
            ERROR_INVALID_VALUE => ApiErrorKind::InvalidValue,
            ERROR_PERMISSION => ApiErrorKind::PermissionDenied,
            ERROR_INTERNAL => ApiErrorKind::Internal,
            other => ApiErrorKind::Other(other.to_string()),
        }
    }

    /// Human readable text, preferring `message` over the `error` code.
    pub fn display_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .or(Some(self.error.as_str()).filter(|e| !e.is_empty()))
    }

    /// Name of the offending form field, if the server reported one.
    pub fn field(&self) -> Option<&str> {
        self.data.as_deref().filter(|d| !d.is_empty())
    }
}

/// Successful API response. Callers in this crate only care that it arrived.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Ack(pub serde_json::Value);
