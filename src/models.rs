use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A hero as stored and served by the API
///
/// Missing fields decode as empty strings so that `{}` is well-formed JSON
/// but still fails [`Hero::is_valid`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct Hero {
    #[schema(example = "1")]
    pub id: String,
    #[schema(example = "Batman")]
    pub name: String,
}

impl Hero {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Decode a request body, which must be a JSON object
    ///
    /// The derived `Deserialize` would also take `["1","Batman"]` as a hero.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        match serde_json::from_slice::<JsonValue>(bytes)? {
            value @ JsonValue::Object(_) => serde_json::from_value(value),
            _ => Err(serde::de::Error::custom("hero must be a JSON object")),
        }
    }

    /// Both fields must be non-empty before a hero may be written
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty() && !self.name.is_empty()
    }
}

/// Response type for the status endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct StatusResponse {
    /// Liveness token reported by the backend
    pub redis: String,
}

/// Error envelope returned for rejected requests
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorMessage {
    pub message: String,
}
