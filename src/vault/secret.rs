use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Error parsing JSON response: no {0} found")]
    MissingField(String),
    #[error("Error parsing JSON response: {field} is not a {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
    #[error("Error parsing JSON response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The envelope Vault wraps every secret read in.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secret {
    #[serde(default)]
    pub lease_id: String,
    #[serde(default)]
    pub lease_duration: u64,
    #[serde(default)]
    pub renewable: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Map<String, Value>,
}

// Vault sends `"data": null` on some reads
fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Secret {
    /// # Errors
    /// Returns an error if the body is not a JSON object shaped like a secret.
    pub fn from_value(value: Value) -> Result<Self, SecretError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch a required string from `data`.
    ///
    /// # Errors
    /// Returns `MissingField` if absent and `WrongType` if not a string.
    pub fn require_str(&self, field: &str) -> Result<&str, SecretError> {
        as_str(self.data.get(field), field)
    }

    /// Fetch a required string from an object nested in `data`, such as
    /// `connection_details.connection_url`.
    ///
    /// # Errors
    /// Returns `MissingField` if either key is absent and `WrongType` if the
    /// outer value is not an object or the inner value not a string.
    pub fn require_nested_str(&self, outer: &str, inner: &str) -> Result<&str, SecretError> {
        let object = self
            .data
            .get(outer)
            .ok_or_else(|| SecretError::MissingField(outer.to_string()))?
            .as_object()
            .ok_or_else(|| SecretError::WrongType {
                field: outer.to_string(),
                expected: "object",
            })?;

        as_str(object.get(inner), &format!("{outer}.{inner}"))
    }
}

fn as_str<'a>(value: Option<&'a Value>, field: &str) -> Result<&'a str, SecretError> {
    value
        .ok_or_else(|| SecretError::MissingField(field.to_string()))?
        .as_str()
        .ok_or_else(|| SecretError::WrongType {
            field: field.to_string(),
            expected: "string",
        })
}
