use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error code the backend uses when an enum field carries an unknown value.
pub const INVALID_ENUM_VALUE: &str = "INVALID_ENUM_VALUE";

/// Error body returned by the person and demography services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Map<String, Value>>,
}

impl ServiceErrorBody {
    /// First field error as `field: message`, in the order the server sent it.
    pub fn first_field_error(&self) -> Option<String> {
        let (field, detail) = self.errors.as_ref()?.iter().next()?;
        let detail = match detail {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        Some(format!("{field}: {detail}"))
    }

    pub fn is_invalid_enum(&self) -> bool {
        self.error.as_deref() == Some(INVALID_ENUM_VALUE)
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|message| !message.is_empty())
    }
}
