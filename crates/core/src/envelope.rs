//! The normalized response envelope returned by every gateway route.
//!
//! Browser code only ever sees this shape, whether the backend answered with
//! JSON, an HTML error page, or nothing at all. Absent fields are omitted
//! from the serialized JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message body used for the 401 short-circuit.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// `{ success, data?, error?, message?, details?, isHtmlError?, rawResponse? }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_html_error: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl Envelope {
    /// A successful envelope carrying `data`.
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            ..Self::default()
        }
    }

    /// A failed envelope with an `error` string.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// The fixed `{ success: false, message: "Unauthorized" }` body.
    pub fn unauthorized() -> Self {
        Self {
            success: false,
            message: Some(UNAUTHORIZED_MESSAGE.to_string()),
            ..Self::default()
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
