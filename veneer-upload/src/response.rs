//! Response interpretation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::UploadError;

/// Body of a successful upload response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadBody {
    /// The body parsed as JSON.
    Json(Value),
    /// The body was not JSON.
    Text(String),
    /// The response had no body.
    Empty,
}

/// Parse a response body: JSON when it parses, raw text otherwise.
#[must_use]
pub fn parse_body(text: &str) -> UploadBody {
    if text.is_empty() {
        return UploadBody::Empty;
    }
    serde_json::from_str(text).map_or_else(|_| UploadBody::Text(text.to_string()), UploadBody::Json)
}

/// Turn a status and body into the upload outcome.
///
/// # Errors
///
/// Returns an [`UploadError`] for any status outside `200..=299`.
pub fn interpret(url: &str, status: u16, body: &str) -> Result<UploadBody, UploadError> {
    if (200..300).contains(&status) {
        Ok(parse_body(body))
    } else {
        Err(UploadError::from_response(url, status, body))
    }
}
