//! Upload failure.

use std::fmt;

use thiserror::Error;

/// Method every upload is sent with.
pub const UPLOAD_METHOD: &str = "post";

/// A failed upload, as reported to the upload view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UploadError {
    /// Human-readable reason.
    pub message: String,
    /// HTTP status, or `0` when no response arrived.
    pub status: u16,
    /// Always [`UPLOAD_METHOD`].
    pub method: &'static str,
    /// Endpoint the upload was posted to.
    pub url: String,
}

impl UploadError {
    /// Error for a response outside the 2xx range.
    ///
    /// A JSON body with an `error` field contributes that field; any other
    /// non-empty body is used as-is. Empty bodies fall back to a generic
    /// message naming the endpoint and status.
    #[must_use]
    pub fn from_response(url: &str, status: u16, body: &str) -> Self {
        let message = if body.is_empty() {
            format!("fail to post {url} {status}")
        } else {
            error_field(body).unwrap_or_else(|| body.to_string())
        };
        Self {
            message,
            status,
            method: UPLOAD_METHOD,
            url: url.to_string(),
        }
    }

    /// Error for a request that never got a response.
    #[must_use]
    pub fn network(url: &str, reason: &dyn fmt::Display) -> Self {
        Self {
            message: reason.to_string(),
            status: 0,
            method: UPLOAD_METHOD,
            url: url.to_string(),
        }
    }

    /// Whether the server answered at all.
    #[must_use]
    pub fn has_response(&self) -> bool {
        self.status != 0
    }
}

fn error_field(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        serde_json::Value::Null | serde_json::Value::Bool(false) => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.test/upload";

    #[test]
    fn test_empty_body_uses_generic_message() {
        let err = UploadError::from_response(URL, 500, "");
        assert_eq!(err.message, "fail to post https://example.test/upload 500");
        assert_eq!(err.status, 500);
        assert_eq!(err.method, "post");
        assert_eq!(err.url, URL);
        assert_eq!(err.to_string(), err.message);
    }

    #[test]
    fn test_error_field_preferred() {
        let err = UploadError::from_response(URL, 413, r#"{"error":"file too large"}"#);
        assert_eq!(err.message, "file too large");
    }

    #[test]
    fn test_body_without_error_field_used_verbatim() {
        let err = UploadError::from_response(URL, 400, r#"{"code":7}"#);
        assert_eq!(err.message, r#"{"code":7}"#);

        let err = UploadError::from_response(URL, 502, "Bad Gateway");
        assert_eq!(err.message, "Bad Gateway");

        let err = UploadError::from_response(URL, 400, r#"{"error":""}"#);
        assert_eq!(err.message, r#"{"error":""}"#);
    }

    #[test]
    fn test_network_error_has_no_status() {
        let err = UploadError::network(URL, &"connection refused");
        assert_eq!(err.status, 0);
        assert!(!err.has_response());
        assert_eq!(err.message, "connection refused");
    }
}
