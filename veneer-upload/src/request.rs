//! Upload request and progress types.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use url::Url;

/// Channel progress updates are sent on.
pub type ProgressSender = UnboundedSender<UploadProgress>;

/// The file being uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name sent in the part's `Content-Disposition`.
    pub name: String,
    /// File contents.
    pub bytes: Vec<u8>,
    /// MIME type of the part, if known.
    pub mime: Option<String>,
}

impl UploadFile {
    /// A file with no declared MIME type.
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            mime: None,
        }
    }

    /// Declare the MIME type.
    #[must_use]
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// One multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Endpoint the form is posted to.
    pub endpoint: Url,
    /// Extra form fields, sent before the file in this order.
    pub form_fields: Vec<(String, String)>,
    /// Form field name of the file part.
    pub file_field_name: String,
    /// The file.
    pub file: UploadFile,
    /// Request headers. Entries without a value are skipped.
    pub headers: Vec<(String, Option<String>)>,
    /// Send credentials with cross-origin requests. Only meaningful in
    /// browsers; native clients send whatever their client is configured with.
    pub with_credentials: bool,
}

impl UploadRequest {
    /// Upload `file` to `endpoint` under the conventional `file` field.
    #[must_use]
    pub fn new(endpoint: Url, file: UploadFile) -> Self {
        Self {
            endpoint,
            form_fields: Vec::new(),
            file_field_name: "file".to_string(),
            file,
            headers: Vec::new(),
            with_credentials: false,
        }
    }

    /// Add a form field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form_fields.push((name.into(), value.into()));
        self
    }

    /// Set the file part's field name.
    #[must_use]
    pub fn with_file_field_name(mut self, name: impl Into<String>) -> Self {
        self.file_field_name = name.into();
        self
    }

    /// Add a header. `None` values are skipped when the request is sent.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: Option<String>) -> Self {
        self.headers.push((name.into(), value));
        self
    }

    /// Set whether credentials accompany the request.
    #[must_use]
    pub fn with_credentials(mut self, with_credentials: bool) -> Self {
        self.with_credentials = with_credentials;
        self
    }

    /// Headers that are actually sent.
    pub fn effective_headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (name.as_str(), v)))
    }
}

/// Bytes of the file handed to the connection so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UploadProgress {
    /// Bytes sent.
    pub loaded: u64,
    /// Total bytes to send.
    pub total: u64,
    /// `loaded / total * 100`, absent when the total is unknown.
    pub percent: Option<f64>,
}

impl UploadProgress {
    /// Progress with the percentage derived from `loaded` and `total`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(loaded: u64, total: u64) -> Self {
        let percent = (total > 0).then(|| loaded as f64 / total as f64 * 100.0);
        Self {
            loaded,
            total,
            percent,
        }
    }
}
