//! HTTP upload transport.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use tracing::{debug, info, warn};

use crate::{interpret, ProgressSender, UploadBody, UploadError, UploadProgress, UploadRequest};

/// Size of the file chunks progress is reported for.
const CHUNK_SIZE: usize = 64 * 1024;

/// Sends one upload and reports its outcome.
///
/// Implementations make exactly one attempt; the caller decides whether to
/// try again.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Post `request`, sending progress updates on `progress` if given.
    ///
    /// # Errors
    ///
    /// Returns an [`UploadError`] for non-2xx responses and for requests that
    /// got no response at all (status `0`).
    async fn upload(
        &self,
        request: UploadRequest,
        progress: Option<ProgressSender>,
    ) -> Result<UploadBody, UploadError>;
}

/// [`Transport`] over a `reqwest` client.
#[derive(Debug, Clone)]
pub struct UploadClient {
    http: Client,
}

impl UploadClient {
    /// Create a client with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new() -> reqwest::Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("veneer-upload/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// Reuse an existing client.
    #[must_use]
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    fn form(request: UploadRequest, progress: Option<ProgressSender>) -> Result<Form, UploadError> {
        let url = request.endpoint.to_string();
        let total = request.file.bytes.len() as u64;
        let body = Body::wrap_stream(chunked(request.file.bytes, progress));

        let mut part = Part::stream_with_length(body, total).file_name(request.file.name);
        if let Some(mime) = &request.file.mime {
            part = part
                .mime_str(mime)
                .map_err(|e| UploadError::network(&url, &e))?;
        }

        let form = request
            .form_fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        Ok(form.part(request.file_field_name, part))
    }
}

#[async_trait]
impl Transport for UploadClient {
    async fn upload(
        &self,
        request: UploadRequest,
        progress: Option<ProgressSender>,
    ) -> Result<UploadBody, UploadError> {
        let url = request.endpoint.to_string();
        if request.with_credentials {
            debug!(%url, "Credentials requested; native client sends its configured defaults");
        }

        let mut builder = self.http.post(request.endpoint.clone());
        for (name, value) in request.effective_headers() {
            builder = builder.header(name, value);
        }
        let form = Self::form(request, progress)?;

        let response = builder.multipart(form).send().await.map_err(|e| {
            warn!(%url, "Upload request failed: {e}");
            UploadError::network(&url, &e)
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| UploadError::network(&url, &e))?;

        let outcome = interpret(&url, status, &text);
        match &outcome {
            Ok(_) => info!(%url, status, "Upload finished"),
            Err(e) => info!(%url, status, "Upload rejected: {e}"),
        }
        outcome
    }
}

/// Stream `bytes` in chunks, reporting progress as each chunk is taken.
fn chunked(
    bytes: Vec<u8>,
    progress: Option<ProgressSender>,
) -> impl futures::Stream<Item = Result<Vec<u8>, std::io::Error>> + Send + 'static {
    let total = bytes.len() as u64;
    let chunks: Vec<Vec<u8>> = bytes.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
    let mut loaded = 0_u64;

    futures::stream::iter(chunks.into_iter().map(move |chunk| {
        loaded += chunk.len() as u64;
        if let Some(tx) = &progress {
            // The receiver may have stopped listening; the upload goes on.
            let _ = tx.send(UploadProgress::new(loaded, total));
        }
        Ok(chunk)
    }))
}
