//! Upload gateway: file selection, accept filtering and the async uploader.
//!
//! The gateway turns a user selection into an [`UploadOutcome`]. The preview
//! for the selection is available synchronously via
//! [`FileSelection::preview_source`]; the network part goes through an
//! [`Uploader`], which defaults to [`HttpUploader`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::GalleryConfig;
use crate::error::{GalleryError, GalleryResult, UploadError};
use crate::models::UploadedFile;
use crate::slots::SlotId;

/// A file chosen by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub name: String,
    /// Declared MIME type; guessed from `name` when absent
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for FileSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSelection")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl FileSelection {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Read a selection from disk.
    pub async fn read(path: &Path) -> GalleryResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, bytes))
    }

    /// Declared MIME type, or the one guessed from the file name.
    pub fn mime(&self) -> String {
        match &self.mime_type {
            Some(mime) => mime.clone(),
            None => mime_guess::from_path(&self.name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        }
    }

    /// Lowercased extension of the file name, without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }

    /// Local preview shown while the upload is in flight, as a `data:` URL.
    pub fn preview_source(&self) -> String {
        format!("data:{};base64,{}", self.mime(), STANDARD.encode(&self.bytes))
    }
}

/// Parsed accept filter, e.g. `"image/*, video/mp4, .gif"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptFilter {
    raw: String,
    rules: Vec<AcceptRule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AcceptRule {
    AnyOfType(String),
    Mime(String),
    Extension(String),
}

impl AcceptFilter {
    pub fn parse(raw: &str) -> Self {
        let rules = raw
            .split(',')
            .map(|token| token.trim().to_ascii_lowercase())
            .filter(|token| !token.is_empty())
            .map(|token| {
                if let Some(ext) = token.strip_prefix('.') {
                    AcceptRule::Extension(ext.to_string())
                } else if let Some(top) = token.strip_suffix("/*") {
                    AcceptRule::AnyOfType(top.to_string())
                } else {
                    AcceptRule::Mime(token)
                }
            })
            .collect();

        Self {
            raw: raw.to_string(),
            rules,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// An empty filter accepts everything.
    pub fn accepts(&self, selection: &FileSelection) -> bool {
        if self.rules.is_empty() {
            return true;
        }

        let mime = selection.mime().to_ascii_lowercase();
        let top_level = mime.split('/').next().unwrap_or_default();
        let extension = selection.extension();

        self.rules.iter().any(|rule| match rule {
            AcceptRule::AnyOfType(top) => top == "*" || top == top_level,
            AcceptRule::Mime(exact) => *exact == mime,
            AcceptRule::Extension(ext) => extension.as_deref() == Some(ext.as_str()),
        })
    }

    /// Check a selection, producing the upload error on mismatch.
    pub fn check(&self, selection: &FileSelection) -> Result<(), UploadError> {
        if self.accepts(selection) {
            Ok(())
        } else {
            Err(UploadError::NotAccepted {
                mime: selection.mime(),
                accept: self.raw.clone(),
            })
        }
    }
}

/// Where and how to send a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub endpoint: Option<String>,
    pub field: String,
    pub headers: BTreeMap<String, String>,
    pub extra_fields: BTreeMap<String, String>,
}

impl UploadRequest {
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            endpoint: config.endpoints.by_file.clone(),
            field: config.field.clone(),
            headers: config.additional_request_headers.clone(),
            extra_fields: config.additional_request_data.clone(),
        }
    }
}

/// Upload endpoint reply: `{success, file?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: Option<bool>,
    pub file: Option<UploadedFile>,
}

impl UploadResponse {
    /// Interpret a raw JSON reply.
    ///
    /// `success: false` is a rejection; a missing flag, a missing file or an
    /// empty URL is a malformed response.
    pub fn interpret(body: &Value) -> Result<UploadedFile, UploadError> {
        let response: UploadResponse = serde_json::from_value(body.clone())
            .map_err(|_| UploadError::MalformedResponse(body.to_string()))?;

        match response {
            UploadResponse {
                success: Some(true),
                file: Some(file),
            } if !file.url.is_empty() => Ok(file),
            UploadResponse {
                success: Some(false),
                ..
            } => Err(UploadError::Rejected),
            _ => Err(UploadError::MalformedResponse(body.to_string())),
        }
    }
}

/// Async upload backend.
///
/// Implementations resolve exactly once per call.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Upload a selected file
    async fn upload_by_file(
        &self,
        selection: &FileSelection,
        request: &UploadRequest,
    ) -> Result<UploadedFile, UploadError>;
}

/// Multipart HTTP uploader.
pub struct HttpUploader {
    client: reqwest::Client,
}

impl HttpUploader {
    pub fn new(timeout: Duration) -> GalleryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("RiceCoder/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GalleryError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn from_config(config: &GalleryConfig) -> GalleryResult<Self> {
        Self::new(config.upload_timeout)
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn upload_by_file(
        &self,
        selection: &FileSelection,
        request: &UploadRequest,
    ) -> Result<UploadedFile, UploadError> {
        let endpoint = request.endpoint.as_deref().ok_or(UploadError::NoEndpoint)?;
        let endpoint = endpoint
            .parse::<url::Url>()
            .map_err(|e| UploadError::InvalidEndpoint(e.to_string()))?;

        let part = reqwest::multipart::Part::bytes(selection.bytes.clone())
            .file_name(selection.name.clone())
            .mime_str(&selection.mime())
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let mut form = reqwest::multipart::Form::new().part(request.field.clone(), part);
        for (name, value) in &request.extra_fields {
            form = form.text(name.clone(), value.clone());
        }

        let mut builder = self.client.post(endpoint.clone()).multipart(form);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        debug!("HTTP POST upload {} to {}", selection.name, endpoint);
        let response = builder
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Status {
                status: status.as_u16(),
                body: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string()),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;
        UploadResponse::interpret(&body)
    }
}

/// A selection waiting to be uploaded into a specific slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    pub slot: SlotId,
    pub selection: FileSelection,
}

/// Resolution of an [`UploadJob`].
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub slot: SlotId,
    pub result: Result<UploadedFile, UploadError>,
}

/// Accept filter, request settings and uploader in one cloneable handle.
#[derive(Clone)]
pub struct UploadGateway {
    uploader: Arc<dyn Uploader>,
    request: UploadRequest,
    accept: AcceptFilter,
}

impl fmt::Debug for UploadGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadGateway")
            .field("request", &self.request)
            .field("accept", &self.accept)
            .finish_non_exhaustive()
    }
}

impl UploadGateway {
    pub fn new(uploader: Arc<dyn Uploader>, config: &GalleryConfig) -> Self {
        Self {
            uploader,
            request: UploadRequest::from_config(config),
            accept: AcceptFilter::parse(&config.types),
        }
    }

    pub fn accept(&self) -> &AcceptFilter {
        &self.accept
    }

    pub(crate) fn set_uploader(&mut self, uploader: Arc<dyn Uploader>) {
        self.uploader = uploader;
    }

    /// Run the upload for `job`. Consumes the job, so each selection
    /// resolves once.
    pub async fn upload(&self, job: UploadJob) -> UploadOutcome {
        let result = match self.accept.check(&job.selection) {
            Ok(()) => {
                self.uploader
                    .upload_by_file(&job.selection, &self.request)
                    .await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            warn!("Upload for slot {} failed: {}", job.slot, e);
        }

        UploadOutcome {
            slot: job.slot,
            result,
        }
    }
}
