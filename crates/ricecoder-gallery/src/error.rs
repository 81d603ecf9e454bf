//! Error types for gallery operations.

use thiserror::Error;

use crate::slots::SlotId;

/// Result type for gallery operations.
pub type GalleryResult<T> = Result<T, GalleryError>;

/// Errors that can occur while driving the gallery state core.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// Tune name is not part of the configured tune set.
    #[error("Unknown tune: {0}")]
    UnknownTune(String),

    /// Slot id does not refer to a slot in the registry.
    #[error("Unknown slot: {0}")]
    UnknownSlot(SlotId),

    /// Requested lifecycle change is not allowed from the slot's current state.
    #[error("Invalid transition for slot {slot}: {from} -> {to}")]
    InvalidTransition {
        slot: SlotId,
        from: &'static str,
        to: &'static str,
    },

    /// Slot fields can only be edited once the slot is populated.
    #[error("Slot {0} is not editable in its current state")]
    NotEditable(SlotId),

    /// Mutating command issued while the block is read-only.
    #[error("Gallery is read-only")]
    ReadOnly,

    /// Upload could not be started or completed.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Reasons an upload fails.
///
/// None of these are retried; the controller surfaces them as a notification
/// and leaves the originating slot in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// Selected file does not match the configured accept filter.
    #[error("File type not accepted: {mime} (accepted: {accept})")]
    NotAccepted { mime: String, accept: String },

    /// No upload endpoint is configured.
    #[error("No upload endpoint configured")]
    NoEndpoint,

    /// Endpoint is not a valid URL.
    #[error("Invalid upload endpoint: {0}")]
    InvalidEndpoint(String),

    /// Request could not be sent or the body could not be read.
    #[error("Upload request failed: {0}")]
    Transport(String),

    /// Endpoint answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Endpoint answered `success: false`.
    #[error("Upload rejected by server")]
    Rejected,

    /// Endpoint answered without a usable file descriptor.
    #[error("incorrect response: {0}")]
    MalformedResponse(String),
}

impl From<serde_yaml::Error> for GalleryError {
    fn from(err: serde_yaml::Error) -> Self {
        GalleryError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for GalleryError {
    fn from(err: serde_json::Error) -> Self {
        GalleryError::SerializationError(err.to_string())
    }
}
