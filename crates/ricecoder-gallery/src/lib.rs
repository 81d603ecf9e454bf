//! Gallery block support for ricecoder's rich-content editor.
//!
//! This crate provides the state core behind the gallery block:
//! - Persisted gallery data with per-gallery style tunes
//! - A session upload ledger for files uploaded but not yet saved
//! - View slots with an explicit Empty/Preloading/Populated lifecycle
//! - Upload gateway with a pluggable async uploader (HTTP multipart by default)
//! - Save-time reconciliation of slots and ledger into persisted data
//!
//! Every user action is a [`GalleryCommand`] handled by
//! [`GalleryController::update`], which returns the [`GalleryEffect`]s the host
//! must perform.

pub mod error;
pub mod config;
pub mod models;
pub mod upload;
pub mod slots;
pub mod tunes;
pub mod ledger;
pub mod controller;
pub mod tool;

pub use error::{GalleryError, GalleryResult, UploadError};
pub use config::{EndpointsConfig, GalleryConfig};
pub use models::{GalleryData, ImageRecord, UploadedFile};
pub use upload::{
    AcceptFilter, FileSelection, HttpUploader, UploadGateway, UploadJob, UploadOutcome,
    UploadRequest, UploadResponse, Uploader,
};
pub use slots::{MediaPresentation, Slot, SlotId, SlotRegistry, SlotState, Transition};
pub use tunes::{TuneButton, TuneDefinition, TuneRegistry};
pub use ledger::{LedgerEntry, ReconciliationMiss, UploadLedger};
pub use controller::{
    GalleryCommand, GalleryController, GalleryEffect, GalleryView, Notification,
    NotificationStyle, SlotView, ViewStatus,
};
pub use tool::{BlockTool, ToolContext, ToolboxEntry};
