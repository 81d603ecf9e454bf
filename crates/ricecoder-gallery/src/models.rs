//! Persisted data shapes: gallery data, image records and upload descriptors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GalleryResult;

/// Upload descriptor returned by the backend.
///
/// Only `url` is required; any other backend fields are kept verbatim so
/// they survive a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Public URL of the uploaded file
    pub url: String,
    /// Backend-specific metadata (name, size, dimensions, ...)
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl UploadedFile {
    /// Create a descriptor with no extra metadata.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            metadata: Map::new(),
        }
    }

    /// Attach a metadata field.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// One image in the persisted gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub file: UploadedFile,
    #[serde(default)]
    pub caption: Option<String>,
}

impl ImageRecord {
    pub fn new(file: UploadedFile, caption: Option<String>) -> Self {
        Self { file, caption }
    }
}

/// Persisted gallery block data.
///
/// Serializes as `{"images": [...], "<tune>": bool, ...}`. On load, tune
/// values may be booleans or the strings `"true"`/`"false"`; anything else
/// is dropped. A missing or `null` image list loads as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGalleryData")]
pub struct GalleryData {
    pub images: Vec<ImageRecord>,
    #[serde(flatten)]
    pub tunes: BTreeMap<String, bool>,
}

#[derive(Deserialize)]
struct RawGalleryData {
    #[serde(default)]
    images: Option<Vec<ImageRecord>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawGalleryData> for GalleryData {
    fn from(raw: RawGalleryData) -> Self {
        let tunes = raw
            .extra
            .into_iter()
            .filter_map(|(key, value)| tune_value(&value).map(|flag| (key, flag)))
            .collect();

        Self {
            images: raw.images.unwrap_or_default(),
            tunes,
        }
    }
}

fn tune_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(s) if s == "true" => Some(true),
        Value::String(s) if s == "false" => Some(false),
        _ => None,
    }
}

impl GalleryData {
    /// Create gallery data from a list of images and no tunes.
    pub fn new(images: Vec<ImageRecord>) -> Self {
        Self {
            images,
            tunes: BTreeMap::new(),
        }
    }

    /// Parse gallery data from the host's JSON.
    pub fn from_json(json: &str) -> GalleryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize gallery data to JSON.
    pub fn to_json(&self) -> GalleryResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Stored value for a tune, if present.
    pub fn tune(&self, name: &str) -> Option<bool> {
        self.tunes.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
