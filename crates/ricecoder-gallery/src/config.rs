//! Configuration for the gallery block.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GalleryError, GalleryResult};
use crate::tunes::TuneDefinition;

/// Key under which images are persisted; tunes may not shadow it.
pub const RESERVED_DATA_KEY: &str = "images";

/// Gallery block configuration.
///
/// Keys are snake_case; the camelCase spellings used by editor hosts are
/// accepted as aliases so a host's JSON tool config deserializes directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Upload targets
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// Extra form fields sent with every upload
    #[serde(default, alias = "additionalRequestData")]
    pub additional_request_data: BTreeMap<String, String>,

    /// Extra headers sent with every upload
    #[serde(default, alias = "additionalRequestHeaders")]
    pub additional_request_headers: BTreeMap<String, String>,

    /// Form field name for the uploaded file
    #[serde(default = "default_field")]
    pub field: String,

    /// Accept filter for file selection (e.g. "image/*")
    #[serde(default = "default_types")]
    pub types: String,

    /// Placeholder shown in empty caption inputs
    #[serde(default = "default_caption_placeholder", alias = "captionPlaceholder")]
    pub caption_placeholder: String,

    /// Markup for the trailing add button
    #[serde(default = "default_button_content", alias = "buttonContent")]
    pub button_content: String,

    /// Tunes offered in the block settings
    #[serde(default)]
    pub actions: Vec<TuneDefinition>,

    /// Upload request timeout
    #[serde(default = "default_upload_timeout", alias = "uploadTimeout")]
    pub upload_timeout: Duration,
}

/// Upload endpoint configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Endpoint receiving multipart file uploads
    #[serde(default, alias = "byFile")]
    pub by_file: Option<String>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointsConfig::default(),
            additional_request_data: BTreeMap::new(),
            additional_request_headers: BTreeMap::new(),
            field: default_field(),
            types: default_types(),
            caption_placeholder: default_caption_placeholder(),
            button_content: default_button_content(),
            actions: Vec::new(),
            upload_timeout: default_upload_timeout(),
        }
    }
}

impl GalleryConfig {
    /// Create a new gallery config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// Configuration loaded from file, or default if file doesn't exist
    pub fn from_file(path: &Path) -> GalleryResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with hierarchy support.
    ///
    /// Configuration hierarchy (highest to lowest priority):
    /// 1. Project-level config (config/gallery.yaml)
    /// 2. User-level config (~/.ricecoder/config/gallery.yaml)
    /// 3. Built-in defaults
    pub fn load_with_hierarchy() -> GalleryResult<Self> {
        let mut config = Self::default();

        if let Ok(user_home) = std::env::var("HOME") {
            let user_config_path = PathBuf::from(user_home)
                .join(".ricecoder")
                .join("config")
                .join("gallery.yaml");
            config = Self::layer(config, &user_config_path);
        }

        let project_config_path = PathBuf::from("config/gallery.yaml");
        config = Self::layer(config, &project_config_path);

        Ok(config)
    }

    /// Merge the file at `path` over `base`. A file that fails to load or
    /// validate is skipped with a warning.
    fn layer(base: Self, path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(loaded) => Self::merge(base, loaded),
            Err(e) => {
                warn!("Ignoring gallery config {}: {}", path.display(), e);
                base
            }
        }
    }

    /// Merge two configurations, with `override_config` taking precedence.
    ///
    /// Fields still at their built-in default in `override_config` keep the
    /// base value.
    fn merge(mut base: Self, override_config: Self) -> Self {
        if override_config.endpoints.by_file.is_some() {
            base.endpoints = override_config.endpoints;
        }
        base.additional_request_data
            .extend(override_config.additional_request_data);
        base.additional_request_headers
            .extend(override_config.additional_request_headers);
        if override_config.field != default_field() {
            base.field = override_config.field;
        }
        if override_config.types != default_types() {
            base.types = override_config.types;
        }
        if override_config.caption_placeholder != default_caption_placeholder() {
            base.caption_placeholder = override_config.caption_placeholder;
        }
        if override_config.button_content != default_button_content() {
            base.button_content = override_config.button_content;
        }
        if !override_config.actions.is_empty() {
            base.actions = override_config.actions;
        }
        if override_config.upload_timeout != default_upload_timeout() {
            base.upload_timeout = override_config.upload_timeout;
        }

        base
    }

    /// Check the tune set and upload settings for consistency.
    pub fn validate(&self) -> GalleryResult<()> {
        let mut seen = HashSet::new();
        for action in &self.actions {
            if action.name.trim().is_empty() {
                return Err(GalleryError::ConfigError(
                    "Tune name must not be empty".to_string(),
                ));
            }
            if action.name == RESERVED_DATA_KEY {
                return Err(GalleryError::ConfigError(format!(
                    "Tune name '{}' is reserved",
                    RESERVED_DATA_KEY
                )));
            }
            if !seen.insert(action.name.as_str()) {
                return Err(GalleryError::ConfigError(format!(
                    "Duplicate tune name: {}",
                    action.name
                )));
            }
        }

        if self.field.trim().is_empty() {
            return Err(GalleryError::ConfigError(
                "Upload field name must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Names of the configured tunes, in configuration order.
    pub fn tune_names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name.as_str()).collect()
    }

    /// Set the file upload endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoints.by_file = Some(endpoint.into());
        self
    }

    /// Set the accept filter
    pub fn with_types(mut self, types: impl Into<String>) -> Self {
        self.types = types.into();
        self
    }

    /// Set the upload form field name
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Add an upload header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_request_headers
            .insert(name.into(), value.into());
        self
    }

    /// Add an extra upload form field
    pub fn with_request_data(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_request_data.insert(name.into(), value.into());
        self
    }

    /// Add a tune
    pub fn with_action(mut self, action: TuneDefinition) -> Self {
        self.actions.push(action);
        self
    }
}

// Default value functions for serde
fn default_field() -> String {
    "image".to_string()
}

fn default_types() -> String {
    "image/*".to_string()
}

fn default_caption_placeholder() -> String {
    "Caption...".to_string()
}

fn default_button_content() -> String {
    "Add Image".to_string()
}

fn default_upload_timeout() -> Duration {
    Duration::from_secs(30)
}
