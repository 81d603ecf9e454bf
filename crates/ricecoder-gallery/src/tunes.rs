//! Gallery-wide style tunes.
//!
//! A tune is a named boolean flag applied to the gallery container as a
//! `gallery-list--<name>` class. The registry only tracks what is visually
//! applied; the controller owns the persisted value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::controller::GalleryCommand;
use crate::error::{GalleryError, GalleryResult};

/// Container class that tune classes are derived from.
pub const LIST_CLASS: &str = "gallery-list";

/// A configured tune.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuneDefinition {
    /// Key under which the flag is persisted
    pub name: String,
    /// Icon markup for the settings button
    #[serde(default)]
    pub icon: String,
    /// Human-readable label
    #[serde(default)]
    pub title: String,
}

impl TuneDefinition {
    pub fn new(name: impl Into<String>, icon: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            title: title.into(),
        }
    }

    /// Container class toggled by this tune.
    pub fn class_name(&self) -> String {
        tune_class(&self.name)
    }
}

/// Settings button for one tune.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuneButton {
    pub name: String,
    pub icon: String,
    pub title: String,
    pub active: bool,
}

impl TuneButton {
    /// Command emitted when the user clicks this button.
    pub fn activate(&self) -> GalleryCommand {
        GalleryCommand::ToggleTune(self.name.clone())
    }
}

/// Fixed set of tunes and their applied visual state.
#[derive(Debug, Clone, Default)]
pub struct TuneRegistry {
    definitions: Vec<TuneDefinition>,
    applied: BTreeMap<String, bool>,
}

impl TuneRegistry {
    /// Build the registry from the configured definitions. Every tune starts
    /// unapplied.
    pub fn configure(definitions: Vec<TuneDefinition>) -> Self {
        let applied = definitions
            .iter()
            .map(|d| (d.name.clone(), false))
            .collect();
        Self {
            definitions,
            applied,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.applied.contains_key(name)
    }

    /// Apply or clear the container class for `name`.
    pub fn set_state(&mut self, name: &str, value: bool) -> GalleryResult<()> {
        match self.applied.get_mut(name) {
            Some(flag) => {
                *flag = value;
                Ok(())
            }
            None => Err(GalleryError::UnknownTune(name.to_string())),
        }
    }

    pub fn is_applied(&self, name: &str) -> bool {
        self.applied.get(name).copied().unwrap_or(false)
    }

    /// Classes currently applied to the gallery container, in configuration
    /// order.
    pub fn container_classes(&self) -> Vec<String> {
        self.definitions
            .iter()
            .filter(|d| self.is_applied(&d.name))
            .map(TuneDefinition::class_name)
            .collect()
    }

    /// One settings button per tune, in configuration order.
    pub fn render_settings(&self) -> Vec<TuneButton> {
        self.definitions
            .iter()
            .map(|d| TuneButton {
                name: d.name.clone(),
                icon: d.icon.clone(),
                title: d.title.clone(),
                active: self.is_applied(&d.name),
            })
            .collect()
    }
}

fn tune_class(name: &str) -> String {
    format!("{}--{}", LIST_CLASS, name)
}
