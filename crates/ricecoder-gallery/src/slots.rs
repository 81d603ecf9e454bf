//! View slot registry: one visual unit per gallery image.
//!
//! Each slot owns an independent lifecycle (`Empty` -> `Preloading` ->
//! `Populated`) and the two user-editable text fields (URL and caption).
//! Lifecycle only changes through [`SlotRegistry::set_lifecycle`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{GalleryError, GalleryResult};

/// Stable identifier for a view slot.
///
/// Generated per slot and carried by the matching ledger entry, so the save
/// join never depends on user-editable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(Uuid);

impl SlotId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SlotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotState {
    /// Nothing selected yet
    Empty,
    /// File selected, upload in flight; a local preview is shown
    Preloading,
    /// Media resolved and shown
    Populated,
}

impl SlotState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotState::Empty => "empty",
            SlotState::Preloading => "preloading",
            SlotState::Populated => "populated",
        }
    }
}

/// Requested lifecycle change, carrying the data the target state needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Show a placeholder using the given preview source
    Preloading { preview: String },
    /// Show the resolved media at `url`
    Populated { url: String },
}

impl Transition {
    fn target(&self) -> SlotState {
        match self {
            Transition::Preloading { .. } => SlotState::Preloading,
            Transition::Populated { .. } => SlotState::Populated,
        }
    }
}

/// How a populated slot presents its media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaPresentation {
    Image {
        src: String,
    },
    /// Muted looping inline video, played like an animated image
    Video {
        src: String,
        autoplay: bool,
        looped: bool,
        muted: bool,
        plays_inline: bool,
    },
}

impl MediaPresentation {
    /// Pick a presentation for `url` from its guessed MIME type.
    pub fn for_url(url: &str) -> Self {
        // Query strings and fragments would defeat extension guessing.
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let is_video = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.type_() == mime_guess::mime::VIDEO)
            .unwrap_or(false);

        if is_video {
            MediaPresentation::Video {
                src: url.to_string(),
                autoplay: true,
                looped: true,
                muted: true,
                plays_inline: true,
            }
        } else {
            MediaPresentation::Image {
                src: url.to_string(),
            }
        }
    }

    pub fn src(&self) -> &str {
        match self {
            MediaPresentation::Image { src } | MediaPresentation::Video { src, .. } => src,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, MediaPresentation::Video { .. })
    }
}

/// One visual unit in the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    id: SlotId,
    state: SlotState,
    preview: Option<String>,
    media: Option<MediaPresentation>,
    url_text: String,
    /// `None` until a caption is stored or typed
    caption: Option<String>,
}

impl Slot {
    fn new(state: SlotState) -> Self {
        Self {
            id: SlotId::new(),
            state,
            preview: None,
            media: None,
            url_text: String::new(),
            caption: None,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    /// Local preview shown while preloading
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Resolved media, once populated
    pub fn media(&self) -> Option<&MediaPresentation> {
        self.media.as_ref()
    }

    /// Current contents of the URL text field
    pub fn url_text(&self) -> &str {
        &self.url_text
    }

    /// Current contents of the caption text field
    pub fn caption_text(&self) -> &str {
        self.caption.as_deref().unwrap_or_default()
    }

    /// Caption as it will be saved. A stored caption is kept as is until the
    /// user edits it; an edit to empty text clears it.
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// The remove affordance is only shown once the slot is populated.
    pub fn is_removable(&self) -> bool {
        self.state == SlotState::Populated
    }
}

/// Ordered registry of view slots.
///
/// The trailing add control is not a slot; it is always rendered after the
/// last slot, so inserting always appends.
#[derive(Debug, Clone, Default)]
pub struct SlotRegistry {
    slots: Vec<Slot>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Append a slot. An empty `url` gives an `Empty` slot, anything else a
    /// `Populated` one showing that URL.
    pub fn insert(&mut self, url: &str, caption: Option<&str>) -> SlotId {
        let mut slot = Slot::new(SlotState::Empty);
        slot.caption = caption.map(str::to_string);
        if !url.is_empty() {
            slot.state = SlotState::Populated;
            slot.url_text = url.to_string();
            slot.media = Some(MediaPresentation::for_url(url));
        }

        let id = slot.id;
        debug!("Inserted slot {} ({})", id, slot.state.as_str());
        self.slots.push(slot);
        id
    }

    /// Append a slot that is already preloading with `preview`.
    pub fn insert_preloading(&mut self, preview: &str) -> SlotId {
        let mut slot = Slot::new(SlotState::Preloading);
        slot.preview = Some(preview.to_string());

        let id = slot.id;
        debug!("Inserted preloading slot {}", id);
        self.slots.push(slot);
        id
    }

    /// Move a slot to a new lifecycle state.
    ///
    /// Allowed: Empty -> Preloading, Empty -> Populated,
    /// Preloading -> Populated. Populated is terminal.
    pub fn set_lifecycle(&mut self, id: SlotId, transition: Transition) -> GalleryResult<()> {
        let slot = self.slot_mut(id)?;
        let from = slot.state;
        let to = transition.target();

        let allowed = matches!(
            (from, to),
            (SlotState::Empty, SlotState::Preloading)
                | (SlotState::Empty, SlotState::Populated)
                | (SlotState::Preloading, SlotState::Populated)
        );
        if !allowed {
            return Err(GalleryError::InvalidTransition {
                slot: id,
                from: from.as_str(),
                to: to.as_str(),
            });
        }

        match transition {
            Transition::Preloading { preview } => {
                slot.preview = Some(preview);
            }
            Transition::Populated { url } => {
                slot.media = Some(MediaPresentation::for_url(&url));
                slot.url_text = url;
                slot.preview = None;
            }
        }
        slot.state = to;

        debug!("Slot {} {} -> {}", id, from.as_str(), to.as_str());
        Ok(())
    }

    /// Replace the URL text field of a populated slot.
    pub fn set_url_text(&mut self, id: SlotId, text: &str) -> GalleryResult<()> {
        let slot = self.editable_slot_mut(id)?;
        slot.url_text = text.to_string();
        Ok(())
    }

    /// Replace the caption text field of a populated slot.
    pub fn set_caption_text(&mut self, id: SlotId, text: &str) -> GalleryResult<()> {
        let slot = self.editable_slot_mut(id)?;
        slot.caption = (!text.is_empty()).then(|| text.to_string());
        Ok(())
    }

    /// Detach a slot from the view.
    pub fn remove(&mut self, id: SlotId) -> Option<Slot> {
        let index = self.slots.iter().position(|s| s.id == id)?;
        debug!("Removed slot {}", id);
        Some(self.slots.remove(index))
    }

    /// Slots past the `Empty` state, in display order.
    pub fn list_populated(&self) -> Vec<&Slot> {
        self.slots
            .iter()
            .filter(|s| s.state != SlotState::Empty)
            .collect()
    }

    pub fn get(&self, id: SlotId) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// All slots in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether any slot is still waiting on an upload.
    pub fn has_preloading(&self) -> bool {
        self.slots.iter().any(|s| s.state == SlotState::Preloading)
    }

    fn slot_mut(&mut self, id: SlotId) -> GalleryResult<&mut Slot> {
        self.slots
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(GalleryError::UnknownSlot(id))
    }

    fn editable_slot_mut(&mut self, id: SlotId) -> GalleryResult<&mut Slot> {
        let slot = self.slot_mut(id)?;
        if slot.state != SlotState::Populated {
            return Err(GalleryError::NotEditable(id));
        }
        Ok(slot)
    }
}
