//! Gallery controller: the root of the block's state.
//!
//! The controller owns the tune state, the upload ledger, the view slots and
//! the upload gateway. Every user action arrives as a [`GalleryCommand`] and
//! goes through [`GalleryController::update`], which returns the
//! [`GalleryEffect`]s the host has to perform (open a picker, run an upload,
//! show a notification). Upload results come back as
//! [`GalleryCommand::UploadResolved`].

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::GalleryConfig;
use crate::error::{GalleryError, GalleryResult};
use crate::ledger::UploadLedger;
use crate::models::GalleryData;
use crate::slots::{MediaPresentation, SlotId, SlotRegistry, SlotState, Transition};
use crate::tunes::{TuneButton, TuneRegistry, LIST_CLASS};
use crate::upload::{FileSelection, HttpUploader, UploadGateway, UploadJob, UploadOutcome, Uploader};

/// Message shown to the user when an upload fails.
pub const UPLOAD_FAILED_MESSAGE: &str = "Can not upload an image, try another";

/// Class of the block's outer wrapper.
pub const WRAPPER_CLASS: &str = "gallery-wrapper";

/// User and runtime actions handled by the controller.
#[derive(Debug, Clone)]
pub enum GalleryCommand {
    /// Add button or toolbox entry activated
    AddRequested,
    /// User picked a file
    SelectFile(FileSelection),
    /// An upload job finished
    UploadResolved(UploadOutcome),
    /// Tune button activated
    ToggleTune(String),
    /// URL text field edited
    EditUrl { slot: SlotId, text: String },
    /// Caption text field edited
    EditCaption { slot: SlotId, text: String },
    /// Remove affordance activated
    RemoveSlot(SlotId),
}

/// Side effects the host performs on the controller's behalf.
#[derive(Debug, Clone)]
pub enum GalleryEffect {
    /// Open the native file picker with this accept filter
    OpenFilePicker { accept: String },
    /// Run this job through [`UploadGateway::upload`] and feed the outcome back
    StartUpload(UploadJob),
    /// Show a non-blocking notification
    Notify(Notification),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStyle {
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub style: NotificationStyle,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            style: NotificationStyle::Error,
        }
    }
}

/// Block-level status shown on the wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    /// No slots
    Empty,
    /// At least one slot is preloading
    Uploading,
    Filled,
}

impl ViewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewStatus::Empty => "empty",
            ViewStatus::Uploading => "loading",
            ViewStatus::Filled => "filled",
        }
    }

    pub fn class_name(&self) -> String {
        format!("{}--{}", WRAPPER_CLASS, self.as_str())
    }
}

/// Rendered state of one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotView {
    pub id: SlotId,
    pub state: SlotState,
    pub url_text: String,
    pub caption_text: String,
    pub caption_placeholder: String,
    pub caption_editable: bool,
    pub preview: Option<String>,
    pub media: Option<MediaPresentation>,
    pub removable: bool,
}

/// Rendered state of the whole block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryView {
    pub status: ViewStatus,
    pub wrapper_classes: Vec<String>,
    pub list_classes: Vec<String>,
    pub slots: Vec<SlotView>,
    /// Content of the trailing add button; absent in read-only mode
    pub add_button: Option<String>,
}

impl GalleryView {
    pub fn is_empty(&self) -> bool {
        self.status == ViewStatus::Empty
    }
}

/// Root of the gallery block state.
#[derive(Debug)]
pub struct GalleryController {
    config: GalleryConfig,
    read_only: bool,
    gateway: UploadGateway,
    slots: SlotRegistry,
    tunes: TuneRegistry,
    tune_state: BTreeMap<String, bool>,
    ledger: UploadLedger,
    in_flight: HashSet<SlotId>,
}

impl GalleryController {
    /// Create a controller that uploads over HTTP.
    pub fn new(data: GalleryData, config: GalleryConfig) -> GalleryResult<Self> {
        config.validate()?;
        let uploader = Arc::new(HttpUploader::from_config(&config)?);
        Self::with_uploader(data, config, uploader)
    }

    /// Create a controller with a custom uploader.
    ///
    /// Renders one populated slot per stored image, seeds the ledger with the
    /// stored records and applies the stored (or default `false`) value of
    /// every configured tune.
    pub fn with_uploader(
        data: GalleryData,
        config: GalleryConfig,
        uploader: Arc<dyn Uploader>,
    ) -> GalleryResult<Self> {
        config.validate()?;

        let gateway = UploadGateway::new(uploader, &config);
        let tunes = TuneRegistry::configure(config.actions.clone());

        let mut controller = Self {
            config,
            read_only: false,
            gateway,
            slots: SlotRegistry::new(),
            tunes,
            tune_state: BTreeMap::new(),
            ledger: UploadLedger::new(),
            in_flight: HashSet::new(),
        };

        let GalleryData { images, tunes: stored_tunes } = data;

        for record in images {
            if record.file.url.is_empty() {
                warn!("Skipping stored image without a URL");
                continue;
            }
            let slot = controller
                .slots
                .insert(&record.file.url, record.caption.as_deref());
            controller.ledger.append(slot, record.file, record.caption);
        }

        for name in stored_tunes.keys() {
            if !controller.tunes.contains(name) {
                debug!("Ignoring unknown stored tune '{}'", name);
            }
        }

        let names: Vec<String> = controller
            .config
            .actions
            .iter()
            .map(|a| a.name.clone())
            .collect();
        for name in names {
            let value = stored_tunes.get(&name).copied().unwrap_or(false);
            controller.set_tune(&name, value)?;
        }

        info!(
            "Gallery created with {} images and {} tunes",
            controller.slots.len(),
            controller.tune_state.len()
        );

        Ok(controller)
    }

    /// Switch read-only mode on or off.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Replace the uploader used for new jobs.
    pub fn set_uploader(&mut self, uploader: Arc<dyn Uploader>) {
        self.gateway.set_uploader(uploader);
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn gateway(&self) -> &UploadGateway {
        &self.gateway
    }

    pub fn slots(&self) -> &SlotRegistry {
        &self.slots
    }

    pub fn ledger(&self) -> &UploadLedger {
        &self.ledger
    }

    pub fn tunes(&self) -> &TuneRegistry {
        &self.tunes
    }

    /// Current persisted value of a tune.
    pub fn tune(&self, name: &str) -> Option<bool> {
        self.tune_state.get(name).copied()
    }

    /// Number of uploads started and not yet resolved.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Handle one command.
    ///
    /// Upload failures are not errors here: they become a notification
    /// effect. Errors are reserved for commands that cannot apply (unknown
    /// slot or tune, read-only mode, rejected file type).
    pub fn update(&mut self, command: GalleryCommand) -> GalleryResult<Vec<GalleryEffect>> {
        match command {
            GalleryCommand::AddRequested => {
                self.ensure_writable()?;
                Ok(vec![GalleryEffect::OpenFilePicker {
                    accept: self.gateway.accept().as_str().to_string(),
                }])
            }
            GalleryCommand::SelectFile(selection) => self.handle_select_file(selection),
            GalleryCommand::UploadResolved(outcome) => self.handle_upload_resolved(outcome),
            GalleryCommand::ToggleTune(name) => {
                self.toggle_tune(&name)?;
                Ok(Vec::new())
            }
            GalleryCommand::EditUrl { slot, text } => {
                self.ensure_writable()?;
                self.slots.set_url_text(slot, &text)?;
                Ok(Vec::new())
            }
            GalleryCommand::EditCaption { slot, text } => {
                self.ensure_writable()?;
                self.slots.set_caption_text(slot, &text)?;
                Ok(Vec::new())
            }
            GalleryCommand::RemoveSlot(slot) => {
                self.ensure_writable()?;
                let removable = self
                    .slots
                    .get(slot)
                    .map(|s| s.is_removable())
                    .ok_or(GalleryError::UnknownSlot(slot))?;
                if !removable {
                    return Err(GalleryError::NotEditable(slot));
                }
                self.slots.remove(slot);
                Ok(Vec::new())
            }
        }
    }

    /// Select a file, upload it and apply the result.
    ///
    /// Returns the effects left for the host (notifications). Overlapping
    /// uploads should go through [`update`](Self::update) and a cloned
    /// [`gateway`](Self::gateway) instead.
    pub async fn request_upload(
        &mut self,
        selection: FileSelection,
    ) -> GalleryResult<Vec<GalleryEffect>> {
        let mut remaining = Vec::new();

        for effect in self.update(GalleryCommand::SelectFile(selection))? {
            match effect {
                GalleryEffect::StartUpload(job) => {
                    let outcome = self.gateway.upload(job).await;
                    remaining.extend(self.update(GalleryCommand::UploadResolved(outcome))?);
                }
                other => remaining.push(other),
            }
        }

        Ok(remaining)
    }

    /// Flip a tune, returning its new value.
    pub fn toggle_tune(&mut self, name: &str) -> GalleryResult<bool> {
        self.ensure_writable()?;
        let current = self
            .tune_state
            .get(name)
            .copied()
            .ok_or_else(|| GalleryError::UnknownTune(name.to_string()))?;

        self.set_tune(name, !current)?;
        Ok(!current)
    }

    /// Render the block.
    pub fn render(&self) -> GalleryView {
        let status = if self.slots.is_empty() {
            ViewStatus::Empty
        } else if self.slots.has_preloading() {
            ViewStatus::Uploading
        } else {
            ViewStatus::Filled
        };

        let slots = self
            .slots
            .iter()
            .map(|slot| SlotView {
                id: slot.id(),
                state: slot.state(),
                url_text: slot.url_text().to_string(),
                caption_text: slot.caption_text().to_string(),
                caption_placeholder: self.config.caption_placeholder.clone(),
                caption_editable: !self.read_only && slot.state() == SlotState::Populated,
                preview: slot.preview().map(str::to_string),
                media: slot.media().cloned(),
                removable: !self.read_only && slot.is_removable(),
            })
            .collect();

        let mut list_classes = vec![LIST_CLASS.to_string()];
        list_classes.extend(self.tunes.container_classes());

        GalleryView {
            status,
            wrapper_classes: vec![WRAPPER_CLASS.to_string(), status.class_name()],
            list_classes,
            slots,
            add_button: (!self.read_only).then(|| self.config.button_content.clone()),
        }
    }

    /// Tune buttons for the block settings; none in read-only mode.
    pub fn render_settings(&self) -> Vec<TuneButton> {
        if self.read_only {
            return Vec::new();
        }
        self.tunes.render_settings()
    }

    /// Reconcile the view with the ledger into persisted data.
    pub fn serialize(&self) -> GalleryData {
        let (images, misses) = self.ledger.reconcile(self.slots.list_populated());
        if !misses.is_empty() {
            debug!("Save skipped {} unmatched slots", misses.len());
        }

        GalleryData {
            images,
            tunes: self.tune_state.clone(),
        }
    }

    /// Alias of [`serialize`](Self::serialize) matching the host's naming.
    pub fn save(&self) -> GalleryData {
        self.serialize()
    }

    /// Saved data as JSON.
    pub fn save_json(&self) -> GalleryResult<String> {
        self.serialize().to_json()
    }

    fn handle_select_file(&mut self, selection: FileSelection) -> GalleryResult<Vec<GalleryEffect>> {
        self.ensure_writable()?;
        self.gateway.accept().check(&selection)?;

        let preview = selection.preview_source();
        let slot = self.slots.insert_preloading(&preview);
        self.in_flight.insert(slot);

        debug!("Started upload of {} into slot {}", selection.name, slot);
        Ok(vec![GalleryEffect::StartUpload(UploadJob { slot, selection })])
    }

    fn handle_upload_resolved(&mut self, outcome: UploadOutcome) -> GalleryResult<Vec<GalleryEffect>> {
        let UploadOutcome { slot, result } = outcome;

        if !self.in_flight.remove(&slot) {
            warn!("Ignoring upload result for slot {}: no upload in flight", slot);
            return Ok(Vec::new());
        }

        match result {
            Ok(file) => {
                self.slots.set_lifecycle(
                    slot,
                    Transition::Populated {
                        url: file.url.clone(),
                    },
                )?;
                info!("Uploaded {} into slot {}", file.url, slot);
                self.ledger.append(slot, file, None);
                Ok(Vec::new())
            }
            Err(e) => {
                warn!("Gallery: uploading failed because of {}", e);
                Ok(vec![GalleryEffect::Notify(Notification::error(
                    UPLOAD_FAILED_MESSAGE,
                ))])
            }
        }
    }

    fn set_tune(&mut self, name: &str, value: bool) -> GalleryResult<()> {
        self.tunes.set_state(name, value)?;
        self.tune_state.insert(name.to_string(), value);
        Ok(())
    }

    fn ensure_writable(&self) -> GalleryResult<()> {
        if self.read_only {
            return Err(GalleryError::ReadOnly);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UploadError;
    use crate::models::{ImageRecord, UploadedFile};
    use crate::tunes::TuneDefinition;
    use async_trait::async_trait;

    struct EchoUploader;

    #[async_trait]
    impl Uploader for EchoUploader {
        async fn upload_by_file(
            &self,
            selection: &FileSelection,
            _request: &crate::upload::UploadRequest,
        ) -> Result<UploadedFile, UploadError> {
            Ok(UploadedFile::new(format!("https://cdn.example.com/{}", selection.name)))
        }
    }

    fn controller(data: GalleryData) -> GalleryController {
        let config = GalleryConfig::new()
            .with_action(TuneDefinition::new("slider", "", "Slider"))
            .with_action(TuneDefinition::new("fit", "", "Fit"));
        GalleryController::with_uploader(data, config, Arc::new(EchoUploader)).unwrap()
    }

    fn record(url: &str, caption: Option<&str>) -> ImageRecord {
        ImageRecord::new(UploadedFile::new(url), caption.map(str::to_string))
    }

    #[test]
    fn test_construct_seeds_ledger_and_slots() {
        let gallery = controller(GalleryData::new(vec![
            record("a.png", Some("A")),
            record("b.png", None),
        ]));

        assert_eq!(gallery.slots().len(), 2);
        assert_eq!(gallery.ledger().len(), 2);
        let first = gallery.slots().iter().next().unwrap();
        assert_eq!(gallery.ledger().find_by_slot(first.id()).unwrap().file.url, "a.png");
        assert_eq!(gallery.tune("slider"), Some(false));
        assert_eq!(gallery.tune("fit"), Some(false));
    }

    #[test]
    fn test_stored_tunes_applied_and_unknown_ignored() {
        let mut data = GalleryData::new(vec![]);
        data.tunes.insert("slider".to_string(), true);
        data.tunes.insert("legacy".to_string(), true);

        let gallery = controller(data);
        assert_eq!(gallery.tune("slider"), Some(true));
        assert_eq!(gallery.tune("legacy"), None);
        assert!(gallery
            .render()
            .list_classes
            .contains(&"gallery-list--slider".to_string()));

        let saved = gallery.serialize();
        assert_eq!(saved.tunes.get("slider"), Some(&true));
        assert!(!saved.tunes.contains_key("legacy"));
    }

    #[test]
    fn test_render_empty() {
        let gallery = controller(GalleryData::default());
        let view = gallery.render();

        assert!(view.is_empty());
        assert!(view.slots.is_empty());
        assert_eq!(
            view.wrapper_classes,
            vec!["gallery-wrapper".to_string(), "gallery-wrapper--empty".to_string()]
        );
        assert_eq!(view.add_button.as_deref(), Some("Add Image"));
    }

    #[test]
    fn test_add_requested_opens_picker() {
        let mut gallery = controller(GalleryData::default());
        let effects = gallery.update(GalleryCommand::AddRequested).unwrap();
        assert!(matches!(
            effects.as_slice(),
            [GalleryEffect::OpenFilePicker { accept }] if accept == "image/*"
        ));
    }

    #[test]
    fn test_select_file_creates_preloading_slot() {
        let mut gallery = controller(GalleryData::default());
        let effects = gallery
            .update(GalleryCommand::SelectFile(FileSelection::new("x.png", vec![1])))
            .unwrap();

        let job = match effects.as_slice() {
            [GalleryEffect::StartUpload(job)] => job.clone(),
            other => panic!("unexpected effects: {:?}", other),
        };

        let slot = gallery.slots().get(job.slot).unwrap();
        assert_eq!(slot.state(), SlotState::Preloading);
        assert_eq!(slot.preview(), Some("data:image/png;base64,AQ=="));
        assert_eq!(gallery.render().status, ViewStatus::Uploading);
        assert_eq!(gallery.in_flight(), 1);
        assert!(gallery.ledger().is_empty());
    }

    #[test]
    fn test_select_rejected_type() {
        let mut gallery = controller(GalleryData::default());
        let result = gallery.update(GalleryCommand::SelectFile(FileSelection::new(
            "notes.txt",
            vec![],
        )));

        assert!(matches!(
            result,
            Err(GalleryError::Upload(UploadError::NotAccepted { .. }))
        ));
        assert!(gallery.slots().is_empty());
    }

    #[test]
    fn test_upload_resolves_once() {
        let mut gallery = controller(GalleryData::default());
        let effects = gallery
            .update(GalleryCommand::SelectFile(FileSelection::new("x.png", vec![1])))
            .unwrap();
        let slot = match &effects[0] {
            GalleryEffect::StartUpload(job) => job.slot,
            other => panic!("unexpected effect: {:?}", other),
        };

        let outcome = UploadOutcome {
            slot,
            result: Ok(UploadedFile::new("x.png")),
        };
        gallery
            .update(GalleryCommand::UploadResolved(outcome.clone()))
            .unwrap();
        gallery
            .update(GalleryCommand::UploadResolved(outcome))
            .unwrap();

        assert_eq!(gallery.ledger().len(), 1);
        assert_eq!(gallery.slots().get(slot).unwrap().state(), SlotState::Populated);
        assert_eq!(gallery.in_flight(), 0);
    }

    #[test]
    fn test_upload_failure_notifies_and_keeps_slot() {
        let mut gallery = controller(GalleryData::default());
        let effects = gallery
            .update(GalleryCommand::SelectFile(FileSelection::new("x.png", vec![1])))
            .unwrap();
        let slot = match &effects[0] {
            GalleryEffect::StartUpload(job) => job.slot,
            other => panic!("unexpected effect: {:?}", other),
        };

        let effects = gallery
            .update(GalleryCommand::UploadResolved(UploadOutcome {
                slot,
                result: Err(UploadError::Rejected),
            }))
            .unwrap();

        match effects.as_slice() {
            [GalleryEffect::Notify(notification)] => {
                assert_eq!(notification.message, UPLOAD_FAILED_MESSAGE);
                assert_eq!(notification.style, NotificationStyle::Error);
            }
            other => panic!("unexpected effects: {:?}", other),
        }
        assert!(gallery.ledger().is_empty());
        assert_eq!(gallery.slots().get(slot).unwrap().state(), SlotState::Preloading);
        assert!(gallery.serialize().images.is_empty());
    }

    #[test]
    fn test_preloading_slot_cannot_be_removed() {
        let mut gallery = controller(GalleryData::default());
        let effects = gallery
            .update(GalleryCommand::SelectFile(FileSelection::new("x.png", vec![1])))
            .unwrap();
        let slot = match &effects[0] {
            GalleryEffect::StartUpload(job) => job.slot,
            other => panic!("unexpected effect: {:?}", other),
        };

        assert!(!gallery.render().slots[0].removable);
        assert!(matches!(
            gallery.update(GalleryCommand::RemoveSlot(slot)),
            Err(GalleryError::NotEditable(id)) if id == slot
        ));
        assert_eq!(gallery.slots().len(), 1);
        assert_eq!(gallery.in_flight(), 1);

        gallery
            .update(GalleryCommand::UploadResolved(UploadOutcome {
                slot,
                result: Ok(UploadedFile::new("x.png")),
            }))
            .unwrap();
        gallery.update(GalleryCommand::RemoveSlot(slot)).unwrap();
        assert!(gallery.slots().is_empty());
        assert_eq!(gallery.ledger().len(), 1);
    }

    #[test]
    fn test_result_for_unknown_slot_ignored() {
        let mut gallery = controller(GalleryData::default());
        let effects = gallery
            .update(GalleryCommand::UploadResolved(UploadOutcome {
                slot: SlotId::new(),
                result: Ok(UploadedFile::new("x.png")),
            }))
            .unwrap();

        assert!(effects.is_empty());
        assert!(gallery.slots().is_empty());
        assert!(gallery.ledger().is_empty());
    }

    #[test]
    fn test_stored_image_without_url_skipped() {
        let gallery = controller(GalleryData::new(vec![
            record("", Some("c")),
            record("a.png", Some("A")),
        ]));

        assert_eq!(gallery.slots().len(), 1);
        assert_eq!(gallery.ledger().len(), 1);
        assert_eq!(gallery.render().status, ViewStatus::Filled);
        assert_eq!(gallery.serialize().images, vec![record("a.png", Some("A"))]);
    }

    #[test]
    fn test_stored_empty_caption_round_trips() {
        let records = vec![record("a.png", Some("")), record("b.png", None)];
        let gallery = controller(GalleryData::new(records.clone()));

        assert_eq!(gallery.serialize().images, records);
    }

    #[test]
    fn test_toggle_tune_twice_restores() {
        let mut gallery = controller(GalleryData::default());

        assert!(gallery.toggle_tune("fit").unwrap());
        assert_eq!(gallery.serialize().tunes.get("fit"), Some(&true));
        assert!(gallery.tunes().is_applied("fit"));

        gallery.update(GalleryCommand::ToggleTune("fit".to_string())).unwrap();
        assert_eq!(gallery.tune("fit"), Some(false));
        assert!(!gallery.tunes().is_applied("fit"));
    }

    #[test]
    fn test_toggle_unknown_tune() {
        let mut gallery = controller(GalleryData::default());
        assert!(matches!(
            gallery.toggle_tune("sepia"),
            Err(GalleryError::UnknownTune(_))
        ));
    }

    #[test]
    fn test_read_only_blocks_mutation() {
        let mut gallery = controller(GalleryData::new(vec![record("a.png", None)])).read_only(true);
        let slot = gallery.slots().iter().next().unwrap().id();

        assert!(matches!(
            gallery.update(GalleryCommand::AddRequested),
            Err(GalleryError::ReadOnly)
        ));
        assert!(matches!(
            gallery.update(GalleryCommand::EditCaption {
                slot,
                text: "x".to_string()
            }),
            Err(GalleryError::ReadOnly)
        ));
        assert!(matches!(gallery.toggle_tune("fit"), Err(GalleryError::ReadOnly)));

        let view = gallery.render();
        assert!(view.add_button.is_none());
        assert!(!view.slots[0].removable);
        assert!(!view.slots[0].caption_editable);
        assert!(gallery.render_settings().is_empty());
        assert_eq!(gallery.serialize().images.len(), 1);
    }

    #[test]
    fn test_remove_unknown_slot() {
        let mut gallery = controller(GalleryData::default());
        assert!(matches!(
            gallery.update(GalleryCommand::RemoveSlot(SlotId::new())),
            Err(GalleryError::UnknownSlot(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GalleryConfig::new().with_action(TuneDefinition::new("images", "", ""));
        let result =
            GalleryController::with_uploader(GalleryData::default(), config, Arc::new(EchoUploader));
        assert!(matches!(result, Err(GalleryError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_request_upload_end_to_end() {
        let mut gallery = controller(GalleryData::new(vec![record("a.png", Some("A"))]));

        let effects = gallery
            .request_upload(FileSelection::new("x.png", vec![1, 2]))
            .await
            .unwrap();
        assert!(effects.is_empty());

        let saved = gallery.serialize();
        assert_eq!(saved.images.len(), 2);
        assert_eq!(saved.images[1].file.url, "https://cdn.example.com/x.png");
        assert_eq!(saved.images[1].caption, None);
        assert_eq!(gallery.render().status, ViewStatus::Filled);
    }
}
