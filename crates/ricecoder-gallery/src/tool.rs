//! Host editor tool contract.

use std::sync::Arc;

use crate::config::GalleryConfig;
use crate::controller::{GalleryController, GalleryView};
use crate::error::GalleryResult;
use crate::models::GalleryData;
use crate::tunes::TuneButton;
use crate::upload::Uploader;

const TOOLBOX_ICON: &str = r#"<svg width="17" height="15" viewBox="0 0 336 276" xmlns="http://www.w3.org/2000/svg"><path d="M291 150V79c0-19-15-34-34-34H79c-19 0-34 15-34 34v42l67-44 81 72 56-29 42 30zm0 52l-43-30-56 30-81-67-66 39v23c0 19 15 34 34 34h178c17 0 31-13 34-29zM79 0h178c44 0 79 35 79 79v118c0 44-35 79-79 79H79c-44 0-79-35-79-79V79C0 35 35 0 79 0z"/></svg>"#;

/// Entry shown in the editor toolbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolboxEntry {
    pub title: &'static str,
    pub icon: &'static str,
}

/// Everything the host hands a block tool at construction.
pub struct ToolContext<D, C> {
    pub data: D,
    pub config: C,
    pub read_only: bool,
    /// Replaces the tool's default uploader when set
    pub uploader: Option<Arc<dyn Uploader>>,
}

impl<D, C> ToolContext<D, C> {
    pub fn new(data: D, config: C) -> Self {
        Self {
            data,
            config,
            read_only: false,
            uploader: None,
        }
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_uploader(mut self, uploader: Arc<dyn Uploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }
}

/// A block tool as seen by the host editor.
pub trait BlockTool: Sized {
    type Data;
    type Config;
    type View;

    /// Toolbox entry for inserting the block
    fn toolbox() -> ToolboxEntry;

    /// Whether the tool can render in read-only mode
    fn is_read_only_supported() -> bool {
        false
    }

    fn construct(context: ToolContext<Self::Data, Self::Config>) -> GalleryResult<Self>;

    fn render(&self) -> Self::View;

    fn save(&self) -> Self::Data;

    /// Settings buttons; none by default
    fn render_settings(&self) -> Vec<TuneButton> {
        Vec::new()
    }
}

impl BlockTool for GalleryController {
    type Data = GalleryData;
    type Config = GalleryConfig;
    type View = GalleryView;

    fn toolbox() -> ToolboxEntry {
        ToolboxEntry {
            title: "Gallery",
            icon: TOOLBOX_ICON,
        }
    }

    fn is_read_only_supported() -> bool {
        true
    }

    fn construct(context: ToolContext<GalleryData, GalleryConfig>) -> GalleryResult<Self> {
        let ToolContext {
            data,
            config,
            read_only,
            uploader,
        } = context;

        let controller = match uploader {
            Some(uploader) => GalleryController::with_uploader(data, config, uploader)?,
            None => GalleryController::new(data, config)?,
        };
        Ok(controller.read_only(read_only))
    }

    fn render(&self) -> GalleryView {
        GalleryController::render(self)
    }

    fn save(&self) -> GalleryData {
        GalleryController::save(self)
    }

    fn render_settings(&self) -> Vec<TuneButton> {
        GalleryController::render_settings(self)
    }
}
