use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eframe::egui;

use crate::data::filter::{filtered_names, init_filter_state, unique_codes, FilterField, FilterState};
use crate::data::loader::load_images;
use crate::data::model::{ImageCollection, Probe};
use crate::export::{write_export, RenderOptions};
use crate::figure::{compose, Figure};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct AppState {
    /// Directory currently shown (None until one is chosen).
    pub directory: Option<PathBuf>,

    pub probe: Probe,

    /// Everything the last load returned for `probe`.
    pub images: ImageCollection,

    /// Per-field filter selections.
    pub filters: FilterState,

    /// Filters requested on the command line, applied on the first load.
    pending_filters: Option<FilterState>,

    /// Composition of the images passing the current filters.
    pub figure: Option<Figure>,

    /// One texture per figure panel; rebuilt when the figure changes.
    pub textures: Vec<egui::TextureHandle>,

    pub render_options: RenderOptions,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(
        directory: Option<PathBuf>,
        probe: Probe,
        filters: FilterState,
        render_options: RenderOptions,
    ) -> Self {
        Self {
            directory,
            probe,
            images: ImageCollection::new(),
            filters: FilterState::default(),
            pending_filters: (!filters.is_empty()).then_some(filters),
            figure: None,
            textures: Vec::new(),
            render_options,
            status_message: None,
        }
    }

    /// Re-read the current directory for the current probe.
    pub fn reload(&mut self) -> Result<()> {
        let Some(dir) = self.directory.clone() else {
            return Ok(());
        };
        let images = load_images(&dir, self.probe)
            .with_context(|| format!("loading {} images", self.probe.upper_label()))?;
        self.set_images(images);
        Ok(())
    }

    /// Ingest a newly loaded collection, initialise filters and figure.
    pub fn set_images(&mut self, images: ImageCollection) {
        self.filters = init_filter_state(&images);
        if let Some(requested) = self.pending_filters.take() {
            self.filters.extend(requested);
        }
        self.images = images;
        self.status_message = if self.images.is_empty() {
            Some(format!("No images found for probe {}", self.probe.upper_label()))
        } else {
            None
        };
        self.refilter();
    }

    /// Reload and record any failure in the status bar.
    pub fn reload_reporting(&mut self) {
        if let Err(e) = self.reload() {
            log::error!("Failed to load images: {e:#}");
            self.images = ImageCollection::new();
            self.figure = None;
            self.textures.clear();
            self.status_message = Some(format!("Error: {e:#}"));
        }
    }

    pub fn set_directory(&mut self, dir: PathBuf) {
        self.directory = Some(dir);
        self.reload_reporting();
    }

    pub fn set_probe(&mut self, probe: Probe) {
        if self.probe != probe {
            self.probe = probe;
            self.reload_reporting();
        }
    }

    /// Names passing the current filters, in load order.
    pub fn visible_names(&self) -> Vec<&str> {
        filtered_names(&self.images, &self.filters)
    }

    /// Recompose the figure after a filter change.
    pub fn refilter(&mut self) {
        let visible = self.visible_names();
        let shown = self.images.retain_names(&visible);
        self.figure = compose(&shown, self.probe);
        self.textures.clear();
    }

    /// Toggle a single code in a field's filter.
    pub fn toggle_filter_value(&mut self, field: FilterField, code: &str) {
        let selected = self.filters.entry(field).or_default();
        if !selected.remove(code) {
            selected.insert(code.to_string());
        }
        self.refilter();
    }

    /// Select all codes of a field.
    pub fn select_all(&mut self, field: FilterField) {
        if let Some(all) = unique_codes(&self.images).remove(&field) {
            self.filters.insert(field, all);
            self.refilter();
        }
    }

    /// Deselect all codes of a field.
    pub fn select_none(&mut self, field: FilterField) {
        self.filters.insert(field, BTreeSet::new());
        self.refilter();
    }

    /// Export the current figure; nothing to do when no panel is visible.
    pub fn export(&self, png: &Path) -> Result<bool> {
        match &self.figure {
            Some(figure) => {
                write_export(figure, &self.render_options, png)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
