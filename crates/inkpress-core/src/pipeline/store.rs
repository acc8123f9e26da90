//! The image collection: every uploaded image with its settings and result.
//!
//! Entries are shared as `Rc<ImageEntry>` snapshots. The store never mutates
//! an entry a reader may hold; an update builds a new entry and swaps it in.
//! Mutation is crate-private so only [`Session`](super::Session) can change
//! the collection.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::EditSettings;
use crate::raster::RasterBuffer;
use crate::transform::CropRect;
use crate::{ImageFormat, ToneParams};

/// Opaque, unique identifier of an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ImageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Per-image processing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingState {
    #[default]
    Idle,
    Processing,
}

/// One uploaded image.
#[derive(Debug, Clone)]
pub struct ImageEntry {
    id: ImageId,
    name: String,
    source_format: ImageFormat,
    original: Rc<RasterBuffer>,
    processed: Rc<RasterBuffer>,
    settings: EditSettings,
    state: ProcessingState,
    // Encoded export of `processed`; dropped along with this entry version.
    encoded: OnceCell<Rc<Vec<u8>>>,
}

impl ImageEntry {
    pub(crate) fn new(
        id: ImageId,
        name: String,
        source_format: ImageFormat,
        original: RasterBuffer,
        processed: RasterBuffer,
        settings: EditSettings,
    ) -> Self {
        Self {
            id,
            name,
            source_format,
            original: Rc::new(original),
            processed: Rc::new(processed),
            settings,
            state: ProcessingState::Idle,
            encoded: OnceCell::new(),
        }
    }

    /// Same entry in a different processing state.
    pub(crate) fn with_state(&self, state: ProcessingState) -> Self {
        Self {
            state,
            ..self.clone()
        }
    }

    /// Successor entry holding a fresh result, back in `Idle`.
    pub(crate) fn with_result(&self, settings: EditSettings, processed: RasterBuffer) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            source_format: self.source_format,
            original: Rc::clone(&self.original),
            processed: Rc::new(processed),
            settings,
            state: ProcessingState::Idle,
            encoded: OnceCell::new(),
        }
    }

    pub fn id(&self) -> &ImageId {
        &self.id
    }

    /// File name the image was uploaded with.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_format(&self) -> ImageFormat {
        self.source_format
    }

    /// The decoded upload. Every recompute starts from this.
    pub fn original(&self) -> &RasterBuffer {
        &self.original
    }

    /// Result of the last successful recompute.
    pub fn processed(&self) -> &RasterBuffer {
        &self.processed
    }

    /// Settings that produced [`processed`](Self::processed).
    pub fn settings(&self) -> &EditSettings {
        &self.settings
    }

    pub fn tone(&self) -> ToneParams {
        self.settings.tone
    }

    pub fn crop(&self) -> Option<CropRect> {
        self.settings.crop
    }

    pub fn extract_black_pixels(&self) -> bool {
        self.settings.extract_black_pixels
    }

    pub fn state(&self) -> ProcessingState {
        self.state
    }

    /// Format the processed image is exported in.
    pub fn output_format(&self) -> ImageFormat {
        self.settings.output_format(self.source_format)
    }

    pub(crate) fn cached_encoding(&self) -> Option<Rc<Vec<u8>>> {
        self.encoded.get().cloned()
    }

    pub(crate) fn cache_encoding(&self, bytes: Rc<Vec<u8>>) {
        // Already set means another export of this version got there first
        let _ = self.encoded.set(bytes);
    }
}

/// All images of the current session, in upload order.
#[derive(Debug, Default)]
pub struct ImageStore {
    entries: Vec<Rc<ImageEntry>>,
    selected: Option<ImageId>,
    unsaved_changes: bool,
    next_id: u64,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &ImageId) -> Option<Rc<ImageEntry>> {
        self.position(id).map(|i| Rc::clone(&self.entries[i]))
    }

    pub fn contains(&self, id: &ImageId) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> Vec<ImageId> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<ImageEntry>> {
        self.entries.iter()
    }

    pub fn selected(&self) -> Option<&ImageId> {
        self.selected.as_ref()
    }

    pub fn selected_entry(&self) -> Option<Rc<ImageEntry>> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    /// True once anything has been uploaded this session. Never resets.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved_changes
    }

    pub(crate) fn allocate_id(&mut self) -> ImageId {
        self.next_id += 1;
        ImageId(format!("img-{}", self.next_id))
    }

    pub(crate) fn insert(&mut self, entry: ImageEntry) -> ImageId {
        let id = entry.id.clone();
        self.entries.push(Rc::new(entry));
        self.unsaved_changes = true;
        id
    }

    /// Swap in a new version of an existing entry, returning the old one.
    pub(crate) fn replace(&mut self, entry: Rc<ImageEntry>) -> Option<Rc<ImageEntry>> {
        let index = self.position(&entry.id)?;
        Some(std::mem::replace(&mut self.entries[index], entry))
    }

    /// Remove an entry. If it was selected, the first remaining entry
    /// becomes selected.
    pub(crate) fn remove(&mut self, id: &ImageId) -> Option<Rc<ImageEntry>> {
        let index = self.position(id)?;
        let removed = self.entries.remove(index);
        if self.selected.as_ref() == Some(id) {
            self.selected = self.entries.first().map(|e| e.id.clone());
        }
        Some(removed)
    }

    pub(crate) fn select(&mut self, id: &ImageId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selected = Some(id.clone());
        true
    }

    fn position(&self, id: &ImageId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }
}
