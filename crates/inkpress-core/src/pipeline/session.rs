//! The orchestrator: the one owner of the image collection.
//!
//! Hosts drive a [`Session`] through its command methods. Crop commits,
//! extraction toggles and explicit applies recompute immediately; tone
//! changes wait in a per-image [`Debouncer`] until [`Session::tick`] finds
//! their window elapsed.

use std::collections::BTreeMap;
use std::rc::Rc;

use super::{
    run_pipeline, Debouncer, EditSettings, ImageEntry, ImageId, ImageStore, PipelineError,
    ProcessingState,
};
use crate::config::PipelineConfig;
use crate::decode::decode_image;
use crate::export::{
    export_entries, export_entry, ArchivePackager, ExportArtifact, ExportReport, ZipPackager,
};
use crate::transform::CropRect;
use crate::ToneParams;

/// Application state for one editing session.
pub struct Session {
    config: PipelineConfig,
    store: ImageStore,
    pending_tone: BTreeMap<ImageId, Debouncer<ToneParams>>,
    packager: Box<dyn ArchivePackager>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl Session {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config: config.normalized(),
            store: ImageStore::new(),
            pending_tone: BTreeMap::new(),
            packager: Box::new(ZipPackager),
        }
    }

    /// Use a different archive packager for batch export.
    pub fn with_packager(mut self, packager: Box<dyn ArchivePackager>) -> Self {
        self.packager = packager;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Replace the configuration.
    ///
    /// Stored results are not recomputed; the new values apply from the next
    /// recompute or export on. A new `debounce_ms` also moves the deadline of
    /// tone changes that are already pending.
    pub fn set_config(&mut self, config: PipelineConfig) {
        self.config = config.normalized();
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    pub fn entry(&self, id: &ImageId) -> Option<Rc<ImageEntry>> {
        self.store.get(id)
    }

    pub fn ids(&self) -> Vec<ImageId> {
        self.store.ids()
    }

    pub fn select(&mut self, id: &ImageId) -> Result<(), PipelineError> {
        if self.store.select(id) {
            Ok(())
        } else {
            Err(PipelineError::UnknownImage(id.clone()))
        }
    }

    /// Decode one file and add it to the collection, selected.
    ///
    /// The stored result is the image run through the pipeline with neutral
    /// settings.
    pub fn upload(&mut self, bytes: &[u8], name: &str) -> Result<ImageId, PipelineError> {
        let id = self.ingest(bytes, name)?;
        self.store.select(&id);
        Ok(id)
    }

    /// Decode several files. Files that fail are skipped and reported in
    /// place; the first one that succeeds becomes selected.
    pub fn upload_batch<I, N, B>(&mut self, files: I) -> Vec<Result<ImageId, PipelineError>>
    where
        I: IntoIterator<Item = (N, B)>,
        N: AsRef<str>,
        B: AsRef<[u8]>,
    {
        let results: Vec<_> = files
            .into_iter()
            .map(|(name, bytes)| self.ingest(bytes.as_ref(), name.as_ref()))
            .collect();

        if let Some(first) = results.iter().find_map(|r| r.as_ref().ok()) {
            self.store.select(first);
        }
        results
    }

    fn ingest(&mut self, bytes: &[u8], name: &str) -> Result<ImageId, PipelineError> {
        let decoded = decode_image(bytes).map_err(|e| {
            log::warn!("rejected upload {name}: {e}");
            PipelineError::from(e)
        })?;

        let settings = EditSettings::default();
        let processed = run_pipeline(&decoded.raster, &settings, &self.config)
            .inspect_err(|e| log::warn!("rejected upload {name}: {e}"))?;

        let id = self.store.allocate_id();
        let (width, height) = decoded.dimensions();
        log::info!("accepted {name} as {id} ({width}x{height}, {:?})", decoded.format);

        Ok(self.store.insert(ImageEntry::new(
            id,
            name.to_string(),
            decoded.format,
            decoded.raster,
            processed,
            settings,
        )))
    }

    /// Commit a crop rectangle (or clear it) and recompute.
    pub fn set_crop(&mut self, id: &ImageId, crop: Option<CropRect>) -> Result<(), PipelineError> {
        self.recompute_with(id, |settings| settings.crop = crop)
    }

    /// Toggle dark-pixel extraction and recompute.
    pub fn set_extract_black_pixels(
        &mut self,
        id: &ImageId,
        enabled: bool,
    ) -> Result<(), PipelineError> {
        self.recompute_with(id, |settings| settings.extract_black_pixels = enabled)
    }

    /// Recompute now, including any tone change still waiting for its window.
    pub fn apply_changes(&mut self, id: &ImageId) -> Result<(), PipelineError> {
        self.recompute_with(id, |_| {})
    }

    /// Queue a brightness/contrast change.
    ///
    /// Nothing is recomputed here. The change replaces any earlier pending
    /// one for the same image and is applied by the first [`tick`](Self::tick)
    /// at or after `now_ms + debounce_ms`, with `debounce_ms` read from the
    /// configuration at tick time.
    pub fn set_tone(
        &mut self,
        id: &ImageId,
        tone: ToneParams,
        now_ms: u64,
    ) -> Result<(), PipelineError> {
        if !self.store.contains(id) {
            return Err(PipelineError::UnknownImage(id.clone()));
        }

        let superseded = self
            .pending_tone
            .entry(id.clone())
            .or_default()
            .submit(tone.clamped(), now_ms);
        if let Some(old) = superseded {
            log::debug!("tone {old:?} for {id} superseded");
        }
        Ok(())
    }

    /// Tone change not yet applied, if any.
    ///
    /// This includes a change whose recompute failed. It is kept without a
    /// deadline and goes in with the next tone input or recompute.
    pub fn pending_tone(&self, id: &ImageId) -> Option<ToneParams> {
        self.pending_tone.get(id).and_then(|d| d.peek().copied())
    }

    /// Earliest time at which [`tick`](Self::tick) has work to do.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        let window = self.config.debounce_ms;
        self.pending_tone
            .values()
            .filter_map(|debouncer| debouncer.deadline_ms(window))
            .min()
    }

    /// Apply every pending tone change whose window has elapsed.
    ///
    /// Returns one result per recomputed image.
    pub fn tick(&mut self, now_ms: u64) -> Vec<(ImageId, Result<(), PipelineError>)> {
        let window = self.config.debounce_ms;
        let ready: Vec<(ImageId, ToneParams)> = self
            .pending_tone
            .iter_mut()
            .filter_map(|(id, debouncer)| {
                debouncer
                    .take_ready(now_ms, window)
                    .map(|tone| (id.clone(), tone))
            })
            .collect();
        self.pending_tone.retain(|_, debouncer| debouncer.is_pending());

        ready
            .into_iter()
            .map(|(id, tone)| {
                let result = self.recompute_pending(&id, Some(tone), |_| {});
                (id, result)
            })
            .collect()
    }

    /// Remove an image and everything it owns.
    ///
    /// The removed entry is returned so the host can release handles tied
    /// to it.
    pub fn remove(&mut self, id: &ImageId) -> Result<Rc<ImageEntry>, PipelineError> {
        self.pending_tone.remove(id);
        let removed = self
            .store
            .remove(id)
            .ok_or_else(|| PipelineError::UnknownImage(id.clone()))?;
        log::info!("removed {id}");
        Ok(removed)
    }

    /// Encode one image's current result for download.
    pub fn export(&self, id: &ImageId) -> Result<ExportArtifact, PipelineError> {
        let entry = self
            .store
            .get(id)
            .ok_or_else(|| PipelineError::UnknownImage(id.clone()))?;
        export_entry(&entry, &self.config)
    }

    /// Export every image, packaged into one archive when there is more
    /// than one.
    ///
    /// `archive_name` falls back to the configured name.
    pub fn export_all(&self, archive_name: Option<&str>) -> Result<ExportReport, PipelineError> {
        let archive_name = archive_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(self.config.archive_name.as_str());
        export_entries(
            self.store.iter().map(Rc::as_ref),
            &self.config,
            self.packager.as_ref(),
            archive_name,
        )
    }

    fn recompute_with(
        &mut self,
        id: &ImageId,
        update: impl FnOnce(&mut EditSettings),
    ) -> Result<(), PipelineError> {
        if !self.store.contains(id) {
            return Err(PipelineError::UnknownImage(id.clone()));
        }
        // A recompute always folds in the latest tone input
        let pending = self.pending_tone.remove(id).and_then(|mut d| d.flush());
        self.recompute_pending(id, pending, update)
    }

    /// Recompute with `pending` tone and `update` applied.
    ///
    /// On failure the pending tone is held again so the input is not lost.
    fn recompute_pending(
        &mut self,
        id: &ImageId,
        pending: Option<ToneParams>,
        update: impl FnOnce(&mut EditSettings),
    ) -> Result<(), PipelineError> {
        let current = self
            .store
            .get(id)
            .ok_or_else(|| PipelineError::UnknownImage(id.clone()))?;

        let mut settings = *current.settings();
        if let Some(tone) = pending {
            settings.tone = tone;
        }
        update(&mut settings);
        settings.tone = settings.tone.clamped();

        let result = self.recompute(current, settings);
        if let (Err(_), Some(tone)) = (&result, pending) {
            log::debug!("holding tone {tone:?} for {id}");
            self.pending_tone.entry(id.clone()).or_default().hold(tone);
        }
        result
    }

    fn recompute(
        &mut self,
        current: Rc<ImageEntry>,
        settings: EditSettings,
    ) -> Result<(), PipelineError> {
        let id = current.id().clone();
        log::debug!("recompute {id} with {settings:?}");

        self.store
            .replace(Rc::new(current.with_state(ProcessingState::Processing)));

        match run_pipeline(current.original(), &settings, &self.config) {
            Ok(processed) => {
                self.store
                    .replace(Rc::new(current.with_result(settings, processed)));
                Ok(())
            }
            Err(err) => {
                log::warn!("recompute of {id} failed, keeping previous result: {err}");
                self.store.replace(current);
                Err(err)
            }
        }
    }
}
