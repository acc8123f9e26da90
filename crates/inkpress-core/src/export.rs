//! Export collaborator: encoded files and batch archives.
//!
//! A single image exports as one file. A batch of several images is
//! packaged into one archive by an [`ArchivePackager`]; the default
//! [`ZipPackager`] writes an uncompressed ZIP, since JPEG and PNG payloads
//! are already compressed.
//!
//! Batch export never stops at the first bad image: each failure is
//! recorded in the [`ExportReport`] and the rest are still packaged.

use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::rc::Rc;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::PipelineConfig;
use crate::encode::encode_raster;
use crate::pipeline::{ImageEntry, ImageId, PipelineError};
use crate::ImageFormat;

/// MIME type of archives produced by [`ZipPackager`].
pub const ZIP_MIME_TYPE: &str = "application/zip";

/// Stem used when an upload name has none.
const FALLBACK_STEM: &str = "image";

/// One downloadable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// An image that could not be exported, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFailure {
    pub id: ImageId,
    pub reason: String,
}

/// Outcome of a batch export.
///
/// `artifact` is `None` when there was nothing to export or every image
/// failed.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub artifact: Option<ExportArtifact>,
    pub failures: Vec<ExportFailure>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Turns a list of files into one archive blob.
pub trait ArchivePackager {
    fn package(&self, files: &[ExportArtifact]) -> Result<Vec<u8>, PipelineError>;

    fn mime_type(&self) -> &str {
        ZIP_MIME_TYPE
    }
}

/// Packages files into a ZIP archive with stored (uncompressed) entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipPackager;

impl ArchivePackager for ZipPackager {
    fn package(&self, files: &[ExportArtifact]) -> Result<Vec<u8>, PipelineError> {
        let archive_err = |e: &dyn std::fmt::Display| PipelineError::Archive(e.to_string());

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        for file in files {
            writer
                .start_file(file.filename.as_str(), options)
                .map_err(|e| archive_err(&e))?;
            writer.write_all(&file.bytes).map_err(|e| archive_err(&e))?;
        }

        let cursor = writer.finish().map_err(|e| archive_err(&e))?;
        Ok(cursor.into_inner())
    }
}

/// Download name for an exported image: `{prefix}{stem}.{ext}`.
///
/// The extension always follows the output format, so a JPEG upload
/// exported with extraction enabled ends in `.png`.
pub fn export_filename(prefix: &str, original_name: &str, format: ImageFormat) -> String {
    // Browsers may hand over a path on some platforms
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    let stem = match base.rfind('.') {
        Some(0) | None => base,
        Some(dot) => &base[..dot],
    };
    let stem = if stem.trim().is_empty() {
        FALLBACK_STEM
    } else {
        stem
    };
    format!("{prefix}{stem}.{}", format.extension())
}

/// Encode one entry's processed image.
///
/// The encoding is cached on the entry, so exporting the same unchanged
/// image twice encodes once.
pub fn export_entry(
    entry: &ImageEntry,
    config: &PipelineConfig,
) -> Result<ExportArtifact, PipelineError> {
    let format = entry.output_format();

    let bytes = match entry.cached_encoding() {
        Some(bytes) => bytes,
        None => {
            let encoded = Rc::new(encode_raster(entry.processed(), format, config.jpeg_quality)?);
            entry.cache_encoding(Rc::clone(&encoded));
            encoded
        }
    };

    Ok(ExportArtifact {
        filename: export_filename(&config.export_prefix, entry.name(), format),
        mime_type: format.mime_type().to_string(),
        bytes: bytes.as_ref().clone(),
    })
}

/// Export several entries as one download.
///
/// One entry yields its file directly; more than one yields an archive
/// named `archive_name` containing every entry that encoded successfully.
pub fn export_entries<'a, I>(
    entries: I,
    config: &PipelineConfig,
    packager: &dyn ArchivePackager,
    archive_name: &str,
) -> Result<ExportReport, PipelineError>
where
    I: IntoIterator<Item = &'a ImageEntry>,
{
    let results = entries
        .into_iter()
        .map(|entry| (entry.id().clone(), export_entry(entry, config)))
        .collect();
    assemble_report(results, packager, archive_name)
}

fn assemble_report(
    results: Vec<(ImageId, Result<ExportArtifact, PipelineError>)>,
    packager: &dyn ArchivePackager,
    archive_name: &str,
) -> Result<ExportReport, PipelineError> {
    let requested = results.len();
    let mut files = Vec::with_capacity(requested);
    let mut failures = Vec::new();

    for (id, result) in results {
        match result {
            Ok(artifact) => files.push(artifact),
            Err(err) => {
                log::warn!("export of {id} failed: {err}");
                failures.push(ExportFailure {
                    id,
                    reason: err.to_string(),
                });
            }
        }
    }

    if requested <= 1 || files.is_empty() {
        return Ok(ExportReport {
            artifact: files.pop(),
            failures,
        });
    }

    dedupe_filenames(&mut files);
    let bytes = packager.package(&files)?;
    log::info!(
        "packaged {} of {} images into {archive_name}",
        files.len(),
        requested
    );

    Ok(ExportReport {
        artifact: Some(ExportArtifact {
            filename: archive_name.to_string(),
            mime_type: packager.mime_type().to_string(),
            bytes,
        }),
        failures,
    })
}

/// Rename repeated file names to `stem (2).ext`, `stem (3).ext`, ...
fn dedupe_filenames(files: &mut [ExportArtifact]) {
    let mut taken: HashSet<String> = HashSet::with_capacity(files.len());
    for file in files.iter_mut() {
        if taken.insert(file.filename.clone()) {
            continue;
        }
        let (stem, ext) = match file.filename.rfind('.') {
            Some(dot) => file.filename.split_at(dot),
            None => (file.filename.as_str(), ""),
        };
        let (stem, ext) = (stem.to_string(), ext.to_string());

        let mut n = 2;
        let renamed = loop {
            let candidate = format!("{stem} ({n}){ext}");
            if !taken.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        taken.insert(renamed.clone());
        file.filename = renamed;
    }
}
