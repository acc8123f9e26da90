use thiserror::Error;

use super::ImageId;
use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Errors reported by [`Session`](super::Session) operations.
///
/// None of these leave a stored entry half-updated: the entry either holds
/// the new result or exactly what it held before the call.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The uploaded file could not be decoded; the file is skipped.
    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// A drawing surface of the requested size could not be allocated.
    #[error("Render surface of {width}x{height} unavailable (limit {limit} pixels)")]
    RenderContextUnavailable { width: u32, height: u32, limit: u64 },

    /// The processed image could not be encoded for export.
    #[error("Encode failed: {0}")]
    Encode(#[from] EncodeError),

    /// No image with this id is in the store.
    #[error("Unknown image: {0}")]
    UnknownImage(ImageId),

    /// Batch packaging failed.
    #[error("Archive packaging failed: {0}")]
    Archive(String),
}
