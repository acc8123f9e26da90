//! Decode collaborator: uploaded bytes in, RGBA raster out.
//!
//! JPEG and PNG are supported. Anything else fails with
//! [`DecodeError::InvalidFormat`] so the caller can skip that file and keep
//! going with the rest of a batch.
//!
//! # Examples
//!
//! ```ignore
//! use inkpress_core::decode::decode_image;
//!
//! let bytes = std::fs::read("scan.jpg").unwrap();
//! let decoded = decode_image(&bytes).unwrap();
//! println!("Decoded {:?} {:?}", decoded.format, decoded.dimensions());
//! ```

mod reader;
mod types;

pub use reader::{decode_image, get_orientation};
pub use types::{DecodeError, DecodedImage, Orientation};
