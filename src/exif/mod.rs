//! The per-photo metadata record and how it is built.
//!
//! - [`read_exif`]: decode image bytes and build an [`ExifData`] record
//! - [`ExifData::from_parser`]: build a record from an existing [`MetadataParser`](crate::metadata::MetadataParser)

mod reader;

pub use reader::{ExifData, read_exif};
