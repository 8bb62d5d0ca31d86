//! # exiframe
//!
//! Camera and lens metadata for framed photo captions. Reads the EXIF block
//! of an image, builds a typed record of the shooting parameters, and formats
//! them as display strings (`"Apple iPhone 14 Pro"`, `"24mm f/1.8 1/200s ISO80"`).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use exiframe::config::Config;
//! use exiframe::pipeline::{collect_images, process_image};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(Some("config.json".as_ref()))?;
//!     let images = collect_images(&[PathBuf::from("./photos")]);
//!
//!     for path in &images {
//!         let result = process_image(path, &config).await;
//!         for line in result.caption.lines() {
//!             println!("{line}");
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-Level Usage
//!
//! The parser gives typed access to individual keys of the decoded
//! properties tree:
//!
//! ```rust,no_run
//! use exiframe::metadata::{MetadataParser, keys};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! if let Some(parser) = MetadataParser::new(&bytes) {
//!     let f_number: Option<f64> = parser.lookup(&keys::F_NUMBER);
//!     let iso: Option<Vec<i64>> = parser.lookup(&keys::ISO_SPEED_RATINGS);
//!     println!("{f_number:?} {iso:?}");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`fraction`]: decimal to fraction conversion for exposure times
//! - [`metadata`]: properties tree, key registry and typed lookups
//! - [`exif`]: the per-photo [`ExifData`](exif::ExifData) record
//! - [`display`]: caption strings with fixed defaults
//! - [`session`]: the current photo selection and its record
//! - [`pipeline`]: image collection and per-file processing
//! - [`config`]: configuration types and loading/saving

pub mod config;
pub mod display;
pub mod exif;
pub mod fraction;
pub mod metadata;
pub mod pipeline;
pub mod session;

#[cfg(test)]
mod testkit;
