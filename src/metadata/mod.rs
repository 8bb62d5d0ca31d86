//! Image properties: decoding, the key registry, and typed lookups.
//!
//! - [`decode`]: turn image bytes into a nested [`Properties`] tree
//! - [`keys`]: constant registry of where each field lives
//! - [`MetadataParser`]: resolve a [`MetadataKey`] to a typed, optional value

mod decoder;
pub mod keys;
mod parser;
mod value;

pub use decoder::{decode, DecodeError};
pub use keys::{DictionaryKey, KeyDescriptor, MetadataKey};
pub use parser::MetadataParser;
pub use value::{FromMetadataValue, MetadataValue, Properties, ValueKind};
