//! Constant catalog of where each field of interest lives in the properties tree.
//!
//! Key names follow the platform image-properties dictionary layout that
//! [`decoder`](super::decoder) produces. A misspelt name silently yields an
//! absent value, so every entry is pinned by the tests at the bottom of this
//! file and by the JPEG fixture tests in [`exif`](crate::exif).

use std::fmt;
use std::marker::PhantomData;

use super::value::{FromMetadataValue, ValueKind};

/// Names a sub-dictionary of the top-level properties mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DictionaryKey {
    pub name: &'static str,
}

/// Named sub-dictionaries.
pub mod dictionary {
    use super::DictionaryKey;

    pub const EXIF: DictionaryKey = DictionaryKey { name: "{Exif}" };
    pub const EXIF_AUX: DictionaryKey = DictionaryKey { name: "{ExifAux}" };
    pub const TIFF: DictionaryKey = DictionaryKey { name: "{TIFF}" };
    pub const GPS: DictionaryKey = DictionaryKey { name: "{GPS}" };

    pub const ALL: [DictionaryKey; 4] = [TIFF, EXIF, EXIF_AUX, GPS];
}

/// Keys that live directly in the top-level mapping.
pub mod top_level {
    pub const PIXEL_WIDTH: &str = "PixelWidth";
    pub const PIXEL_HEIGHT: &str = "PixelHeight";
    pub const ORIENTATION: &str = "Orientation";
    pub const DPI_WIDTH: &str = "DPIWidth";
    pub const DPI_HEIGHT: &str = "DPIHeight";
}

/// A typed lookup: the key name, its optional parent group, and the expected type `T`.
pub struct MetadataKey<T> {
    pub name: &'static str,
    pub parent: Option<DictionaryKey>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> MetadataKey<T> {
    pub const fn new(name: &'static str, parent: Option<DictionaryKey>) -> Self {
        Self {
            name,
            parent,
            _marker: PhantomData,
        }
    }
}

impl<T: FromMetadataValue> MetadataKey<T> {
    pub fn descriptor(&self) -> KeyDescriptor {
        KeyDescriptor {
            name: self.name,
            parent: self.parent,
            kind: T::KIND,
        }
    }
}

impl<T> Clone for MetadataKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MetadataKey<T> {}

impl<T> fmt::Debug for MetadataKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataKey")
            .field("name", &self.name)
            .field("parent", &self.parent.map(|p| p.name))
            .finish()
    }
}

/// Untyped view of a registry entry, for listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDescriptor {
    pub name: &'static str,
    pub parent: Option<DictionaryKey>,
    pub kind: ValueKind,
}

impl KeyDescriptor {
    /// `"{Exif}.FNumber"` style path.
    pub fn path(&self) -> String {
        match self.parent {
            Some(parent) => format!("{}.{}", parent.name, self.name),
            None => self.name.to_string(),
        }
    }
}

// Lens information
pub const LENS_MAKER: MetadataKey<String> = MetadataKey::new("LensMake", Some(dictionary::EXIF));
pub const LENS_MODEL: MetadataKey<String> = MetadataKey::new("LensModel", Some(dictionary::EXIF));

// Camera information
pub const CAMERA_MAKER: MetadataKey<String> = MetadataKey::new("Make", Some(dictionary::TIFF));
pub const CAMERA_MODEL: MetadataKey<String> = MetadataKey::new("Model", Some(dictionary::TIFF));

// Camera settings
pub const FOCAL_LENGTH: MetadataKey<i64> = MetadataKey::new("FocalLength", Some(dictionary::EXIF));
pub const FOCAL_LENGTH_IN_35MM_FILM: MetadataKey<i64> =
    MetadataKey::new("FocalLenIn35mmFilm", Some(dictionary::EXIF));
pub const F_NUMBER: MetadataKey<f64> = MetadataKey::new("FNumber", Some(dictionary::EXIF));
/// APEX Tv value, not seconds.
pub const SHUTTER_SPEED: MetadataKey<f64> =
    MetadataKey::new("ShutterSpeedValue", Some(dictionary::EXIF));
/// Seconds.
pub const EXPOSURE_TIME: MetadataKey<f64> = MetadataKey::new("ExposureTime", Some(dictionary::EXIF));
pub const ISO_SPEED_RATINGS: MetadataKey<Vec<i64>> =
    MetadataKey::new("ISOSpeedRatings", Some(dictionary::EXIF));

/// Every registry entry, in declaration order.
pub fn all() -> [KeyDescriptor; 10] {
    [
        LENS_MAKER.descriptor(),
        LENS_MODEL.descriptor(),
        CAMERA_MAKER.descriptor(),
        CAMERA_MODEL.descriptor(),
        FOCAL_LENGTH.descriptor(),
        FOCAL_LENGTH_IN_35MM_FILM.descriptor(),
        F_NUMBER.descriptor(),
        SHUTTER_SPEED.descriptor(),
        EXPOSURE_TIME.descriptor(),
        ISO_SPEED_RATINGS.descriptor(),
    ]
}
