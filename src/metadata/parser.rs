use super::decoder;
use super::keys::MetadataKey;
use super::value::{FromMetadataValue, MetadataValue, Properties};

/// Typed lookups into the properties of one decoded image.
///
/// # Example
///
/// ```rust
/// use exiframe::metadata::{keys, MetadataParser, MetadataValue, Properties};
///
/// let mut exif = Properties::new();
/// exif.insert("FNumber".into(), MetadataValue::Float(2.8));
/// let mut properties = Properties::new();
/// properties.insert("{Exif}".into(), MetadataValue::Dictionary(exif));
///
/// let parser = MetadataParser::from_properties(properties);
/// assert_eq!(parser.lookup(&keys::F_NUMBER), Some(2.8));
/// assert_eq!(parser.lookup(&keys::CAMERA_MAKER), None);
/// ```
#[derive(Debug, Clone)]
pub struct MetadataParser {
    properties: Properties,
}

impl MetadataParser {
    /// Decode `bytes`; `None` when they are not a readable image.
    pub fn new(bytes: &[u8]) -> Option<Self> {
        match decoder::decode(bytes) {
            Ok(properties) => Some(Self { properties }),
            Err(e) => {
                log::debug!("Could not decode image properties: {e}");
                None
            }
        }
    }

    pub fn from_properties(properties: Properties) -> Self {
        Self { properties }
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Resolve `key` and read its value as `T`.
    ///
    /// A missing group, a group that is not a dictionary, a missing key and a
    /// value of the wrong type all give `None`.
    pub fn lookup<T: FromMetadataValue>(&self, key: &MetadataKey<T>) -> Option<T> {
        let target = match key.parent {
            Some(parent) => self
                .properties
                .get(parent.name)
                .and_then(MetadataValue::as_dictionary)?,
            None => &self.properties,
        };
        target.get(key.name).and_then(T::from_metadata_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::keys::{self, dictionary, top_level};

    fn group(entries: Vec<(&str, MetadataValue)>) -> MetadataValue {
        MetadataValue::Dictionary(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    fn parser(entries: Vec<(&str, MetadataValue)>) -> MetadataParser {
        MetadataParser::from_properties(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    // ── group resolution ─────────────────────────────────────────────

    #[test]
    fn lookup_inside_group() {
        let p = parser(vec![(
            dictionary::TIFF.name,
            group(vec![("Make", "Canon".into()), ("Model", "EOS R5".into())]),
        )]);
        assert_eq!(p.lookup(&keys::CAMERA_MAKER).as_deref(), Some("Canon"));
        assert_eq!(p.lookup(&keys::CAMERA_MODEL).as_deref(), Some("EOS R5"));
    }

    #[test]
    fn missing_group_is_absent() {
        let p = parser(vec![(dictionary::TIFF.name, group(vec![("Make", "Canon".into())]))]);
        assert_eq!(p.lookup(&keys::LENS_MODEL), None);
        assert_eq!(p.lookup(&keys::F_NUMBER), None);
    }

    #[test]
    fn group_that_is_not_a_dictionary_is_absent() {
        let p = parser(vec![(dictionary::EXIF.name, "not a dictionary".into())]);
        assert_eq!(p.lookup(&keys::F_NUMBER), None);
    }

    #[test]
    fn same_name_in_other_group_is_not_found() {
        // "Make" at top level and under {Exif} must not satisfy a {TIFF} lookup.
        let p = parser(vec![
            ("Make", "Nikon".into()),
            (dictionary::EXIF.name, group(vec![("Make", "Nikon".into())])),
        ]);
        assert_eq!(p.lookup(&keys::CAMERA_MAKER), None);
    }

    #[test]
    fn top_level_key() {
        let p = parser(vec![(top_level::PIXEL_WIDTH, MetadataValue::Integer(6000))]);
        let key: MetadataKey<i64> = MetadataKey::new(top_level::PIXEL_WIDTH, None);
        assert_eq!(p.lookup(&key), Some(6000));
    }

    // ── type interpretation ──────────────────────────────────────────

    #[test]
    fn wrong_type_is_absent_not_coerced() {
        let p = parser(vec![(
            dictionary::EXIF.name,
            group(vec![
                ("FocalLength", "35".into()),
                ("FNumber", "2.8".into()),
                ("LensModel", MetadataValue::Integer(50)),
                ("ISOSpeedRatings", MetadataValue::Integer(400)),
            ]),
        )]);
        assert_eq!(p.lookup(&keys::FOCAL_LENGTH), None);
        assert_eq!(p.lookup(&keys::F_NUMBER), None);
        assert_eq!(p.lookup(&keys::LENS_MODEL), None);
        assert_eq!(p.lookup(&keys::ISO_SPEED_RATINGS), None);
    }

    #[test]
    fn fractional_focal_length_is_not_an_integer() {
        let p = parser(vec![(
            dictionary::EXIF.name,
            group(vec![
                ("FocalLength", MetadataValue::Float(4.2)),
                ("FocalLenIn35mmFilm", MetadataValue::Float(26.0)),
            ]),
        )]);
        assert_eq!(p.lookup(&keys::FOCAL_LENGTH), None);
        assert_eq!(p.lookup(&keys::FOCAL_LENGTH_IN_35MM_FILM), Some(26));
    }

    #[test]
    fn empty_iso_array_is_present() {
        let p = parser(vec![(
            dictionary::EXIF.name,
            group(vec![("ISOSpeedRatings", MetadataValue::Array(Vec::new()))]),
        )]);
        assert_eq!(p.lookup(&keys::ISO_SPEED_RATINGS), Some(Vec::new()));
    }

    // ── construction ─────────────────────────────────────────────────

    #[test]
    fn new_rejects_non_image_bytes() {
        assert!(MetadataParser::new(b"plain text, not a photo").is_none());
        assert!(MetadataParser::new(&[]).is_none());
    }

    #[test]
    fn new_accepts_image_without_exif() {
        let parser = MetadataParser::new(&crate::testkit::png_bytes(2, 2)).unwrap();
        assert_eq!(parser.lookup(&keys::CAMERA_MAKER), None);
        assert!(parser.properties().contains_key(top_level::PIXEL_WIDTH));
    }
}
