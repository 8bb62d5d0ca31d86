use serde::Serialize;

use crate::fraction::Fraction;
use crate::metadata::{keys, MetadataParser};

/// Camera and lens metadata extracted from one photo.
///
/// Every field is independently optional: a missing lens model says nothing
/// about whether the ISO or exposure time are present. A record is built once
/// per decoded photo and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExifData {
    /// The original image bytes, for the rendering surface.
    #[serde(skip)]
    pub image_data: Option<Vec<u8>>,
    pub camera_maker: Option<String>,
    pub camera_model: Option<String>,
    pub lens_maker: Option<String>,
    pub lens_model: Option<String>,
    /// Millimetres.
    pub focal_length: Option<i64>,
    /// Millimetres, 35mm-film equivalent.
    pub focal_length_in_35mm_film: Option<i64>,
    pub f_number: Option<f64>,
    /// APEX shutter speed value as stored in the file.
    pub shutter_speed_value: Option<f64>,
    pub exposure_time: Option<Fraction>,
    pub iso: Option<i64>,
}

impl ExifData {
    /// Build a record from an already-decoded parser.
    ///
    /// Each field is looked up on its own; a missing or mistyped field leaves
    /// only that field empty. The exposure time is converted to a [`Fraction`]
    /// and the first ISO rating is kept (an empty rating list gives no ISO).
    pub fn from_parser(image_data: Vec<u8>, parser: &MetadataParser) -> Self {
        let exposure_time = parser
            .lookup(&keys::EXPOSURE_TIME)
            .and_then(|seconds| match Fraction::from_decimal(seconds) {
                Ok(fraction) => Some(fraction),
                Err(e) => {
                    log::warn!("Ignoring exposure time: {e}");
                    None
                }
            });

        Self {
            image_data: Some(image_data),
            camera_maker: parser.lookup(&keys::CAMERA_MAKER),
            camera_model: parser.lookup(&keys::CAMERA_MODEL),
            lens_maker: parser.lookup(&keys::LENS_MAKER),
            lens_model: parser.lookup(&keys::LENS_MODEL),
            focal_length: parser.lookup(&keys::FOCAL_LENGTH),
            focal_length_in_35mm_film: parser.lookup(&keys::FOCAL_LENGTH_IN_35MM_FILM),
            f_number: parser.lookup(&keys::F_NUMBER),
            shutter_speed_value: parser.lookup(&keys::SHUTTER_SPEED),
            exposure_time,
            iso: parser
                .lookup(&keys::ISO_SPEED_RATINGS)
                .and_then(|ratings| ratings.first().copied()),
        }
    }
}

/// Extract an [`ExifData`] record from image bytes.
///
/// Returns `None` only when the bytes cannot be decoded as an image at all.
/// An image without EXIF data yields a record whose metadata fields are all
/// `None`.
///
/// # Example
///
/// ```rust,no_run
/// use exiframe::exif::read_exif;
///
/// let bytes = std::fs::read("photo.jpg").unwrap();
/// if let Some(exif) = read_exif(&bytes) {
///     println!("Camera: {:?}", exif.camera_model);
/// }
/// ```
pub fn read_exif(bytes: &[u8]) -> Option<ExifData> {
    let parser = MetadataParser::new(bytes)?;
    let data = ExifData::from_parser(bytes.to_vec(), &parser);
    log::debug!(
        "Read EXIF: maker={:?} model={:?} lens={:?}",
        data.camera_maker,
        data.camera_model,
        data.lens_model
    );
    Some(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{keys::dictionary, MetadataValue, Properties};
    use crate::testkit::{self, Field};

    fn exif_group(entries: Vec<(&str, MetadataValue)>) -> MetadataParser {
        let group: Properties = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let mut properties = Properties::new();
        properties.insert(dictionary::EXIF.name.to_string(), MetadataValue::Dictionary(group));
        MetadataParser::from_properties(properties)
    }

    // ── from_parser ──────────────────────────────────────────────────

    #[test]
    fn exposure_time_becomes_fraction() {
        let parser = exif_group(vec![("ExposureTime", MetadataValue::Float(0.005))]);
        let data = ExifData::from_parser(Vec::new(), &parser);
        assert_eq!(data.exposure_time, Some(Fraction::new(1, 200)));
    }

    #[test]
    fn invalid_exposure_time_is_dropped() {
        let parser = exif_group(vec![
            ("ExposureTime", MetadataValue::Float(f64::NAN)),
            ("FNumber", MetadataValue::Float(4.0)),
        ]);
        let data = ExifData::from_parser(Vec::new(), &parser);
        assert_eq!(data.exposure_time, None);
        assert_eq!(data.f_number, Some(4.0));
    }

    #[test]
    fn first_iso_rating_is_used() {
        let parser = exif_group(vec![("ISOSpeedRatings", vec![800_i64, 1600].into())]);
        let data = ExifData::from_parser(Vec::new(), &parser);
        assert_eq!(data.iso, Some(800));
    }

    #[test]
    fn empty_iso_ratings_give_no_iso() {
        let parser = exif_group(vec![("ISOSpeedRatings", MetadataValue::Array(Vec::new()))]);
        let data = ExifData::from_parser(Vec::new(), &parser);
        assert_eq!(data.iso, None);
    }

    #[test]
    fn fields_are_independent() {
        let parser = exif_group(vec![
            ("LensModel", "RF24-70mm F2.8 L IS USM".into()),
            ("FocalLength", "not a number".into()),
        ]);
        let data = ExifData::from_parser(vec![1, 2, 3], &parser);
        assert_eq!(data.lens_model.as_deref(), Some("RF24-70mm F2.8 L IS USM"));
        assert_eq!(data.focal_length, None);
        assert_eq!(data.camera_maker, None);
        assert_eq!(data.image_data.as_deref(), Some(&[1_u8, 2, 3][..]));
    }

    // ── read_exif ────────────────────────────────────────────────────

    #[test]
    fn read_exif_rejects_undecodable_bytes() {
        assert!(read_exif(b"GIF? no, just text").is_none());
    }

    #[test]
    fn read_exif_without_metadata_keeps_image() {
        let png = testkit::png_bytes(4, 4);
        let data = read_exif(&png).unwrap();
        assert_eq!(data.image_data.as_ref(), Some(&png));
        assert_eq!(
            ExifData {
                image_data: None,
                ..data
            },
            ExifData::default()
        );
    }

    #[test]
    fn read_exif_from_jpeg() {
        let jpeg = testkit::jpeg_with_exif(
            &[
                (0x010f, Field::Ascii("SONY")),
                (0x0110, Field::Ascii("ILCE-7M4")),
            ],
            &[
                (0x829a, Field::Rational(1, 200)),
                (0x829d, Field::Rational(28, 10)),
                (0x8827, Field::Shorts(&[800, 1600])),
                (0x9201, Field::SRational(764, 100)),
                (0x920a, Field::Rational(35, 1)),
                (0xa405, Field::Short(52)),
                (0xa433, Field::Ascii("Sony")),
                (0xa434, Field::Ascii("FE 35mm F1.8")),
            ],
        );
        let data = read_exif(&jpeg).unwrap();

        assert_eq!(data.camera_maker.as_deref(), Some("SONY"));
        assert_eq!(data.camera_model.as_deref(), Some("ILCE-7M4"));
        assert_eq!(data.lens_maker.as_deref(), Some("Sony"));
        assert_eq!(data.lens_model.as_deref(), Some("FE 35mm F1.8"));
        assert_eq!(data.focal_length, Some(35));
        assert_eq!(data.focal_length_in_35mm_film, Some(52));
        assert_eq!(data.f_number, Some(2.8));
        assert_eq!(data.exposure_time, Some(Fraction::new(1, 200)));
        assert_eq!(data.iso, Some(800));
        assert_eq!(data.shutter_speed_value, Some(7.64));
        assert_eq!(data.image_data.as_ref(), Some(&jpeg));
    }

    #[test]
    fn read_exif_single_iso_rating() {
        let jpeg = testkit::jpeg_with_exif(&[], &[(0x8827, Field::Short(400))]);
        assert_eq!(read_exif(&jpeg).unwrap().iso, Some(400));
    }
}
