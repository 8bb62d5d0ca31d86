use nom_exif::{EntryValue, ExifIter, ExifTag, MediaParser, MediaSource};
use std::io::Cursor;
use thiserror::Error;

use super::keys::{dictionary, top_level, DictionaryKey};
use super::value::{MetadataValue, Properties};

/// IFD index of the primary image (1 is the embedded thumbnail).
const PRIMARY_IFD: usize = 0;

/// Tags whose value is a count-N list even when a file stores a single element.
const ARRAY_TAGS: &[ExifTag] = &[
    ExifTag::ISOSpeedRatings,
    ExifTag::SubjectArea,
    ExifTag::LensSpecification,
];

/// Offset tags that only link IFDs together.
const POINTER_TAGS: &[ExifTag] = &[ExifTag::ExifOffset, ExifTag::GPSInfo, ExifTag::InteropOffset];

/// Tags reported under a different name in the properties dictionary.
const RENAMED_TAGS: &[(ExifTag, &str)] = &[
    (ExifTag::FocalLengthIn35mmFilm, "FocalLenIn35mmFilm"),
    (ExifTag::ExifImageWidth, "PixelXDimension"),
    (ExifTag::ExifImageHeight, "PixelYDimension"),
    (ExifTag::CreateDate, "DateTimeDigitized"),
    (ExifTag::ModifyDate, "DateTime"),
    (ExifTag::WhiteBalanceMode, "WhiteBalance"),
];

/// Tags that live in the Exif sub-IFD. Every other non-GPS tag is filed under `{TIFF}`.
const EXIF_IFD_TAGS: &[ExifTag] = &[
    ExifTag::ExposureTime,
    ExifTag::FNumber,
    ExifTag::ExposureProgram,
    ExifTag::SpectralSensitivity,
    ExifTag::ISOSpeedRatings,
    ExifTag::OECF,
    ExifTag::SensitivityType,
    ExifTag::RecommendedExposureIndex,
    ExifTag::ExifVersion,
    ExifTag::DateTimeOriginal,
    ExifTag::CreateDate,
    ExifTag::OffsetTime,
    ExifTag::OffsetTimeOriginal,
    ExifTag::OffsetTimeDigitized,
    ExifTag::ComponentsConfiguration,
    ExifTag::ShutterSpeedValue,
    ExifTag::ApertureValue,
    ExifTag::BrightnessValue,
    ExifTag::ExposureBiasValue,
    ExifTag::MaxApertureValue,
    ExifTag::SubjectDistance,
    ExifTag::MeteringMode,
    ExifTag::LightSource,
    ExifTag::Flash,
    ExifTag::FocalLength,
    ExifTag::SubjectArea,
    ExifTag::MakerNote,
    ExifTag::UserComment,
    ExifTag::SubSecTime,
    ExifTag::SubSecTimeOriginal,
    ExifTag::SubSecTimeDigitized,
    ExifTag::FlashPixVersion,
    ExifTag::ColorSpace,
    ExifTag::ExifImageWidth,
    ExifTag::ExifImageHeight,
    ExifTag::RelatedSoundFile,
    ExifTag::FlashEnergy,
    ExifTag::FocalPlaneXResolution,
    ExifTag::FocalPlaneYResolution,
    ExifTag::FocalPlaneResolutionUnit,
    ExifTag::SubjectLocation,
    ExifTag::ExposureIndex,
    ExifTag::SensingMethod,
    ExifTag::FileSource,
    ExifTag::SceneType,
    ExifTag::CFAPattern,
    ExifTag::CustomRendered,
    ExifTag::ExposureMode,
    ExifTag::WhiteBalanceMode,
    ExifTag::DigitalZoomRatio,
    ExifTag::FocalLengthIn35mmFilm,
    ExifTag::SceneCaptureType,
    ExifTag::GainControl,
    ExifTag::Contrast,
    ExifTag::Saturation,
    ExifTag::Sharpness,
    ExifTag::DeviceSettingDescription,
    ExifTag::SubjectDistanceRange,
    ExifTag::ImageUniqueID,
    ExifTag::LensSpecification,
    ExifTag::LensMake,
    ExifTag::LensModel,
    ExifTag::Gamma,
];

/// Why bytes could not be turned into image properties.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("image container not recognized")]
    Unrecognized,

    #[error("image carries no readable properties")]
    Empty,
}

/// Decode image bytes into a nested properties mapping.
///
/// The layout mirrors the platform image-properties dictionary:
///
/// | Location | Contents |
/// |----------|----------|
/// | top level | `PixelWidth`, `PixelHeight`, `Orientation`, `DPIWidth`, `DPIHeight` |
/// | `{TIFF}` | primary-IFD tags (`Make`, `Model`, `Software`, …) |
/// | `{Exif}` | Exif sub-IFD tags (`ExposureTime`, `FNumber`, `LensModel`, …) |
/// | `{ExifAux}` | `LensInfo` |
/// | `{GPS}` | GPS tags without their `GPS` prefix |
///
/// Pixel dimensions come from the `image` crate's header probe and the tag
/// groups from nom-exif, so a container either one understands is accepted.
/// Bytes neither recognises fail with [`DecodeError::Unrecognized`].
pub fn decode(bytes: &[u8]) -> Result<Properties, DecodeError> {
    let mut properties = Properties::new();
    let mut recognized = false;

    if let Some((width, height)) = probe_dimensions(bytes) {
        recognized = true;
        properties.insert(top_level::PIXEL_WIDTH.to_string(), i64::from(width).into());
        properties.insert(top_level::PIXEL_HEIGHT.to_string(), i64::from(height).into());
    }

    match parse_exif(bytes) {
        Ok(Some(iter)) => {
            recognized = true;
            collect_groups(iter, &mut properties);
        }
        Ok(None) => log::debug!("Container has no EXIF support"),
        Err(e) => log::debug!("No EXIF data found: {e}"),
    }

    if !recognized {
        return Err(DecodeError::Unrecognized);
    }
    if properties.is_empty() {
        return Err(DecodeError::Empty);
    }

    promote_top_level(&mut properties);
    Ok(properties)
}

fn probe_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?;
    reader.format()?;
    reader.into_dimensions().ok()
}

fn parse_exif(bytes: &[u8]) -> nom_exif::Result<Option<ExifIter>> {
    let ms = MediaSource::seekable(Cursor::new(bytes))?;
    if !ms.has_exif() {
        return Ok(None);
    }
    let mut parser = MediaParser::new();
    let iter: ExifIter = parser.parse(ms)?;
    Ok(Some(iter))
}

/// Sort primary-IFD entries into their groups and insert non-empty groups into `properties`.
fn collect_groups(iter: ExifIter, properties: &mut Properties) {
    let mut tiff = Properties::new();
    let mut exif = Properties::new();
    let mut exif_aux = Properties::new();
    let mut gps = Properties::new();

    for entry in iter {
        if entry.ifd_index() != PRIMARY_IFD {
            continue;
        }
        let Some(tag) = entry.tag() else {
            log::trace!("Skipping unrecognized tag 0x{:04x}", entry.tag_code());
            continue;
        };
        if POINTER_TAGS.contains(&tag) {
            continue;
        }
        let Some(value) = entry.get_value().and_then(|v| convert_value(tag, v)) else {
            log::trace!("Skipping unreadable value for {tag}");
            continue;
        };

        let (group, name) = classify(tag);
        log::trace!("{}.{name} = {value}", group.name);

        if tag == ExifTag::LensSpecification {
            exif_aux.insert("LensInfo".to_string(), value.clone());
        }

        let target = match group {
            g if g == dictionary::TIFF => &mut tiff,
            g if g == dictionary::GPS => &mut gps,
            _ => &mut exif,
        };
        target.insert(name, value);
    }

    for (key, group) in [
        (dictionary::TIFF, tiff),
        (dictionary::EXIF, exif),
        (dictionary::EXIF_AUX, exif_aux),
        (dictionary::GPS, gps),
    ] {
        if !group.is_empty() {
            properties.insert(key.name.to_string(), MetadataValue::Dictionary(group));
        }
    }
}

/// Which group a tag belongs to, and its key name there.
fn classify(tag: ExifTag) -> (DictionaryKey, String) {
    let name = RENAMED_TAGS
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, n)| n.to_string())
        .unwrap_or_else(|| tag.to_string());

    let code = tag.code();
    if code <= 0x001f {
        if let Some(stripped) = name.strip_prefix("GPS") {
            return (dictionary::GPS, stripped.to_string());
        }
    }
    if EXIF_IFD_TAGS.contains(&tag) {
        (dictionary::EXIF, name)
    } else {
        (dictionary::TIFF, name)
    }
}

fn convert_value(tag: ExifTag, value: &EntryValue) -> Option<MetadataValue> {
    let converted = match value {
        EntryValue::Text(v) => MetadataValue::String(v.trim_end_matches('\0').to_string()),
        EntryValue::U8(v) => MetadataValue::Integer(i64::from(*v)),
        EntryValue::U16(v) => MetadataValue::Integer(i64::from(*v)),
        EntryValue::U32(v) => MetadataValue::Integer(i64::from(*v)),
        EntryValue::U64(v) => MetadataValue::Integer(i64::try_from(*v).ok()?),
        EntryValue::I8(v) => MetadataValue::Integer(i64::from(*v)),
        EntryValue::I16(v) => MetadataValue::Integer(i64::from(*v)),
        EntryValue::I32(v) => MetadataValue::Integer(i64::from(*v)),
        EntryValue::I64(v) => MetadataValue::Integer(*v),
        EntryValue::F32(v) => MetadataValue::Float(f64::from(*v)),
        EntryValue::F64(v) => MetadataValue::Float(*v),
        EntryValue::URational(r) => MetadataValue::Float(r.as_float()),
        EntryValue::IRational(r) => MetadataValue::Float(r.as_float()),
        EntryValue::URationalArray(rs) => {
            MetadataValue::Array(rs.iter().map(|r| MetadataValue::Float(r.as_float())).collect())
        }
        EntryValue::IRationalArray(rs) => {
            MetadataValue::Array(rs.iter().map(|r| MetadataValue::Float(r.as_float())).collect())
        }
        EntryValue::U8Array(vs) => integer_array(vs.iter().copied()),
        EntryValue::U16Array(vs) => integer_array(vs.iter().copied()),
        EntryValue::U32Array(vs) => integer_array(vs.iter().copied()),
        EntryValue::Undefined(bytes) => MetadataValue::Bytes(bytes.clone()),
        other => MetadataValue::String(other.to_string()),
    };

    if ARRAY_TAGS.contains(&tag) && converted.as_array().is_none() {
        return Some(MetadataValue::Array(vec![converted]));
    }
    Some(converted)
}

fn integer_array<T: Into<i64>>(values: impl Iterator<Item = T>) -> MetadataValue {
    MetadataValue::Array(values.map(|v| MetadataValue::Integer(v.into())).collect())
}

/// Copy orientation and resolution out of `{TIFF}` to the top level.
fn promote_top_level(properties: &mut Properties) {
    let Some(tiff) = properties
        .get(dictionary::TIFF.name)
        .and_then(MetadataValue::as_dictionary)
        .cloned()
    else {
        return;
    };

    for (source, target) in [
        ("Orientation", top_level::ORIENTATION),
        ("XResolution", top_level::DPI_WIDTH),
        ("YResolution", top_level::DPI_HEIGHT),
    ] {
        if let Some(value) = tiff.get(source) {
            properties
                .entry(target.to_string())
                .or_insert_with(|| value.clone());
        }
    }
}
