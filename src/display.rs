//! Display strings for the framed overlay.
//!
//! Every function accepts `Option<&ExifData>` so the "no photo yet" and
//! "photo could not be decoded" states render with the same fixed defaults.

use serde::Serialize;

use crate::exif::ExifData;

pub const UNKNOWN_MAKER: &str = "Unknown Maker";
pub const UNKNOWN_CAMERA: &str = "Unknown Camera";
pub const UNKNOWN_LENS: &str = "Unknown Lens";

pub fn camera_maker(exif: Option<&ExifData>) -> String {
    exif.and_then(|e| e.camera_maker.clone())
        .unwrap_or_else(|| UNKNOWN_MAKER.to_string())
}

pub fn camera_model(exif: Option<&ExifData>) -> String {
    exif.and_then(|e| e.camera_model.clone())
        .unwrap_or_else(|| UNKNOWN_CAMERA.to_string())
}

pub fn lens_model(exif: Option<&ExifData>) -> String {
    exif.and_then(|e| e.lens_model.clone())
        .unwrap_or_else(|| UNKNOWN_LENS.to_string())
}

/// `"{mm}mm"`, using the 35mm-equivalent value when `show_focal_length_in_35mm_film` is set.
pub fn focal_length(exif: Option<&ExifData>, show_focal_length_in_35mm_film: bool) -> String {
    let millimetres = exif
        .and_then(|e| {
            if show_focal_length_in_35mm_film {
                e.focal_length_in_35mm_film
            } else {
                e.focal_length
            }
        })
        .unwrap_or(0);
    format!("{millimetres}mm")
}

/// `"f/2.8"`, always with one decimal place.
pub fn aperture(exif: Option<&ExifData>) -> String {
    let f_number = exif.and_then(|e| e.f_number).unwrap_or(0.0);
    format!("f/{f_number:.1}")
}

/// `"1/200s"`, or `"0s"` without an exposure time.
pub fn shutter_speed(exif: Option<&ExifData>) -> String {
    let expression = exif
        .and_then(|e| e.exposure_time)
        .map(|fraction| fraction.fractional_expression())
        .unwrap_or_else(|| "0".to_string());
    format!("{expression}s")
}

pub fn iso(exif: Option<&ExifData>) -> String {
    format!("ISO{}", exif.and_then(|e| e.iso).unwrap_or(0))
}

/// All overlay strings for one record, formatted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caption {
    pub camera_maker: String,
    pub camera_model: String,
    pub lens_model: String,
    pub focal_length: String,
    pub aperture: String,
    pub shutter_speed: String,
    pub iso: String,
}

impl Caption {
    pub fn new(exif: Option<&ExifData>, show_focal_length_in_35mm_film: bool) -> Self {
        Self {
            camera_maker: camera_maker(exif),
            camera_model: camera_model(exif),
            lens_model: lens_model(exif),
            focal_length: focal_length(exif, show_focal_length_in_35mm_film),
            aperture: aperture(exif),
            shutter_speed: shutter_speed(exif),
            iso: iso(exif),
        }
    }

    /// The overlay's three rows: body, lens, exposure settings.
    pub fn lines(&self) -> [String; 3] {
        [
            format!("{} {}", self.camera_maker, self.camera_model),
            self.lens_model.clone(),
            format!(
                "{} {} {} {}",
                self.focal_length, self.aperture, self.shutter_speed, self.iso
            ),
        ]
    }
}
