use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::display::Caption;
use crate::exif::{self, ExifData};

/// Supported image extensions.
const IMAGE_EXTENSIONS: &[&str] = &[
    // Decoded by both the image probe and the EXIF reader
    "jpg", "jpeg", "png", "webp", "tif", "tiff",
    // EXIF reader only
    "heic", "heif", "avif",
    // RAW containers the EXIF reader understands
    "raf", "cr3",
];

/// The result of reading one image file.
///
/// `exif` is `None` when the file could not be decoded as an image; the
/// caption then carries the fixed placeholder strings.
#[derive(Debug)]
pub struct ProcessResult {
    pub path: PathBuf,
    pub exif: Option<ExifData>,
    pub caption: Caption,
    pub error: Option<String>,
}

/// Collect supported image files from the given paths.
///
/// Accepts a mix of file paths and directory paths. Directories are walked
/// recursively (following symlinks). Only files with supported image extensions
/// are included.
///
/// # Example
///
/// ```rust,no_run
/// use exiframe::pipeline::collect_images;
/// use std::path::PathBuf;
///
/// let images = collect_images(&[
///     PathBuf::from("photo.jpg"),       // single file
///     PathBuf::from("./photos/"),        // entire directory
/// ]);
/// println!("Found {} images", images.len());
/// ```
pub fn collect_images(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_supported_image(path) {
                images.push(path.clone());
            } else {
                log::warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && is_supported_image(p) {
                    images.push(p.to_path_buf());
                }
            }
        } else {
            log::warn!("Path does not exist: {}", path.display());
        }
    }

    images
}

/// Check if a file has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read one image file and format its caption.
///
/// File reading and decoding run on a blocking worker. An unreadable file
/// sets `error`; an undecodable one only leaves `exif` empty.
///
/// # Example
///
/// ```rust,no_run
/// use exiframe::config::Config;
/// use exiframe::pipeline::process_image;
/// use std::path::Path;
///
/// # async fn example() {
/// let result = process_image(Path::new("photo.jpg"), &Config::default()).await;
/// for line in result.caption.lines() {
///     println!("{line}");
/// }
/// # }
/// ```
pub async fn process_image(path: &Path, config: &Config) -> ProcessResult {
    let show_35mm = config.display.show_focal_length_in_35mm_film;
    let owned = path.to_path_buf();

    let read = tokio::task::spawn_blocking(move || {
        std::fs::read(&owned).map(|bytes| exif::read_exif(&bytes))
    })
    .await;

    let (exif, error) = match read {
        Ok(Ok(exif)) => {
            if exif.is_none() {
                log::warn!("Could not decode {} as an image", path.display());
            }
            (exif, None)
        }
        Ok(Err(e)) => (None, Some(format!("Failed to read file: {e}"))),
        Err(e) => (None, Some(format!("Decode task failed: {e}"))),
    };

    ProcessResult {
        path: path.to_path_buf(),
        caption: Caption::new(exif.as_ref(), show_35mm),
        exif,
        error,
    }
}
