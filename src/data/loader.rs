use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use ndarray::{IxDyn, ShapeError};
use thiserror::Error;

use super::filter::matches_probe;
use super::model::{ImageCollection, PixelArray, Probe};

/// Failures while scanning a directory or decoding a matched image.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The directory is missing, not a directory, or unreadable.
    #[error("cannot read directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single directory entry could not be inspected.
    #[error("cannot read entry in {path}")]
    Entry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A matched file is not a decodable image.
    #[error("cannot decode image {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("unexpected pixel layout in {path}")]
    Shape {
        path: PathBuf,
        #[source]
        source: ShapeError,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load every image of `probe` found directly in `directory`.
///
/// Entries are kept when their name starts with the probe's prefix and ends
/// with `.tif`; the result follows directory enumeration order, which is not
/// sorted. Finding nothing is not an error: a warning is logged and an empty
/// collection returned.
pub fn load_images(directory: &Path, probe: Probe) -> Result<ImageCollection, LoadError> {
    let entries = std::fs::read_dir(directory).map_err(|source| LoadError::ReadDir {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut images = ImageCollection::new();

    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Entry {
            path: directory.to_path_buf(),
            source,
        })?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !matches_probe(&file_name, probe) {
            continue;
        }

        let path = entry.path();
        let pixels = decode_file(&path)?;
        log::debug!("decoded {} with shape {:?}", file_name, pixels.shape());
        images.insert(file_name, pixels);
    }

    if images.is_empty() {
        log::warn!(
            "No images found for probe {} in {}!",
            probe.upper_label(),
            directory.display()
        );
    } else {
        log::info!(
            "Loaded {} {} images from {}",
            images.len(),
            probe.upper_label(),
            directory.display()
        );
    }

    Ok(images)
}

/// Decode one image file into a pixel array.
///
/// The file handle lives only inside the reader, so it is closed when this
/// returns, on success or failure. Multi-page TIFFs yield their first page.
pub fn decode_file(path: &Path) -> Result<PixelArray, LoadError> {
    let decode_err = |source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let img = ImageReader::open(path)
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)?;

    to_pixel_array(img).map_err(|source| LoadError::Shape {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// DynamicImage → ndarray
// ---------------------------------------------------------------------------

/// Convert a decoded image keeping its native sample values.
///
/// Single-channel images become `[height, width]`, others
/// `[height, width, channels]`.
pub fn to_pixel_array(img: DynamicImage) -> Result<PixelArray, ShapeError> {
    let height = img.height() as usize;
    let width = img.width() as usize;

    let (channels, data): (usize, Vec<f32>) = match img {
        DynamicImage::ImageLuma8(b) => (1, widen(b.into_raw())),
        DynamicImage::ImageLumaA8(b) => (2, widen(b.into_raw())),
        DynamicImage::ImageRgb8(b) => (3, widen(b.into_raw())),
        DynamicImage::ImageRgba8(b) => (4, widen(b.into_raw())),
        DynamicImage::ImageLuma16(b) => (1, widen(b.into_raw())),
        DynamicImage::ImageLumaA16(b) => (2, widen(b.into_raw())),
        DynamicImage::ImageRgb16(b) => (3, widen(b.into_raw())),
        DynamicImage::ImageRgba16(b) => (4, widen(b.into_raw())),
        DynamicImage::ImageRgb32F(b) => (3, b.into_raw()),
        DynamicImage::ImageRgba32F(b) => (4, b.into_raw()),
        other => (4, other.into_rgba32f().into_raw()),
    };

    let shape: Vec<usize> = if channels == 1 {
        vec![height, width]
    } else {
        vec![height, width, channels]
    };
    PixelArray::from_shape_vec(IxDyn(&shape), data)
}

fn widen<T: Copy + Into<f32>>(raw: Vec<T>) -> Vec<f32> {
    raw.into_iter().map(Into::into).collect()
}
