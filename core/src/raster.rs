//! DICOM to JPEG export
//!
//! The pixel data of the first frame is min-max scaled to 8-bit grayscale,
//! resized with a Lanczos filter and written as `<file name>.jpeg`.

use crate::error::{DicomstarError, Result};
use dicom_object::open_file;
use dicom_pixeldata::PixelDecoder;
use image::imageops::{self, FilterType};
use image::{GrayImage, ImageFormat};
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};

/// Output raster dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterSize {
    pub width: u32,
    pub height: u32,
}

impl RasterSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for RasterSize {
    fn default() -> Self {
        Self::new(256, 256)
    }
}

impl fmt::Display for RasterSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Converts a source image into a viewable raster file
pub trait RasterConverter {
    /// Writes the raster for `source` and returns its path
    fn convert(&self, source: &Path) -> Result<PathBuf>;
}

/// Writes 8-bit grayscale JPEGs into a fixed directory
#[derive(Debug, Clone)]
pub struct JpegConverter {
    output_dir: PathBuf,
    size: RasterSize,
}

impl JpegConverter {
    pub fn new(output_dir: impl Into<PathBuf>, size: RasterSize) -> Self {
        Self {
            output_dir: output_dir.into(),
            size,
        }
    }

    /// Path the raster for `source` is written to
    ///
    /// The full source file name is kept, so `scan.dcm` and `scan.dicom` in
    /// one directory get distinct rasters.
    pub fn output_path(&self, source: &Path) -> PathBuf {
        let name = source
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        self.output_dir.join(format!("{}.jpeg", name))
    }
}

impl RasterConverter for JpegConverter {
    fn convert(&self, source: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let obj = open_file(source)?;
        let pixels = obj.decode_pixel_data()?;

        if pixels.samples_per_pixel() != 1 {
            return Err(DicomstarError::RasterError(format!(
                "expected 1 sample per pixel, found {}",
                pixels.samples_per_pixel()
            )));
        }

        let (columns, rows) = (pixels.columns(), pixels.rows());
        let frame_len = columns as usize * rows as usize;
        let values: Vec<f32> = pixels.to_vec()?;
        let frame = values.get(..frame_len).ok_or_else(|| {
            DicomstarError::RasterError(format!(
                "pixel data holds {} values, expected {}",
                values.len(),
                frame_len
            ))
        })?;

        let gray = GrayImage::from_raw(columns, rows, scale_to_u8(frame)).ok_or_else(|| {
            DicomstarError::RasterError(format!("cannot build {}x{} image", columns, rows))
        })?;
        let resized = imageops::resize(&gray, self.size.width, self.size.height, FilterType::Lanczos3);

        let output = self.output_path(source);
        resized.save_with_format(&output, ImageFormat::Jpeg)?;
        debug!("Wrote {} ({})", output.display(), self.size);

        Ok(output)
    }
}

/// Min-max scales intensities onto `0..=255`
///
/// A constant input (including an empty one) maps to all zeros.
pub fn scale_to_u8(values: &[f32]) -> Vec<u8> {
    let (min, max) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if max > min {
        let range = max - min;
        values
            .iter()
            .map(|&v| ((v - min) / range * 255.0) as u8)
            .collect()
    } else {
        vec![0; values.len()]
    }
}
