//! The stego image as a read-only grid of 8-bit RGB samples.

use crate::error::Result;
use crate::CHANNELS;
use image::io::Reader as ImageReader;
use image::{DynamicImage, ImageError, RgbImage};
use log::info;
use std::path::Path;

/// An H x W image with exactly three 8-bit samples per pixel.
#[derive(Debug, Clone)]
pub struct Carrier {
    width: usize,
    height: usize,
    // Interleaved RGB, row-major.
    samples: Vec<u8>,
}

impl Carrier {
    /// Decodes any format the `image` crate understands and converts it to
    /// RGB8. The format is sniffed from the file content, not the extension.
    /// Alpha is dropped and grayscale is expanded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(ImageError::IoError)?
            .decode()?;
        let carrier = Self::from_image(&img);
        info!(
            "Loaded carrier '{}' ({}x{})",
            path.display(),
            carrier.width,
            carrier.height
        );
        Ok(carrier)
    }

    pub fn from_image(img: &DynamicImage) -> Self {
        Self::from_rgb(img.to_rgb8())
    }

    pub fn from_rgb(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width: width as usize,
            height: height as usize,
            samples: img.into_raw(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw sample of `channel` at (`row`, `col`).
    ///
    /// Panics if the coordinates fall outside the image; callers only index
    /// inside whole blocks.
    #[inline]
    pub fn sample(&self, row: usize, col: usize, channel: usize) -> u8 {
        debug_assert!(channel < CHANNELS);
        self.samples[(row * self.width + col) * CHANNELS + channel]
    }
}
