//! # Frame Types
//!
//! A decoded camera image: packed 24-bit RGB with explicit dimensions.

use std::fmt;

use image::{Rgb, RgbImage};

use crate::error::{PreviewError, PreviewResult};

/// Width of the canonical capture resolution.
pub const BASE_WIDTH: u32 = 640;

/// Height of the canonical capture resolution.
pub const BASE_HEIGHT: u32 = 480;

const WHITE: [u8; 3] = [255, 255, 255];

// ============================================
// FRAME
// ============================================

/// A single decoded frame from the camera.
///
/// ## Plain English
///
/// One "photograph": a grid of pixels, each with a red, green and blue
/// byte. Once a frame is handed to the buffer nobody edits it again;
/// resizing makes a brand new frame.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Wraps an existing image.
    ///
    /// Fails if the image has no pixels.
    pub fn from_image(image: RgbImage) -> PreviewResult<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PreviewError::EmptyFrame { width, height });
        }
        Ok(Self { image })
    }

    /// Builds a frame from packed RGB bytes (row-major, 3 bytes per pixel).
    ///
    /// ## Parameters
    /// - `width`: Image width in pixels
    /// - `height`: Image height in pixels
    /// - `data`: Exactly `width × height × 3` bytes
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> PreviewResult<Self> {
        if width == 0 || height == 0 {
            return Err(PreviewError::EmptyFrame { width, height });
        }

        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(PreviewError::InvalidFrame {
                expected,
                got: data.len(),
            });
        }

        let image = RgbImage::from_raw(width, height, data).ok_or(PreviewError::InvalidFrame {
            expected,
            got: expected,
        })?;
        Ok(Self { image })
    }

    /// A frame where every pixel has the same colour.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> PreviewResult<Self> {
        Self::from_image(RgbImage::from_pixel(width, height, Rgb(rgb)))
    }

    /// The placeholder every buffer slot starts with: 640×480 solid white.
    pub fn blank() -> Self {
        Self {
            image: RgbImage::from_pixel(BASE_WIDTH, BASE_HEIGHT, Rgb(WHITE)),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Returns the RGB value at `(x, y)`.
    ///
    /// Panics if the coordinate is outside the frame, like indexing a slice.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }

    /// Packed RGB bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Size of the pixel data in bytes (width × height × 3).
    pub fn byte_size(&self) -> usize {
        self.image.as_raw().len()
    }
}

// Pixel data is far too large to be useful in debug output.
impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

// ============================================
// TESTS
// ============================================
