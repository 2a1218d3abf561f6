//! Defines the rendered meme returned by the engine.

use std::fmt;
use std::ops::Deref;

use image::ImageFormat;
use mime::{self, Mime};


/// A rendered meme, encoded as PNG.
#[derive(Clone)]
#[must_use = "rendered meme is discarded without being used"]
pub struct CaptionOutput {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl CaptionOutput {
    #[inline]
    pub(super) fn png(dimensions: (u32, u32), bytes: Vec<u8>) -> Self {
        let (width, height) = dimensions;
        CaptionOutput{width, height, bytes}
    }

    #[inline]
    pub fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }

    #[inline]
    pub fn mime_type(&self) -> Mime {
        mime::IMAGE_PNG
    }

    /// Size of the rendered image in pixels, as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Encoded image file.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl Deref for CaptionOutput {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.bytes()
    }
}

impl fmt::Debug for CaptionOutput {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "<{}x{} PNG, {} bytes>", self.width, self.height, self.bytes.len())
    }
}
