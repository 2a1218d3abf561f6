//! Module implementing the drawing surface.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use image::{ExtendedColorType, ImageEncoder, ImageError, Pixel, Rgba, RgbaImage};
use image::codecs::png::PngEncoder;
use thiserror::Error;

use crate::model::Color;


/// Fixed-size RGBA raster that memes are rendered onto.
#[derive(Clone, Debug)]
pub struct Surface {
    canvas: RgbaImage,
}

impl Surface {
    /// Create a fully transparent surface of given size.
    pub fn new(width: u32, height: u32) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::Empty(width, height));
        }
        Ok(Surface{canvas: RgbaImage::new(width, height)})
    }
}

impl Surface {
    #[inline]
    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    /// The underlying image.
    #[inline]
    pub fn as_image(&self) -> &RgbaImage {
        &self.canvas
    }

    #[inline]
    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }

    #[inline]
    pub(super) fn canvas_mut(&mut self) -> &mut RgbaImage {
        &mut self.canvas
    }
}

// Drawing.
impl Surface {
    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        for pixel in self.canvas.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    /// Blend a pixel of given color and coverage onto the surface.
    /// Coordinates outside of the surface are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.width() || y >= self.height() {
            return;
        }
        let alpha = (coverage.max(0.0).min(1.0) * 255.0).round() as u8;
        if alpha == 0 {
            return;
        }
        self.canvas.get_pixel_mut(x, y).blend(&color.to_rgba(alpha));
    }
}

// Export.
impl Surface {
    /// Encode the content of the surface as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, ImageError> {
        let mut bytes = vec![];
        self.write_png(&mut bytes)?;
        Ok(bytes)
    }

    /// Write the content of the surface as a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageError> {
        let path = path.as_ref();
        trace!("Saving {}x{} surface to {}", self.width(), self.height(), path.display());
        let file = File::create(path).map_err(ImageError::IoError)?;
        self.write_png(BufWriter::new(file))
    }

    fn write_png<W: io::Write>(&self, writer: W) -> Result<(), ImageError> {
        let (width, height) = self.dimensions();
        PngEncoder::new(writer)
            .write_image(self.canvas.as_raw(), width, height, ExtendedColorType::Rgba8)
    }
}


/// Error when creating a `Surface`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("surface cannot be empty: {0}x{1}")]
    Empty(u32, u32),
}


#[cfg(test)]
mod tests {
    use image::Rgba;
    use spectral::prelude::*;
    use crate::model::Color;
    use super::{Error, Surface};

    #[test]
    fn empty_surface_is_error() {
        assert_that!(Surface::new(0, 10)).is_err().is_equal_to(Error::Empty(0, 10));
        assert_that!(Surface::new(10, 0)).is_err();
        assert_that!(Surface::new(1, 1)).is_ok();
    }

    #[test]
    fn blend_pixel_out_of_bounds() {
        let mut surface = Surface::new(4, 4).unwrap();
        surface.blend_pixel(-1, 0, Color::white(), 1.0);
        surface.blend_pixel(0, 4, Color::white(), 1.0);
        surface.blend_pixel(100, 100, Color::white(), 1.0);
        assert!(surface.as_image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn blend_and_clear() {
        let mut surface = Surface::new(4, 4).unwrap();
        surface.blend_pixel(1, 2, Color::white(), 1.0);
        assert_eq!(&Rgba([0xff, 0xff, 0xff, 0xff]), surface.as_image().get_pixel(1, 2));

        surface.clear();
        assert_eq!(&Rgba([0, 0, 0, 0]), surface.as_image().get_pixel(1, 2));
    }

    #[test]
    fn encode_png() {
        let mut surface = Surface::new(3, 2).unwrap();
        surface.blend_pixel(0, 0, Color(0xff, 0, 0), 1.0);
        let bytes = surface.encode_png().unwrap();
        assert_that!(bytes.starts_with(b"\x89PNG\r\n\x1a\n")).is_true();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!((3, 2), decoded.dimensions());
        assert_eq!(&Rgba([0xff, 0, 0, 0xff]), decoded.get_pixel(0, 0));
    }
}
