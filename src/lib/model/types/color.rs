//! Module implementing the `Color` type.

use std::fmt;

use image::Rgba;


/// RGB color used for caption fill and outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    #[inline]
    pub fn white() -> Self {
        Self::gray(0xff)
    }

    #[inline]
    pub fn black() -> Self {
        Self::gray(0x0)
    }

    /// Create a gray color of given intensity.
    #[inline]
    pub fn gray(value: u8) -> Self {
        Color(value, value, value)
    }

    /// Pixel value of this color with given opacity.
    #[inline]
    pub fn to_rgba(self, alpha: u8) -> Rgba<u8> {
        let Color(r, g, b) = self;
        Rgba([r, g, b, alpha])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let Color(r, g, b) = *self;
        write!(fmt, "#{:0>2x}{:0>2x}{:0>2x}", r, g, b)
    }
}
