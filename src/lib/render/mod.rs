//! Module implementing the meme renderer.
//!
//! Rendering takes a surface, a source image and a pair of captions,
//! and paints the captioned meme onto the surface:
//! the image is scaled to fit inside the surface and centered,
//! the top caption hangs from the top margin while the bottom caption
//! grows upward from the bottom margin.

mod layout;
mod surface;
mod text;
mod wrap;



pub use self::layout::{Baseline, Layout, Line, Placement, TextLayout,
                       FONT_SIZE_DIVISOR, LINE_HEIGHT_FACTOR, MARGIN, STROKE_DIVISOR};
pub use self::surface::{Error as SurfaceError, Surface};
pub use self::text::{check, NoText, Style, Typeface, VMetrics};
pub use self::wrap::wrap_text;


use image::{imageops, DynamicImage, GenericImageView};
use image::imageops::FilterType;

use crate::model::CaptionPair;


/// Filter used to resample the source image when no other is configured.
pub const DEFAULT_FILTER: FilterType = FilterType::Lanczos3;


/// Render a meme onto given surface.
///
/// The surface is cleared first, so its previous content never leaks
/// into the result. Rendering cannot fail: a degenerate image is skipped
/// and empty captions simply draw nothing.
///
/// Returns the layout that was drawn.
#[inline]
pub fn render<T: Typeface + ?Sized>(surface: &mut Surface,
                                    image: &DynamicImage,
                                    captions: &CaptionPair,
                                    typeface: &T) -> Layout {
    render_with(surface, image, captions, typeface, DEFAULT_FILTER)
}

/// Render a meme onto given surface, resampling the image with given filter.
pub fn render_with<T: Typeface + ?Sized>(surface: &mut Surface,
                                         image: &DynamicImage,
                                         captions: &CaptionPair,
                                         typeface: &T,
                                         filter: FilterType) -> Layout {
    surface.clear();
    let layout = Layout::compute(surface.dimensions(), image.dimensions(), captions, typeface);
    match layout.placement {
        Some(ref placement) => draw_image(surface, image, placement, filter),
        None => warn!("Skipping a degenerate image of size {}x{}", image.width(), image.height()),
    }
    draw_text(surface, &layout.text, typeface);
    layout
}

/// Draw the image onto the surface at given placement.
fn draw_image(surface: &mut Surface,
              image: &DynamicImage,
              placement: &Placement,
              filter: FilterType) {
    let (width, height) = placement.pixel_size();
    let (x, y) = placement.pixel_offset();
    debug!("Drawing {}x{} image as {}x{} at ({}, {})",
        image.width(), image.height(), width, height, x, y);

    let resized = if (width, height) == image.dimensions() {
        image.to_rgba8()
    } else {
        imageops::resize(image, width, height, filter)
    };
    imageops::replace(surface.canvas_mut(), &resized, x, y);
}

/// Draw the laid out caption lines onto the surface.
fn draw_text<T: Typeface + ?Sized>(surface: &mut Surface, layout: &TextLayout, typeface: &T) {
    if layout.top.is_empty() && layout.bottom.is_empty() {
        trace!("No captions to draw");
        return;
    }
    let style = layout.style();
    trace!("Caption style: {:?}", style);

    for line in layout.lines() {
        trace!("Drawing line {:?} at ({}, {})", line.text, line.x, line.y);
        text::draw_line(surface, typeface, line, &style);
    }
}
