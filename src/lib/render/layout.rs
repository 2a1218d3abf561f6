//! Module computing the geometry of a rendered meme.

use crate::model::{CaptionPair, DEFAULT_COLOR, DEFAULT_OUTLINE_COLOR};
use super::text::{Style, Typeface};
use super::wrap::wrap_text;


/// Distance of both captions from the surface edges, in pixels.
pub const MARGIN: f32 = 20.0;
/// Font size is the surface width divided by this.
pub const FONT_SIZE_DIVISOR: f32 = 15.0;
/// Stroke width is the font size divided by this.
pub const STROKE_DIVISOR: f32 = 15.0;
/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;


/// Where and how large the source image is drawn on the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub scale: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    /// Fit an image inside the surface, preserving its aspect ratio
    /// and centering it on both axes.
    ///
    /// Returns `None` when either size has a zero dimension.
    pub fn fit(surface: (u32, u32), image: (u32, u32)) -> Option<Self> {
        let (sw, sh) = surface;
        let (iw, ih) = image;
        if sw == 0 || sh == 0 || iw == 0 || ih == 0 {
            return None;
        }
        let (sw, sh) = (sw as f32, sh as f32);
        let (iw, ih) = (iw as f32, ih as f32);

        let scale = (sw / iw).min(sh / ih);
        let width = iw * scale;
        let height = ih * scale;
        Some(Placement{
            scale,
            x: (sw - width) / 2.0,
            y: (sh - height) / 2.0,
            width,
            height,
        })
    }

    /// Size of the resampled image in whole pixels (never zero).
    pub fn pixel_size(&self) -> (u32, u32) {
        let w = self.width.round().max(1.0) as u32;
        let h = self.height.round().max(1.0) as u32;
        (w, h)
    }

    /// Top-left corner of the resampled image in whole pixels.
    pub fn pixel_offset(&self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}


/// Which edge of a line's text box its anchor `y` refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Baseline {
    /// Text hangs below the anchor.
    Top,
    /// Text sits above the anchor.
    Bottom,
}

/// A single laid out line of caption text.
///
/// `x` is the horizontal center of the line.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub baseline: Baseline,
}


/// Layout of both captions on a surface.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout {
    pub font_size: f32,
    pub stroke_width: f32,
    pub line_height: f32,
    /// Width that the wrapped lines should fit in.
    pub max_width: f32,
    pub top: Vec<Line>,
    pub bottom: Vec<Line>,
}

impl TextLayout {
    pub fn compute<T: Typeface + ?Sized>(surface: (u32, u32),
                                         captions: &CaptionPair,
                                         typeface: &T) -> Self {
        let (width, height) = (surface.0 as f32, surface.1 as f32);
        let font_size = (width / FONT_SIZE_DIVISOR).floor();
        let stroke_width = font_size / STROKE_DIVISOR;
        let line_height = font_size * LINE_HEIGHT_FACTOR;
        let max_width = width - 2.0 * MARGIN;
        let center = width / 2.0;

        let measure = |s: &str| typeface.text_width(s, font_size);

        let mut top = vec![];
        if !captions.top_text.is_empty() {
            let lines = wrap_text(&captions.top_text, max_width, &measure);
            top = lines.into_iter().enumerate().map(|(i, text)| Line{
                text,
                x: center,
                y: MARGIN + i as f32 * line_height,
                baseline: Baseline::Top,
            }).collect();
        }

        let mut bottom = vec![];
        if !captions.bottom_text.is_empty() {
            let lines = wrap_text(&captions.bottom_text, max_width, &measure);
            let origin = height - MARGIN - (lines.len() - 1) as f32 * line_height;
            bottom = lines.into_iter().enumerate().map(|(i, text)| Line{
                text,
                x: center,
                y: origin + i as f32 * line_height,
                baseline: Baseline::Bottom,
            }).collect();
        }

        TextLayout{font_size, stroke_width, line_height, max_width, top, bottom}
    }

    /// Style that the captions are drawn with.
    pub fn style(&self) -> Style {
        Style{
            size: self.font_size,
            fill: DEFAULT_COLOR,
            stroke: DEFAULT_OUTLINE_COLOR,
            stroke_width: self.stroke_width,
        }
    }

    /// All the laid out lines, top caption first.
    pub fn lines(&self) -> impl Iterator<Item=&Line> {
        self.top.iter().chain(&self.bottom)
    }
}


/// Complete layout of a meme: image placement and captions.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub placement: Option<Placement>,
    pub text: TextLayout,
}

impl Layout {
    pub fn compute<T: Typeface + ?Sized>(surface: (u32, u32),
                                         image: (u32, u32),
                                         captions: &CaptionPair,
                                         typeface: &T) -> Self {
        Layout{
            placement: Placement::fit(surface, image),
            text: TextLayout::compute(surface, captions, typeface),
        }
    }
}
