//! Module responsible for rendering text.

use std::collections::BTreeSet;
use std::f32::consts::PI;

use itertools::Itertools;
use rusttype::{point, Font, GlyphId, Scale};

use crate::model::Color;
use super::layout::{Baseline, Line};
use super::surface::Surface;


/// Number of shifted copies of the text that make up its outline.
const OUTLINE_COPIES: usize = 8;


/// Vertical metrics of a typeface at particular size.
///
/// `ascent` is positive (above the baseline),
/// `descent` is usually negative (below the baseline).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VMetrics {
    pub ascent: f32,
    pub descent: f32,
}

/// A typeface that captions can be measured and drawn with.
pub trait Typeface {
    /// Width of given single line of text when rendered at given size.
    fn text_width(&self, text: &str, size: f32) -> f32;

    /// Vertical metrics at given size.
    fn v_metrics(&self, size: f32) -> VMetrics;

    /// Rasterize a line of text with its baseline starting at `(x, y)`.
    ///
    /// `plot` receives pixel coordinates and the coverage of that pixel
    /// in the range of 0.0 to 1.0.
    fn rasterize(&self, text: &str, size: f32, x: f32, y: f32,
                 plot: &mut dyn FnMut(i32, i32, f32));

    /// Characters of the text that the typeface cannot render.
    fn missing_glyphs(&self, _text: &str) -> Vec<char> {
        vec![]
    }
}

/// Stand-in typeface for memes that have no captions to draw.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoText;

impl Typeface for NoText {
    fn text_width(&self, _: &str, _: f32) -> f32 { 0.0 }
    fn v_metrics(&self, _: f32) -> VMetrics { VMetrics{ascent: 0.0, descent: 0.0} }
    fn rasterize(&self, _: &str, _: f32, _: f32, _: f32, _: &mut dyn FnMut(i32, i32, f32)) {}
}

/// Log a warning if the typeface cannot render some of the text.
pub fn check<T: Typeface + ?Sized>(typeface: &T, text: &str) {
    let missing = typeface.missing_glyphs(text);
    if !missing.is_empty() {
        warn!("Missing glyphs for {} codepoint(s): {}", missing.len(),
            missing.into_iter().map(|c| format!("{:#x}", c as u32)).join(", "));
    }
}


/// Style of the rendered text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    pub size: f32,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
}

/// Draw a single laid out line of text: its outline first, then the fill.
pub(super) fn draw_line<T: Typeface + ?Sized>(surface: &mut Surface,
                                              typeface: &T,
                                              line: &Line,
                                              style: &Style) {
    if line.text.is_empty() {
        return;
    }
    let width = typeface.text_width(&line.text, style.size);
    let v_metrics = typeface.v_metrics(style.size);

    let x = line.x - width / 2.0;
    let y = match line.baseline {
        Baseline::Top => line.y + v_metrics.ascent,
        Baseline::Bottom => line.y + v_metrics.descent,  // descent is negative
    };

    if style.stroke_width > 0.0 {
        let radius = (style.stroke_width / 2.0).max(1.0);
        for i in 0..OUTLINE_COPIES {
            let angle = 2.0 * PI * i as f32 / OUTLINE_COPIES as f32;
            let (dx, dy) = (radius * angle.cos(), radius * angle.sin());
            draw_text(surface, typeface, &line.text, style.size, x + dx, y + dy, style.stroke);
        }
    }
    draw_text(surface, typeface, &line.text, style.size, x, y, style.fill);
}

fn draw_text<T: Typeface + ?Sized>(surface: &mut Surface, typeface: &T,
                                   text: &str, size: f32, x: f32, y: f32, color: Color) {
    typeface.rasterize(text, size, x, y, &mut |px, py, coverage| {
        surface.blend_pixel(px, py, color, coverage);
    });
}


impl<'a> Typeface for Font<'a> {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        // The width is the final X position of the "caret"
        // after laying out the glyphs starting from X=0.
        self.layout(text, Scale::uniform(size), point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    fn v_metrics(&self, size: f32) -> VMetrics {
        let vm = Font::v_metrics(self, Scale::uniform(size));
        VMetrics{ascent: vm.ascent, descent: vm.descent}
    }

    fn rasterize(&self, text: &str, size: f32, x: f32, y: f32,
                 plot: &mut dyn FnMut(i32, i32, f32)) {
        for glyph in self.layout(text, Scale::uniform(size), point(x, y)) {
            if let Some(bbox) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    plot(bbox.min.x + gx as i32, bbox.min.y + gy as i32, v);
                });
            }
        }
    }

    fn missing_glyphs(&self, text: &str) -> Vec<char> {
        let missing: BTreeSet<_> = text.chars()
            .filter(|c| !c.is_whitespace())
            .filter(|&c| self.glyph(c).id() == GlyphId(0))
            .collect();
        missing.into_iter().collect()
    }
}
