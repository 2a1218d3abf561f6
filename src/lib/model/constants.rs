//! Module defining constants relevant to the data model.

use super::types::Color;


/// Name of the default font.
///
/// Captions are meant to be rendered in a bold sans-serif face,
/// so the default font resource should be one.
pub const DEFAULT_FONT: &str = "Poppins-Bold";

/// Default color of the text.
pub const DEFAULT_COLOR: Color = Color(0xff, 0xff, 0xff);
/// Default color of the text outline.
/// This should be the inversion of DEFAULT_COLOR.
pub const DEFAULT_OUTLINE_COLOR: Color = Color(0x0, 0x0, 0x0);


/// Maximum width of the result image.
pub const MAX_WIDTH: u32 = 2048;
/// Maximum height of the result image.
pub const MAX_HEIGHT: u32 = 2048;

/// Maximum length (in Unicode codepoints) of a single caption text.
pub const MAX_CAPTION_LENGTH: usize = 256;
