//! Module with captioning engine configuration.

use image::imageops::FilterType;

use crate::model::DEFAULT_FONT;
use crate::render::DEFAULT_FILTER;


/// Structure holding configuration for the `Engine`.
///
/// This is shared with `CaptionTask`s.
#[derive(Clone, Debug)]
pub struct Config {
    /// Font used for image macros that don't specify one.
    pub default_font: String,
    /// Filter used when scaling template images.
    pub resize_filter: FilterType,
}

impl Default for Config {
    /// Initialize Config with default values.
    fn default() -> Self {
        Config {
            default_font: DEFAULT_FONT.into(),
            resize_filter: DEFAULT_FILTER,
        }
    }
}
