//! Module defining the model types.

mod caption;
mod color;
mod image_macro;

pub use self::caption::CaptionPair;
pub use self::color::Color;
pub use self::image_macro::{ImageMacro,
                            Builder as ImageMacroBuilder,
                            Error as ImageMacroBuildError};
