//! Data structures for command-line arguments.

use std::num::ParseIntError;
use std::path::PathBuf;

use memecraft::{ImageMacro, ImageMacroBuildError};
use thiserror::Error;


/// Structure to hold options received from the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Verbosity of the logging output.
    ///
    /// Corresponds to the number of times the -v flag has been passed.
    /// If -q has been used instead, this will be negative.
    pub verbosity: isize,

    /// The image macro to create.
    pub image_macro: ImageMacro,
    /// Directory to load the template from.
    pub template_directory: PathBuf,
    /// Directory to load the font from.
    pub font_directory: PathBuf,
    /// Path to write the finished image macro to.
    ///
    /// If absent, it shall be written to standard output.
    pub output_path: Option<PathBuf>,
}

#[allow(dead_code)]
impl Options {
    #[inline]
    pub fn verbose(&self) -> bool { self.verbosity > 0 }
    #[inline]
    pub fn quiet(&self) -> bool { self.verbosity < 0 }
}


/// Error that can occur while parsing of command line arguments.
#[derive(Debug, Error)]
pub enum ArgsError {
    /// General when parsing the arguments.
    #[error("invalid arguments: {0}")]
    Parse(#[from] clap::Error),
    /// Error while parsing --width or --height.
    #[error("invalid image size: {0}")]
    Size(#[from] ParseIntError),
    /// Image macro described by the arguments is invalid.
    #[error("invalid image macro: {0}")]
    ImageMacro(#[from] ImageMacroBuildError),
}
