//! Module for loading fonts used in image macros.

use std::fmt;
use std::io;
use std::ops::Deref;
use std::path::Path;

use thiserror::Error;

use super::Loader;
use super::filesystem::{BytesLoader, FileLoader, PathLoader};


pub const FILE_EXTENSION: &str = "ttf";


/// Font that can be used to caption image macros.
pub struct Font(rusttype::Font<'static>);

impl Font {
    /// Parse a font from the content of a TrueType file.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FontError> {
        rusttype::Font::try_from_vec(bytes).map(Font).ok_or(FontError::Invalid)
    }
}

impl Deref for Font {
    type Target = rusttype::Font<'static>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<rusttype::Font<'static>> for Font {
    fn from(font: rusttype::Font<'static>) -> Self {
        Font(font)
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Font({} glyph(s))", self.0.glyph_count())
    }
}


#[derive(Debug)]
pub struct FontLoader {
    inner: BytesLoader<'static>,
}

impl FontLoader {
    pub fn new<D: AsRef<Path>>(directory: D) -> Self {
        FontLoader{
            inner: BytesLoader::new(
                FileLoader::for_extension(directory, FILE_EXTENSION))
        }
    }

    #[inline]
    pub(crate) fn paths(&self) -> &PathLoader<'static> {
        self.inner.paths()
    }
}

impl Loader for FontLoader {
    type Item = Font;
    type Err = FontError;

    fn load<'n>(&self, name: &'n str) -> Result<Font, Self::Err> {
        let bytes = self.inner.load(name)?;
        let font = Font::from_bytes(bytes).map_err(|e| {
            error!("Invalid font data for `{}` font resource", name); e
        })?;
        debug!("Font `{}` loaded successfully", name);
        Ok(font)
    }
}


/// Error while loading a font.
#[derive(Debug, Error)]
pub enum FontError {
    /// Font file couldn't be found or read.
    #[error("cannot read font file: {0}")]
    File(#[from] io::Error),
    /// File content isn't a valid TrueType font.
    #[error("invalid font data")]
    Invalid,
}

impl FontError {
    /// Whether the error means that the font doesn't exist.
    pub fn is_not_found(&self) -> bool {
        match *self {
            FontError::File(ref e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
