//! Module handling image macro templates.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageError, ImageFormat};
use thiserror::Error;

use super::Loader;
use super::filesystem::{extension, PathLoader};


lazy_static! {
    /// Map of template file extensions to supported image formats.
    pub static ref IMAGE_FORMAT_EXTENSIONS: HashMap<&'static str, ImageFormat> = hashmap!{
        "gif" => ImageFormat::Gif,
        "jpeg" => ImageFormat::Jpeg,
        "jpg" => ImageFormat::Jpeg,
        "png" => ImageFormat::Png,
    };
}


/// Represents an image macro template.
///
/// Animated GIFs are represented by their first frame.
#[derive(Clone)]
pub struct Template {
    image: DynamicImage,
    format: ImageFormat,
}

impl Template {
    #[inline]
    pub fn new(image: DynamicImage, format: ImageFormat) -> Self {
        Template{image, format}
    }

    /// Load the template from an image file.
    /// Image format is figured out from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let format = extension(path)
            .and_then(|ext| IMAGE_FORMAT_EXTENSIONS.get(ext.as_str()).cloned())
            .ok_or_else(|| TemplateError::UnsupportedFormat(path.display().to_string()))?;

        trace!("Opening image {}", path.display());
        let reader = image::ImageReader::open(path).map_err(TemplateError::File)?;
        let image = reader.decode().map_err(|e| {
            error!("Failed to decode template image {}: {}", path.display(), e); e
        })?;
        Ok(Template{image, format})
    }

    /// Decode the template from the bytes of an image file.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TemplateError> {
        let format = image::guess_format(bytes)?;
        let image = image::load_from_memory_with_format(bytes, format)?;
        Ok(Template{image, format})
    }
}

impl Template {
    #[inline]
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Format of the file that the template was loaded from.
    #[inline]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let (width, height) = self.dimensions();
        write!(fmt, "Template({}x{}, {:?})", width, height, self.format)
    }
}


/// Error while loading a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template file couldn't be found or opened.
    #[error("cannot open template file: {0}")]
    File(io::Error),
    /// File extension doesn't correspond to a supported image format.
    #[error("unsupported template image format: {0}")]
    UnsupportedFormat(String),
    /// Error when decoding the template image.
    #[error("cannot decode template image: {0}")]
    Decode(#[from] ImageError),
}

impl TemplateError {
    /// Whether the error means that the template doesn't exist.
    pub fn is_not_found(&self) -> bool {
        match *self {
            TemplateError::File(ref e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}


#[derive(Debug)]
pub struct TemplateLoader {
    inner: PathLoader<'static>,
}

impl TemplateLoader {
    pub fn new<D: AsRef<Path>>(directory: D) -> Self {
        let extensions = IMAGE_FORMAT_EXTENSIONS.keys();
        TemplateLoader{
            inner: PathLoader::for_extensions(directory, extensions),
        }
    }

    #[inline]
    pub(crate) fn paths(&self) -> &PathLoader<'static> {
        &self.inner
    }
}

impl Loader for TemplateLoader {
    type Item = Template;
    type Err = TemplateError;

    fn load<'n>(&self, name: &'n str) -> Result<Template, Self::Err> {
        let path = self.inner.load(name).map_err(TemplateError::File)?;
        Template::from_path(path)
    }
}
