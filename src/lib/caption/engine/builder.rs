//! Module implementing the builder for `Engine`.

use std::fmt::Display;
use std::path::Path;

use image::imageops::FilterType;
use thiserror::Error;

use crate::resources::{CachingLoader, Font, FontLoader, Loader, Template, TemplateLoader};
use super::config::Config;
use super::Engine;


pub(super) const DEFAULT_TEMPLATE_CAPACITY: usize = 128;
pub(super) const DEFAULT_FONT_CAPACITY: usize = 16;


/// Builder for `Engine`.
#[derive(Debug)]
#[must_use = "unused builder which must be used"]
pub struct Builder<Tl = TemplateLoader, Fl = FontLoader>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    errors: Vec<Error>,

    template_loader_builder: Option<LoaderBuilder<Tl>>,
    font_loader_builder: Option<LoaderBuilder<Fl>>,

    default_font: Option<String>,
    resize_filter: Option<FilterType>,
}


/// Temporary configuration for a template or font loader.
/// Used by `Builder`.
#[derive(Debug)]
enum LoaderBuilder<L: Loader> {
    Cached {
        inner: Option<L>,
        cache_size: usize,
    },
    Raw { inner: Option<L> },
}

impl<L: Loader> LoaderBuilder<L> {
    #[inline]
    pub fn cached(size: usize) -> Self {
        LoaderBuilder::Cached { inner: None, cache_size: size }
    }

    #[inline]
    pub fn raw() -> Self {
        LoaderBuilder::Raw { inner: None }
    }
}

impl<L: Loader> LoaderBuilder<L> {
    /// Set the loader that the `Cached` loader would wrap.
    /// Returns `false` if `LoaderBuilder` is already configured incompatibly.
    pub fn set_cached_loader(&mut self, loader: L) -> bool {
        match *self {
            LoaderBuilder::Cached{ref mut inner, ..} => { *inner = Some(loader); true }
            _ => false,
        }
    }

    /// Set the cache size of `Cached` loader.
    /// Returns `false` if `LoaderBuilder` is already configured incompatibly.
    pub fn set_cache_size(&mut self, size: usize) -> bool {
        match *self {
            LoaderBuilder::Cached{ref mut cache_size, ..} => { *cache_size = size; true }
            _ => false,
        }
    }

    /// Set the loader that the `Raw` loader would wrap.
    /// Returns `false` if `LoaderBuilder` is already configured incompatibly.
    pub fn set_raw_loader(&mut self, loader: L) -> bool {
        match *self {
            LoaderBuilder::Raw{ref mut inner} => { *inner = Some(loader); true }
            _ => false,
        }
    }

    /// Build the final `Loader`.
    pub fn build(self) -> Result<CachingLoader<L>, Error> {
        match self {
            LoaderBuilder::Cached{inner: Some(loader), cache_size} =>
                Ok(CachingLoader::new(loader, cache_size)),
            // Use the phony version of CachingLoader which doesn't actually cache anything,
            // but provides the same interface yielding Arc<L::Item>.
            LoaderBuilder::Raw{inner: Some(loader)} => Ok(CachingLoader::phony(loader)),
            _ => Err(Error::no_loader()),
        }
    }
}


impl<Tl, Fl> Builder<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    /// Create a new `Builder`.
    #[inline]
    pub fn new() -> Self {
        Builder::default()
    }
}
impl<Tl, Fl> Default for Builder<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    fn default() -> Self {
        Builder{
            errors: vec![],
            template_loader_builder: None,
            font_loader_builder: None,
            default_font: None,
            resize_filter: None,
        }
    }
}

// Setters.
impl<Fl> Builder<TemplateLoader, Fl>
    where Fl: Loader<Item=Font>
{
    /// Set the directory where the templates will be loaded from.
    #[inline]
    pub fn template_directory<P: AsRef<Path>>(self, directory: P) -> Self {
        self.template_loader(TemplateLoader::new(directory))
    }
}
impl<Tl> Builder<Tl, FontLoader>
    where Tl: Loader<Item=Template>
{
    /// Set the directory where the fonts will be loaded from.
    #[inline]
    pub fn font_directory<P: AsRef<Path>>(self, directory: P) -> Self {
        self.font_loader(FontLoader::new(directory))
    }
}
impl<Tl, Fl> Builder<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    /// Set a custom loader for templates.
    ///
    /// Templates loaded by it will still be cached in an LRU cache.
    /// See `raw_template_loader` if you want to provide your own caching.
    #[inline]
    pub fn template_loader(mut self, loader: Tl) -> Self {
        let ok = self.template_loader_builder
            .get_or_insert_with(|| LoaderBuilder::cached(DEFAULT_TEMPLATE_CAPACITY))
            .set_cached_loader(loader);
        if ok { self } else { self.err(Error::loader_setup_conflict("template")) }
    }

    /// Change the size of the template cache.
    #[inline]
    pub fn template_cache_size(mut self, size: usize) -> Self {
        let ok = self.template_loader_builder
            .get_or_insert_with(|| LoaderBuilder::cached(DEFAULT_TEMPLATE_CAPACITY))
            .set_cache_size(size);
        if ok { self } else { self.err(Error::loader_setup_conflict("template")) }
    }

    /// Set a custom loader for fonts.
    ///
    /// Fonts loaded by it will still be cached in an LRU cache.
    /// See `raw_font_loader` if you want to provide your own caching.
    #[inline]
    pub fn font_loader(mut self, loader: Fl) -> Self {
        let ok = self.font_loader_builder
            .get_or_insert_with(|| LoaderBuilder::cached(DEFAULT_FONT_CAPACITY))
            .set_cached_loader(loader);
        if ok { self } else { self.err(Error::loader_setup_conflict("font")) }
    }

    /// Change the size of the font cache.
    #[inline]
    pub fn font_cache_size(mut self, size: usize) -> Self {
        let ok = self.font_loader_builder
            .get_or_insert_with(|| LoaderBuilder::cached(DEFAULT_FONT_CAPACITY))
            .set_cache_size(size);
        if ok { self } else { self.err(Error::loader_setup_conflict("font")) }
    }

    /// Set a custom "raw" loader for templates.
    ///
    /// Templates loaded this way will not be cached (unless the loader itself
    /// implements some kind of caching).
    #[inline]
    pub fn raw_template_loader(mut self, loader: Tl) -> Self {
        let ok = self.template_loader_builder
            .get_or_insert_with(LoaderBuilder::raw)
            .set_raw_loader(loader);
        if ok { self } else { self.err(Error::loader_setup_conflict("template")) }
    }

    /// Set a custom "raw" loader for fonts.
    ///
    /// Fonts loaded this way will not be cached (unless the loader itself
    /// implements some kind of caching).
    #[inline]
    pub fn raw_font_loader(mut self, loader: Fl) -> Self {
        let ok = self.font_loader_builder
            .get_or_insert_with(LoaderBuilder::raw)
            .set_raw_loader(loader);
        if ok { self } else { self.err(Error::loader_setup_conflict("font")) }
    }
}
impl<Tl, Fl> Builder<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    /// Set the font used for image macros that don't specify any.
    #[inline]
    pub fn default_font<S: Into<String>>(mut self, font: S) -> Self {
        let font = font.into();
        if font.trim().is_empty() {
            return self.err(Error::EmptyFontName);
        }
        self.default_font = Some(font); self
    }

    /// Set the filter used when scaling template images.
    #[inline]
    pub fn resize_filter(mut self, filter: FilterType) -> Self {
        self.resize_filter = Some(filter); self
    }
}

// Validation & building.
impl<Tl, Fl> Builder<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    /// Build the `Engine`.
    pub fn build(mut self) -> Result<Engine<Tl, Fl>, Error> {
        if !self.errors.is_empty() {
            return Err(self.errors.remove(0));
        }

        let config = self.build_config();
        let template_loader = self.template_loader_builder
            .ok_or_else(|| Error::no_loader_for("template"))?
            .build()?;
        let font_loader = self.font_loader_builder
            .ok_or_else(|| Error::no_loader_for("font"))?
            .build()?;
        Ok(Engine::assemble(config, template_loader, font_loader))
    }

    #[doc(hidden)]
    fn build_config(&self) -> Config {
        let mut config = Config::default();
        if let Some(ref font) = self.default_font {
            config.default_font = font.clone();
        }
        if let Some(filter) = self.resize_filter {
            config.resize_filter = filter;
        }
        config
    }

    #[doc(hidden)]
    fn err(mut self, error: Error) -> Self {
        self.errors.push(error); self
    }
}


/// Error that resulted from misconfiguration of the `Engine` via its `Builder`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// No loader set up.
    #[error("{0}")]
    NoLoader(String),

    /// Template or font loader configuration setup error.
    #[error("{0}")]
    LoaderBuilderConflict(String),

    /// Blank name given for the default font.
    #[error("default font name cannot be empty")]
    EmptyFontName,
}

impl Error {
    #[inline]
    fn no_loader() -> Self {
        Error::NoLoader("missing loader configuration".into())
    }

    #[inline]
    fn no_loader_for<R: Display>(resource: R) -> Self {
        Error::NoLoader(format!("no {} loader configured", resource))
    }

    #[inline]
    fn loader_setup_conflict<R: Display>(resource: R) -> Self {
        Error::LoaderBuilderConflict(format!(
            "invalid combination of configuration parameters for setting up {} loader", resource))
    }
}


#[cfg(test)]
mod tests {
    use spectral::prelude::*;
    use crate::resources::{FontLoader, TemplateLoader};
    use super::{Builder, Error};

    #[test]
    fn requires_loaders() {
        let result = Builder::<TemplateLoader, FontLoader>::new()
            .template_directory("data/templates")
            .build();
        assert_that!(result.map(|_| ())).is_err()
            .is_equal_to(Error::NoLoader("no font loader configured".into()));
    }

    #[test]
    fn cached_and_raw_conflict() {
        let result = Builder::<TemplateLoader, FontLoader>::new()
            .template_directory("data/templates")
            .raw_template_loader(TemplateLoader::new("data/templates"))
            .font_directory("data/fonts")
            .build();
        assert_that!(result.map(|_| ())).is_err()
            .matches(|e| matches!(*e, Error::LoaderBuilderConflict(..)));
    }

    #[test]
    fn config() {
        let engine = Builder::<TemplateLoader, FontLoader>::new()
            .template_directory("data/templates")
            .font_directory("data/fonts")
            .default_font("DejaVuSans-Bold")
            .template_cache_size(4)
            .build().unwrap();
        assert_eq!("DejaVuSans-Bold", engine.config().default_font);
        assert_that!(engine.template_cache().map(|c| c.capacity())).is_some().is_equal_to(4);
    }

    #[test]
    fn empty_default_font() {
        let result = Builder::<TemplateLoader, FontLoader>::new().default_font(" ").build();
        assert_that!(result.map(|_| ())).is_err().is_equal_to(Error::EmptyFontName);
    }
}
