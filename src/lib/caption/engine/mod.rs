//! Module with the engine that turns image macros into finished memes.

mod builder;
mod config;

pub use self::builder::{Builder, Error as BuildError};
pub use self::config::Config;


use std::path::Path;
use std::sync::Arc;

use antidote::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::ImageMacro;
use crate::resources::{CachingLoader, Font, FontLoader, Loader, Template, TemplateLoader};
use crate::util::cache::ThreadSafeCache;
use super::error::CaptionError;
use super::output::CaptionOutput;
use super::task::CaptionTask;
use self::builder::{DEFAULT_FONT_CAPACITY, DEFAULT_TEMPLATE_CAPACITY};


/// Meme rendering engine.
///
/// Holds the loaders for template images & fonts (usually behind LRU caches)
/// and the rendering configuration. Cloning an `Engine` is cheap:
/// all clones share the same caches and `Config`,
/// so a single engine can serve many rendering threads at once.
#[derive(Debug)]
pub struct Engine<Tl = TemplateLoader, Fl = FontLoader>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    inner: Arc<Inner<Tl, Fl>>,
}

impl<Tl, Fl> Clone for Engine<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    fn clone(&self) -> Self {
        Engine{inner: Arc::clone(&self.inner)}
    }
}

/// State shared between the engine handles and the tasks they spawn.
#[derive(Debug)]
pub(super) struct Inner<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    pub config: RwLock<Config>,
    pub template_loader: CachingLoader<Tl>,
    pub font_loader: CachingLoader<Fl>,
}

impl<Tl, Fl> Engine<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    pub(super) fn assemble(config: Config,
                           template_loader: CachingLoader<Tl>,
                           font_loader: CachingLoader<Fl>) -> Self {
        let config = RwLock::new(config);
        Engine{inner: Arc::new(Inner{config, template_loader, font_loader})}
    }
}

impl Engine<TemplateLoader, FontLoader> {
    /// Create an `Engine` rendering templates & fonts from given directories,
    /// with default cache sizes.
    ///
    /// Use `EngineBuilder` for anything more elaborate.
    #[inline]
    pub fn new<Dt, Df>(template_directory: Dt, font_directory: Df) -> Self
        where Dt: AsRef<Path>, Df: AsRef<Path>
    {
        Self::with_loaders(TemplateLoader::new(template_directory),
                           FontLoader::new(font_directory))
    }
}
impl<Tl, Fl> Engine<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    /// Create an `Engine` with custom loaders, caching what they load.
    #[inline]
    pub fn with_loaders(template_loader: Tl, font_loader: Fl) -> Self {
        Self::assemble(Config::default(),
            CachingLoader::new(template_loader, DEFAULT_TEMPLATE_CAPACITY),
            CachingLoader::new(font_loader, DEFAULT_FONT_CAPACITY))
    }

    /// Create an `Engine` with custom loaders that are called for every render.
    #[inline]
    pub fn with_raw_loaders(template_loader: Tl, font_loader: Fl) -> Self {
        Self::assemble(Config::default(),
            CachingLoader::phony(template_loader),
            CachingLoader::phony(font_loader))
    }
}

impl<Tl, Fl> Engine<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    /// Render the meme described by given image macro into a PNG.
    ///
    /// This decodes, scales and draws on a full-size raster,
    /// so it should be done off any latency-sensitive thread.
    #[inline]
    pub fn caption(&self, image_macro: ImageMacro) -> Result<CaptionOutput, CaptionError<Tl, Fl>> {
        CaptionTask::new(image_macro, Arc::clone(&self.inner)).perform()
    }

    /// Load a template into the cache ahead of the first render that needs it.
    #[inline]
    pub fn preload_template(&self, name: &str) -> Result<(), Tl::Err> {
        self.inner.template_loader.warm(name)
    }

    /// Load a font into the cache ahead of the first render that needs it.
    #[inline]
    pub fn preload_font(&self, name: &str) -> Result<(), Fl::Err> {
        self.inner.font_loader.warm(name)
    }

    /// The template cache, or `None` when templates aren't cached.
    #[inline]
    pub fn template_cache(&self) -> Option<&ThreadSafeCache<String, Tl::Item>> {
        self.inner.template_loader.active_cache()
    }

    /// The font cache, or `None` when fonts aren't cached.
    #[inline]
    pub fn font_cache(&self) -> Option<&ThreadSafeCache<String, Fl::Item>> {
        self.inner.font_loader.active_cache()
    }

    #[inline]
    pub fn config(&self) -> RwLockReadGuard<Config> {
        self.inner.config.read()
    }

    /// Modify the rendering configuration.
    /// Renders already in progress may see the change as well.
    #[inline]
    pub fn config_mut(&self) -> RwLockWriteGuard<Config> {
        self.inner.config.write()
    }
}


#[cfg(test)]
mod tests;
