//! Module handling the resources used for captioning.

mod filesystem;
mod fonts;
mod templates;


pub use self::filesystem::{BytesLoader, FileLoader, PathLoader};
pub use self::fonts::{Font, FontError, FontLoader, FILE_EXTENSION as FONT_FILE_EXTENSION};
pub use self::templates::{IMAGE_FORMAT_EXTENSIONS, Template, TemplateError, TemplateLoader};


use std::error::Error;
use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::util::cache::ThreadSafeCache;


/// Loader of resources from some external source.
pub trait Loader {
    /// Type of resources that this loader can load.
    type Item;
    /// Error that may occur while loading the resource.
    type Err: Error + Send + Sync + 'static;

    /// Load a resource of given name.
    fn load<'n>(&self, name: &'n str) -> Result<Self::Item, Self::Err>;
}


/// A loader that keeps a cache of resources previously loaded.
pub struct CachingLoader<L: Loader> {
    inner: L,
    cache: ThreadSafeCache<String, L::Item>,
    pub(crate) phony: bool,
}

impl<L: Loader> CachingLoader<L> {
    #[inline]
    pub fn new(inner: L, capacity: usize) -> Self {
        CachingLoader{
            inner,
            cache: ThreadSafeCache::new(capacity),
            phony: false,
        }
    }

    /// Create a phony version of CachingLoader that doesn't actually cache anything.
    ///
    /// This is used to transparently wrap a Loader<Item=T> into Loader<Item=Arc<T>>,
    /// which is necessary because Rust cannot really abstract between the two.
    #[inline]
    pub(crate) fn phony(inner: L) -> Self {
        CachingLoader{
            inner,
            cache: ThreadSafeCache::new(1),
            phony: true,
        }
    }
}

impl<L: Loader> CachingLoader<L> {
    #[inline]
    pub fn cache(&self) -> &ThreadSafeCache<String, L::Item> {
        &self.cache
    }

    #[inline]
    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// The cache, unless this loader doesn't actually cache anything.
    #[inline]
    pub(crate) fn active_cache(&self) -> Option<&ThreadSafeCache<String, L::Item>> {
        Some(&self.cache).filter(|_| !self.phony)
    }

    /// Load a resource only to put it in the cache.
    /// Does nothing for a phony loader.
    pub(crate) fn warm(&self, name: &str) -> Result<(), L::Err> {
        if self.phony || self.cache.get(name).is_some() {
            return Ok(());
        }
        let obj = self.inner.load(name)?;
        self.cache.put(name.to_owned(), obj);
        Ok(())
    }
}

impl<L: Loader> Loader for CachingLoader<L> {
    type Item = Arc<L::Item>;
    type Err = L::Err;

    /// Load the object from cache or fall back on the original Loader.
    /// Cache the objects loaded this way.
    fn load<'n>(&self, name: &'n str) -> Result<Self::Item, Self::Err> {
        if self.phony {
            let obj = self.inner.load(name)?;
            Ok(Arc::new(obj))
        } else {
            if let Some(obj) = self.cache.get(name) {
                return Ok(obj);
            }
            let obj = self.inner.load(name)?;
            let cached_obj = self.cache.put(name.to_owned(), obj);
            Ok(cached_obj)
        }
    }
}

impl<L: Loader> fmt::Debug for CachingLoader<L> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("CachingLoader")
            .field("inner", &"...")
            .field("cache", &self.cache)
            .field("phony", &self.phony)
            .finish()
    }
}


/// List the names of all fonts available in given directory.
pub fn list_fonts<D: AsRef<Path>>(directory: D) -> io::Result<Vec<String>> {
    debug!("Listing all available fonts...");
    FontLoader::new(directory).paths().list()
}

/// List the names of all templates available in given directory.
pub fn list_templates<D: AsRef<Path>>(directory: D) -> io::Result<Vec<String>> {
    debug!("Listing all available templates...");
    TemplateLoader::new(directory).paths().list()
}


#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use spectral::prelude::*;
    use super::{CachingLoader, Loader};

    /// Loader which counts how many times it actually loaded something.
    #[derive(Default)]
    struct CountingLoader {
        count: AtomicUsize,
    }

    impl Loader for CountingLoader {
        type Item = String;
        type Err = io::Error;

        fn load<'n>(&self, name: &'n str) -> Result<String, io::Error> {
            if name.is_empty() {
                return Err(io::Error::new(io::ErrorKind::NotFound, "empty name"));
            }
            self.count.fetch_add(1, Ordering::SeqCst);
            Ok(name.to_uppercase())
        }
    }

    #[test]
    fn caching_loader_caches() {
        let loader = CachingLoader::new(CountingLoader::default(), 8);
        assert_eq!("DRAKE", *loader.load("drake").unwrap());
        assert_eq!("DRAKE", *loader.load("drake").unwrap());
        assert_eq!(1, loader.inner().count.load(Ordering::SeqCst));
        assert_eq!(1, loader.cache().hits());
        assert_eq!(1, loader.cache().misses());
    }

    #[test]
    fn caching_loader_doesnt_cache_errors() {
        let loader = CachingLoader::new(CountingLoader::default(), 8);
        assert_that!(loader.load("")).is_err();
        assert_that!(loader.cache().is_empty()).is_true();
    }

    #[test]
    fn phony_loader_never_caches() {
        let loader = CachingLoader::phony(CountingLoader::default());
        loader.load("doge").unwrap();
        loader.load("doge").unwrap();
        assert_eq!(2, loader.inner().count.load(Ordering::SeqCst));
    }
}
