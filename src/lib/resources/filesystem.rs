//! Module defining and implementing filesystem resource loaders.

use std::collections::BTreeSet;
use std::fmt;
use std::fs::{self, File};
use std::iter;
use std::io::{self, BufReader, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use super::Loader;


/// Loader for file paths from given directory.
///
/// The resources here are just file *paths* (std::path::PathBuf),
/// and no substantial "loading" is performing (only path resolution).
///
/// This isn't particularly useful on its own, but can be wrapped around
/// to make more interesting loaders.
#[derive(Clone)]
pub struct PathLoader<'pl> {
    directory: PathBuf,
    predicate: Arc<dyn Fn(&Path) -> bool + Send + Sync + 'pl>,
}

impl<'pl> PathLoader<'pl> {
    #[inline]
    pub fn new<D: AsRef<Path>>(directory: D) -> Self {
        Self::with_predicate(directory, |_| true)
    }

    #[inline]
    pub fn for_extension<D: AsRef<Path>, S>(directory: D, extension: S) -> Self
        where S: ToString
    {
        Self::for_extensions(directory, iter::once(extension))
    }

    /// Create a loader which only gives out paths to files
    /// that have one of the extensions given.
    pub fn for_extensions<D: AsRef<Path>, I, S>(directory: D, extensions: I) -> Self
        where I: IntoIterator<Item=S>, S: ToString
    {
        Self::with_predicate(directory, {
            let extensions: Vec<_> = extensions.into_iter()
                .map(|e| e.to_string()).map(|e| e.trim().to_lowercase())
                .collect();
            move |path| {
                let ext = extension(path);
                extensions.iter().any(|e| Some(e) == ext.as_ref())
            }
        })
    }

    pub fn with_predicate<D, P>(directory: D, predicate: P) -> Self
        where D: AsRef<Path>, P: Fn(&Path) -> bool + Send + Sync + 'pl
    {
        PathLoader{
            directory: directory.as_ref().to_owned(),
            predicate: Arc::new(predicate),
        }
    }
}

impl<'pl> PathLoader<'pl> {
    #[inline]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Names of all resources that this loader can find, sorted.
    pub fn list(&self) -> io::Result<Vec<String>> {
        let names: BTreeSet<_> = self.glob_files("*.*")?
            .into_iter()
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(String::from))
            .collect();
        debug!("{} resource(s) found in {}", names.len(), self.directory.display());
        Ok(names.into_iter().collect())
    }

    /// Paths of files in the directory that have given stem
    /// and satisfy the loader's predicate.
    fn glob(&self, stem: &str) -> io::Result<Vec<PathBuf>> {
        self.glob_files(&format!("{}.*", glob::Pattern::escape(stem)))
    }

    /// Paths of files in the directory whose names match given glob pattern
    /// and which satisfy the loader's predicate.
    fn glob_files(&self, file_pattern: &str) -> io::Result<Vec<PathBuf>> {
        let directory = glob::Pattern::escape(&self.directory.to_string_lossy());
        let pattern = format!("{}", Path::new(&directory).join(file_pattern).display());
        trace!("Globbing with {}", pattern);

        let glob_iter = glob::glob(&pattern).map_err(|e| {
            error!("Failed to glob over files with {}: {}", pattern, e);
            io::Error::new(io::ErrorKind::InvalidInput, e)
        })?;
        // The `glob` crate doesn't support patterns like foo.{gif|png},
        // so unsupported extensions are filtered out here.
        Ok(glob_iter
            .filter_map(|r| r.map_err(|e| warn!("Cannot read {}: {}", e.path().display(), e)).ok())
            .filter(|f| (self.predicate)(f))
            .collect())
    }
}

/// Whether the resource name stays inside the loader's directory,
/// i.e. it has no path separators and isn't `..` or absolute.
fn is_plain_name(name: &str) -> bool {
    let path = Path::new(name);
    !name.is_empty()
        && !name.contains(|c: char| c == '/' || c == '\\')
        && !path.is_absolute()
        && path.components().all(|c| matches!(c, Component::Normal(_)))
}

impl<'pl> Loader for PathLoader<'pl> {
    type Item = PathBuf;
    type Err = io::Error;

    /// "Load" a path "resource" from the loader's directory.
    fn load<'n>(&self, name: &'n str) -> Result<Self::Item, Self::Err> {
        if !is_plain_name(name) {
            warn!("Rejecting resource name `{}` that points outside of {}",
                name, self.directory.display());
            return Err(io::Error::new(io::ErrorKind::NotFound,
                format!("resource `{}` not found in {}", name, self.directory.display())));
        }
        let mut matches = self.glob(name)?;
        match matches.len() {
            0 => Err(io::Error::new(io::ErrorKind::NotFound,
                format!("resource `{}` not found in {}", name, self.directory.display()))),
            1 => Ok(matches.remove(0)),
            c => Err(io::Error::new(io::ErrorKind::InvalidInput,
                format!("ambiguous resource name `{}` matching {} files in {}",
                    name, c, self.directory.display()))),
        }
    }
}

impl<'pl> fmt::Debug for PathLoader<'pl> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("PathLoader")
            .field("directory", &self.directory)
            .finish()
    }
}


/// Loader for files in given directory.
///
/// The resources it doles out are just file handles (std::fs::File).
/// Wrappers around this loaded can then implement their own decoding.
#[derive(Debug)]
pub struct FileLoader<'pl> {
    inner: PathLoader<'pl>,
}

// Constructors that for convenience are delegating to the PathLoader ones.
impl<'pl> FileLoader<'pl> {
    #[inline]
    pub fn new<D: AsRef<Path>>(directory: D) -> Self {
        FileLoader{inner: PathLoader::new(directory)}
    }

    #[inline]
    pub fn for_extension<D: AsRef<Path>, S>(directory: D, extension: S) -> Self
        where S: ToString
    {
        FileLoader{inner: PathLoader::for_extension(directory, extension)}
    }

    /// Create a loader which only loads files
    /// that have one of the extensions given.
    #[inline]
    pub fn for_extensions<D: AsRef<Path>, I, S>(directory: D, extensions: I) -> Self
        where I: IntoIterator<Item=S>, S: ToString
    {
        FileLoader{inner: PathLoader::for_extensions(directory, extensions)}
    }

    #[inline]
    pub fn paths(&self) -> &PathLoader<'pl> {
        &self.inner
    }
}

impl<'pl> Loader for FileLoader<'pl> {
    type Item = File;
    type Err = io::Error;

    fn load<'n>(&self, name: &'n str) -> Result<Self::Item, Self::Err> {
        let path = self.inner.load(name)?;
        fs::OpenOptions::new().read(true).open(path)
    }
}


/// Wrapper around FileLoader that loads the entire content of the files.
#[derive(Debug)]
pub struct BytesLoader<'fl> {
    inner: FileLoader<'fl>,
}

impl<'fl> BytesLoader<'fl> {
    #[inline]
    pub fn new(inner: FileLoader<'fl>) -> Self {
        BytesLoader{inner}
    }

    #[inline]
    pub fn paths(&self) -> &PathLoader<'fl> {
        self.inner.paths()
    }
}
impl<'fl> From<FileLoader<'fl>> for BytesLoader<'fl> {
    fn from(input: FileLoader<'fl>) -> Self {
        Self::new(input)
    }
}

impl<'fl> Loader for BytesLoader<'fl> {
    type Item = Vec<u8>;
    type Err = io::Error;

    /// Load a file resource as its byte content.
    fn load<'n>(&self, name: &'n str) -> Result<Self::Item, Self::Err> {
        let file = self.inner.load(name)?;

        let mut bytes = match file.metadata() {
            Ok(stat) => Vec::with_capacity(stat.len() as usize),
            Err(e) => {
                warn!("Failed to stat file of resource `{}` to obtain its size: {}",
                    name, e);
                Vec::new()
            },
        };

        let mut reader = BufReader::new(file);
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}


/// Get the (useful part of) file extension from the path.
pub(super) fn extension<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref().extension().and_then(|e| e.to_str())
        .map(|s| s.trim().to_lowercase())
}


#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use spectral::prelude::*;
    use crate::resources::Loader;
    use super::{BytesLoader, FileLoader, PathLoader};

    /// Create a fresh directory with given (empty) files.
    fn scratch_dir(name: &str, files: &[&str]) -> PathBuf {
        let dir = env::temp_dir()
            .join(format!("memecraft-test-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        for file in files {
            fs::write(dir.join(file), file.as_bytes()).unwrap();
        }
        dir
    }

    #[test]
    fn load_path_by_stem() {
        let dir = scratch_dir("path", &["drake.png", "doge.jpg", "notes.txt"]);
        let loader = PathLoader::for_extensions(&dir, &["png", "jpg"]);
        assert_that!(loader.load("drake")).is_ok().is_equal_to(dir.join("drake.png"));
        assert_that!(loader.load("doge")).is_ok().is_equal_to(dir.join("doge.jpg"));

        let err = loader.load("notes").unwrap_err();
        assert_eq!(io::ErrorKind::NotFound, err.kind());
    }

    #[test]
    fn ambiguous_name() {
        let dir = scratch_dir("ambiguous", &["drake.png", "drake.gif"]);
        let loader = PathLoader::new(&dir);
        let err = loader.load("drake").unwrap_err();
        assert_eq!(io::ErrorKind::InvalidInput, err.kind());
    }

    #[test]
    fn list_names() {
        let dir = scratch_dir("list", &["b.png", "a.PNG", "c.txt", "a.gif"]);
        let loader = PathLoader::for_extensions(&dir, &["png", "gif"]);
        assert_that!(loader.list()).is_ok().is_equal_to(vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn names_cannot_leave_directory() {
        let root = scratch_dir("escape", &["secret.png"]);
        let dir = root.join("templates");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("drake.png"), b"drake").unwrap();
        let loader = PathLoader::for_extension(&dir, "png");
        assert_that!(loader.load("drake")).is_ok();

        let absolute = root.join("secret");
        for name in &["../secret", "./drake", "..", "sub/drake", "sub\\drake",
                      absolute.to_str().unwrap()] {
            let err = loader.load(name).unwrap_err();
            assert_eq!(io::ErrorKind::NotFound, err.kind(), "name: {}", name);
        }
    }

    #[test]
    fn load_bytes() {
        let dir = scratch_dir("bytes", &["hello.txt"]);
        let loader = BytesLoader::new(FileLoader::for_extension(&dir, "txt"));
        assert_that!(loader.load("hello")).is_ok().is_equal_to(b"hello.txt".to_vec());
    }
}
