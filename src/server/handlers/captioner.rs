//! Module implementing the pool that does the image captioning.
//! This is used by the /api/meme/render request handler.

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use hyper::StatusCode;
use memecraft::{CaptionError, CaptionOutput, Engine, ImageMacro};
use memecraft::{list_fonts, list_templates};
use rand::seq::SliceRandom;
use rand::thread_rng;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task;
use tokio::time;

use crate::args::Resource;


/// Renders image macros into captioned images.
pub struct Captioner {
    engine: Engine,
    permits: Arc<Semaphore>,
    thread_count: usize,
    task_timeout: Duration,
}

impl Captioner {
    /// Create a `Captioner` rendering at most `thread_count` images at once.
    /// Zero means one per CPU core.
    pub fn new(engine: Engine, thread_count: usize, task_timeout: Duration) -> Self {
        let thread_count = if thread_count > 0 {
            thread_count
        } else {
            thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        };
        trace!("Allowing {} concurrent rendering task(s)", thread_count);

        if task_timeout > Duration::ZERO {
            trace!("Setting caption request timeout to {} secs", task_timeout.as_secs());
        } else {
            trace!("Caption request timeout is disabled");
        }

        let permits = Arc::new(Semaphore::new(thread_count));
        Captioner{engine, permits, thread_count, task_timeout}
    }

    #[inline]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    #[inline]
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }
}

impl Captioner {
    /// Fill the cache for given type of resource.
    pub fn preload<P: AsRef<Path>>(&self, what: Resource, directory: P) {
        let directory = directory.as_ref();
        let mut rng = thread_rng();
        match what {
            Resource::Template => {
                let capacity = self.engine.template_cache().map(|c| c.capacity()).unwrap_or(0);
                debug!("Preloading up to {} templates", capacity);
                let templates = list_or_warn(list_templates(directory), what, directory);
                for template in templates.choose_multiple(&mut rng, capacity) {
                    if let Err(e) = self.engine.preload_template(template) {
                        warn!("Error preloading template `{}`: {}", template, e);
                    }
                }
            }
            Resource::Font => {
                let capacity = self.engine.font_cache().map(|c| c.capacity()).unwrap_or(0);
                debug!("Preloading up to {} fonts", capacity);
                let fonts = list_or_warn(list_fonts(directory), what, directory);
                for font in fonts.choose_multiple(&mut rng, capacity) {
                    if let Err(e) = self.engine.preload_font(font) {
                        warn!("Error preloading font `{}`: {}", font, e);
                    }
                }
            }
        }
    }
}

fn list_or_warn(names: std::io::Result<Vec<String>>, what: Resource, directory: &Path) -> Vec<String> {
    names.unwrap_or_else(|e| {
        warn!("Cannot list {} in {}: {}", what, directory.display(), e);
        vec![]
    })
}

// Rendering code.
impl Captioner {
    /// Render an image macro as PNG.
    /// The rendering is done on the blocking thread pool.
    pub async fn render(&self, im: ImageMacro) -> Result<CaptionOutput, RenderError> {
        if self.task_timeout == Duration::ZERO {
            return self.render_now(im).await;
        }
        // A blocking task that's already running isn't stopped by the timeout,
        // and keeps its permit until it finishes.
        time::timeout(self.task_timeout, self.render_now(im)).await
            .unwrap_or_else(|_| {
                warn!("Caption request timed out after {} secs", self.task_timeout.as_secs());
                Err(RenderError::Timeout)
            })
    }

    async fn render_now(&self, im: ImageMacro) -> Result<CaptionOutput, RenderError> {
        if self.permits.available_permits() == 0 {
            debug!("All {} render threads are busy, waiting", self.thread_count);
        }
        let permit = self.permits.clone().acquire_owned().await
            .map_err(|_| RenderError::Unavailable)?;

        let im_repr = format!("{:?}", im);
        let engine = self.engine.clone();
        let task = task::spawn_blocking({
            let im_repr = im_repr.clone();
            move || {
                let _permit = permit;
                match engine.caption(im) {
                    Ok(out) => {
                        debug!("Successfully rendered {} as {:?}", im_repr, out);
                        Ok(out)
                    }
                    Err(e) => {
                        error!("Failed to render image macro {}: {}", im_repr, e);
                        Err(e)
                    }
                }
            }
        });

        match task.await {
            Ok(result) => result.map_err(RenderError::Caption),
            Err(e) => {
                error!("Rendering task for {} didn't complete: {}", im_repr, e);
                Err(RenderError::Unavailable)
            }
        }
    }
}


/// Error that can occur during the image macro rendering process.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error during the captioning process.
    #[error("{0}")]
    Caption(CaptionError),
    /// Timeout while performing the caption request.
    #[error("timed out while rendering the image")]
    Timeout,
    /// Captioning service temporarily unavailable.
    #[error("rendering is temporarily unavailable")]
    Unavailable,
}

impl RenderError {
    /// Determine the HTTP response code that best corresponds to the error.
    pub fn status_code(&self) -> StatusCode {
        match *self {
            RenderError::Caption(ref e) => match *e {
                CaptionError::Template(_, ref e) if e.is_not_found() => StatusCode::NOT_FOUND,
                CaptionError::Template(..) => StatusCode::INTERNAL_SERVER_ERROR,
                CaptionError::Font(_, ref e) if e.is_not_found() => StatusCode::NOT_FOUND,
                CaptionError::Font(..) => StatusCode::INTERNAL_SERVER_ERROR,
                CaptionError::Surface(..) => StatusCode::INTERNAL_SERVER_ERROR,
                CaptionError::Encode(..) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            RenderError::Timeout => StatusCode::INTERNAL_SERVER_ERROR,
            RenderError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}


#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use std::time::Duration;
    use hyper::StatusCode;
    use memecraft::{CaptionError, Engine, ImageMacro, TemplateError};
    use memecraft::render::Surface;
    use spectral::prelude::*;
    use crate::args::Resource;
    use super::{Captioner, RenderError};

    fn template_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir()
            .join(format!("memecraftd-test-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        Surface::new(40, 30).unwrap().save_png(dir.join("drake.png")).unwrap();
        dir
    }

    fn captioner(dir: &PathBuf) -> Captioner {
        Captioner::new(Engine::new(dir, dir), 2, Duration::from_secs(10))
    }

    #[tokio::test]
    async fn render_template() {
        let dir = template_dir("render");
        let im = ImageMacro::builder().template("drake").width(80).build().unwrap();
        let out = captioner(&dir).render(im).await.unwrap();
        assert_eq!("image/png", out.mime_type().to_string());
        assert_eq!(80, out.dimensions().0);
        assert!(!out.is_empty());
    }

    #[tokio::test]
    async fn missing_template() {
        let dir = template_dir("missing");
        let im = ImageMacro::builder().template("doge").build().unwrap();
        let err = captioner(&dir).render(im).await.unwrap_err();
        assert_eq!(StatusCode::NOT_FOUND, err.status_code());
    }

    #[test]
    fn status_codes() {
        let not_found = io::Error::new(io::ErrorKind::NotFound, "nope");
        let err = RenderError::Caption(
            CaptionError::Template("doge".into(), TemplateError::File(not_found)));
        assert_eq!(StatusCode::NOT_FOUND, err.status_code());
        let err = RenderError::Caption(CaptionError::Template(
            "doge".into(), TemplateError::UnsupportedFormat("bmp".into())));
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, err.status_code());
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, RenderError::Timeout.status_code());
        assert_eq!(StatusCode::SERVICE_UNAVAILABLE, RenderError::Unavailable.status_code());
    }

    #[test]
    fn default_thread_count() {
        let dir = template_dir("threads");
        let captioner = Captioner::new(Engine::new(&dir, &dir), 0, Duration::ZERO);
        assert_that!(captioner.thread_count()).is_greater_than(0);
    }

    #[test]
    fn preload_templates() {
        let dir = template_dir("preload");
        let captioner = captioner(&dir);
        captioner.preload(Resource::Template, &dir);
        let cache = captioner.engine().template_cache().unwrap();
        assert_eq!(1, cache.len());
        // Missing directories aren't fatal.
        captioner.preload(Resource::Font, dir.join("fonts"));
    }
}
