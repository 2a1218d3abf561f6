//! Module with everything the request handlers need to do their job.

use std::io;

use memecraft::{CaptionPair, EngineBuilder, FontLoader, ImageMacro, TemplateLoader};
use memecraft::ai::failure_captions;
use memecraft::catalog::{self, Catalog, Category, TemplateEntry};
use thiserror::Error;

use crate::ai::{CaptionGenerator, CannedGenerator, OpenAiGenerator};
use crate::args::{Options, Resource};
use crate::handlers::Captioner;


/// Catalog of templates, the captioner, and the caption generator.
pub struct Backend {
    catalog: Catalog,
    captioner: Captioner,
    generator: Box<dyn CaptionGenerator>,
}

impl Backend {
    #[inline]
    pub fn new(catalog: Catalog, captioner: Captioner, generator: Box<dyn CaptionGenerator>) -> Self {
        Backend{catalog, captioner, generator}
    }

    /// Set up the backend as requested on the command line.
    pub fn from_options(opts: &Options) -> Result<Self, SetupError> {
        let catalog = match opts.catalog_path {
            Some(ref path) => {
                debug!("Loading template catalog from {}", path.display());
                Catalog::from_path(path)?
            }
            None => {
                debug!("Using the built-in template catalog");
                Catalog::default()
            }
        };
        info!("Catalog has {} template(s) in {} categories",
            catalog.templates().len(), catalog.categories().len());

        let mut builder = EngineBuilder::<TemplateLoader, FontLoader>::new()
            .template_directory(&opts.template_directory)
            .font_directory(&opts.font_directory);
        if let Some(size) = opts.template_cache_size {
            builder = builder.template_cache_size(size);
        }
        if let Some(size) = opts.font_cache_size {
            builder = builder.font_cache_size(size);
        }
        let engine = builder.build().map_err(|e| SetupError::Engine(e.to_string()))?;

        let captioner = Captioner::new(
            engine, opts.render_threads.unwrap_or(0), opts.request_timeout);
        for &resource in &opts.preload {
            let directory = match resource {
                Resource::Template => &opts.template_directory,
                Resource::Font => &opts.font_directory,
            };
            captioner.preload(resource, directory);
        }

        let generator: Box<dyn CaptionGenerator> = match opts.openai_api_key {
            Some(ref key) => {
                let generator = OpenAiGenerator::new(
                    key.as_str(), opts.openai_model.as_str(), opts.openai_base_url.as_str(),
                    opts.ai_timeout)?;
                info!("Captions will be generated by {} at {}",
                    generator.model(), opts.openai_base_url);
                Box::new(generator)
            }
            None => {
                warn!("No OpenAI API key given, captions will be picked from a canned list");
                Box::new(CannedGenerator)
            }
        };
        debug!("Using the {} caption generator", generator.name());

        Ok(Backend::new(catalog, captioner, generator))
    }
}

impl Backend {
    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[inline]
    pub fn captioner(&self) -> &Captioner {
        &self.captioner
    }

    #[inline]
    pub fn list_templates(&self) -> &[TemplateEntry] {
        self.catalog.templates()
    }

    #[inline]
    pub fn list_categories(&self) -> &[Category] {
        self.catalog.categories()
    }

    /// Come up with captions for a meme idea.
    ///
    /// This never fails: if the generator does, the user gets captions
    /// saying that something went wrong.
    pub async fn generate_caption(&self, prompt: &str) -> CaptionPair {
        match self.generator.generate(prompt).await {
            Ok(captions) => {
                debug!("Generated {:?} for prompt `{}`", captions, prompt);
                captions
            }
            Err(e) => {
                error!("Failed to generate captions with {} generator: {}",
                    self.generator.name(), e);
                failure_captions()
            }
        }
    }

    /// Point the image macro at the template image of a catalog entry,
    /// if it refers to one by its numeric ID.
    pub fn resolve_template(&self, mut im: ImageMacro) -> ImageMacro {
        if let Ok(id) = im.template.parse::<u32>() {
            match self.catalog.template(id) {
                Some(entry) => {
                    trace!("Template #{} is `{}`", id, entry.slug);
                    im.template = entry.slug.clone();
                }
                None => debug!("No template #{} in the catalog", id),
            }
        }
        im
    }
}


/// Error while setting up the `Backend`.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("cannot load the catalog: {0}")]
    Catalog(#[from] catalog::Error),
    #[error("cannot set up the captioning engine: {0}")]
    Engine(String),
    #[error("cannot set up the HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<SetupError> for io::Error {
    fn from(e: SetupError) -> Self {
        io::Error::new(io::ErrorKind::Other, e)
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;
    use futures::executor::block_on;
    use futures::future::{self, BoxFuture, FutureExt};
    use memecraft::{CaptionPair, Engine, ImageMacro};
    use memecraft::ai::{failure_captions, ReplyError};
    use memecraft::catalog::Catalog;
    use crate::ai::{CaptionGenerator, GenerateError};
    use crate::handlers::Captioner;
    use super::Backend;

    struct Fixed(Option<CaptionPair>);

    impl CaptionGenerator for Fixed {
        fn name(&self) -> &str { "fixed" }

        fn generate<'a>(&'a self, _: &'a str) -> BoxFuture<'a, Result<CaptionPair, GenerateError>> {
            let result = self.0.clone().ok_or(GenerateError::Reply(ReplyError::Empty));
            future::ready(result).boxed()
        }
    }

    fn backend(captions: Option<CaptionPair>) -> Backend {
        let captioner = Captioner::new(
            Engine::new("data/templates", "data/fonts"), 1, Duration::ZERO);
        Backend::new(Catalog::default(), captioner, Box::new(Fixed(captions)))
    }

    #[test]
    fn generated_captions() {
        let captions = CaptionPair::new("Boss:", "Weekend bhi kaam karo");
        let backend = backend(Some(captions.clone()));
        assert_eq!(captions, block_on(backend.generate_caption("boss")));
    }

    #[test]
    fn generator_failure() {
        let backend = backend(None);
        assert_eq!(failure_captions(), block_on(backend.generate_caption("boss")));
    }

    #[test]
    fn listings() {
        let backend = backend(None);
        assert_eq!(8, backend.list_templates().len());
        assert_eq!(6, backend.list_categories().len());
    }

    #[test]
    fn template_by_id() {
        let backend = backend(None);
        let im = ImageMacro::builder().template("4").build().unwrap();
        assert_eq!("cricket-celebration", backend.resolve_template(im).template);
        // Unknown IDs and names are left alone.
        let im = ImageMacro::builder().template("42").build().unwrap();
        assert_eq!("42", backend.resolve_template(im).template);
        let im = ImageMacro::builder().template("drake").build().unwrap();
        assert_eq!("drake", backend.resolve_template(im).template);
    }
}
