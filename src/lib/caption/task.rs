//! Module implementing the actual captioning task.
//! Most if not all captioning logic lives here.

use std::ops::Deref;
use std::sync::Arc;

use crate::model::{ImageMacro, MAX_HEIGHT, MAX_WIDTH};
use crate::render::{self, NoText, Surface};
use crate::resources::{Font, Loader, Template};
use super::error::CaptionError;
use super::engine;
use super::output::CaptionOutput;


/// Represents a single captioning task and contains all the relevant logic.
///
/// This is a separate struct so that the rendering state (e.g. the cache)
/// can be easily carried between its methods.
///
/// All the code here is executed in a background thread,
/// and so it can be synchronous.
pub(super) struct CaptionTask<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    image_macro: ImageMacro,
    engine: Arc<engine::Inner<Tl, Fl>>,
}

impl<Tl, Fl> Deref for CaptionTask<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    type Target = ImageMacro;
    fn deref(&self) -> &Self::Target {
        &self.image_macro  // makes the rendering code a little terser
    }
}

impl<Tl, Fl> CaptionTask<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    #[inline]
    pub fn new(image_macro: ImageMacro, engine: Arc<engine::Inner<Tl, Fl>>) -> Self {
        CaptionTask{image_macro, engine}
    }
}

impl<Tl, Fl> CaptionTask<Tl, Fl>
    where Tl: Loader<Item=Template>, Fl: Loader<Item=Font>
{
    /// Perform the captioning task.
    pub fn perform(self) -> Result<CaptionOutput, CaptionError<Tl, Fl>> {
        debug!("Rendering {:?}", self.image_macro);

        let template = self.engine.template_loader.load(&self.template)
            .map_err(|e| CaptionError::Template(self.template.clone(), e))?;
        let mut surface = self.create_surface(&template)?;
        let filter = self.engine.config.read().resize_filter;

        // Font is only needed (and loaded) when there is some text.
        if self.has_text() {
            let font = self.load_font()?;
            let typeface: &rusttype::Font = &font;
            render::render_with(&mut surface, template.image(), &self.captions, typeface, filter);
        } else {
            render::render_with(&mut surface, template.image(), &self.captions, &NoText, filter);
        }

        debug!("Encoding final image as PNG...");
        let bytes = surface.encode_png().map_err(CaptionError::Encode)?;
        Ok(CaptionOutput::png(surface.dimensions(), bytes))
    }

    /// Create the surface that the template will be drawn on.
    ///
    /// Its size defaults to the size of the template,
    /// limited to the maximum size of a rendered meme.
    fn create_surface(&self, template: &Template) -> Result<Surface, CaptionError<Tl, Fl>> {
        let (orig_width, orig_height) = template.dimensions();
        trace!("Original size of the template image `{}`: {}x{}",
            self.template, orig_width, orig_height);

        let width = self.width.unwrap_or_else(|| orig_width.min(MAX_WIDTH));
        let height = self.height.unwrap_or_else(|| orig_height.min(MAX_HEIGHT));
        if (width, height) != (orig_width, orig_height) {
            debug!("Rendering template `{}` onto a {}x{} surface",
                self.template, width, height);
        }
        Surface::new(width, height).map_err(CaptionError::Surface)
    }

    /// Load the font for the captions, checking it can render them.
    fn load_font(&self) -> Result<Arc<Font>, CaptionError<Tl, Fl>> {
        let font_name = match self.font {
            Some(ref f) => f.clone(),
            None => self.engine.config.read().default_font.clone(),
        };
        trace!("Loading font `{}`...", font_name);
        let font = self.engine.font_loader.load(&font_name)
            .map_err(|e| CaptionError::Font(font_name.clone(), e))?;

        trace!("Checking if font `{}` has all glyphs for captions", font_name);
        let typeface: &rusttype::Font = &font;
        render::check(typeface, &self.captions.top_text);
        render::check(typeface, &self.captions.bottom_text);
        Ok(font)
    }
}
