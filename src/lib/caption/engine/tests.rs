//! Tests for the captioning engine.

use std::collections::HashMap;
use std::io;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use spectral::prelude::*;

use crate::model::ImageMacroBuilder;
use crate::resources::{Font, FontError, Loader, Template, TemplateError};
use crate::CaptionError;
use super::Engine;


/// Loader of templates kept in memory.
struct MemoryTemplates(HashMap<String, Template>);

impl MemoryTemplates {
    fn with(name: &str, width: u32, height: u32) -> Self {
        let image = DynamicImage::ImageRgba8(
            RgbaImage::from_pixel(width, height, Rgba([0x20, 0x40, 0x60, 0xff])));
        let mut templates = HashMap::new();
        templates.insert(name.to_owned(), Template::new(image, ImageFormat::Png));
        MemoryTemplates(templates)
    }
}

impl Loader for MemoryTemplates {
    type Item = Template;
    type Err = TemplateError;

    fn load<'n>(&self, name: &'n str) -> Result<Template, TemplateError> {
        self.0.get(name).cloned().ok_or_else(|| TemplateError::File(
            io::Error::new(io::ErrorKind::NotFound, name.to_owned())))
    }
}

/// Loader that has no fonts at all.
struct NoFonts;

impl Loader for NoFonts {
    type Item = Font;
    type Err = FontError;

    fn load<'n>(&self, _: &'n str) -> Result<Font, FontError> {
        Err(FontError::File(io::ErrorKind::NotFound.into()))
    }
}

fn decode(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory_with_format(bytes, ImageFormat::Png).unwrap().to_rgba8()
}


#[test]
fn thread_safe() {
    fn assert_sync<T: Sync>() {}
    fn assert_send<T: Send>() {}

    assert_sync::<Engine>();
    assert_send::<Engine>();
}

#[test]
fn caption_without_text_keeps_template_size() {
    let engine = Engine::with_loaders(MemoryTemplates::with("drake", 40, 30), NoFonts);
    let im = ImageMacroBuilder::new().template("drake").build().unwrap();

    let output = engine.caption(im).unwrap();
    assert_eq!(ImageFormat::Png, output.format());
    assert_eq!(mime::IMAGE_PNG, output.mime_type());
    assert_eq!((40, 30), output.dimensions());

    let image = decode(output.bytes());
    assert_eq!((40, 30), image.dimensions());
    assert!(image.pixels().all(|p| p[3] == 0xff));
}

#[test]
fn caption_with_size_letterboxes_template() {
    let engine = Engine::with_loaders(MemoryTemplates::with("drake", 40, 20), NoFonts);
    let im = ImageMacroBuilder::new().template("drake").width(40).height(40).build().unwrap();

    let image = decode(engine.caption(im).unwrap().bytes());
    assert_eq!((40, 40), image.dimensions());
    assert_eq!(0, image.get_pixel(20, 0)[3]);
    assert_eq!(0xff, image.get_pixel(20, 20)[3]);
    assert_eq!(0, image.get_pixel(20, 39)[3]);
}

#[test]
fn missing_template() {
    let engine = Engine::with_loaders(MemoryTemplates::with("drake", 4, 4), NoFonts);
    let im = ImageMacroBuilder::new().template("zoidberg").build().unwrap();

    let err = engine.caption(im).unwrap_err();
    assert_that!(err).matches(|e| match *e {
        CaptionError::Template(ref name, ref e) => name == "zoidberg" && e.is_not_found(),
        _ => false,
    });
}

#[test]
fn missing_font_only_matters_with_text() {
    let engine = Engine::with_loaders(MemoryTemplates::with("drake", 4, 4), NoFonts);
    let im = ImageMacroBuilder::new().template("drake").font("Comic Sans").build().unwrap();
    assert_that!(engine.caption(im).map(|_| ())).is_ok();

    let im = ImageMacroBuilder::new().template("drake").font("Comic Sans")
        .top_text("Nobody:").build().unwrap();
    let err = engine.caption(im).unwrap_err();
    assert_that!(err).matches(|e| match *e {
        CaptionError::Font(ref name, _) => name == "Comic Sans",
        _ => false,
    });
}

#[test]
fn default_font_from_config() {
    let engine = Engine::with_loaders(MemoryTemplates::with("drake", 4, 4), NoFonts);
    engine.config_mut().default_font = "Impact".into();

    let im = ImageMacroBuilder::new().template("drake").bottom_text("Me:").build().unwrap();
    let err = engine.caption(im).unwrap_err();
    assert_eq!("cannot load font `Impact`: cannot read font file: entity not found",
        format!("{}", err));
}

#[test]
fn caches_templates() {
    let engine = Engine::with_loaders(MemoryTemplates::with("drake", 4, 4), NoFonts);
    engine.preload_template("drake").unwrap();
    let im = ImageMacroBuilder::new().template("drake").build().unwrap();
    let _ = engine.caption(im).unwrap();

    let stats = engine.template_cache().unwrap().stats();
    assert_eq!(1, stats.hits);
    assert_eq!(1, stats.misses);

    let raw = Engine::with_raw_loaders(MemoryTemplates::with("drake", 4, 4), NoFonts);
    assert_that!(raw.template_cache()).is_none();
}

#[test]
fn default_size_is_limited() {
    let engine = Engine::with_loaders(MemoryTemplates::with("panorama", 3000, 10), NoFonts);
    let im = ImageMacroBuilder::new().template("panorama").build().unwrap();
    let output = engine.caption(im).unwrap();
    assert_eq!((crate::MAX_WIDTH, 10), output.dimensions());
    assert_eq!((crate::MAX_WIDTH, 10), decode(output.bytes()).dimensions());
}
