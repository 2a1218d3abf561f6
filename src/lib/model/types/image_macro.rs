//! Module implementing the `ImageMacro` type and its builder.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

use crate::model::constants::{MAX_CAPTION_LENGTH, MAX_HEIGHT, MAX_WIDTH};
use super::caption::CaptionPair;


/// Describes an image macro (a meme). Used as an input structure.
///
/// *Note*: `width` and `height` set the size of the rendered surface.
/// The template is scaled to fit inside it whilst preserving its aspect ratio,
/// so parts of the surface may remain transparent.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ImageMacroRepr")]
pub struct ImageMacro {
    /// Name of the template used by this image macro.
    pub template: String,
    /// Width of the rendered macro (if it is to be different from the template).
    pub width: Option<u32>,
    /// Height of the rendered macro (if it is to be different from the template).
    pub height: Option<u32>,
    /// Name of the font to render the captions with, if not the default one.
    pub font: Option<String>,
    /// Top & bottom texts to render over the template.
    pub captions: CaptionPair,
}

impl ImageMacro {
    /// Start building an `ImageMacro`.
    #[inline]
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Whether the image macro includes any text.
    #[inline]
    pub fn has_text(&self) -> bool {
        !self.captions.is_empty()
    }
}

impl fmt::Debug for ImageMacro {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let mut ds = fmt.debug_struct("ImageMacro");
        ds.field("template", &self.template);

        macro_rules! fmt_opt_field {
            ($name:ident) => (
                if let Some(ref $name) = self.$name {
                    ds.field(stringify!($name), $name);
                }
            );
        }
        fmt_opt_field!(width);
        fmt_opt_field!(height);
        fmt_opt_field!(font);

        if self.has_text() {
            ds.field("captions", &self.captions);
        }

        ds.finish()
    }
}


/// Builder for `ImageMacro`.
#[derive(Debug, Default, PartialEq)]
#[must_use = "unused builder which must be used"]
pub struct Builder {
    template: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    font: Option<String>,
    captions: CaptionPair,
}

impl Builder {
    /// Create a new `Builder` for an `ImageMacro`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Builder {
    /// Set the template used by resulting `ImageMacro`.
    #[inline]
    pub fn template<S: Into<String>>(mut self, template: S) -> Self {
        self.template = Some(template.into()); self
    }

    /// Change the width of the resulting image macro.
    ///
    /// By default, the width of the template will be used.
    #[inline]
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width); self
    }

    /// Reset the `ImageMacro` width back to the width of the template.
    #[inline]
    pub fn clear_width(mut self) -> Self {
        self.width = None; self
    }

    /// Change the height of the resulting image macro.
    ///
    /// By default, the height of the template will be used.
    #[inline]
    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height); self
    }

    /// Reset the `ImageMacro` height back to the height of the template.
    #[inline]
    pub fn clear_height(mut self) -> Self {
        self.height = None; self
    }

    /// Set the font that the captions will be rendered with.
    #[inline]
    pub fn font<S: Into<String>>(mut self, font: S) -> Self {
        self.font = Some(font.into()); self
    }
}

// Captioning interface.
impl Builder {
    /// Set the text rendered at the top of the image.
    #[inline]
    pub fn top_text<S: Into<String>>(mut self, text: S) -> Self {
        self.captions.top_text = text.into(); self
    }

    /// Set the text rendered at the bottom of the image.
    #[inline]
    pub fn bottom_text<S: Into<String>>(mut self, text: S) -> Self {
        self.captions.bottom_text = text.into(); self
    }

    /// Set both texts at once, e.g. from a generated `CaptionPair`.
    #[inline]
    pub fn captions(mut self, captions: CaptionPair) -> Self {
        self.captions = captions; self
    }
}

impl Builder {
    /// Build the resulting `ImageMacro`.
    pub fn build(self) -> Result<ImageMacro, Error> {
        self.validate()?;
        let template = self.template.ok_or(Error::NoTemplate)?;
        Ok(ImageMacro{
            template,
            width: self.width,
            height: self.height,
            font: self.font,
            captions: self.captions,
        })
    }

    #[doc(hidden)]
    fn validate(&self) -> Result<(), Error> {
        match self.template.as_ref().map(|t| t.trim()) {
            None | Some("") => return Err(Error::NoTemplate),
            _ => {}
        }
        if let Some("") = self.font.as_ref().map(|f| f.trim()) {
            return Err(Error::EmptyFont);
        }

        if self.width == Some(0) || self.height == Some(0) {
            return Err(Error::Empty(self.width, self.height));
        }
        let width = self.width.unwrap_or(0);
        let height = self.height.unwrap_or(0);
        if !(width <= MAX_WIDTH && height <= MAX_HEIGHT) {
            return Err(Error::TooLarge(self.width, self.height));
        }

        for text in &[&self.captions.top_text, &self.captions.bottom_text] {
            let length = text.chars().count();
            if length > MAX_CAPTION_LENGTH {
                return Err(Error::CaptionTooLong(length));
            }
        }

        Ok(())
    }
}


/// Error while building an `ImageMacro`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// No template given.
    #[error("no template chosen")]
    NoTemplate,
    /// Font name given but blank.
    #[error("font name cannot be empty")]
    EmptyFont,
    /// Requested image size has a zero dimension.
    #[error("target image cannot be empty: {}x{}", dim(.0), dim(.1))]
    Empty(Option<u32>, Option<u32>),
    /// Requested image size is too large.
    #[error("target image too large: {}x{} > {}x{}", dim(.0), dim(.1), MAX_WIDTH, MAX_HEIGHT)]
    TooLarge(Option<u32>, Option<u32>),
    /// Caption text too long.
    #[error("caption too long: {0} > {max}", max = MAX_CAPTION_LENGTH)]
    CaptionTooLong(usize),
}

fn dim(d: &Option<u32>) -> String {
    d.map(|d| format!("{}", d)).unwrap_or_else(|| "(default)".into())
}


/// Representation of `ImageMacro` as it comes from JSON or a query string.
#[derive(Deserialize)]
struct ImageMacroRepr {
    template: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    font: Option<String>,
    #[serde(default, alias = "topText")]
    top_text: String,
    #[serde(default, alias = "bottomText")]
    bottom_text: String,
}

impl TryFrom<ImageMacroRepr> for ImageMacro {
    type Error = Error;

    fn try_from(repr: ImageMacroRepr) -> Result<Self, Self::Error> {
        trace!("ImageMacro::template = {}", repr.template);
        let mut builder = Builder::new()
            .template(repr.template.trim())
            .top_text(repr.top_text.nfc().collect::<String>())
            .bottom_text(repr.bottom_text.nfc().collect::<String>());
        if let Some(width) = repr.width {
            builder = builder.width(width);
        }
        if let Some(height) = repr.height {
            builder = builder.height(height);
        }
        if let Some(font) = repr.font {
            builder = builder.font(font.trim());
        }
        builder.build()
    }
}


#[cfg(test)]
mod tests {
    use serde_qs::from_str as from_qs;
    use spectral::prelude::*;
    use crate::model::{CaptionPair, MAX_CAPTION_LENGTH, MAX_WIDTH};
    use super::{Builder, Error, ImageMacro};

    lazy_static! {
        static ref MOM: ImageMacro = Builder::new()
            .template("shocked-babu-bhaiya")
            .top_text("Mom:")
            .bottom_text("Ghar ka khana tayyar hai")
            .build().unwrap();
    }

    #[test]
    fn build_requires_template() {
        assert_that!(Builder::new().build()).is_err().is_equal_to(Error::NoTemplate);
        assert_that!(Builder::new().template("  ").build()).is_err();
        assert_that!(Builder::new().template("zoidberg").build()).is_ok();
    }

    #[test]
    fn build_validates_size() {
        let too_wide = Builder::new().template("x").width(MAX_WIDTH + 1).build();
        assert_that!(too_wide).is_err().is_equal_to(Error::TooLarge(Some(MAX_WIDTH + 1), None));
        let empty = Builder::new().template("x").height(0).build();
        assert_that!(empty).is_err().is_equal_to(Error::Empty(None, Some(0)));
        let ok = Builder::new().template("x").width(500).height(500).build();
        assert_that!(ok).is_ok();
    }

    #[test]
    fn build_validates_caption_length() {
        let long_text: String = "ह".repeat(MAX_CAPTION_LENGTH + 1);
        let im = Builder::new().template("x").bottom_text(long_text).build();
        assert_that!(im).is_err().is_equal_to(Error::CaptionTooLong(MAX_CAPTION_LENGTH + 1));
        assert_eq!("caption too long: 257 > 256", Error::CaptionTooLong(257).to_string());

        // Length is counted in codepoints rather than bytes.
        let max_text: String = "ह".repeat(MAX_CAPTION_LENGTH);
        let im = Builder::new().template("x").top_text(max_text).build();
        assert_that!(im).is_ok();
    }

    #[test]
    fn has_text() {
        assert!(MOM.has_text());
        let im = Builder::new().template("x").build().unwrap();
        assert!(!im.has_text());
    }

    #[test]
    fn from_json() {
        let json = r#"{
            "template": "shocked-babu-bhaiya",
            "topText": "Mom:",
            "bottomText": "Ghar ka khana tayyar hai"
        }"#;
        let im: ImageMacro = serde_json::from_str(json).unwrap();
        assert_that!(im).is_equal_to(&*MOM);
    }

    #[test]
    fn from_json_with_size() {
        let json = r#"{"template": "x", "width": 500, "height": 400, "font": "Impact"}"#;
        let im: ImageMacro = serde_json::from_str(json).unwrap();
        assert_eq!(Some(500), im.width);
        assert_eq!(Some(400), im.height);
        assert_eq!(Some("Impact".to_owned()), im.font);
        assert_eq!(CaptionPair::default(), im.captions);
    }

    #[test]
    fn from_json_invalid() {
        assert_that!(serde_json::from_str::<ImageMacro>(r#"{}"#)).is_err();
        assert_that!(serde_json::from_str::<ImageMacro>(r#"{"template": ""}"#)).is_err();
        assert_that!(serde_json::from_str::<ImageMacro>(
            r#"{"template": "x", "width": 0}"#)).is_err();
    }

    #[test]
    fn from_query_string() {
        let qs = "template=shocked-babu-bhaiya&top_text=Mom:&bottom_text=Ghar%20ka%20khana%20tayyar%20hai";
        let im: ImageMacro = from_qs(qs).unwrap();
        assert_that!(im).is_equal_to(&*MOM);
    }

    #[test]
    fn text_is_nfc_normalized() {
        // "é" as "e" followed by a combining acute accent.
        let json = "{\"template\": \"x\", \"top_text\": \"Cafe\u{301}\"}";
        let im: ImageMacro = serde_json::from_str(json).unwrap();
        assert_eq!("Caf\u{e9}", im.captions.top_text);
    }
}
