//! Module implementing the `CaptionPair` type.

use std::fmt;

use serde::{Deserialize, Serialize};


/// The top & bottom texts of a meme.
///
/// This is both the result of AI caption generation
/// and the text input of the renderer.
#[derive(Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptionPair {
    /// Text rendered at the top of the image, growing downwards.
    pub top_text: String,
    /// Text rendered at the bottom of the image, growing upwards.
    pub bottom_text: String,
}

impl CaptionPair {
    #[inline]
    pub fn new<T: Into<String>, B: Into<String>>(top_text: T, bottom_text: B) -> Self {
        CaptionPair{top_text: top_text.into(), bottom_text: bottom_text.into()}
    }
}

impl CaptionPair {
    /// Whether both captions are empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.top_text.is_empty() && self.bottom_text.is_empty()
    }

    /// Both captions combined into a single line of text.
    pub fn text(&self) -> String {
        match (self.top_text.trim(), self.bottom_text.trim()) {
            ("", b) => b.to_owned(),
            (t, "") => t.to_owned(),
            (t, b) => format!("{} {}", t, b),
        }
    }
}

impl fmt::Debug for CaptionPair {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "CaptionPair({:?} / {:?})", self.top_text, self.bottom_text)
    }
}
