//! Module for interpreting the replies of language models.

use regex::Regex;
use thiserror::Error;

use crate::model::CaptionPair;


lazy_static! {
    /// The outermost `{...}` in a piece of text, possibly spanning many lines.
    static ref JSON_OBJECT_RE: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
}


/// Extract the captions from the content of a model's reply.
///
/// The reply should be a JSON object with `topText` and `bottomText`,
/// but models don't always comply, so we also accept an object embedded
/// in other text (e.g. a Markdown code block), and as the last resort
/// treat the first two non-empty lines as top & bottom text.
pub fn parse_reply(content: &str) -> Result<CaptionPair, ReplyError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ReplyError::Empty);
    }

    if let Some(captions) = from_json(content) {
        trace!("Model reply is a JSON object");
        return Ok(captions);
    }
    if let Some(captions) = JSON_OBJECT_RE.find(content).and_then(|m| from_json(m.as_str())) {
        debug!("Found JSON object embedded in model reply");
        return Ok(captions);
    }

    debug!("Model reply is not JSON, using its lines as captions");
    let mut lines = content.lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty());
    let top_text = lines.next().unwrap_or_default();
    let bottom_text = lines.next().unwrap_or_default();
    Ok(CaptionPair::new(top_text, bottom_text))
}

/// Parse captions from JSON, unless the object doesn't have any.
fn from_json(json: &str) -> Option<CaptionPair> {
    serde_json::from_str::<CaptionPair>(json).ok().filter(|c| !c.is_empty())
}


/// Error when interpreting a model's reply.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReplyError {
    #[error("empty reply")]
    Empty,
}
