//! Module with the provider-independent parts of AI caption generation.

mod canned;
mod reply;


pub use self::canned::{failure_captions, random_canned, CANNED_CAPTIONS};
pub use self::reply::{parse_reply, ReplyError};


use thiserror::Error;


/// Instructions given to the language model before the user's idea.
pub const SYSTEM_PROMPT: &str = "\
You are a humorous meme creator specializing in Indian cultural context and Desi memes. \
Generate concise and funny meme text in Hinglish (Hindi written in Roman script) \
for a meme template based on the user's prompt. \
Respond in JSON format with 'topText' and 'bottomText' fields, both in Hinglish. \
Keep each text short (maximum 10 words) and punchy to fit on a meme.";

/// Maximum length (in Unicode codepoints) of the user's meme idea.
pub const MAX_PROMPT_LENGTH: usize = 500;


/// Check the user's meme idea, returning it without surrounding whitespace.
pub fn validate_prompt(prompt: &str) -> Result<&str, PromptError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(PromptError::Empty);
    }
    let length = prompt.chars().count();
    if length > MAX_PROMPT_LENGTH {
        return Err(PromptError::TooLong(length));
    }
    Ok(prompt)
}

/// Error when the user's meme idea is unusable.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("Prompt is required")]
    Empty,
    #[error("Prompt is too long: {0} > {max}", max = MAX_PROMPT_LENGTH)]
    TooLong(usize),
}
