//! Module with the generators of caption text.

mod canned;
mod openai;


pub use self::canned::CannedGenerator;
pub use self::openai::OpenAiGenerator;


use futures::future::BoxFuture;
use memecraft::CaptionPair;
use memecraft::ai::ReplyError;
use reqwest::StatusCode;
use thiserror::Error;


/// Something that comes up with captions for a meme idea.
pub trait CaptionGenerator: Send + Sync {
    /// Short name of the generator, for logging.
    fn name(&self) -> &str;

    /// Generate the top & bottom text for given (already validated) prompt.
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<CaptionPair, GenerateError>>;
}


/// Error that can occur while generating captions.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Error while talking to the API.
    #[error("request to the API failed: {0}")]
    Http(#[from] reqwest::Error),
    /// API responded with an error.
    #[error("API responded with HTTP {0}: {1}")]
    Status(StatusCode, String),
    /// API response didn't contain any message.
    #[error("API response has no message content")]
    NoContent,
    /// Message from the model didn't contain any captions.
    #[error("cannot interpret the model's reply: {0}")]
    Reply(#[from] ReplyError),
}
