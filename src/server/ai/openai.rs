//! Caption generator talking to the OpenAI chat completions API.

use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use memecraft::CaptionPair;
use memecraft::ai::{parse_reply, SYSTEM_PROMPT};
use serde::{Deserialize, Serialize};

use super::{CaptionGenerator, GenerateError};


/// Maximum time for establishing the connection to the API.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

lazy_static! {
    static ref USER_AGENT: String = format!("{}/{}",
        *crate::NAME, crate::VERSION.unwrap_or("0.0.0"));
}


/// Generator asking a language model for captions.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiGenerator {
    pub fn new<K, M, U>(api_key: K, model: M, base_url: U, timeout: Duration) -> Result<Self, reqwest::Error>
        where K: Into<String>, M: Into<String>, U: Into<String>
    {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT.as_str());
        if timeout > Duration::ZERO {
            builder = builder.timeout(timeout);
        }
        Ok(OpenAiGenerator{
            client: builder.build()?,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        })
    }

    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    async fn complete(&self, prompt: &str) -> Result<CaptionPair, GenerateError> {
        let request = ChatRequest::new(&self.model, prompt);
        debug!("Asking {} at {} for captions", self.model, self.base_url);

        let response = self.client.post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Status(status, body));
        }

        let completion: ChatResponse = response.json().await?;
        if let Some(ref usage) = completion.usage {
            trace!("Chat completion used {} prompt + {} completion tokens",
                usage.prompt_tokens, usage.completion_tokens);
        }
        let content = completion.content().ok_or(GenerateError::NoContent)?;
        trace!("Model replied with: {}", content);
        Ok(parse_reply(content)?)
    }
}

impl CaptionGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<CaptionPair, GenerateError>> {
        self.complete(prompt).boxed()
    }
}


// Wire format of the chat completions API.

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    response_format: ResponseFormat,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, prompt: &'a str) -> Self {
        ChatRequest{
            model,
            messages: [
                Message{role: "system", content: SYSTEM_PROMPT},
                Message{role: "user", content: prompt},
            ],
            response_format: ResponseFormat{kind: "json_object"},
        }
    }
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

impl ChatResponse {
    /// Content of the first message, if any.
    fn content(&self) -> Option<&str> {
        self.choices.first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|c| !c.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
