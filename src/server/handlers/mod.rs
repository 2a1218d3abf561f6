//! Module with the server's request handlers.

mod captioner;
pub mod list;
pub mod util;


use std::error::Error;

use hyper::body::Body as HttpBody;
use hyper::header::{HeaderValue, ALLOW};
use hyper::{Method, Request, Response, StatusCode};
use memecraft::ImageMacro;
use memecraft::ai::validate_prompt;
use serde::Deserialize;

pub use self::captioner::{Captioner, RenderError};
use crate::backend::Backend;
use self::util::{download_filename, download_response, error_response, json_response, read_body, Body};


type DecodeError = Box<dyn Error + Send + Sync>;

/// Request parameters of the meme rendering endpoint
/// which aren't part of the image macro.
#[derive(Debug, Default, Deserialize)]
struct DownloadParams {
    #[serde(default)]
    filename: Option<String>,
}

/// Body of the caption generation request.
#[derive(Debug, Default, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    prompt: Option<String>,
}


/// Handle the meme rendering HTTP request.
pub async fn render_meme<B>(backend: &Backend, request: Request<B>) -> Response<Body>
    where B: HttpBody, B::Error: Into<DecodeError>
{
    let (parts, body) = request.into_parts();
    let parsed: Result<(ImageMacro, DownloadParams), DecodeError> = match parts.method {
        Method::GET => {
            let query = match parts.uri.query() {
                Some(q) => { trace!("Render request query string: {}", q); q }
                None => { trace!("No query string found in render request"); "" }
            };
            debug!("Decoding image macro from {} bytes of query string", query.len());
            decode_query(query)
        }
        Method::POST => {
            let body = match read_body(body).await {
                Ok(b) => b,
                Err(e) => {
                    warn!("Failed to read render request body: {}", e);
                    return error_response(
                        StatusCode::BAD_REQUEST, format!("cannot read request: {}", e));
                }
            };
            trace!("Render request body: {}", String::from_utf8_lossy(&body));
            debug!("Decoding image macro from {} bytes of JSON", body.len());
            decode_json(&body)
        }
        m => {
            warn!("Unsupported HTTP method for render request: {}", m);
            let mut response = error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
            response.headers_mut().insert(ALLOW, HeaderValue::from_static("GET, POST, OPTIONS"));
            return response;
        }
    };

    let (im, params) = match parsed {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to decode image macro: {}", e);
            return error_response(
                StatusCode::BAD_REQUEST, format!("cannot decode request: {}", e));
        }
    };
    let im = backend.resolve_template(im);
    debug!("Decoded {:?}", im);

    let filename = download_filename(params.filename.as_deref());
    match backend.captioner().render(im).await {
        Ok(out) => download_response(&out.mime_type(), out.into_bytes(), &filename),
        Err(e) => error_response(e.status_code(), e),
    }
}

fn decode_query(query: &str) -> Result<(ImageMacro, DownloadParams), DecodeError> {
    let im = serde_qs::from_str(query)?;
    let params = serde_qs::from_str(query)?;
    Ok((im, params))
}

fn decode_json(body: &[u8]) -> Result<(ImageMacro, DownloadParams), DecodeError> {
    let im = serde_json::from_slice(body)?;
    let params = serde_json::from_slice(body)?;
    Ok((im, params))
}


/// Handle the HTTP request for generating captions from a meme idea.
pub async fn generate_caption<B>(backend: &Backend, request: Request<B>) -> Response<Body>
    where B: HttpBody, B::Error: Into<DecodeError>
{
    let body = match read_body(request.into_body()).await {
        Ok(b) => b,
        Err(e) => {
            warn!("Failed to read caption generation request body: {}", e);
            return error_response(StatusCode::BAD_REQUEST, format!("cannot read request: {}", e));
        }
    };
    trace!("Caption generation request body: {}", String::from_utf8_lossy(&body));

    let generate: GenerateRequest = if body.iter().all(u8::is_ascii_whitespace) {
        GenerateRequest::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(g) => g,
            Err(e) => {
                error!("Failed to decode caption generation request: {}", e);
                return error_response(
                    StatusCode::BAD_REQUEST, format!("cannot decode request: {}", e));
            }
        }
    };

    let prompt = match validate_prompt(generate.prompt.as_deref().unwrap_or("")) {
        Ok(p) => p,
        Err(e) => {
            debug!("Rejecting caption generation request: {}", e);
            return error_response(StatusCode::BAD_REQUEST, e);
        }
    };
    let captions = backend.generate_caption(prompt).await;
    json_response(&captions)
}


#[cfg(test)]
mod tests {
    use spectral::prelude::*;
    use super::{decode_json, decode_query};

    #[test]
    fn query_with_filename() {
        let (im, params) = decode_query(
            "template=drake&topText=Hello&bottom_text=World&filename=greeting").unwrap();
        assert_eq!("drake", im.template);
        assert_eq!("Hello", im.captions.top_text);
        assert_eq!("World", im.captions.bottom_text);
        assert_that!(params.filename).is_some().is_equal_to("greeting".to_owned());
    }

    #[test]
    fn json_without_filename() {
        let (im, params) = decode_json(br#"{"template": "4", "width": 500}"#).unwrap();
        assert_eq!("4", im.template);
        assert_that!(im.width).is_some().is_equal_to(500);
        assert_that!(params.filename).is_none();
    }

    #[test]
    fn invalid_macros() {
        assert!(decode_query("topText=no+template").is_err());
        assert!(decode_query("template=drake&width=0").is_err());
        assert!(decode_json(b"{\"template\": \"drake\", \"height\": 100000}").is_err());
        assert!(decode_json(b"not json").is_err());
    }
}
