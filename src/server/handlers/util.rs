//! Utilities for request handlers.

use std::error::Error;

use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Body as HttpBody, Bytes};
use hyper::header::{HeaderValue, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use mime::{self, Mime};
use regex::Regex;
use serde::Serialize;
use serde_json::json;


/// Body of every response produced by the server.
pub type Body = Full<Bytes>;

/// Maximum size of request body that the server will read.
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Name of the downloaded image when none has been requested.
pub const DEFAULT_FILENAME: &str = "meme.png";

lazy_static! {
    /// Runs of characters that shouldn't make it into a download filename.
    static ref UNSAFE_FILENAME_CHARS_RE: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();
}


/// Create a response with given content.
pub fn response<B: Into<Bytes>>(status: StatusCode, content_type: &Mime, body: B) -> Response<Body> {
    let body = body.into();
    let length = body.len();
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    if let Ok(value) = HeaderValue::from_str(content_type.as_ref()) {
        response.headers_mut().insert(CONTENT_TYPE, value);
    }
    response.headers_mut().insert(CONTENT_LENGTH, HeaderValue::from(length));
    response
}

/// Create an empty response.
pub fn empty_response(status: StatusCode) -> Response<Body> {
    response(status, &mime::TEXT_PLAIN_UTF_8, Bytes::new())
}

/// Create a JSON response.
pub fn json_response<T: Serialize + ?Sized>(value: &T) -> Response<Body> {
    match serde_json::to_vec(value) {
        Ok(body) => response(StatusCode::OK, &mime::APPLICATION_JSON, body),
        Err(e) => {
            error!("Failed to serialize JSON response: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "cannot serialize response")
        }
    }
}

/// Create an erroneous JSON response.
pub fn error_response<T: ToString>(status: StatusCode, message: T) -> Response<Body> {
    let body = json!({"error": message.to_string()}).to_string();
    response(status, &mime::APPLICATION_JSON, body)
}

/// Create a response with an image to be downloaded as given file.
pub fn download_response(content_type: &Mime, bytes: Vec<u8>, filename: &str) -> Response<Body> {
    let mut response = response(StatusCode::OK, content_type, bytes);
    let disposition = format!("attachment; filename=\"{}\"", filename);
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        response.headers_mut().insert(CONTENT_DISPOSITION, value);
    }
    response
}


/// Read the whole request body, up to `MAX_BODY_SIZE`.
pub async fn read_body<B>(body: B) -> Result<Bytes, Box<dyn Error + Send + Sync>>
    where B: HttpBody, B::Error: Into<Box<dyn Error + Send + Sync>>
{
    let collected = Limited::new(body, MAX_BODY_SIZE).collect().await?;
    Ok(collected.to_bytes())
}

/// Turn the requested name of a downloaded image into a safe PNG filename.
pub fn download_filename(requested: Option<&str>) -> String {
    let name = requested.unwrap_or("").trim();
    let name = UNSAFE_FILENAME_CHARS_RE.replace_all(name, "_");
    let name = name.trim_matches(|c| c == '.' || c == '_');
    if name.is_empty() {
        return DEFAULT_FILENAME.to_owned();
    }
    if name.to_lowercase().ends_with(".png") {
        name.to_owned()
    } else {
        format!("{}.png", name)
    }
}


#[cfg(test)]
mod tests {
    use http_body_util::Full;
    use hyper::body::Bytes;
    use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};
    use hyper::StatusCode;
    use spectral::prelude::*;
    use super::{download_filename, error_response, json_response, read_body, MAX_BODY_SIZE};

    #[test]
    fn filenames() {
        assert_eq!("meme.png", download_filename(None));
        assert_eq!("meme.png", download_filename(Some("")));
        assert_eq!("meme.png", download_filename(Some(" ../ ")));
        assert_eq!("drake.png", download_filename(Some("drake")));
        assert_eq!("Drake.PNG", download_filename(Some("Drake.PNG")));
        assert_eq!("my_meme.png", download_filename(Some("my meme")));
        assert_eq!("etc_passwd.png", download_filename(Some("/etc/passwd")));
        assert_eq!("a_b.png", download_filename(Some("a\"; b")));
    }

    #[test]
    fn json_headers() {
        let response = json_response(&vec![1, 2, 3]);
        assert_eq!(StatusCode::OK, response.status());
        assert_that!(response.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()))
            .is_some().is_equal_to("application/json");
        assert_that!(response.headers().get(CONTENT_LENGTH).and_then(|v| v.to_str().ok()))
            .is_some().is_equal_to("7");
    }

    #[test]
    fn error_status() {
        let response = error_response(StatusCode::NOT_FOUND, "Not found");
        assert_eq!(StatusCode::NOT_FOUND, response.status());
        assert_that!(response.headers().get(CONTENT_LENGTH).and_then(|v| v.to_str().ok()))
            .is_some().is_equal_to("21");
    }

    #[tokio::test]
    async fn body_limit() {
        let body = Full::new(Bytes::from_static(b"{\"prompt\": \"hi\"}"));
        assert_that!(read_body(body).await.map(|b| b.len())).is_ok().is_equal_to(16);

        let body = Full::new(Bytes::from(vec![b'x'; MAX_BODY_SIZE + 1]));
        assert!(read_body(body).await.is_err());
    }
}
