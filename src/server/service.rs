//! Module with the service that implements ALL the functionality.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt};
use hyper::body::{Body as HttpBody, Incoming};
use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode};
use serde_json::json;

use crate::backend::Backend;
use crate::handlers::{self, list};
use crate::handlers::util::{empty_response, error_response, json_response, Body};


/// Hyper service serving a single connection.
#[derive(Clone)]
pub struct Memecraft {
    backend: Arc<Backend>,
    remote: SocketAddr,
}

impl Memecraft {
    #[inline]
    pub fn new(backend: Arc<Backend>, remote: SocketAddr) -> Self {
        Memecraft{backend, remote}
    }
}

impl Service<Request<Incoming>> for Memecraft {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let this = self.clone();
        async move { Ok(this.serve(req).await) }.boxed()
    }
}

impl Memecraft {
    /// Handle the request, logging it together with the response.
    pub async fn serve<B>(&self, req: Request<B>) -> Response<Body>
        where B: HttpBody, B::Error: Into<Box<dyn std::error::Error + Send + Sync>>
    {
        // TODO: log the request after the response is served, in Common Log Format
        self.log(&req);

        let start = Instant::now();
        let mut resp = self.handle(req).await;
        Self::fix_headers(resp.headers_mut());

        debug!("HTTP {status}, produced {len} bytes of {ctype} in {time:.3} secs",
            status = resp.status(),
            len = header_str(resp.headers(), header::CONTENT_LENGTH).unwrap_or("unknown number of"),
            ctype = header_str(resp.headers(), header::CONTENT_TYPE).unwrap_or("unknown content"),
            time = start.elapsed().as_secs_f64());
        resp
    }

    async fn handle<B>(&self, req: Request<B>) -> Response<Body>
        where B: HttpBody, B::Error: Into<Box<dyn std::error::Error + Send + Sync>>
    {
        let method = req.method().clone();
        let path = req.uri().path().to_owned();
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        let backend = &*self.backend;
        match (&method, &segments[..]) {
            (&Method::OPTIONS, _) => Self::handle_preflight(),

            (&Method::GET, ["api", "templates"]) => list::templates(backend),
            (&Method::GET, ["api", "templates", "popular"]) => list::popular_templates(backend),
            (&Method::GET, ["api", "templates", "trending"]) => list::trending_templates(backend),
            (&Method::GET, ["api", "templates", "category", slug]) =>
                list::category_templates(backend, slug),
            (&Method::GET, ["api", "categories"]) => list::categories(backend),

            (&Method::POST, ["api", "meme", "generate"]) =>
                handlers::generate_caption(backend, req).await,
            (_, ["api", "meme", "render"]) => handlers::render_meme(backend, req).await,

            (&Method::GET, ["stats"]) => self.handle_stats(),
            _ => Self::handle_404(&path),
        }
    }

    fn handle_404(path: &str) -> Response<Body> {
        debug!("Path {} doesn't match any endpoint", path);
        error_response(StatusCode::NOT_FOUND, "Not found")
    }

    /// Handle a CORS preflight request.
    fn handle_preflight() -> Response<Body> {
        trace!("Responding to CORS preflight request");
        empty_response(StatusCode::OK)
    }

    /// Handle the server statistics request.
    fn handle_stats(&self) -> Response<Body> {
        let engine = self.backend.captioner().engine();
        let stats = json!({
            "cache": {
                "templates": engine.template_cache().map(|c| c.stats()),
                "fonts": engine.font_cache().map(|c| c.stats()),
            },
            "renderThreads": self.backend.captioner().thread_count(),
            "revision": *crate::REVISION,
        });
        json_response(&stats)
    }
}

impl Memecraft {
    #[inline]
    fn log<B>(&self, req: &Request<B>) {
        info!("{} {} {}{} {:?}",
            self.remote.ip(),
            req.method().as_str().to_uppercase(),
            req.uri().path(),
            req.uri().query().map(|q| format!("?{}", q)).unwrap_or_default(),
            req.version());
    }

    /// Fix headers in the response, providing default values where necessary.
    fn fix_headers(headers: &mut HeaderMap) {
        if !headers.contains_key(header::CONTENT_TYPE) {
            headers.insert(header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"));
        }
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"));
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"));
        headers.insert(header::ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static("Content-Disposition"));
    }
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
