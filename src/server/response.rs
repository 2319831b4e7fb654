//! Request and response values, and the `tiny_http` glue around them.
//!
//! Routing works on plain [`AppRequest`]/[`AppResponse`] values so it can be
//! exercised without a socket. [`read_request`] and [`send`] are the only
//! places that touch `tiny_http`.

use maud::Markup;
use serde::Serialize;
use std::io::Read;
use tiny_http::{Header, Request, Response, StatusCode};

/// Largest request body read; anything beyond is truncated.
pub const MAX_BODY_BYTES: u64 = 1024 * 1024;

pub mod mime {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JSON: &str = "application/json";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Other,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Other => "OTHER",
        }
    }

    /// GET and HEAD are served by the same handlers.
    pub fn is_read(self) -> bool {
        matches!(self, Method::Get | Method::Head)
    }
}

#[derive(Debug, Clone)]
pub struct AppRequest {
    pub method: Method,
    /// Path without query string.
    pub path: String,
    /// Query string without the leading `?`.
    pub query: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl AppRequest {
    pub fn new(method: Method, url: &str) -> Self {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let path = path.split('#').next().unwrap_or_default();
        Self {
            method,
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            query: query.to_string(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn get(url: &str) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            ..Self::new(Method::Post, url)
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct AppResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl AppResponse {
    pub fn new(status: u16, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body: body.into(),
        }
    }

    pub fn html(status: u16, markup: Markup) -> Self {
        Self::new(status, mime::HTML, markup.into_string())
    }

    pub fn json(status: u16, value: &impl Serialize) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::new(status, mime::JSON, body),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response");
                Self::new(500, mime::PLAIN, "500 Internal Server Error")
            }
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self::new(status, mime::PLAIN, body)
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All values of a repeatable header such as `Set-Cookie`.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Copy a `tiny_http` request into an [`AppRequest`], reading the body.
pub fn read_request(request: &mut Request) -> std::io::Result<AppRequest> {
    let method = match request.method() {
        tiny_http::Method::Get => Method::Get,
        tiny_http::Method::Head => Method::Head,
        tiny_http::Method::Post => Method::Post,
        _ => Method::Other,
    };
    let mut app_request = AppRequest::new(method, request.url());
    app_request.headers = request
        .headers()
        .iter()
        .map(|h| (h.field.as_str().as_str().to_string(), h.value.as_str().to_string()))
        .collect();
    if method == Method::Post {
        request
            .as_reader()
            .take(MAX_BODY_BYTES)
            .read_to_end(&mut app_request.body)?;
    }
    Ok(app_request)
}

/// Write an [`AppResponse`]. For HEAD requests `tiny_http` withholds the
/// body but still reports its length.
pub fn send(request: Request, response: AppResponse) -> std::io::Result<()> {
    let mut out = Response::from_data(response.body).with_status_code(StatusCode(response.status));
    for (name, value) in &response.headers {
        match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(header) => out.add_header(header),
            Err(()) => tracing::warn!(header = %name, "dropping invalid response header"),
        }
    }
    request.respond(out)
}
