//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;

use crate::method::Method;

/// An incoming HTTP request with its body already collected.
///
/// The server builds one per hyper request. Tests build them directly with
/// [`Request::new`] and hand them to [`Router::handle`](crate::Router::handle).
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: Bytes::new(),
            params: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub(crate) fn from_parts(
        parts: &http::request::Parts,
        method: Method,
        body: Bytes,
    ) -> Self {
        let headers = parts.headers.iter()
            .filter_map(|(k, v)| Some((k.as_str().to_owned(), v.to_str().ok()?.to_owned())))
            .collect();
        Self {
            method,
            path: parts.uri.path().to_owned(),
            headers,
            body,
            params: HashMap::new(),
        }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The declared `content-length`, falling back to the collected body size
    /// when the header is missing or unparsable (chunked uploads).
    pub fn content_length(&self) -> usize {
        self.header("content-length")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(self.body.len())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/sample/{key}`, `req.param("key")` on `/sample/foo` returns `Some("foo")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Decodes an `application/x-www-form-urlencoded` body.
    ///
    /// Repeated names keep the last value.
    pub fn form(&self) -> HashMap<String, String> {
        form_urlencoded::parse(&self.body).into_owned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::new(Method::Get, "/").with_header("Content-Type", "text/plain");
        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn content_length_prefers_header() {
        let req = Request::new(Method::Post, "/")
            .with_header("content-length", "12")
            .with_body(&b"abc"[..]);
        assert_eq!(req.content_length(), 12);

        let req = Request::new(Method::Post, "/").with_body(&b"abc"[..]);
        assert_eq!(req.content_length(), 3);
    }

    #[test]
    fn form_decodes_percent_and_plus() {
        let req = Request::new(Method::Post, "/login").with_body(&b"key1=a+b&key2=%7Cx%7C&key3="[..]);
        let form = req.form();
        assert_eq!(form.get("key1").map(String::as_str), Some("a b"));
        assert_eq!(form.get("key2").map(String::as_str), Some("|x|"));
        assert_eq!(form.get("key3").map(String::as_str), Some(""));
    }
}
