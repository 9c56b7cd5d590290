//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. You register a path, you
//! get a handler.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;
use percent_encoding::percent_decode_str;
use tracing::debug;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Registrations chain.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if the path is malformed or conflicts with an earlier route.
    /// Routes are fixed at startup, so this is a programming error.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, handler)
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::Post, path, handler)
    }

    fn add(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), percent_decode_str(v).decode_utf8_lossy().into_owned()))
            .collect();
        Some((handler, params))
    }

    /// Routes one request and runs its handler. Unmatched paths get `404`.
    ///
    /// `HEAD` without a route of its own runs the `GET` handler and drops the
    /// body. The server calls this for every request; tests can call it
    /// directly without opening a socket.
    pub async fn handle(&self, mut req: Request) -> Response {
        let head_as_get = req.method == Method::Head && !self.routes.contains_key(&Method::Head);
        let method = if head_as_get { Method::Get } else { req.method };

        match self.lookup(method, &req.path) {
            Some((handler, params)) => {
                req.params = params;
                let mut response = handler.call(req).await;
                if head_as_get {
                    response.body.clear();
                }
                response
            }
            None => {
                debug!(method = %req.method, path = %req.path, "no route");
                Response::status(Status::NotFound)
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn echo(req: Request) -> String {
        req.param("name").unwrap_or("?").to_owned()
    }

    #[tokio::test]
    async fn params_reach_the_handler() {
        let router = Router::new().get("/hello/{name}", echo);
        let res = router.handle(Request::new(Method::Get, "/hello/ada")).await;
        assert_eq!(res.code(), Status::Ok);
        assert_eq!(res.body(), b"ada");
    }

    #[tokio::test]
    async fn method_and_path_must_both_match() {
        let router = Router::new().get("/hello/{name}", echo);
        let res = router.handle(Request::new(Method::Post, "/hello/ada")).await;
        assert_eq!(res.code(), Status::NotFound);
        let res = router.handle(Request::new(Method::Get, "/bye")).await;
        assert_eq!(res.code(), Status::NotFound);
    }

    #[tokio::test]
    async fn static_segment_wins_over_parameter() {
        async fn add(_: Request) -> &'static str { "add" }
        let router = Router::new()
            .get("/sample/{key}", echo)
            .get("/sample/add/{key}/{value}", add);
        let res = router.handle(Request::new(Method::Get, "/sample/add/a/b")).await;
        assert_eq!(res.body(), b"add");
    }

    #[tokio::test]
    async fn head_runs_the_get_handler_without_a_body() {
        let router = Router::new().get("/hello/{name}", echo);
        let res = router.handle(Request::new(Method::Head, "/hello/ada")).await;
        assert_eq!(res.code(), Status::Ok);
        assert_eq!(res.header("content-type"), Some("text/plain; charset=utf-8"));
        assert!(res.body().is_empty());

        let res = router.handle(Request::new(Method::Head, "/bye")).await;
        assert_eq!(res.code(), Status::NotFound);
    }

    #[tokio::test]
    async fn params_are_percent_decoded() {
        let router = Router::new().get("/hello/{name}", echo);
        let res = router.handle(Request::new(Method::Get, "/hello/ada%20l")).await;
        assert_eq!(res.body(), b"ada l");
    }
}
