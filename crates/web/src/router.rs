//! Prefix routing.
//!
//! A [`Router`] holds an ordered list of [`Route`]s. Dispatch scans the routes in
//! registration order and picks the first one whose prefix starts the request
//! path; there is no longest-match rule, so `/a` registered before `/a/b` shadows
//! it. When the matched route doesn't accept the request method the response is
//! `405 Method Not Allowed` with an `Allow` header, and no later route is tried.
//! Requests matching no prefix go to the error handler, [`NotFound`] by default.

use std::fmt;

use async_trait::async_trait;
use http::header::ALLOW;
use http::StatusCode;
use tracing::debug;
use webby_http::handler::Handler;
use webby_http::protocol::{MethodMask, Request, Response, SendError};

/// A path prefix, the methods it accepts and the handler serving it.
pub struct Route {
    prefix: String,
    methods: MethodMask,
    handler: Box<dyn Handler>,
}

impl Route {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn methods(&self) -> MethodMask {
        self.methods
    }

    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route").field("prefix", &self.prefix).field("methods", &self.methods).finish_non_exhaustive()
    }
}

/// The route table of a server.
///
/// ```
/// use webby::{FileHandler, Method, MethodMask, NotImplemented, Router};
///
/// let router = Router::new()
///     .add("/api", MethodMask::REST, NotImplemented)
///     .add("/", Method::Get, FileHandler::new("./public"));
/// assert_eq!(router.at("/api/items").unwrap().prefix(), "/api");
/// assert_eq!(router.at("/index.html").unwrap().prefix(), "/");
/// ```
pub struct Router {
    routes: Vec<Route>,
    error_handler: Box<dyn Handler>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new(), error_handler: Box::new(NotFound) }
    }

    /// Appends a route. Routes registered earlier take precedence.
    #[must_use]
    pub fn add(mut self, prefix: impl Into<String>, methods: impl Into<MethodMask>, handler: impl Handler + 'static) -> Self {
        self.routes.push(Route { prefix: prefix.into(), methods: methods.into(), handler: Box::new(handler) });
        self
    }

    /// Replaces the handler for requests matching no route.
    #[must_use]
    pub fn set_error_handler(mut self, handler: impl Handler + 'static) -> Self {
        self.error_handler = Box::new(handler);
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the first route whose prefix starts `path`.
    pub fn at(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| path.starts_with(route.prefix.as_str()))
    }

    /// Routes `req` to its handler.
    ///
    /// # Errors
    ///
    /// Propagates the errors of the selected handler.
    pub async fn dispatch(&self, req: &Request, resp: &mut Response) -> Result<(), SendError> {
        let Some(route) = self.at(req.path()) else {
            debug!(path = req.path(), "no route matched");
            return self.error_handler.call(req, resp).await;
        };

        if !route.methods.contains(req.method()) {
            debug!(path = req.path(), prefix = route.prefix.as_str(), method = %req.method(), "method not allowed");
            resp.set_status(StatusCode::METHOD_NOT_ALLOWED)?.set_header(ALLOW, route.methods.to_string())?;
            return Ok(());
        }

        debug!(path = req.path(), prefix = route.prefix.as_str(), "matched route");
        // overwrites the prefix recorded by an enclosing router
        req.set_route(&route.prefix);
        route.handler.call(req, resp).await
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").field("routes", &self.routes).finish_non_exhaustive()
    }
}

#[async_trait]
impl Handler for Router {
    async fn call(&self, req: &Request, resp: &mut Response) -> Result<(), SendError> {
        self.dispatch(req, resp).await
    }
}

/// Answers every request with `404 Not Found`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotFound;

#[async_trait]
impl Handler for NotFound {
    async fn call(&self, _req: &Request, resp: &mut Response) -> Result<(), SendError> {
        resp.set_status(StatusCode::NOT_FOUND)?;
        Ok(())
    }
}
