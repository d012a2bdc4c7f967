//! The decoded request handed to handlers.

use std::sync::atomic::{AtomicUsize, Ordering};

use http::Version;

use crate::protocol::{HeaderError, Headers, Method};

/// A request decoded from an accepted connection.
///
/// Requests are only built by the request decoder. Apart from the matched route
/// prefix, which routers record during dispatch, a request is immutable for its
/// whole lifetime.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    version: Version,
    headers: Headers,
    /// Length of the matched route prefix; the prefix is always a prefix of `path`.
    route_len: AtomicUsize,
}

impl Request {
    pub(crate) fn new(method: Method, path: String, version: Version, headers: Headers) -> Self {
        Self { method, path, version, headers, route_len: AtomicUsize::new(0) }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the request target exactly as received. Percent-encoding is not decoded.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Shortcut for `self.headers().get(name)`.
    pub fn header(&self, name: impl AsRef<str>) -> Result<&str, HeaderError> {
        self.headers.get(name)
    }

    pub fn has_header(&self, name: impl AsRef<str>) -> bool {
        self.headers.has(name)
    }

    /// Returns the route prefix that matched this request, or `""` before dispatch.
    pub fn route(&self) -> &str {
        &self.path[..self.route_len()]
    }

    /// Records the route prefix that matched this request.
    ///
    /// Nested routers each record their match, so the innermost prefix is the one
    /// kept. Returns `false`, recording nothing, if `prefix` does not start the path.
    pub fn set_route(&self, prefix: &str) -> bool {
        if !self.path.starts_with(prefix) {
            return false;
        }
        self.route_len.store(prefix.len(), Ordering::Relaxed);
        true
    }

    /// Returns the part of the path that follows the matched route prefix.
    ///
    /// For a request to `/item/2` routed through `/item` this is `/2`. Before
    /// dispatch the whole path is returned.
    pub fn subpath(&self) -> &str {
        &self.path[self.route_len()..]
    }

    fn route_len(&self) -> usize {
        self.route_len.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(path: &str) -> Request {
        let mut headers = Headers::new();
        headers.set("Host", "localhost:8080").unwrap();
        Request::new(Method::Get, path.to_owned(), Version::HTTP_11, headers)
    }

    #[test]
    fn route_splits_the_path() {
        let req = request("/item/2");
        assert_eq!(req.route(), "");
        assert_eq!(req.subpath(), "/item/2");

        assert!(req.set_route("/item"));
        assert_eq!(req.route(), "/item");
        assert_eq!(req.subpath(), "/2");
    }

    #[test]
    fn innermost_route_is_kept() {
        let req = request("/api/items/7");

        assert!(req.set_route("/api"));
        assert!(req.set_route("/api/items"));
        assert_eq!(req.route(), "/api/items");
        assert_eq!(req.subpath(), "/7");
    }

    #[test]
    fn reject_route_that_is_not_a_prefix() {
        let req = request("/item/2");
        assert!(req.set_route("/item"));

        assert!(!req.set_route("/other"));
        assert!(!req.set_route("/item/2/extra"));
        assert_eq!(req.route(), "/item");
    }

    #[test]
    fn header_shortcuts() {
        let req = request("/");
        assert!(req.has_header("host"));
        assert_eq!(req.header("HOST").unwrap(), "localhost:8080");
        assert!(req.header("Accept").is_err());
    }
}
