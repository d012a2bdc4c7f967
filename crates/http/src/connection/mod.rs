//! Connection handling.
//!
//! [`HttpConnection`] drives one request/response exchange over a pair of async
//! streams: it decodes the request, hands it to a [`Handler`](crate::handler::Handler),
//! terminates the response and shuts the write side down. Malformed requests and
//! failing handlers are answered here, so handlers never see them.

mod http_connection;

pub use http_connection::{HttpConnection, ACCESS_LOG_TARGET};
