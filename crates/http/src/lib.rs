//! The HTTP/1.1 protocol engine of the webby embeddable server.
//!
//! This crate turns one accepted connection into one request/response exchange:
//! it decodes the request head, hands a [`Request`](protocol::Request) and a
//! [`Response`](protocol::Response) to a [`Handler`](handler::Handler), and makes
//! sure the response is properly terminated before the connection is closed.
//!
//! # Example
//!
//! ```no_run
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn};
//! use webby_http::connection::HttpConnection;
//! use webby_http::handler::{make_handler, HandlerFuture};
//! use webby_http::protocol::{Request, Response};
//!
//! #[tokio::main]
//! async fn main() {
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = make_handler(hello_world);
//!
//!     loop {
//!         let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let (reader, writer) = tcp_stream.into_split();
//!         let connection = HttpConnection::new(reader, writer).with_peer(remote_addr);
//!         match connection.process(&handler).await {
//!             Ok(()) => info!("finished process, connection shutdown"),
//!             Err(e) => error!(cause = %e, "connection failed"),
//!         }
//!     }
//! }
//!
//! fn hello_world<'a>(_req: &'a Request, resp: &'a mut Response) -> HandlerFuture<'a> {
//!     Box::pin(async move {
//!         resp.set_status_code(200)?.set_header("Content-Length", "14")?;
//!         resp.write_block(b"Hello World!\r\n").await
//!     })
//! }
//! ```
//!
//! # Architecture
//!
//! - [`connection`]: the per-connection lifecycle
//! - [`protocol`]: requests, responses, headers, methods and errors
//! - [`codec`]: the request decoder
//! - [`handler`]: the handler contract and helpers
//!
//! # Limitations
//!
//! - one request per connection; no keep-alive, pipelining or chunked encoding
//! - request bodies are not read
//! - no TLS support (use a reverse proxy for HTTPS)
//! - maximum header size: 8KB
//! - maximum number of headers: 64

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod date;
mod utils;
pub(crate) use utils::ensure;

#[cfg(test)]
mod test_util;
