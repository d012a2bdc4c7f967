//! An embeddable HTTP/1.1 server with prefix routing.
//!
//! `webby` puts a route table, a few ready-made handlers and an accept loop on
//! top of the [`webby_http`] protocol engine:
//!
//! - [`Router`]: first-match prefix routing with per-route method masks
//! - [`ResourceHandler`]: REST-style dispatch into a [`Resource`]
//! - [`FileHandler`]: static files below a root directory
//! - [`Server`]: binds the configured address and serves one connection at a
//!   time through a [`Strategy`]
//! - [`ServerConfig`] and [`logging`]: the listen address and the access and
//!   error logs
//!
//! ```no_run
//! use webby::{handler_fn, FileHandler, HandlerFuture, Method, MethodMask, Request, Response, Router, Server, ServerConfig};
//!
//! fn hello<'a>(_req: &'a Request, resp: &'a mut Response) -> HandlerFuture<'a> {
//!     Box::pin(async move {
//!         resp.set_status_code(200)?.set_header("Content-Length", "5")?;
//!         resp.write_block(b"hello").await
//!     })
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::load("webby.toml")?;
//!     webby::logging::init(&config)?;
//!
//!     let router = Router::new()
//!         .add("/hello", Method::Get | Method::Head, handler_fn(hello))
//!         .add("/", MethodMask::from(Method::Get), FileHandler::new("./public"));
//!
//!     Server::builder().config(config).router(router).build()?.run().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod files;
mod resource;
mod router;
mod server;
mod strategy;

pub mod logging;

pub use config::{ConfigError, LogSink, ServerConfig};
pub use files::FileHandler;
pub use resource::{Resource, ResourceHandler};
pub use router::{NotFound, Route, Router};
pub use server::{Listening, Server, ServerBuildError, ServerBuilder, ServerError};
pub use strategy::{Single, Strategy};

pub use webby_http::handler::{make_handler as handler_fn, Handler, HandlerFn, HandlerFuture, NotImplemented};
pub use webby_http::protocol::{HeaderError, Headers, Method, MethodMask, Request, Response, SendError};

#[cfg(test)]
mod test_support;
