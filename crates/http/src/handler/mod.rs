//! The handler contract.
//!
//! A [`Handler`] receives a decoded [`Request`] together with the [`Response`]
//! for it and fills the response in: status, headers and, optionally, a body.
//! Anything the handler leaves unsent is flushed by the connection afterwards.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;

use crate::protocol::{Request, Response, SendError};

#[async_trait]
pub trait Handler: Send + Sync {
    /// Handles `req` by mutating `resp`.
    ///
    /// # Errors
    ///
    /// Errors are response programming errors, such as writing a body without a
    /// `Content-Length`. The connection answers them with a 500 when the head
    /// was not sent yet, and otherwise closes the connection.
    async fn call(&self, req: &Request, resp: &mut Response) -> Result<(), SendError>;
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Box<H> {
    async fn call(&self, req: &Request, resp: &mut Response) -> Result<(), SendError> {
        (**self).call(req, resp).await
    }
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Arc<H> {
    async fn call(&self, req: &Request, resp: &mut Response) -> Result<(), SendError> {
        (**self).call(req, resp).await
    }
}

/// The future returned by functions wrapped with [`make_handler`].
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), SendError>> + Send + 'a>>;

/// A [`Handler`] backed by a plain function.
#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<F> Handler for HandlerFn<F>
where
    F: for<'a> Fn(&'a Request, &'a mut Response) -> HandlerFuture<'a> + Send + Sync,
{
    async fn call(&self, req: &Request, resp: &mut Response) -> Result<(), SendError> {
        (self.f)(req, resp).await
    }
}

/// Wraps a function into a [`Handler`].
///
/// ```
/// use webby_http::handler::{make_handler, HandlerFuture};
/// use webby_http::protocol::{Request, Response};
///
/// fn hello<'a>(_req: &'a Request, resp: &'a mut Response) -> HandlerFuture<'a> {
///     Box::pin(async move {
///         resp.set_status_code(200)?.set_header("Content-Length", "5")?;
///         resp.write_block(b"hello").await
///     })
/// }
///
/// let handler = make_handler(hello);
/// ```
pub fn make_handler<F>(f: F) -> HandlerFn<F>
where
    F: for<'a> Fn(&'a Request, &'a mut Response) -> HandlerFuture<'a> + Send + Sync,
{
    HandlerFn { f }
}

/// Answers every request with `501 Not Implemented`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotImplemented;

#[async_trait]
impl Handler for NotImplemented {
    async fn call(&self, _req: &Request, resp: &mut Response) -> Result<(), SendError> {
        resp.set_status(StatusCode::NOT_IMPLEMENTED)?;
        Ok(())
    }
}
