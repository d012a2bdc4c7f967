use std::net::SocketAddr;
use std::time::Duration;

use futures::StreamExt;
use http::header::{HOST, LOCATION};
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::time::timeout;
use tokio_util::codec::FramedRead;
use tracing::{debug, error, info, trace, warn};

use crate::codec::RequestDecoder;
use crate::handler::Handler;
use crate::protocol::{HttpError, ParseError, Request, Response};

/// Target of the access log events emitted once per completed response.
pub const ACCESS_LOG_TARGET: &str = "webby::access";

const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Upper bounds on what is read and discarded after the response went out.
const DRAIN_LIMIT: usize = 64 * 1024;
const DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

/// One accepted connection, carrying exactly one request/response exchange.
///
/// Processing goes through decoding the request, adding default headers,
/// dispatching to the handler and flushing whatever the handler left unsent;
/// the connection is shut down afterwards. Request bytes nobody read, such as an
/// unused body, are drained for a short while before the socket is released.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    writer: W,
    peer: Option<SocketAddr>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Send + Unpin + 'static,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), READ_BUFFER_SIZE), writer, peer: None }
    }

    /// Records the remote address, used in the access log.
    #[must_use]
    pub fn with_peer(mut self, peer: SocketAddr) -> Self {
        self.peer = Some(peer);
        self
    }

    /// Serves the single request of this connection with `handler`.
    ///
    /// A request that can't be decoded is answered with `400 Bad Request`; a
    /// handler error is answered with `500 Internal Server Error` as long as the
    /// handler did not send the head yet.
    ///
    /// # Errors
    ///
    /// Returns the decode error for malformed requests, handler errors raised
    /// after the head was sent, and I/O failures while writing the response.
    pub async fn process<H>(self, handler: &H) -> Result<(), HttpError>
    where
        H: Handler + ?Sized,
    {
        let Self { mut framed_read, writer, peer } = self;
        let mut response = Response::new(writer);

        let request = match framed_read.next().await {
            Some(Ok(request)) => request,

            Some(Err(ParseError::Incomplete { buffered })) => {
                info!(?peer, buffered, "peer closed the connection in the middle of a request");
                return Ok(());
            }

            Some(Err(e)) => {
                error!(?peer, cause = %e, "can't decode request");
                response.set_status(StatusCode::BAD_REQUEST)?;
                response.finish().await?;
                response.shutdown().await?;
                drain(framed_read, peer).await;
                return Err(e.into());
            }

            None => {
                debug!(?peer, "connection closed before a request arrived");
                return Ok(());
            }
        };

        debug!(?peer, method = %request.method(), path = request.path(), "dispatching request");
        set_default_headers(&request, &mut response);

        if let Err(e) = handler.call(&request, &mut response).await {
            error!(?peer, method = %request.method(), path = request.path(), cause = %e, "handler failed");
            if response.headers_sent() {
                response.shutdown().await?;
                drain(framed_read, peer).await;
                return Err(e.into());
            }
            response.reset(StatusCode::INTERNAL_SERVER_ERROR)?;
        }

        if let Err(e) = response.finish().await {
            error!(?peer, method = %request.method(), path = request.path(), cause = %e, "can't finish response");
            if response.headers_sent() {
                response.shutdown().await?;
                return Err(e.into());
            }
            response.reset(StatusCode::INTERNAL_SERVER_ERROR)?;
            response.finish().await?;
        }

        info!(
            target: ACCESS_LOG_TARGET,
            ?peer,
            method = %request.method(),
            path = request.path(),
            status = response.status().as_u16(),
            bytes = response.bytes_sent(),
            "request completed"
        );

        response.shutdown().await?;
        drain(framed_read, peer).await;
        Ok(())
    }
}

/// Reads and discards what the peer still sends, until it closes its side or a
/// bound is hit.
async fn drain<R>(framed_read: FramedRead<R, RequestDecoder>, peer: Option<SocketAddr>)
where
    R: AsyncRead + Unpin,
{
    let buffered = framed_read.read_buffer().len();
    let mut reader = framed_read.into_inner();
    let mut block = [0u8; 4 * 1024];
    let mut drained = 0;

    let read_until_closed = async {
        while drained < DRAIN_LIMIT {
            match reader.read(&mut block).await {
                Ok(0) | Err(_) => break,
                Ok(n) => drained += n,
            }
        }
    };
    if timeout(DRAIN_TIMEOUT, read_until_closed).await.is_err() {
        debug!(?peer, "peer kept the connection open after the response");
    }
    trace!(?peer, buffered, drained, "discarded unread request bytes");
}

/// Points `Location` at the absolute URL of the request when the client sent a `Host`.
fn set_default_headers(request: &Request, response: &mut Response) {
    let Ok(host) = request.header(HOST) else {
        return;
    };

    let location = format!("http://{host}{}", request.path());
    if let Err(e) = response.set_header(LOCATION, location) {
        warn!(cause = %e, "can't set default location header");
    }
}
