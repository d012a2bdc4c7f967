//! The response writer handed to handlers.
//!
//! A [`Response`] collects a status code and headers until the first body block
//! is written. At that point the head is framed and sent, after which status and
//! headers are frozen and further blocks stream straight to the connection.
//!
//! # Framing rules
//!
//! - a body can only be written once a `Content-Length` header is set, and the
//!   body may never exceed the declared length
//! - the reason phrase is derived from the status code; only codes with a known
//!   reason phrase are accepted
//! - a response whose handler never wrote a body is still terminated: the
//!   connection sends its head with `Content-Length: 0` when handling ends, or
//!   answers 500 if the handler left a `Content-Length` that is not a number

use std::fmt;

use bytes::BytesMut;
use http::header::CONTENT_LENGTH;
use http::{StatusCode, Version};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;
use tracing::{trace, warn};

use crate::codec::{HeaderEncoder, ResponseHead};
use crate::date::http_date;
use crate::ensure;
use crate::protocol::{Headers, SendError};

const INIT_BUFFER_SIZE: usize = 4 * 1024;

type BoxWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// The response to one request, writing to the request's connection.
///
/// Responses are created by the connection that accepted the request; handlers
/// receive them by mutable reference.
pub struct Response {
    status: StatusCode,
    version: Version,
    headers: Headers,
    headers_sent: bool,
    content_length: Option<u64>,
    bytes_sent: u64,
    writer: BoxWriter,
    buffer: BytesMut,
    encoder: HeaderEncoder,
}

impl Response {
    pub(crate) fn new<W>(writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            status: StatusCode::OK,
            version: Version::HTTP_11,
            headers: Headers::new(),
            headers_sent: false,
            content_length: None,
            bytes_sent: 0,
            writer: Box::new(writer),
            buffer: BytesMut::with_capacity(INIT_BUFFER_SIZE),
            encoder: HeaderEncoder,
        }
    }

    /// Sets a header, replacing any value stored under the same name.
    ///
    /// # Errors
    ///
    /// Fails if the headers were already sent, or the name or value is invalid.
    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<&mut Self, SendError> {
        ensure!(!self.headers_sent, SendError::headers_sent("headers"));
        self.headers.set(name, value)?;
        Ok(self)
    }

    /// Sets the status code.
    ///
    /// # Errors
    ///
    /// [`SendError::InvalidStatus`] if `code` has no registered reason phrase, in
    /// which case the previous status is kept; [`SendError::HeadersSent`] once the
    /// head went out.
    pub fn set_status_code(&mut self, code: u16) -> Result<&mut Self, SendError> {
        ensure!(!self.headers_sent, SendError::headers_sent("status code"));
        let status = StatusCode::from_u16(code)
            .ok()
            .filter(|status| status.canonical_reason().is_some())
            .ok_or(SendError::InvalidStatus(code))?;
        self.status = status;
        Ok(self)
    }

    /// Typed variant of [`set_status_code`](Self::set_status_code).
    pub fn set_status(&mut self, status: StatusCode) -> Result<&mut Self, SendError> {
        self.set_status_code(status.as_u16())
    }

    /// Sets the protocol version of the status line. Defaults to HTTP/1.1.
    pub fn set_version(&mut self, version: Version) -> Result<&mut Self, SendError> {
        ensure!(!self.headers_sent, SendError::headers_sent("version"));
        ensure!(matches!(version, Version::HTTP_10 | Version::HTTP_11), SendError::UnsupportedVersion(version));
        self.version = version;
        Ok(self)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the reason phrase that goes with the current status code.
    pub fn reason(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_sent(&self) -> bool {
        self.headers_sent
    }

    /// Returns the number of body bytes written so far.
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// Writes a block of the body.
    ///
    /// The first call sends the status line and headers ahead of the data; later
    /// calls only append body bytes.
    ///
    /// # Errors
    ///
    /// - [`SendError::MissingContentLength`] if the head is still pending and no
    ///   `Content-Length` header was set
    /// - [`SendError::InvalidContentLength`] if that header is not a number
    /// - [`SendError::BodyOverflow`] if the block would exceed the declared length
    ///
    /// None of these write anything to the connection.
    pub async fn write_block(&mut self, data: &[u8]) -> Result<(), SendError> {
        let declared = match self.content_length {
            Some(declared) => declared,
            None => declared_content_length(&self.headers)?,
        };

        let attempted = self.bytes_sent + data.len() as u64;
        ensure!(attempted <= declared, SendError::BodyOverflow { declared, attempted });

        if !self.headers_sent {
            self.content_length = Some(declared);
            self.encode_head()?;
        }

        self.flush_buffer().await?;
        self.writer.write_all(data).await?;
        self.writer.flush().await?;
        self.bytes_sent = attempted;

        trace!(block_size = data.len(), bytes_sent = self.bytes_sent, "wrote body block");
        Ok(())
    }

    /// Ends the response.
    ///
    /// If the head was never sent it goes out now, with `Content-Length: 0` unless
    /// the handler declared a length.
    ///
    /// # Errors
    ///
    /// [`SendError::InvalidContentLength`] if the pending head declares a length
    /// that is not a number. Nothing is written in that case, so the response can
    /// still be [`reset`](Self::reset).
    pub(crate) async fn finish(&mut self) -> Result<(), SendError> {
        if !self.headers_sent {
            let declared = if self.headers.has(CONTENT_LENGTH) {
                declared_content_length(&self.headers)?
            } else {
                self.headers.set(CONTENT_LENGTH, "0")?;
                0
            };
            self.content_length = Some(declared);
            self.encode_head()?;
        }
        self.flush_buffer().await?;
        self.writer.flush().await?;

        if let Some(declared) = self.content_length.filter(|declared| self.bytes_sent < *declared) {
            warn!(declared, bytes_sent = self.bytes_sent, "response body is shorter than its content-length");
        }
        Ok(())
    }

    /// Discards everything set so far and turns this into an empty response with
    /// `status`. Only possible while the head is still pending.
    pub(crate) fn reset(&mut self, status: StatusCode) -> Result<(), SendError> {
        ensure!(!self.headers_sent, SendError::headers_sent("response"));
        self.headers.clear();
        self.content_length = None;
        self.status = status;
        Ok(())
    }

    pub(crate) async fn shutdown(&mut self) -> Result<(), SendError> {
        Ok(self.writer.shutdown().await?)
    }

    fn encode_head(&mut self) -> Result<(), SendError> {
        let date = http_date();
        let head = ResponseHead { version: self.version, status: self.status, headers: &self.headers, date: &date };
        self.encoder.encode(head, &mut self.buffer)?;
        self.headers_sent = true;
        Ok(())
    }

    async fn flush_buffer(&mut self) -> Result<(), SendError> {
        if !self.buffer.is_empty() {
            self.writer.write_all(&self.buffer).await?;
            self.buffer.clear();
        }
        Ok(())
    }
}

fn declared_content_length(headers: &Headers) -> Result<u64, SendError> {
    ensure!(headers.has(CONTENT_LENGTH), SendError::MissingContentLength);
    let value = headers.get(CONTENT_LENGTH)?;
    value.trim().parse::<u64>().map_err(|_| SendError::invalid_content_length(format!("value {value} is not u64")))
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("version", &self.version)
            .field("headers", &self.headers)
            .field("headers_sent", &self.headers_sent)
            .field("bytes_sent", &self.bytes_sent)
            .finish_non_exhaustive()
    }
}
