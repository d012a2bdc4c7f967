//! HTTP request decoder
//!
//! Turns the bytes of an accepted connection into a [`Request`]. Only the request
//! line and the header block are consumed; whatever follows the blank line stays
//! in the buffer untouched.
//!
//! # Limits
//!
//! - Maximum number of headers: 64
//! - Maximum header size: 8KB
//! - Only HTTP/1.0 and HTTP/1.1 are accepted
//!
//! # Example
//!
//! ```
//! use webby_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from("GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n");
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.path(), "/index.html");
//! ```

use bytes::{Buf, BytesMut};
use http::{HeaderName, HeaderValue, Version};
use httparse::Status;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;
use crate::protocol::{Headers, Method, ParseError, Request};

/// Maximum number of headers allowed in a request
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the request line plus the header section
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Decoder for request heads implementing the [`Decoder`] trait.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestDecoder;

impl RequestDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode a request head from `src`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))` once the blank line ending the header block arrived
    /// - `Ok(None)` if more data is needed
    /// - `Err(ParseError)` if the bytes can't be a valid request
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let (request, head_len) = {
            let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
            let mut req = httparse::Request::new(&mut headers);

            let status = req.parse(src).map_err(|e| match e {
                httparse::Error::TooManyHeaders => ParseError::too_many_headers(MAX_HEADER_NUM),
                e => ParseError::invalid_header(e),
            })?;

            let head_len = match status {
                Status::Complete(head_len) => head_len,
                Status::Partial => {
                    ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
                    return Ok(None);
                }
            };

            trace!(head_len, "parsed request head");
            ensure!(head_len <= MAX_HEADER_BYTES, ParseError::too_large_header(head_len, MAX_HEADER_BYTES));

            (build_request(&req)?, head_len)
        };

        src.advance(head_len);
        Ok(Some(request))
    }

    /// Like [`decode`](Self::decode), but a peer that hangs up in the middle of a
    /// request head is reported as [`ParseError::Incomplete`].
    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(buf)? {
            Some(request) => Ok(Some(request)),
            None if buf.is_empty() => Ok(None),
            None => Err(ParseError::Incomplete { buffered: buf.len() }),
        }
    }
}

/// Copies the parsed head out of the read buffer into an owned [`Request`].
fn build_request(req: &httparse::Request<'_, '_>) -> Result<Request, ParseError> {
    let method = req.method.ok_or_else(|| ParseError::invalid_method(""))?.parse::<Method>()?;
    let path = req.path.ok_or(ParseError::InvalidUri)?;

    let version = match req.version {
        Some(0) => Version::HTTP_10,
        Some(1) => Version::HTTP_11,
        v => return Err(ParseError::InvalidVersion(v)),
    };

    let mut headers = Headers::new();
    for header in req.headers.iter() {
        let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(ParseError::invalid_header)?;
        let value = HeaderValue::from_bytes(header.value.trim_ascii()).map_err(ParseError::invalid_header)?;
        // a repeated header keeps its last value
        headers.insert(name, value);
    }

    Ok(Request::new(method, path.to_owned(), version, headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn from_curl() {
        let str = indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "##};

        let mut buf = BytesMut::from(str);

        let request = RequestDecoder.decode(&mut buf).unwrap().unwrap();

        assert!(buf.is_empty());
        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.version(), Version::HTTP_11);
        assert_eq!(request.path(), "/index.html");
        assert_eq!(request.route(), "");

        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.header("accept").unwrap(), "*/*");
        assert_eq!(request.header("HOST").unwrap(), "127.0.0.1:8080");
        assert_eq!(request.header("User-Agent").unwrap(), "curl/7.79.1");
    }

    #[test]
    fn leaves_body_in_buffer() {
        let str = indoc! {r##"
        POST /item HTTP/1.0
        Content-Length: 3

        123"##};

        let mut bytes = BytesMut::from(str);
        let request = RequestDecoder::new().decode(&mut bytes).unwrap().unwrap();

        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.version(), Version::HTTP_10);
        assert_eq!(&bytes[..], &b"123"[..]);
    }

    #[test]
    fn header_values_are_trimmed_and_last_wins() {
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nX-Token:   abc  \r\nx-token: def\r\n\r\n");

        let request = RequestDecoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("X-Token").unwrap(), "def");

        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nX-Token:   abc  \r\n\r\n");
        let request = RequestDecoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(request.header("X-Token").unwrap(), "abc");
    }

    #[test]
    fn partial_head_needs_more_data() {
        let mut buf = BytesMut::from("GET /index.html HTTP/1.1\r\nHost: local");
        assert!(RequestDecoder.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 37);

        buf.extend_from_slice(b"host\r\n\r\n");
        let request = RequestDecoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(request.header("Host").unwrap(), "localhost");
    }

    #[test]
    fn reject_unknown_method() {
        let mut buf = BytesMut::from("PATCH /item HTTP/1.1\r\n\r\n");
        let result = RequestDecoder.decode(&mut buf);
        assert!(matches!(result, Err(ParseError::InvalidMethod { method }) if method == "PATCH"));
    }

    #[test]
    fn reject_malformed_request_line() {
        let mut buf = BytesMut::from("GET\r\n\r\n");
        assert!(matches!(RequestDecoder.decode(&mut buf), Err(ParseError::InvalidHeader { .. })));

        let mut buf = BytesMut::from("GET / HTTP/2.0\r\n\r\n");
        assert!(RequestDecoder.decode(&mut buf).is_err());
    }

    #[test]
    fn reject_malformed_header_line() {
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nno colon here\r\n\r\n");
        assert!(matches!(RequestDecoder.decode(&mut buf), Err(ParseError::InvalidHeader { .. })));
    }

    #[test]
    fn reject_too_many_headers() {
        let mut raw = String::from("GET / HTTP/1.1\r\n");
        for i in 0..=MAX_HEADER_NUM {
            raw.push_str(&format!("X-Header-{i}: {i}\r\n"));
        }
        raw.push_str("\r\n");

        let mut buf = BytesMut::from(raw.as_str());
        assert!(matches!(RequestDecoder.decode(&mut buf), Err(ParseError::TooManyHeaders { .. })));
    }

    #[test]
    fn reject_too_large_header() {
        let mut raw = String::from("GET / HTTP/1.1\r\nX-Large: ");
        raw.push_str(&"a".repeat(MAX_HEADER_BYTES));

        let mut buf = BytesMut::from(raw.as_str());
        assert!(matches!(RequestDecoder.decode(&mut buf), Err(ParseError::TooLargeHeader { .. })));
    }

    #[test]
    fn eof_in_the_middle_of_a_request() {
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nHost");
        assert!(matches!(RequestDecoder.decode_eof(&mut buf), Err(ParseError::Incomplete { buffered: 20 })));

        let mut empty = BytesMut::new();
        assert!(RequestDecoder.decode_eof(&mut empty).unwrap().is_none());
    }
}
