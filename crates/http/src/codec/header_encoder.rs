//! Serialises the status line and header block of a response.
//!
//! The block is written as
//!
//! ```text
//! HTTP/<version> <code> <reason>\r\n
//! <Name>: <value>\r\n          (one line per stored header)
//! Date: <RFC 1123 date>\r\n
//! \r\n
//! ```
//!
//! The reason phrase always comes from the status code registry, and the `Date`
//! line is generated here, replacing any `Date` header a handler may have stored.
//! Names are stored lowercase and written in canonical form, each `-` separated
//! word capitalised (`content-length` goes out as `Content-Length`).

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use http::{header, StatusCode, Version};
use tokio_util::codec::Encoder;
use tracing::error;

use crate::protocol::{Headers, SendError};

/// Initial buffer size reserved for the header block.
const INIT_HEADER_SIZE: usize = 1024;

/// Everything the encoder needs to frame one response head.
#[derive(Debug)]
pub(crate) struct ResponseHead<'a> {
    pub(crate) version: Version,
    pub(crate) status: StatusCode,
    pub(crate) headers: &'a Headers,
    pub(crate) date: &'a [u8],
}

/// Encoder for the response head, implementing the [`Encoder`] trait.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct HeaderEncoder;

impl Encoder<ResponseHead<'_>> for HeaderEncoder {
    type Error = SendError;

    /// Appends the encoded head to `dst`.
    ///
    /// # Errors
    ///
    /// Fails with [`SendError::UnsupportedVersion`] for any version other than
    /// HTTP/1.0 and HTTP/1.1.
    fn encode(&mut self, head: ResponseHead<'_>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let version = match head.version {
            Version::HTTP_10 => "1.0",
            Version::HTTP_11 => "1.1",
            v => {
                error!(http_version = ?v, "unsupported http version");
                return Err(SendError::UnsupportedVersion(v));
            }
        };

        dst.reserve(INIT_HEADER_SIZE);
        write!(FastWrite(dst), "HTTP/{} {} {}\r\n", version, head.status.as_str(), head.status.canonical_reason().unwrap_or(""))?;

        for (header_name, header_value) in head.headers.iter() {
            if *header_name == header::DATE {
                continue;
            }
            put_canonical_name(dst, header_name.as_str());
            dst.put_slice(b": ");
            dst.put_slice(header_value.as_ref());
            dst.put_slice(b"\r\n");
        }

        dst.put_slice(b"Date: ");
        dst.put_slice(head.date);
        dst.put_slice(b"\r\n\r\n");
        Ok(())
    }
}

fn put_canonical_name(dst: &mut BytesMut, name: &str) {
    let mut word_start = true;
    for byte in name.bytes() {
        dst.put_u8(if word_start { byte.to_ascii_uppercase() } else { byte.to_ascii_lowercase() });
        word_start = byte == b'-';
    }
}

/// Writes straight into a `BytesMut` that already has room reserved.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
