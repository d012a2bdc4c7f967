//! Wire codecs for the protocol engine.
//!
//! - [`RequestDecoder`]: decodes the request line and header block of an incoming
//!   request with `httparse`, for use with `tokio_util::codec::FramedRead`
//! - the header encoder: frames a response's status line, headers and `Date`
//!   line; used by [`Response`](crate::protocol::Response) when its headers are
//!   flushed

mod header_encoder;
mod request_decoder;

pub(crate) use header_encoder::{HeaderEncoder, ResponseHead};
pub use request_decoder::RequestDecoder;
