//! Core HTTP protocol types.
//!
//! - [`Method`] and [`MethodMask`]: the request methods and sets of them
//! - [`Headers`]: case-insensitive header storage
//! - [`Request`]: a decoded request head
//! - [`Response`]: the writer a handler answers through
//! - error types: [`HttpError`] at the connection level, [`ParseError`] for
//!   decoding, [`SendError`] for response misuse and [`HeaderError`] for header
//!   lookups
//!
//! The protocol types are used through the connection layer; only
//! [`HttpConnection`](crate::connection::HttpConnection) creates requests and responses.

mod error;
pub use error::HeaderError;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;

mod method;
pub use method::Method;
pub use method::MethodMask;

mod header;
pub use header::Headers;

mod request;
pub use request::Request;

mod response;
pub use response::Response;
