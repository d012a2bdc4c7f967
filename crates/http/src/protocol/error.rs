use http::Version;
use std::io;
use thiserror::Error;

/// Failure while processing a single connection.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

/// Header map lookups and insertions.
#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("header `{name}` not found")]
    NotFound { name: String },

    #[error("invalid header name `{name}`")]
    InvalidName { name: String },

    #[error("invalid value for header `{name}`")]
    InvalidValue { name: String },
}

impl HeaderError {
    pub fn not_found<S: ToString>(name: S) -> Self {
        Self::NotFound { name: name.to_string() }
    }

    pub fn invalid_name<S: ToString>(name: S) -> Self {
        Self::InvalidName { name: name.to_string() }
    }

    pub fn invalid_value<S: ToString>(name: S) -> Self {
        Self::InvalidValue { name: name.to_string() }
    }
}

/// A request that could not be decoded off the wire.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid http version: {0:?}")]
    InvalidVersion(Option<u8>),

    #[error("invalid http method: {method}")]
    InvalidMethod { method: String },

    #[error("invalid http uri")]
    InvalidUri,

    #[error("connection closed with {buffered} bytes of an incomplete request")]
    Incomplete { buffered: usize },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_method<S: ToString>(method: S) -> Self {
        Self::InvalidMethod { method: method.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// A response operation that was rejected or could not reach the peer.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("headers already sent, can't change the {what}")]
    HeadersSent { what: &'static str },

    #[error("invalid status code: {0}")]
    InvalidStatus(u16),

    #[error("Content-Length header was not provided")]
    MissingContentLength,

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("body exceeds content-length: declared {declared} bytes, attempted {attempted}")]
    BodyOverflow { declared: u64, attempted: u64 },

    #[error("unsupported http version: {0:?}")]
    UnsupportedVersion(Version),

    #[error("header error: {source}")]
    Header {
        #[from]
        source: HeaderError,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn headers_sent(what: &'static str) -> Self {
        Self::HeadersSent { what }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
