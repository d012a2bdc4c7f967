//! Case-insensitive header storage shared by requests and responses.

use http::{HeaderMap, HeaderName, HeaderValue};

use crate::protocol::HeaderError;

/// A map from header name to a single value.
///
/// Names are compared case-insensitively, so `Content-Length` and
/// `content-length` address the same entry, and setting a header that already
/// exists replaces its value.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    inner: HeaderMap,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `name`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Fails if `name` is not a valid header name, or `value` contains bytes that
    /// are not allowed in a header value.
    pub fn set(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<(), HeaderError> {
        let name = name.as_ref();
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| HeaderError::invalid_name(name))?;
        let header_value = HeaderValue::from_str(value.as_ref()).map_err(|_| HeaderError::invalid_value(name))?;
        self.inner.insert(header_name, header_value);
        Ok(())
    }

    /// Returns the value stored under `name`.
    ///
    /// # Errors
    ///
    /// [`HeaderError::NotFound`] if the header is absent, and
    /// [`HeaderError::InvalidValue`] if the value is not visible ASCII.
    pub fn get(&self, name: impl AsRef<str>) -> Result<&str, HeaderError> {
        let name = name.as_ref();
        let value = self.inner.get(name).ok_or_else(|| HeaderError::not_found(name))?;
        value.to_str().map_err(|_| HeaderError::invalid_value(name))
    }

    pub fn has(&self, name: impl AsRef<str>) -> bool {
        self.inner.contains_key(name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.inner.iter()
    }

    pub(crate) fn insert(&mut self, name: HeaderName, value: HeaderValue) {
        self.inner.insert(name, value);
    }

    pub(crate) fn clear(&mut self) {
        self.inner.clear();
    }
}
