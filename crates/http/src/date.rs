//! Formatting of the `Date` header value.

use bytes::Bytes;

/// Returns the current time in the RFC 1123 form used by the `Date` header,
/// e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub(crate) fn http_date() -> Bytes {
    let mut buf = faf_http_date::get_date_buff_no_key();
    faf_http_date::get_date_no_key(&mut buf);
    Bytes::from_owner(buf)
}
