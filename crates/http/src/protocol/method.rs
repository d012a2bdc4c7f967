//! The request methods understood by the server and bit masks over them.
//!
//! Each [`Method`] occupies one bit so that routes can accept any combination of
//! methods through a [`MethodMask`]. The declaration order of the variants is the
//! order used when a mask is rendered, e.g. for the `Allow` header of a
//! `405 Method Not Allowed` response.

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use crate::protocol::ParseError;

/// An HTTP/1.1 request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Method {
    Connect = 0x01,
    Delete = 0x02,
    Get = 0x04,
    Head = 0x08,
    Options = 0x10,
    Post = 0x20,
    Put = 0x40,
    Trace = 0x80,
}

impl Method {
    /// Every method, in rendering order.
    pub const ALL: [Method; 8] =
        [Method::Connect, Method::Delete, Method::Get, Method::Head, Method::Options, Method::Post, Method::Put, Method::Trace];

    /// Returns the wire token of this method.
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Connect => "CONNECT",
            Method::Delete => "DELETE",
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Trace => "TRACE",
        }
    }

    #[inline]
    const fn bit(self) -> u8 {
        self as u8
    }
}

impl FromStr for Method {
    type Err = ParseError;

    /// Parses a method token. Tokens are case-sensitive, as on the wire.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL.into_iter().find(|method| method.as_str() == s).ok_or_else(|| ParseError::invalid_method(s))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of [`Method`]s.
///
/// Masks are built by or-ing methods together:
///
/// ```
/// use webby_http::protocol::{Method, MethodMask};
///
/// let mask = Method::Get | Method::Head;
/// assert!(mask.contains(Method::Head));
/// assert!(!mask.contains(Method::Delete));
/// assert_eq!(mask.to_string(), "GET, HEAD");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MethodMask(u8);

impl MethodMask {
    /// Matches no method at all.
    pub const NONE: MethodMask = MethodMask(0);

    /// DELETE, GET, POST and PUT: the methods a resource handler dispatches on.
    pub const REST: MethodMask =
        MethodMask(Method::Delete.bit() | Method::Get.bit() | Method::Post.bit() | Method::Put.bit());

    /// Matches any method.
    pub const ALL: MethodMask = MethodMask(0xFF);

    #[inline]
    pub const fn contains(self, method: Method) -> bool {
        self.0 & method.bit() != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Iterates the methods of this mask in rendering order.
    pub fn methods(self) -> impl Iterator<Item = Method> {
        Method::ALL.into_iter().filter(move |method| self.contains(*method))
    }
}

impl From<Method> for MethodMask {
    fn from(method: Method) -> Self {
        MethodMask(method.bit())
    }
}

impl BitOr for Method {
    type Output = MethodMask;

    fn bitor(self, rhs: Method) -> MethodMask {
        MethodMask(self.bit() | rhs.bit())
    }
}

impl BitOr<Method> for MethodMask {
    type Output = MethodMask;

    fn bitor(self, rhs: Method) -> MethodMask {
        MethodMask(self.0 | rhs.bit())
    }
}

impl BitOr for MethodMask {
    type Output = MethodMask;

    fn bitor(self, rhs: MethodMask) -> MethodMask {
        MethodMask(self.0 | rhs.0)
    }
}

/// Renders the mask the way the `Allow` header expects: `"GET, HEAD"`.
impl fmt::Display for MethodMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, method) in self.methods().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            f.write_str(method.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_methods() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn reject_unknown_methods() {
        assert!(matches!("PATCH".parse::<Method>(), Err(ParseError::InvalidMethod { .. })));
        assert!(matches!("get".parse::<Method>(), Err(ParseError::InvalidMethod { .. })));
        assert!(matches!("".parse::<Method>(), Err(ParseError::InvalidMethod { .. })));
    }

    #[test]
    fn mask_renders_in_fixed_order() {
        let mask = Method::Put | Method::Get | Method::Connect;
        assert_eq!(mask.to_string(), "CONNECT, GET, PUT");

        assert_eq!(MethodMask::REST.to_string(), "DELETE, GET, POST, PUT");
        assert_eq!(MethodMask::ALL.to_string(), "CONNECT, DELETE, GET, HEAD, OPTIONS, POST, PUT, TRACE");
        assert_eq!(MethodMask::NONE.to_string(), "");
    }

    #[test]
    fn mask_membership() {
        let mask = MethodMask::from(Method::Get) | Method::Head;
        assert!(mask.contains(Method::Get));
        assert!(mask.contains(Method::Head));
        assert!(!mask.contains(Method::Delete));
        assert_eq!(mask.methods().count(), 2);

        assert_eq!(MethodMask::REST.bits(), 0x66);
        assert!(MethodMask::NONE.is_empty());
        assert!(Method::ALL.into_iter().all(|method| MethodMask::ALL.contains(method)));
    }
}
