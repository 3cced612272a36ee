//! Link building: percent-encoding and affiliate wrapping.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Everything but RFC 3986 unreserved characters.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// As [`COMPONENT`], but slashes pass through.
const SEARCH_TERM: &AsciiSet = &COMPONENT.remove(b'/');

/// Encodes a search term for a query string or path segment. Slashes are
/// kept as-is.
pub fn quote(text: &str) -> String {
    utf8_percent_encode(text, SEARCH_TERM).to_string()
}

/// Encodes every reserved character, slashes included.
pub fn quote_component(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT).to_string()
}

/// Affiliate redirect wrapping for booking links.
///
/// With neither part configured, links pass through untouched. Otherwise a
/// link becomes `prefix + encoded(link) + suffix`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliate {
    /// Text placed before the encoded link
    pub prefix: String,
    /// Text placed after the encoded link
    pub suffix: String,
}

impl Affiliate {
    /// Creates a wrapper; surrounding whitespace is dropped.
    pub fn new(prefix: impl AsRef<str>, suffix: impl AsRef<str>) -> Self {
        Self {
            prefix: prefix.as_ref().trim().to_string(),
            suffix: suffix.as_ref().trim().to_string(),
        }
    }

    /// Returns true if links will be rewritten.
    pub fn is_enabled(&self) -> bool {
        !self.prefix.is_empty() || !self.suffix.is_empty()
    }

    /// Wraps `url`.
    pub fn wrap(&self, url: &str) -> String {
        if !self.is_enabled() {
            return url.to_string();
        }
        format!("{}{}{}", self.prefix, quote_component(url), self.suffix)
    }
}
