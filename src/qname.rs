//! Qualified names in Clark notation.
//!
//! A [`QName`] is the pair (namespace URI, local name). The serialized prefix
//! is *not* part of the name — it is decided per scope by the writer
//! (Namespaces in XML 1.0 Section 6.2: two names are equal when URI and
//! local name are equal, regardless of prefix).
//!
//! Clark-Notation: `{http://example.org/ns}local` bzw. `local` ohne Namespace.

use std::fmt;
use std::rc::Rc;

/// A qualified element or attribute name.
///
/// Immutable once constructed; compared by `(uri, local_name)` value.
/// `Rc<str>`-Felder, damit QNames billig zwischen Element-Stack und
/// Event-Strom geteilt werden koennen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// The namespace URI. Empty string means no namespace.
    pub uri: Rc<str>,
    /// The local name.
    pub local_name: Rc<str>,
}

impl QName {
    /// Creates a QName from URI and local name. An empty URI means
    /// "no namespace".
    pub fn new(uri: &str, local_name: &str) -> Self {
        Self {
            uri: Rc::from(uri),
            local_name: Rc::from(local_name),
        }
    }

    /// Parses Clark notation: `{uri}local` yields a namespaced name,
    /// anything else is taken as a plain local name.
    ///
    /// Ein `{` an Position 0 ohne schliessendes `}` ist kein Clark-Name und
    /// wird unveraendert als local name uebernommen.
    pub fn from_clark(name: &str) -> Self {
        if let Some(rest) = name.strip_prefix('{') {
            if let Some(close) = rest.find('}') {
                return Self::new(&rest[..close], &rest[close + 1..]);
            }
        }
        Self::new("", name)
    }

    /// True if the name carries no namespace URI.
    pub fn is_plain(&self) -> bool {
        self.uri.is_empty()
    }
}

impl fmt::Display for QName {
    /// Renders Clark notation (`{uri}local`, or bare `local` without URI).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.uri.is_empty() {
            write!(f, "{}", self.local_name)
        } else {
            write!(f, "{{{}}}{}", self.uri, self.local_name)
        }
    }
}
