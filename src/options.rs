//! Writer configuration: output encoding and serialization options.
//!
//! # Beispiel
//!
//! ```
//! use sxw::options::{Encoding, WriterOptions};
//!
//! let opts = WriterOptions::default()
//!     .with_encoding(Encoding::from_label("us-ascii").unwrap())
//!     .with_pretty_print(true);
//!
//! assert!(opts.pretty_print());
//! assert_eq!(opts.encoding().name(), "us-ascii");
//! ```

use crate::{Error, Result};

/// The target character encoding of the output sink.
///
/// UTF-8 and US-ASCII are self-describing for a conforming reader (XML 1.0
/// Appendix F) and need no XML declaration. Every other encoding is resolved
/// through encoding_rs and forces an automatic declaration before the first
/// output byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoding {
    /// UTF-8 (default). Non-ASCII characters pass through as raw UTF-8 bytes.
    Utf8,
    /// US-ASCII. Non-ASCII characters become decimal character references.
    UsAscii,
    /// Any other named, ASCII-compatible encoding.
    Other {
        /// Das Label das der Aufrufer angegeben hat (lowercased). Die XML-
        /// Deklaration nennt dieses Label, nicht den WHATWG-Kanonnamen —
        /// encoding_rs kanonisiert z.B. "iso-8859-1" zu windows-1252.
        label: String,
        /// The encoder used for the non-escaped remainder of the text.
        encoding: &'static encoding_rs::Encoding,
    },
}

impl Default for Encoding {
    fn default() -> Self {
        Self::Utf8
    }
}

impl Encoding {
    /// Resolves an encoding label (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEncoding`] when the label matches no known
    /// encoding, or when it names an encoding that is not ASCII-compatible
    /// (UTF-16, ISO-2022-JP): XML markup could not be emitted byte-wise there.
    pub fn from_label(label: &str) -> Result<Self> {
        let lower = label.to_ascii_lowercase();
        match lower.as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "us-ascii" | "ascii" => Ok(Self::UsAscii),
            _ => {
                let encoding = encoding_rs::Encoding::for_label(lower.as_bytes())
                    .ok_or_else(|| Error::UnknownEncoding(label.to_string()))?;
                if !encoding.is_ascii_compatible() {
                    return Err(Error::UnknownEncoding(label.to_string()));
                }
                Ok(Self::Other {
                    label: lower,
                    encoding,
                })
            }
        }
    }

    /// The canonical name used in the XML declaration.
    pub fn name(&self) -> &str {
        match self {
            Self::Utf8 => "utf-8",
            Self::UsAscii => "us-ascii",
            Self::Other { label, .. } => label,
        }
    }

    /// True when a conforming reader can detect this encoding without a
    /// declaration (XML 1.0 Appendix F).
    pub fn is_self_describing(&self) -> bool {
        matches!(self, Self::Utf8 | Self::UsAscii)
    }
}

/// Options controlling one writer instance.
///
/// Prozessweite Defaults gibt es absichtlich nicht — jede Instanz bekommt
/// ihre Konfiguration explizit bei der Konstruktion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    pub(crate) encoding: Encoding,
    pub(crate) sort_attributes: bool,
    pub(crate) abbreviate_empty: bool,
    pub(crate) pretty_print: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            encoding: Encoding::Utf8,
            sort_attributes: true,
            abbreviate_empty: true,
            pretty_print: false,
        }
    }
}

impl WriterOptions {
    // --- Getter ---

    /// The target output encoding.
    pub fn encoding(&self) -> &Encoding { &self.encoding }
    /// Attributes are sorted by (prefix, local name); default true.
    pub fn sort_attributes(&self) -> bool { self.sort_attributes }
    /// Empty elements use the `<name />` form; default true.
    pub fn abbreviate_empty(&self) -> bool { self.abbreviate_empty }
    /// Structural indentation (two spaces per depth); default false.
    pub fn pretty_print(&self) -> bool { self.pretty_print }

    // --- Builder-Setter (Fluent API) ---

    /// Setzt die Ziel-Encoding.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self { self.encoding = encoding; self }
    /// Setzt die Attribut-Sortierung.
    pub fn with_sort_attributes(mut self, sort: bool) -> Self { self.sort_attributes = sort; self }
    /// Setzt die Leerelement-Abkuerzung.
    pub fn with_abbreviate_empty(mut self, abbrev: bool) -> Self { self.abbreviate_empty = abbrev; self }
    /// Setzt Pretty-Printing.
    pub fn with_pretty_print(mut self, pretty: bool) -> Self { self.pretty_print = pretty; self }
}
