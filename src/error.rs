//! Central error types for the streaming XML writer.
//!
//! Each variant references the governing section of XML 1.0 (Fifth Edition)
//! or Namespaces in XML 1.0 (Third Edition) where one exists.

use core::fmt;

/// All faults the writer can raise.
///
/// Jeder Fehler ist terminal fuer die Writer-Instanz: bereits geflushte Bytes
/// bleiben im Sink sichtbar, weitere Writes sind nicht definiert.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// `declaration()` was called after content was already written (XML 1.0
    /// Section 2.8: the XML declaration must appear before anything else).
    DeclarationAfterContent,
    /// A qualified name references a URI with no bound prefix or default
    /// namespace in the current scope (Namespaces in XML 1.0 Section 6.2).
    UnboundNamespaceUri(String),
    /// `end(name)` does not match the innermost open element.
    EndMismatch {
        /// Name des innersten offenen Elements (Clark-Notation).
        expected: String,
        /// Name den der Aufrufer uebergeben hat.
        found: String,
    },
    /// `end()` with no element open.
    NoOpenElement,
    /// A write was attempted after `close()`.
    WriterClosed,
    /// Comment text contains `--` or ends with `-` (XML 1.0 Section 2.5).
    InvalidComment,
    /// Processing instruction data contains `?>` (XML 1.0 Section 2.6).
    InvalidPi,
    /// The encoding label is not recognized by any known encoding.
    UnknownEncoding(String),
    /// The transcoding input is not well-formed XML.
    XmlParse(String),
    /// An IO error while writing to the output sink.
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeclarationAfterContent => {
                write!(f, "XML declaration after document content (XML 1.0 Section 2.8)")
            }
            Self::UnboundNamespaceUri(uri) => {
                write!(
                    f,
                    "no prefix bound for namespace URI '{uri}' (Namespaces in XML 1.0 Section 6.2)"
                )
            }
            Self::EndMismatch { expected, found } => {
                write!(
                    f,
                    "end tag mismatch: open element is '{expected}', got '{found}' (XML 1.0 Section 3.1)"
                )
            }
            Self::NoOpenElement => write!(f, "no open element"),
            Self::WriterClosed => write!(f, "write after close()"),
            Self::InvalidComment => {
                write!(f, "comment text contains '--' or ends with '-' (XML 1.0 Section 2.5)")
            }
            Self::InvalidPi => write!(f, "PI data contains '?>' (XML 1.0 Section 2.6)"),
            Self::UnknownEncoding(label) => write!(f, "unknown encoding label '{label}'"),
            Self::XmlParse(msg) => write!(f, "XML parse error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
