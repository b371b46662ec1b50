//! sxw – streaming, incremental XML serializer.
//!
//! Emits well-formed XML as a sequence of discrete write calls without ever
//! holding a document tree: namespace scoping with prefix rebinding, lazily
//! decided self-closing tags, encoding-aware escaping and an event bridge
//! for re-serializing externally parsed documents.
//!
//! # Beispiel
//!
//! ```
//! use sxw::{WriterOptions, XmlWriter};
//!
//! let mut w = XmlWriter::new(Vec::new());
//! w.start_ns("", "http://example.org/ns").unwrap();
//! w.start("{http://example.org/ns}greeting").unwrap();
//! w.data("Hello").unwrap();
//! w.close().unwrap();
//! assert_eq!(
//!     w.into_inner(),
//!     br#"<greeting xmlns="http://example.org/ns">Hello</greeting>"#
//! );
//! ```

pub mod bridge;
pub mod error;
pub mod event;
mod escape;
pub mod options;
pub mod qname;
mod scope;
pub mod transcode;
pub mod writer;

pub use error::{Error, Result};

/// HashMap mit ahash (schneller, nicht DoS-resistent — fuer interne
/// Datenstrukturen wie Namespace-Snapshots).
pub(crate) type FastHashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;

/// IndexMap mit ahash (deterministische Iteration + schnelles Hashing).
pub(crate) type FastIndexMap<K, V> = indexmap::IndexMap<K, V, ahash::RandomState>;

// Public API: Writer
pub use options::{Encoding, WriterOptions};
pub use writer::{DocumentPosition, XmlWriter};

// Public API: Events/Bridge
pub use event::{CommentContent, EndContent, NsContent, PiContent, StartContent, XmlEvent};

// Public API: Namen
pub use qname::QName;

// Public API: Streaming-Transcode
pub use transcode::{transcode_xml_file, transcode_xml_stream};
