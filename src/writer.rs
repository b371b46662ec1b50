//! The streaming writer core: document state machine, pending open tag,
//! attribute resolution and pretty-printing.
//!
//! Zentrale Invariante: es gibt hoechstens einen unterminierte Start-Tag
//! (den innersten). Jede andere Operation loest ihn zuerst auf — erst dann
//! steht fest, ob das Element leer war (`<name />`) oder nicht. Dadurch wird
//! nie zurueckgeschrieben: echtes Streaming ohne Backpatching.
//!
//! # Beispiel
//!
//! ```
//! use sxw::XmlWriter;
//!
//! let mut w = XmlWriter::new(Vec::new());
//! w.start("doc").unwrap();
//! w.start_with_attrs("item", &[("id", "1")]).unwrap();
//! w.data("text").unwrap();
//! w.close().unwrap();
//! assert_eq!(w.into_inner(), b"<doc><item id=\"1\">text</item></doc>");
//! ```

use std::io::Write;

use crate::escape::{write_escaped, write_raw, EscapeContext};
use crate::options::WriterOptions;
use crate::qname::QName;
use crate::scope::{NamespaceScopes, SerializedName};
use crate::{Error, FastIndexMap, Result};

/// Where the writer currently is relative to the single root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentPosition {
    /// Prolog: declaration, comments and PIs before the root element.
    BeforeRoot,
    /// Inside the root element.
    InRoot,
    /// Epilog: comments and PIs after the root element closed.
    AfterRoot,
}

/// Ein offenes Element auf dem Stack.
struct OpenElement {
    /// Der serialisierte Tag-Token (fuer den End-Tag).
    tag: String,
    /// Der Originalname (fuer die `end_named`-Pruefung).
    name: QName,
    /// Direkt geschriebener Text-Inhalt (steuert Pretty-Printing).
    has_text: bool,
    /// Mindestens ein Kind-Knoten (Element, Kommentar, PI).
    has_child: bool,
}

/// A streaming, incremental XML serializer over any byte sink.
///
/// Write operations are ordered calls (`start`, `data`, `end`, ...); the
/// writer owns only the open-element chain and never a document tree, so
/// memory use is bounded by nesting depth.
pub struct XmlWriter<W: Write> {
    sink: W,
    options: WriterOptions,
    scopes: NamespaceScopes,
    stack: Vec<OpenElement>,
    pending_tag: bool,
    position: DocumentPosition,
    wrote_declaration: bool,
    wrote_anything: bool,
    closed: bool,
}

impl<W: Write> XmlWriter<W> {
    /// Creates a writer with default options (UTF-8, sorted attributes,
    /// abbreviated empty elements, no pretty-printing).
    pub fn new(sink: W) -> Self {
        Self::with_options(sink, WriterOptions::default())
    }

    /// Creates a writer with explicit options.
    pub fn with_options(sink: W, options: WriterOptions) -> Self {
        Self {
            sink,
            options,
            scopes: NamespaceScopes::new(),
            stack: Vec::new(),
            pending_tag: false,
            position: DocumentPosition::BeforeRoot,
            wrote_declaration: false,
            wrote_anything: false,
            closed: false,
        }
    }

    /// The writer's configuration.
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// The current document position.
    pub fn position(&self) -> DocumentPosition {
        self.position
    }

    /// Borrows the output sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Consumes the writer and returns the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Emits the XML declaration (`version='1.0'` plus the configured
    /// encoding name). Idempotent; must precede all other output.
    ///
    /// # Errors
    ///
    /// [`Error::DeclarationAfterContent`] once any content has been written
    /// (XML 1.0 Section 2.8).
    pub fn declaration(&mut self) -> Result<()> {
        self.guard_open()?;
        if self.wrote_declaration {
            return Ok(());
        }
        if self.wrote_anything {
            return Err(Error::DeclarationAfterContent);
        }
        let decl = format!(
            "<?xml version='1.0' encoding='{}'?>",
            self.options.encoding.name()
        );
        self.put(&decl)?;
        self.wrote_declaration = true;
        self.wrote_anything = true;
        Ok(())
    }

    /// Registers a namespace binding for the next `start`. An empty URI
    /// unbinds the prefix (`xmlns=""`).
    pub fn start_ns(&mut self, prefix: &str, uri: &str) -> Result<()> {
        self.guard_open()?;
        self.scopes.declare(prefix, uri);
        Ok(())
    }

    /// Discards one pending namespace declaration. Scope lifetime itself is
    /// driven by `end`; parser event streams report end-ns afterwards, so
    /// this is a no-op there.
    pub fn end_ns(&mut self) -> Result<()> {
        self.guard_open()?;
        self.scopes.undeclare_pending();
        Ok(())
    }

    /// Opens an element without attributes. `name` is Clark notation
    /// (`{uri}local`) or a plain local name.
    pub fn start(&mut self, name: &str) -> Result<()> {
        self.start_with_attrs(name, &[])
    }

    /// Opens an element with attributes (Clark-notation names).
    ///
    /// With attribute sorting enabled (default), duplicate resolved names
    /// collapse last-write-wins and the list is ordered by
    /// `(prefix, local name)`; with sorting disabled the caller's order and
    /// duplicates pass through verbatim.
    pub fn start_with_attrs(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.guard_open()?;
        self.auto_declaration()?;
        self.flush_pending_tag()?;

        let separate = self.node_separation_allowed();
        if let Some(parent) = self.stack.last_mut() {
            parent.has_child = true;
        }

        let declarations = self.scopes.push();
        let qname = QName::from_clark(name);
        // Erst vollstaendig aufloesen, dann emittieren: ein Namespace-Fehler
        // darf keine halben Tag-Bytes hinterlassen.
        let tag = match self.scopes.resolve(&qname) {
            Ok(resolved) => resolved.to_token(),
            Err(e) => return Err(e),
        };
        let resolved_attrs = self.resolve_attrs(attrs)?;

        if separate {
            self.write_indent(self.stack.len())?;
        }
        self.put("<")?;
        self.put(&tag)?;
        for (prefix, uri) in &declarations {
            if prefix.is_empty() {
                self.put(" xmlns=\"")?;
            } else {
                self.put(" xmlns:")?;
                self.put(prefix)?;
                self.put("=\"")?;
            }
            self.put_attr_value(uri)?;
            self.put("\"")?;
        }
        for (attr_name, value) in &resolved_attrs {
            self.put(" ")?;
            self.put(&attr_name.to_token())?;
            self.put("=\"")?;
            self.put_attr_value(value)?;
            self.put("\"")?;
        }

        self.stack.push(OpenElement {
            tag,
            name: qname,
            has_text: false,
            has_child: false,
        });
        self.pending_tag = true;
        self.wrote_anything = true;
        if self.position == DocumentPosition::BeforeRoot {
            self.position = DocumentPosition::InRoot;
        }
        Ok(())
    }

    /// Writes escaped character data. Never surrounded by inserted
    /// whitespace, also under pretty-printing.
    pub fn data(&mut self, text: &str) -> Result<()> {
        self.guard_open()?;
        self.auto_declaration()?;
        self.flush_pending_tag()?;
        if let Some(current) = self.stack.last_mut() {
            current.has_text = true;
        }
        write_escaped(&mut self.sink, text, EscapeContext::Text, &self.options.encoding)?;
        self.wrote_anything = true;
        Ok(())
    }

    /// Writes a comment. Legal before, inside and after the root element.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidComment`] when `text` contains `--` or ends with `-`
    /// (XML 1.0 Section 2.5).
    pub fn comment(&mut self, text: &str) -> Result<()> {
        self.guard_open()?;
        if text.contains("--") || text.ends_with('-') {
            return Err(Error::InvalidComment);
        }
        self.auto_declaration()?;
        self.flush_pending_tag()?;
        self.before_misc_node()?;
        self.put("<!--")?;
        self.put(text)?;
        self.put("-->")?;
        self.wrote_anything = true;
        Ok(())
    }

    /// Writes a processing instruction. Legal before, inside and after the
    /// root element.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPi`] when `data` contains `?>` (XML 1.0 Section 2.6).
    pub fn pi(&mut self, target: &str, data: &str) -> Result<()> {
        self.guard_open()?;
        if data.contains("?>") {
            return Err(Error::InvalidPi);
        }
        self.auto_declaration()?;
        self.flush_pending_tag()?;
        self.before_misc_node()?;
        self.put("<?")?;
        self.put(target)?;
        if !data.is_empty() {
            self.put(" ")?;
            self.put(data)?;
        }
        self.put("?>")?;
        self.wrote_anything = true;
        Ok(())
    }

    /// Closes the innermost open element.
    pub fn end(&mut self) -> Result<()> {
        self.end_impl(None)
    }

    /// Closes the innermost open element, checking that `name` (Clark
    /// notation) matches its original name.
    ///
    /// # Errors
    ///
    /// [`Error::EndMismatch`] when it does not.
    pub fn end_named(&mut self, name: &str) -> Result<()> {
        self.end_impl(Some(name))
    }

    /// Ends every element still open (innermost first) and flushes the sink.
    /// Safe to call with no open elements; every write afterwards fails with
    /// [`Error::WriterClosed`].
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        while !self.stack.is_empty() {
            self.end_impl(None)?;
        }
        self.sink.flush()?;
        self.closed = true;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Interna
    // ------------------------------------------------------------------

    fn guard_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::WriterClosed);
        }
        Ok(())
    }

    /// Encodings ohne Selbstbeschreibung (alles ausser UTF-8/US-ASCII)
    /// brauchen die Deklaration vor dem ersten Byte.
    fn auto_declaration(&mut self) -> Result<()> {
        if !self.wrote_declaration && !self.wrote_anything
            && !self.options.encoding.is_self_describing()
        {
            self.declaration()?;
        }
        Ok(())
    }

    /// Terminates the pending start tag as a paired tag (`>`).
    fn flush_pending_tag(&mut self) -> Result<()> {
        if self.pending_tag {
            self.put(">")?;
            self.pending_tag = false;
        }
        Ok(())
    }

    /// Pretty-Printing: Umbruch vor einem Knoten, ausser der Elternknoten
    /// hat direkt geschriebenen Text (gemischter Inhalt bleibt inline).
    fn node_separation_allowed(&self) -> bool {
        self.options.pretty_print
            && self.wrote_anything
            && self.stack.last().map_or(true, |e| !e.has_text)
    }

    /// Umbruch/Markierung vor Kommentar oder PI.
    fn before_misc_node(&mut self) -> Result<()> {
        let separate = self.node_separation_allowed();
        if let Some(current) = self.stack.last_mut() {
            current.has_child = true;
        }
        if separate {
            self.write_indent(self.stack.len())?;
        }
        Ok(())
    }

    fn end_impl(&mut self, expected: Option<&str>) -> Result<()> {
        self.guard_open()?;
        let current = self.stack.last().ok_or(Error::NoOpenElement)?;
        if let Some(name) = expected {
            if QName::from_clark(name) != current.name {
                return Err(Error::EndMismatch {
                    expected: current.name.to_string(),
                    found: name.to_string(),
                });
            }
        }
        let elem = match self.stack.pop() {
            Some(e) => e,
            None => return Err(Error::NoOpenElement),
        };
        if self.pending_tag {
            // Leeres Element: Terminator-Entscheidung faellt jetzt.
            self.pending_tag = false;
            if self.options.abbreviate_empty {
                self.put(" />")?;
            } else {
                self.put("></")?;
                self.put(&elem.tag)?;
                self.put(">")?;
            }
        } else {
            if self.options.pretty_print && elem.has_child && !elem.has_text {
                self.write_indent(self.stack.len())?;
            }
            self.put("</")?;
            self.put(&elem.tag)?;
            self.put(">")?;
        }
        self.scopes.pop();
        if self.stack.is_empty() {
            self.position = DocumentPosition::AfterRoot;
        }
        Ok(())
    }

    /// Loest Attributnamen auf; sortierter Modus dedupliziert (last wins)
    /// und ordnet nach `(prefix, local)` — unpraefigierte zuerst.
    fn resolve_attrs(&self, attrs: &[(&str, &str)]) -> Result<Vec<(SerializedName, String)>> {
        let mut resolved = Vec::with_capacity(attrs.len());
        for (name, value) in attrs {
            let serialized = self.scopes.resolve(&QName::from_clark(name))?;
            resolved.push((serialized, value.to_string()));
        }
        if self.options.sort_attributes {
            let mut unique: FastIndexMap<String, (SerializedName, String)> =
                FastIndexMap::default();
            for (serialized, value) in resolved {
                unique.insert(serialized.to_token(), (serialized, value));
            }
            let mut sorted: Vec<_> = unique.into_values().collect();
            sorted.sort_by(|(a, _), (b, _)| {
                let a_prefix = a.prefix.as_deref().unwrap_or("");
                let b_prefix = b.prefix.as_deref().unwrap_or("");
                (a_prefix, &*a.local).cmp(&(b_prefix, &*b.local))
            });
            return Ok(sorted);
        }
        Ok(resolved)
    }

    fn write_indent(&mut self, depth: usize) -> Result<()> {
        self.sink.write_all(b"\n")?;
        for _ in 0..depth {
            self.sink.write_all(b"  ")?;
        }
        Ok(())
    }

    fn put(&mut self, s: &str) -> Result<()> {
        write_raw(&mut self.sink, s, &self.options.encoding)
    }

    fn put_attr_value(&mut self, value: &str) -> Result<()> {
        write_escaped(
            &mut self.sink,
            value,
            EscapeContext::AttributeValue,
            &self.options.encoding,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Encoding;

    fn finished<W: Write>(mut w: XmlWriter<W>) -> W {
        w.close().unwrap();
        w.into_inner()
    }

    #[test]
    fn deferred_self_close() {
        let mut w = XmlWriter::new(Vec::new());
        w.start("foo").unwrap();
        w.end().unwrap();
        assert_eq!(finished(w), b"<foo />");
    }

    #[test]
    fn explicit_pair_without_abbreviation() {
        let opts = WriterOptions::default().with_abbreviate_empty(false);
        let mut w = XmlWriter::with_options(Vec::new(), opts);
        w.start("a").unwrap();
        assert_eq!(finished(w), b"<a></a>");
    }

    #[test]
    fn end_named_mismatch() {
        let mut w = XmlWriter::new(Vec::new());
        w.start("a").unwrap();
        let err = w.end_named("b").unwrap_err();
        assert!(matches!(err, Error::EndMismatch { .. }));
    }

    #[test]
    fn end_named_match_with_clark_name() {
        let mut w = XmlWriter::new(Vec::new());
        w.start_ns("p", "urn:x").unwrap();
        w.start("{urn:x}a").unwrap();
        w.end_named("{urn:x}a").unwrap();
        assert_eq!(finished(w), br#"<p:a xmlns:p="urn:x" />"#);
    }

    #[test]
    fn end_without_open_element() {
        let mut w = XmlWriter::new(Vec::new());
        assert_eq!(w.end().unwrap_err(), Error::NoOpenElement);
    }

    #[test]
    fn write_after_close_fails() {
        let mut w = XmlWriter::new(Vec::new());
        w.start("a").unwrap();
        w.close().unwrap();
        assert_eq!(w.start("b").unwrap_err(), Error::WriterClosed);
        assert_eq!(w.data("x").unwrap_err(), Error::WriterClosed);
        // close() selbst bleibt idempotent.
        w.close().unwrap();
    }

    #[test]
    fn comment_guard() {
        let mut w = XmlWriter::new(Vec::new());
        assert_eq!(w.comment("a--b").unwrap_err(), Error::InvalidComment);
        assert_eq!(w.comment("ends-").unwrap_err(), Error::InvalidComment);
    }

    #[test]
    fn pi_guard() {
        let mut w = XmlWriter::new(Vec::new());
        assert_eq!(w.pi("t", "a?>b").unwrap_err(), Error::InvalidPi);
    }

    #[test]
    fn pi_without_data_has_no_trailing_space() {
        let mut w = XmlWriter::new(Vec::new());
        w.pi("target", "").unwrap();
        assert_eq!(finished(w), b"<?target?>");
    }

    #[test]
    fn position_tracking() {
        let mut w = XmlWriter::new(Vec::new());
        assert_eq!(w.position(), DocumentPosition::BeforeRoot);
        w.start("a").unwrap();
        assert_eq!(w.position(), DocumentPosition::InRoot);
        w.end().unwrap();
        assert_eq!(w.position(), DocumentPosition::AfterRoot);
    }

    #[test]
    fn sorted_attrs_dedup_last_wins() {
        let mut w = XmlWriter::new(Vec::new());
        w.start_with_attrs("a", &[("k", "1"), ("k", "2")]).unwrap();
        assert_eq!(finished(w), br#"<a k="2" />"#);
    }

    #[test]
    fn unsorted_attrs_keep_duplicates_and_order() {
        let opts = WriterOptions::default().with_sort_attributes(false);
        let mut w = XmlWriter::with_options(Vec::new(), opts);
        w.start_with_attrs("a", &[("z", "1"), ("k", "2"), ("k", "3")])
            .unwrap();
        assert_eq!(finished(w), br#"<a z="1" k="2" k="3" />"#);
    }

    #[test]
    fn unbound_attribute_uri_leaves_no_partial_tag() {
        let mut w = XmlWriter::new(Vec::new());
        let err = w
            .start_with_attrs("a", &[("{urn:missing}k", "v")])
            .unwrap_err();
        assert!(matches!(err, Error::UnboundNamespaceUri(_)));
        assert!(w.get_ref().is_empty());
    }

    #[test]
    fn auto_declaration_for_named_encoding() {
        let opts = WriterOptions::default()
            .with_encoding(Encoding::from_label("iso-8859-1").unwrap());
        let mut w = XmlWriter::with_options(Vec::new(), opts);
        w.start("foo").unwrap();
        let out = finished(w);
        assert_eq!(
            out,
            b"<?xml version='1.0' encoding='iso-8859-1'?><foo />".to_vec()
        );
    }
}
