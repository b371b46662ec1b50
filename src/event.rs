//! Bridge event model: the structural events an external pull parser feeds
//! into the writer.
//!
//! Das Event-Format spiegelt Parser, die Inline-Text an Elementknoten
//! haengen statt eigene Text-Events zu liefern (lxml-iterparse-Form):
//! `StartElement` traegt den Text direkt nach dem Start-Tag, `EndElement`
//! den Tail — Text nach dem End-Tag, der zum Inhalt des *Elternelements*
//! gehoert.

/// Content for a start-element event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartContent {
    /// Element name in Clark notation (`{uri}local`) or plain local name.
    pub name: String,
    /// Attribute pairs, names in Clark notation, values unescaped.
    pub attributes: Vec<(String, String)>,
    /// Character data directly following the start tag, if any.
    pub text: Option<String>,
}

/// Content for an end-element event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndContent {
    /// The element name (Clark notation), checked against the open element.
    pub name: String,
    /// Character data directly following the end tag (parent content).
    pub tail: Option<String>,
}

/// Content for a namespace-declaration event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsContent {
    /// The prefix being bound (empty string for the default namespace).
    pub prefix: String,
    /// The URI (empty string rescinds the binding).
    pub uri: String,
}

/// Content for a comment event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContent {
    /// The comment text (written without escaping).
    pub text: String,
}

/// Content for a processing-instruction event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiContent {
    /// The PI target name.
    pub target: String,
    /// The PI data (written without escaping).
    pub data: String,
}

/// One structural event of the bridge input contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// Begins an element; applies pending namespace declarations first.
    StartElement(StartContent),
    /// Closes the innermost element, then writes its tail text.
    EndElement(EndContent),
    /// Registers a prefix binding for the next `StartElement`.
    StartNamespace(NsContent),
    /// Balances a `StartNamespace` after the element closed.
    EndNamespace,
    /// An XML comment.
    Comment(CommentContent),
    /// An XML processing instruction.
    ProcessingInstruction(PiContent),
}

impl XmlEvent {
    /// Convenience constructor: start element without attributes or text.
    pub fn start(name: &str) -> Self {
        Self::StartElement(StartContent {
            name: name.to_string(),
            attributes: Vec::new(),
            text: None,
        })
    }

    /// Convenience constructor: end element without tail text.
    pub fn end(name: &str) -> Self {
        Self::EndElement(EndContent {
            name: name.to_string(),
            tail: None,
        })
    }
}
