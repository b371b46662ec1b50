//! Byte-genaue Roundtrips: Dokument → Parser → Writer → identische Bytes,
//! sowohl ueber den Streaming-Transcode als auch ueber Bridge-Events.

use sxw::{
    transcode_xml_stream, Encoding, EndContent, NsContent, StartContent, WriterOptions, XmlEvent,
    XmlWriter,
};

fn transcoded(xml: &str, options: &WriterOptions) -> Vec<u8> {
    let mut out = Vec::new();
    transcode_xml_stream(xml.as_bytes(), &mut out, options).unwrap();
    out
}

// ============================================================================
// Streaming-Transcode
// ============================================================================

#[test]
fn full_document_roundtrip() {
    // Kommentare und PIs vor, in und nach dem Wurzelelement; Default- und
    // Praefix-Bindungen; gemischter Inhalt; Escapes. Das Dokument ist in
    // kanonischer Form (sortierte Attribute, " />"-Leerelemente), die
    // Ausgabe muss Byte fuer Byte uebereinstimmen.
    let xml = "<!--comment before root element--><?pi before root?>\
<foo xmlns=\"http://example.org/ns\">\n  \
<?a pi?>\n  \
<bar xmlns:b=\"http://example.org/ns2\">\n    \
<?pi inside?>some text\n    \
<baz attr=\"1\" b:attr=\"2\" />\n    \
<quux>5 &gt; 4 &amp; 3 &lt; 4</quux>\n    \
oh dear<!--comment inside element-->text here too\n  \
</bar>\n\
</foo><?pi after?><!--comment after-->";
    assert_eq!(transcoded(xml, &WriterOptions::default()), xml.as_bytes());
}

#[test]
fn declaration_roundtrip_canonicalizes_quotes() {
    let out = transcoded(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?><a />",
        &WriterOptions::default(),
    );
    assert_eq!(out, b"<?xml version='1.0' encoding='utf-8'?><a />".to_vec());
}

#[test]
fn transcode_to_latin1_declares_and_reencodes() {
    let opts = WriterOptions::default()
        .with_encoding(Encoding::from_label("iso-8859-1").unwrap());
    let out = transcoded("<foo>åäö</foo>", &opts);
    assert_eq!(
        out,
        b"<?xml version='1.0' encoding='iso-8859-1'?><foo>\xe5\xe4\xf6</foo>".to_vec()
    );
}

#[test]
fn transcode_pretty_reindents() {
    let opts = WriterOptions::default().with_pretty_print(true);
    let out = transcoded("<a><b>foo</b><b>bar</b><b><c /></b></a>", &opts);
    assert_eq!(
        out,
        b"<a>\n  <b>foo</b>\n  <b>bar</b>\n  <b>\n    <c />\n  </b>\n</a>".to_vec()
    );
}

#[test]
fn leading_padding_is_insignificant() {
    // Grosse Whitespace-Polster vor dem Wurzelelement treiben den Parser
    // ueber interne Puffergrenzen; das Ergebnis bleibt unveraendert.
    let doc = "<doc><foo>hello</foo></doc>";
    for padding in [16382usize, 32755] {
        let xml = format!("{}{doc}", " ".repeat(padding));
        assert_eq!(
            transcoded(&xml, &WriterOptions::default()),
            doc.as_bytes(),
            "padding={padding}"
        );
    }
}

#[test]
fn large_text_run_roundtrip() {
    let body = "far too much text, ".repeat(4_000);
    let xml = format!("<doc><foo>{body}</foo></doc>");
    assert_eq!(transcoded(&xml, &WriterOptions::default()), xml.as_bytes());
}

// ============================================================================
// Bridge-Events
// ============================================================================

#[test]
fn event_sequence_roundtrip() {
    // Ereignisfolge in lxml-iterparse-Form: Text haengt am Start-Event,
    // Tail am End-Event des Geschwisterknotens.
    let events = vec![
        XmlEvent::Comment(sxw::CommentContent {
            text: "generated".into(),
        }),
        XmlEvent::StartNamespace(NsContent {
            prefix: "p".into(),
            uri: "urn:p".into(),
        }),
        XmlEvent::start("root"),
        XmlEvent::StartElement(StartContent {
            name: "{urn:p}item".into(),
            attributes: vec![("n".into(), "1".into())],
            text: Some("first".into()),
        }),
        XmlEvent::EndElement(EndContent {
            name: "{urn:p}item".into(),
            tail: Some("between".into()),
        }),
        XmlEvent::StartElement(StartContent {
            name: "{urn:p}item".into(),
            attributes: vec![("n".into(), "2".into())],
            text: Some("second".into()),
        }),
        XmlEvent::end("{urn:p}item"),
        XmlEvent::end("root"),
        XmlEvent::EndNamespace,
        XmlEvent::ProcessingInstruction(sxw::PiContent {
            target: "done".into(),
            data: String::new(),
        }),
    ];

    let mut w = XmlWriter::new(Vec::new());
    w.write_events(events).unwrap();
    w.close().unwrap();
    assert_eq!(
        w.into_inner(),
        br#"<!--generated--><root xmlns:p="urn:p"><p:item n="1">first</p:item>between<p:item n="2">second</p:item></root><?done?>"#
            .to_vec()
    );
}

#[test]
fn event_roundtrip_with_default_namespace() {
    let events = vec![
        XmlEvent::StartNamespace(NsContent {
            prefix: String::new(),
            uri: "urn:d".into(),
        }),
        XmlEvent::StartElement(StartContent {
            name: "{urn:d}doc".into(),
            attributes: vec![("{urn:d}lang".into(), "en".into())],
            text: Some("body".into()),
        }),
        XmlEvent::end("{urn:d}doc"),
        XmlEvent::EndNamespace,
    ];

    let mut w = XmlWriter::new(Vec::new());
    w.write_events(events).unwrap();
    w.close().unwrap();
    assert_eq!(
        w.into_inner(),
        br#"<doc xmlns="urn:d" lang="en">body</doc>"#.to_vec()
    );
}
