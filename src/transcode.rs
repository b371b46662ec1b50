//! Streaming XML → XML transcoding: quick-xml as the pull parser, the
//! writer as the sink.
//!
//! Liest nie das ganze Dokument ein — pro Schleifendurchlauf ein Event,
//! Speicherbedarf nur Element-Kette plus ein Text-Stueck. Damit laesst sich
//! ein Dokument umkodieren, einruecken oder kanonisch sortieren, ohne dass
//! die Groesse eine Rolle spielt.
//!
//! Eingabe muss UTF-8 sein; DOCTYPE wird (ohne DTD-Unterstuetzung)
//! uebersprungen, CDATA wird zu escaptem Text normalisiert.

use std::io::{BufReader, Read, Write};
use std::path::Path;

use log::warn;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{PrefixDeclaration, ResolveResult};
use quick_xml::reader::NsReader;

use crate::options::WriterOptions;
use crate::writer::XmlWriter;
use crate::{Error, Result};

/// Re-serializes an XML document from `input` to `output` under the given
/// writer options (encoding, pretty-printing, attribute sorting).
pub fn transcode_xml_stream(
    input: impl Read,
    output: impl Write,
    options: &WriterOptions,
) -> Result<()> {
    let mut reader = NsReader::from_reader(BufReader::new(input));
    reader.config_mut().trim_text(false);
    let mut writer = XmlWriter::with_options(output, options.clone());

    let mut buf = Vec::new();
    let mut depth: usize = 0;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Decl(_)) => {
                writer.declaration()?;
            }
            Ok(Event::Start(e)) => {
                start_element(&reader, &e, &mut writer)?;
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                start_element(&reader, &e, &mut writer)?;
                writer.end()?;
            }
            Ok(Event::End(_)) => {
                // quick-xml prueft die Tag-Balance selbst (check_end_names).
                writer.end()?;
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|er| Error::XmlParse(er.to_string()))?;
                if depth == 0 {
                    // Whitespace im Prolog/Epilog ist insignifikant.
                    if !text.trim().is_empty() {
                        return Err(Error::XmlParse(
                            "character data outside root element".into(),
                        ));
                    }
                } else {
                    writer.data(&text)?;
                }
            }
            Ok(Event::CData(e)) => {
                let text = utf8(&e.into_inner())?.to_string();
                if depth > 0 {
                    writer.data(&text)?;
                }
            }
            Ok(Event::Comment(e)) => {
                writer.comment(utf8(e.as_ref())?)?;
            }
            Ok(Event::PI(e)) => {
                let target = utf8(e.target())?.to_string();
                // XML 1.0 Section 2.6: Whitespace zwischen Target und Daten
                // ist Separator, nicht Teil der Daten.
                let data = utf8(e.content())?.trim_start().to_string();
                writer.pi(&target, &data)?;
            }
            Ok(Event::DocType(_)) => {
                warn!("skipping DOCTYPE: DTD processing is not supported");
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlParse(format!(
                    "at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
        }
        buf.clear();
    }
    writer.close()
}

/// Transcodes one file into another, streaming.
pub fn transcode_xml_file(input: &Path, output: &Path, options: &WriterOptions) -> Result<()> {
    let src = std::fs::File::open(input)
        .map_err(|e| Error::Io(format!("open {}: {e}", input.display())))?;
    let dst = std::fs::File::create(output)
        .map_err(|e| Error::Io(format!("create {}: {e}", output.display())))?;
    transcode_xml_stream(src, std::io::BufWriter::new(dst), options)
}

/// Meldet xmlns-Deklarationen als Bindings an und oeffnet dann das Element
/// mit seinen aufgeloesten (Clark-Notation) Attributen.
fn start_element<W: Write>(
    reader: &NsReader<impl std::io::BufRead>,
    e: &BytesStart<'_>,
    writer: &mut XmlWriter<W>,
) -> Result<()> {
    let mut attrs: Vec<(String, String)> = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|er| Error::XmlParse(er.to_string()))?;
        match attr.key.as_namespace_binding() {
            Some(PrefixDeclaration::Default) => {
                writer.start_ns("", &attr_value(&attr)?)?;
            }
            Some(PrefixDeclaration::Named(prefix)) => {
                let prefix = utf8(prefix)?.to_string();
                writer.start_ns(&prefix, &attr_value(&attr)?)?;
            }
            None => {
                let (ns, local) = reader.resolve_attribute(attr.key);
                attrs.push((clark(ns, local.as_ref())?, attr_value(&attr)?));
            }
        }
    }
    let (ns, local) = reader.resolve_element(e.name());
    let name = clark(ns, local.as_ref())?;
    let attr_refs: Vec<(&str, &str)> = attrs
        .iter()
        .map(|(n, v)| (n.as_str(), v.as_str()))
        .collect();
    writer.start_with_attrs(&name, &attr_refs)
}

fn attr_value(attr: &Attribute<'_>) -> Result<String> {
    attr.unescape_value()
        .map(|v| v.into_owned())
        .map_err(|e| Error::XmlParse(e.to_string()))
}

/// Baut einen Clark-Namen aus dem Resolver-Ergebnis.
fn clark(ns: ResolveResult<'_>, local: &[u8]) -> Result<String> {
    let local = utf8(local)?;
    match ns {
        ResolveResult::Bound(namespace) => {
            Ok(format!("{{{}}}{}", utf8(namespace.as_ref())?, local))
        }
        ResolveResult::Unbound => Ok(local.to_string()),
        ResolveResult::Unknown(prefix) => Err(Error::XmlParse(format!(
            "unknown namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| Error::XmlParse(e.to_string()))
}
