//! Context- and encoding-dependent XML escaping.
//!
//! Zwei Kontexte (XML 1.0 Section 2.4, 3.1):
//! - Text-Inhalt: `&` `<` `>` → `&amp;` `&lt;` `&gt;` (`>` defensiv, wegen
//!   `]]>`-Ambiguitaet).
//! - Attribut-Werte: `&` `<` `"` → `&amp;` `&lt;` `&quot;` (`>` bleibt).
//!
//! Non-ASCII-Policy haengt an der Ziel-Encoding: UTF-8 reicht Rohbytes durch,
//! US-ASCII ersetzt durch dezimale Character References, benannte Encodings
//! encodieren nativ und fallen fuer nicht darstellbare Zeichen auf Character
//! References zurueck (encoding_rs NCR-Fallback).
//!
//! Jeder Aufruf ist zustandslos und in sich abgeschlossen — die Ausgabe ist
//! unabhaengig davon, wie ein Textlauf auf Aufrufe verteilt wird.

use std::io::Write;

use crate::options::Encoding;
use crate::Result;

/// Where a run of character data is headed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EscapeContext {
    /// Element content between tags.
    Text,
    /// A double-quoted attribute value.
    AttributeValue,
}

impl EscapeContext {
    /// Die drei strukturell zu ersetzenden Bytes dieses Kontexts.
    fn needles(self) -> [u8; 3] {
        match self {
            Self::Text => [b'&', b'<', b'>'],
            Self::AttributeValue => [b'&', b'<', b'"'],
        }
    }

    fn replacements(self) -> [&'static [u8]; 3] {
        match self {
            Self::Text => [b"&amp;", b"&lt;", b"&gt;"],
            Self::AttributeValue => [b"&amp;", b"&lt;", b"&quot;"],
        }
    }
}

/// Escaped einen Textlauf strukturell und encodiert ihn in die Ziel-Encoding.
pub(crate) fn write_escaped(
    w: &mut impl Write,
    s: &str,
    ctx: EscapeContext,
    enc: &Encoding,
) -> Result<()> {
    let needles = ctx.needles();
    let replacements = ctx.replacements();
    let bytes = s.as_bytes();
    let mut start = 0;
    // memchr3-Segmentierung: grosse escape-freie Bloecke in einem Stueck.
    while start < bytes.len() {
        match memchr::memchr3(needles[0], needles[1], needles[2], &bytes[start..]) {
            Some(offset) => {
                let pos = start + offset;
                if start < pos {
                    write_segment(w, &s[start..pos], enc)?;
                }
                let idx = needles.iter().position(|&n| n == bytes[pos]).unwrap_or(0);
                w.write_all(replacements[idx])?;
                start = pos + 1;
            }
            None => {
                write_segment(w, &s[start..], enc)?;
                break;
            }
        }
    }
    Ok(())
}

/// Schreibt Markup (Tag-Namen, Kommentare, PI-Daten) ohne strukturelles
/// Escaping, aber in der Ziel-Encoding.
pub(crate) fn write_raw(w: &mut impl Write, s: &str, enc: &Encoding) -> Result<()> {
    match enc {
        Encoding::Utf8 | Encoding::UsAscii => w.write_all(s.as_bytes())?,
        Encoding::Other { encoding, .. } => {
            let (encoded, _, _) = encoding.encode(s);
            w.write_all(&encoded)?;
        }
    }
    Ok(())
}

/// Ein escape-freies Segment in der Ziel-Encoding ausgeben.
fn write_segment(w: &mut impl Write, seg: &str, enc: &Encoding) -> Result<()> {
    match enc {
        Encoding::Utf8 => w.write_all(seg.as_bytes())?,
        Encoding::UsAscii => write_ascii_with_ncr(w, seg)?,
        Encoding::Other { encoding, .. } => {
            // encoding_rs ersetzt nicht darstellbare Zeichen durch dezimale
            // Character References — exakt die gewuenschte Fallback-Policy.
            let (encoded, _, _) = encoding.encode(seg);
            w.write_all(&encoded)?;
        }
    }
    Ok(())
}

/// ASCII-Bytes durchreichen, alles andere als dezimale `&#NNNN;` Referenz.
fn write_ascii_with_ncr(w: &mut impl Write, seg: &str) -> Result<()> {
    let mut rest = seg;
    while let Some(pos) = rest.bytes().position(|b| b >= 0x80) {
        w.write_all(&rest.as_bytes()[..pos])?;
        // `pos` ist eine Char-Grenze: das erste High-Byte nach lauter
        // ASCII-Bytes ist zwingend ein UTF-8 Leading-Byte.
        let tail = &rest[pos..];
        let Some(ch) = tail.chars().next() else { break };
        write!(w, "&#{};", ch as u32)?;
        rest = &tail[ch.len_utf8()..];
    }
    w.write_all(rest.as_bytes())?;
    Ok(())
}
