//! Event bridge: drives the writer from a sequence of externally produced
//! parse events, enabling whole-document re-serialization without buffering.
//!
//! Der Bridge-Modus puffert nie das ganze Dokument: gehalten wird nur die
//! Kette der offenen Elemente plus das gerade escapte Text-Stueck — der
//! Speicherbedarf ist unabhaengig von Dokument- und Textgroesse.

use std::io::Write;

use crate::event::XmlEvent;
use crate::writer::XmlWriter;
use crate::Result;

impl<W: Write> XmlWriter<W> {
    /// Applies one bridge event to the writer.
    ///
    /// `StartElement`: pending `StartNamespace` declarations, then `start`,
    /// then any leading text. `EndElement`: `end` (name-checked), then any
    /// tail text — the tail belongs to the parent's content stream.
    pub fn write_event(&mut self, event: &XmlEvent) -> Result<()> {
        match event {
            XmlEvent::StartElement(se) => {
                let attrs: Vec<(&str, &str)> = se
                    .attributes
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str()))
                    .collect();
                self.start_with_attrs(&se.name, &attrs)?;
                if let Some(text) = &se.text {
                    self.data(text)?;
                }
            }
            XmlEvent::EndElement(ee) => {
                self.end_named(&ee.name)?;
                if let Some(tail) = &ee.tail {
                    self.data(tail)?;
                }
            }
            XmlEvent::StartNamespace(ns) => self.start_ns(&ns.prefix, &ns.uri)?,
            XmlEvent::EndNamespace => self.end_ns()?,
            XmlEvent::Comment(cm) => self.comment(&cm.text)?,
            XmlEvent::ProcessingInstruction(pi) => self.pi(&pi.target, &pi.data)?,
        }
        Ok(())
    }

    /// Writes a whole event sequence.
    pub fn write_events<I>(&mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = XmlEvent>,
    {
        for event in events {
            self.write_event(&event)?;
        }
        Ok(())
    }

    /// Wie [`write_events`](Self::write_events), aber fuer fallible
    /// Event-Quellen (Parser-Fehler via `?` durchgereicht).
    pub fn write_events_fallible<I>(&mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<XmlEvent>>,
    {
        for event in events {
            self.write_event(&event?)?;
        }
        Ok(())
    }
}
