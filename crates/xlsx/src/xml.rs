//! Thin layer over `quick_xml` shared by the part parsers.
//!
//! Elements and attributes are matched by local name, so documents using any
//! namespace prefix parse the same way.

use ballot_core::{Error, Result};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

/// Streams events from one package part, tracking element depth.
///
/// Any syntax error, mismatched end tag, or element left open at end of
/// input is reported as [`Error::XmlError`] naming the part.
pub struct PartReader<'a> {
    reader: Reader<&'a [u8]>,
    part: &'a str,
    depth: usize,
    seen_root: bool,
}

impl<'a> PartReader<'a> {
    /// Start reading `xml`, the content of `part`.
    pub fn new(xml: &'a str, part: &'a str) -> Self {
        let reader = Reader::from_str(xml);
        Self {
            reader,
            part,
            depth: 0,
            seen_root: false,
        }
    }

    /// Next event. Element depth is updated before the event is returned, so
    /// for a `Start` event `depth()` is the depth of that element (root is 1)
    /// and for an `Empty` event it is the depth of the parent.
    pub fn read_event(&mut self) -> Result<Event<'a>> {
        let event = self
            .reader
            .read_event()
            .map_err(|e| self.error(format!("at byte {}: {}", self.reader.buffer_position(), e)))?;
        match &event {
            Event::Start(_) => {
                self.depth += 1;
                self.seen_root = true;
            }
            Event::Empty(_) => self.seen_root = true,
            Event::End(_) => self.depth = self.depth.saturating_sub(1),
            Event::Eof if self.depth > 0 => {
                return Err(self.error("unexpected end of document".to_string()))
            }
            Event::Eof if !self.seen_root => {
                return Err(self.error("document has no root element".to_string()))
            }
            _ => {}
        }
        Ok(event)
    }

    /// Current element depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Unescaped text content.
    pub fn text(&self, text: &BytesText) -> Result<String> {
        text.unescape()
            .map(|t| t.into_owned())
            .map_err(|e| self.error(format!("bad text content: {}", e)))
    }

    /// Value of the unprefixed attribute `key`.
    pub fn attr(&self, element: &BytesStart, key: &[u8]) -> Result<Option<String>> {
        self.find_attr(element, |name| name == key)
    }

    /// Value of a namespace-prefixed attribute with local name `local`
    /// (`r:id`, `r:embed`).
    pub fn prefixed_attr(&self, element: &BytesStart, local: &[u8]) -> Result<Option<String>> {
        self.find_attr(element, |name| {
            name.contains(&b':') && local_name(name) == local && !name.starts_with(b"xmlns:")
        })
    }

    fn find_attr(&self, element: &BytesStart, matches: impl Fn(&[u8]) -> bool) -> Result<Option<String>> {
        for attr in element.attributes() {
            let attr = attr.map_err(|e| self.error(format!("bad attribute: {}", e)))?;
            if matches(attr.key.as_ref()) {
                let value = attr
                    .unescape_value()
                    .map_err(|e| self.error(format!("bad attribute value: {}", e)))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    /// An XML error for this part.
    pub fn error(&self, message: String) -> Error {
        Error::XmlError(format!("{}: {}", self.part, message))
    }
}

/// Extract the local name from a potentially namespaced XML element name.
pub fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}
