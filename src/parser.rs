//! Lenient XML parsing into a small element tree.
//!
//! Feeds in the wild are frequently not well-formed: end tags that do not
//! match, stray end tags, elements that are never closed, undeclared
//! namespace prefixes, bare `&` in text. [`parse_document`] never fails on
//! any of these. It builds whatever tree it can from the events `quick-xml`
//! produces, skipping fragments the reader rejects.
//!
//! Recovery rules:
//!
//! - a `&` that does not start a reference is read as a literal `&`
//! - a syntax error skips the offending fragment and parsing resumes after it;
//!   the parse only stops early when the reader makes no progress
//! - an end tag closes back to the nearest open element with the same local
//!   name, implicitly closing anything opened after it
//! - an end tag with no matching open element is ignored
//! - elements still open at end of input are closed
//! - elements are stored under their local name (`dc:date` becomes `date`)

use quick_xml::Reader;
use std::borrow::Cow;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use tracing::{debug, instrument, warn};

const ROOT_NAME: &str = "#document";

/// A node of element content.
#[derive(Debug, Clone, PartialEq, Eq)]
enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with its local name and mixed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    content: Vec<XmlNode>,
}

impl XmlElement {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Vec::new(),
        }
    }

    /// Local name, without any namespace prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct child elements, in document order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &XmlElement> {
        self.content.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// All descendant elements named `name`, depth-first in document order.
    /// The element itself is not included.
    pub fn descendants<'n>(&self, name: &'n str) -> Descendants<'_, 'n> {
        Descendants {
            stack: self.children().rev().collect(),
            name,
        }
    }

    /// First direct child element named `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children().find(|el| el.name == name)
    }

    /// First descendant element named `name`.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.descendants(name).next()
    }

    /// Concatenated text of this element and all of its descendants, trimmed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out.trim().to_string()
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.content {
            match node {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(el) => el.collect_text(out),
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(XmlNode::Text(last)) = self.content.last_mut() {
            last.push_str(text);
        } else {
            self.content.push(XmlNode::Text(text.to_string()));
        }
    }
}

/// Depth-first iterator over descendants with a given local name.
#[derive(Debug)]
pub struct Descendants<'a, 'n> {
    stack: Vec<&'a XmlElement>,
    name: &'n str,
}

impl<'a> Iterator for Descendants<'a, '_> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(el) = self.stack.pop() {
            self.stack.extend(el.children().rev());
            if el.name == self.name {
                return Some(el);
            }
        }
        None
    }
}

/// A parsed document. The root is synthetic and holds the top-level content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// True when no element at all could be read.
    pub fn is_empty(&self) -> bool {
        self.root.children().next().is_none()
    }

    pub fn descendants<'n>(&self, name: &'n str) -> Descendants<'_, 'n> {
        self.root.descendants(name)
    }

    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.root.find(name)
    }
}

/// Stack of open elements; index 0 is the document root and is never popped
/// before [`TreeBuilder::finish`].
struct TreeBuilder {
    open: Vec<XmlElement>,
    elements: usize,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            open: vec![XmlElement::new(ROOT_NAME)],
            elements: 0,
        }
    }

    fn open(&mut self, name: String) {
        self.elements += 1;
        self.open.push(XmlElement::new(name));
    }

    fn close_current(&mut self) {
        if self.open.len() < 2 {
            return;
        }
        if let Some(el) = self.open.pop() {
            if let Some(parent) = self.open.last_mut() {
                parent.content.push(XmlNode::Element(el));
            }
        }
    }

    fn close(&mut self, name: &str) {
        match self.open.iter().rposition(|el| el.name == name) {
            Some(pos) if pos > 0 => {
                while self.open.len() > pos {
                    self.close_current();
                }
            }
            _ => debug!(%name, "Ignoring unmatched end tag"),
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(top) = self.open.last_mut() {
            top.push_text(text);
        }
    }

    fn finish(mut self) -> XmlDocument {
        while self.open.len() > 1 {
            self.close_current();
        }
        let root = self.open.pop().unwrap_or_else(|| XmlElement::new(ROOT_NAME));
        XmlDocument { root }
    }
}

/// Resolve the body of an `&...;` reference. Unknown entities are kept as written.
fn resolve_reference(name: &str) -> String {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        if let Some(ch) = value.and_then(char::from_u32) {
            return ch.to_string();
        }
    } else if let Some(value) = resolve_predefined_entity(name) {
        return value.to_string();
    }
    format!("&{name};")
}

/// True when `after_amp` (the text following a `&`) starts with a complete
/// character or entity reference such as `#38;`, `#x26;` or `amp;`.
fn starts_with_reference(after_amp: &str) -> bool {
    let Some(end) = after_amp.bytes().take(40).position(|b| b == b';') else {
        return false;
    };
    let body = &after_amp[..end];
    if let Some(num) = body.strip_prefix('#') {
        return match num.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !num.is_empty() && num.chars().all(|c| c.is_ascii_digit()),
        };
    }
    let mut chars = body.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Escape every `&` that does not start a reference, leaving CDATA sections
/// and comments untouched.
fn escape_bare_ampersands(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    let mut rest = text;
    while let Some(pos) = rest.find(['&', '<']) {
        let (head, tail) = rest.split_at(pos);
        out.push_str(head);

        if let Some(after_amp) = tail.strip_prefix('&') {
            out.push_str(if starts_with_reference(after_amp) { "&" } else { "&amp;" });
            rest = after_amp;
            continue;
        }

        let close = if tail.starts_with("<![CDATA[") {
            Some("]]>")
        } else if tail.starts_with("<!--") {
            Some("-->")
        } else {
            None
        };
        let end = match close {
            Some(marker) => tail
                .find(marker)
                .map(|i| i + marker.len())
                .unwrap_or(tail.len()),
            None => 1,
        };
        out.push_str(&tail[..end]);
        rest = &tail[end..];
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Parse `text` as XML, recovering from malformed markup.
///
/// Never fails: empty or non-XML input produces an empty document.
#[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
pub fn parse_document(text: &str) -> XmlDocument {
    let text = escape_bare_ampersands(text);
    let mut reader = Reader::from_str(&text);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut builder = TreeBuilder::new();
    loop {
        let before = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                builder.open(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Empty(e)) => {
                builder.open(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                builder.close_current();
            }
            Ok(Event::End(e)) => {
                builder.close(&String::from_utf8_lossy(e.local_name().as_ref()));
            }
            Ok(Event::Text(e)) => builder.push_text(&String::from_utf8_lossy(&e)),
            Ok(Event::CData(e)) => builder.push_text(&String::from_utf8_lossy(&e)),
            Ok(Event::GeneralRef(e)) => {
                builder.push_text(&resolve_reference(&String::from_utf8_lossy(&e)));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                let after = reader.buffer_position();
                if after <= before {
                    warn!(
                        position = after,
                        error = %e,
                        "Malformed XML; keeping what was parsed so far"
                    );
                    break;
                }
                warn!(position = before, error = %e, "Skipping malformed XML fragment");
            }
        }
    }

    debug!(elements = builder.elements, "Parsed XML document");
    builder.finish()
}
