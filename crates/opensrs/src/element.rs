//! Minimal XML element tree for the OPS envelope grammar.
//!
//! The protocol only needs element names, one optional `key` attribute, child
//! elements and text, so this is all the tree keeps. Reading and writing go
//! through `quick-xml`.

use std::borrow::Cow;

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::Writer;

use crate::errors::XcpError;

/// The only attribute the grammar uses.
pub const KEY_ATTRIBUTE: &str = "key";

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    /// Concatenated text of this node and all of its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Self::Element(element) => element.text_content(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// An XML element with an optional `key` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub key: Option<String>,
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an element with no attribute and no children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
            children: Vec::new(),
        }
    }

    /// Sets the `key` attribute.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Appends a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Appends a text node.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Replaces all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    /// Iterates over child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text of all descendants, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Element(element) => element.collect_text(out),
                Node::Text(text) => out.push_str(text),
            }
        }
    }

    /// Follows `path` from this element, taking the first child element with
    /// each name in turn.
    pub fn find_path(&self, path: &[&str]) -> Option<&Element> {
        path.iter().try_fold(self, |current, name| {
            current.child_elements().find(|child| child.name == *name)
        })
    }

    // -----------------------------------------------------------------------
    // Serialisation
    // -----------------------------------------------------------------------

    /// Writes this element as a standalone UTF-8 document with an XML
    /// declaration. Output is compact and identical for identical trees.
    pub fn to_xml(&self) -> Result<String, XcpError> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(XcpError::serialization)?;
        self.write(&mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(XcpError::serialization)
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), XcpError> {
        let mut start = BytesStart::new(self.name.as_str());
        if let Some(key) = &self.key {
            start.push_attribute((KEY_ATTRIBUTE, key.as_str()));
        }
        writer
            .write_event(Event::Start(start))
            .map_err(XcpError::serialization)?;

        for child in &self.children {
            match child {
                Node::Element(element) => element.write(writer)?,
                Node::Text(text) => writer
                    .write_event(Event::Text(BytesText::from_escaped(partial_escape(text.as_str()))))
                    .map_err(XcpError::serialization)?,
            }
        }

        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(XcpError::serialization)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parses XML text into an element tree and returns its root element.
///
/// Declarations, DOCTYPE, comments and processing instructions are dropped.
/// CDATA sections become text. Attributes other than `key` are ignored.
pub fn parse_document(text: &str) -> Result<Element, XcpError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(XcpError::malformed)? {
            Event::Start(start) => {
                ensure_single_root(&root, &stack)?;
                stack.push(open_element(&start)?);
            }
            Event::Empty(start) => {
                ensure_single_root(&root, &stack)?;
                let element = open_element(&start)?;
                close_element(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XcpError::malformed("unexpected closing tag"))?;
                close_element(element, &mut stack, &mut root);
            }
            Event::Text(content) => {
                let text = content.unescape().map_err(XcpError::malformed)?;
                push_text(&mut stack, text)?;
            }
            Event::CData(content) => {
                let text = content.decode().map_err(XcpError::malformed)?;
                push_text(&mut stack, text)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(XcpError::malformed("unexpected end of document"));
    }
    root.ok_or_else(|| XcpError::malformed("document has no root element"))
}

fn open_element(start: &BytesStart<'_>) -> Result<Element, XcpError> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(XcpError::malformed)?
        .to_owned();
    let key = match start
        .try_get_attribute(KEY_ATTRIBUTE)
        .map_err(XcpError::malformed)?
    {
        Some(attribute) => Some(
            attribute
                .unescape_value()
                .map_err(XcpError::malformed)?
                .into_owned(),
        ),
        None => None,
    };
    Ok(Element {
        name,
        key,
        children: Vec::new(),
    })
}

fn close_element(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None => *root = Some(element),
    }
}

fn ensure_single_root(root: &Option<Element>, stack: &[Element]) -> Result<(), XcpError> {
    if root.is_some() && stack.is_empty() {
        return Err(XcpError::malformed("multiple root elements"));
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: Cow<'_, str>) -> Result<(), XcpError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Text(text.into_owned()));
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(XcpError::malformed("text outside of the root element")),
    }
}
