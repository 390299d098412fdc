//! Recursive mapping between [`Value`] trees and `dt_*` elements.
//!
//! ## Grammar
//!
//! | Value | Element |
//! |-------|---------|
//! | map | `<dt_assoc>` with one `<item key="name">` per entry, in map order |
//! | list | `<dt_array>` with one `<item key="0">`, `<item key="1">`, ... per element |
//! | scalar inside an item | the item's text content |
//! | scalar at the top level | `<dt_scalar>text</dt_scalar>` |
//!
//! ## Decode policy
//!
//! [`Decoder::decode`] takes the **first** usable node of a sequence: a
//! `dt_array`, a `dt_assoc`, or a text-bearing leaf (`dt_scalar`, `item`, bare
//! text). Nodes whose trimmed text is empty are skipped, so an empty scalar
//! reads the same as a missing one and the corresponding map or list entry is
//! dropped. Scalar text is trimmed and, under [`ScalarPolicy::InferTemporal`],
//! passed through [`infer_scalar`].

use tracing::debug;

use crate::element::{Element, Node};
use crate::errors::XcpError;
use crate::scalar::{infer_scalar, render_scalar, Scalar};
use crate::value::{Map, Value};

pub const DT_ASSOC: &str = "dt_assoc";
pub const DT_ARRAY: &str = "dt_array";
pub const DT_SCALAR: &str = "dt_scalar";
pub const ITEM: &str = "item";

/// Largest `dt_array` index accepted on decode. Items beyond it are dropped
/// rather than allocating a list of that length.
pub const MAX_LIST_INDEX: usize = 65_535;

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Encodes a value as a standalone element.
pub fn encode(value: &Value) -> Element {
    match value {
        Value::Scalar(scalar) => with_scalar_text(Element::new(DT_SCALAR), scalar),
        Value::List(items) => items
            .iter()
            .enumerate()
            .fold(Element::new(DT_ARRAY), |array, (index, item)| {
                array.with_child(encode_item(index.to_string(), item))
            }),
        Value::Map(entries) => entries
            .iter()
            .fold(Element::new(DT_ASSOC), |assoc, (key, item)| {
                assoc.with_child(encode_item(key.clone(), item))
            }),
    }
}

fn encode_item(key: String, value: &Value) -> Element {
    let item = Element::new(ITEM).with_key(key);
    match value {
        Value::Scalar(scalar) => with_scalar_text(item, scalar),
        nested => item.with_child(encode(nested)),
    }
}

fn with_scalar_text(element: Element, scalar: &Scalar) -> Element {
    let text = render_scalar(scalar);
    if text.is_empty() {
        element
    } else {
        element.with_text(text)
    }
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Decodes the first usable node of `nodes` with the default
/// [`ScalarPolicy`].
pub fn decode(nodes: &[Node]) -> Result<Value, XcpError> {
    Decoder::default().decode(nodes)
}

/// How decoded scalar text is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScalarPolicy {
    /// Date and datetime shaped text becomes [`Scalar::Date`] /
    /// [`Scalar::DateTime`]; everything else stays text.
    #[default]
    InferTemporal,
    /// All scalar text is returned as [`Scalar::Text`].
    PlainText,
}

/// Decodes element sequences back into values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    policy: ScalarPolicy,
}

impl Decoder {
    pub fn new(policy: ScalarPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ScalarPolicy {
        self.policy
    }

    /// Decodes the first usable node of `nodes`.
    ///
    /// Returns [`XcpError::NoData`] if the sequence holds no usable node.
    pub fn decode(&self, nodes: &[Node]) -> Result<Value, XcpError> {
        self.decode_first(nodes).ok_or(XcpError::NoData)
    }

    /// Decodes the first usable child element of `parent`. Text directly
    /// inside `parent` is ignored.
    ///
    /// Returns [`XcpError::NoData`] if `parent` has no usable child element.
    pub fn decode_children(&self, parent: &Element) -> Result<Value, XcpError> {
        parent
            .child_elements()
            .find_map(|element| self.decode_element(element))
            .ok_or(XcpError::NoData)
    }

    fn decode_first(&self, nodes: &[Node]) -> Option<Value> {
        nodes.iter().find_map(|node| match node {
            Node::Element(element) => self.decode_element(element),
            Node::Text(text) => self.decode_text(text),
        })
    }

    fn decode_element(&self, element: &Element) -> Option<Value> {
        match element.name.as_str() {
            DT_ARRAY => Some(self.decode_array(element)),
            DT_ASSOC => Some(self.decode_assoc(element)),
            DT_SCALAR | ITEM => self.decode_text(&element.text_content()),
            _ => None,
        }
    }

    fn decode_text(&self, text: &str) -> Option<Value> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let scalar = match self.policy {
            ScalarPolicy::InferTemporal => infer_scalar(trimmed),
            ScalarPolicy::PlainText => Scalar::Text(trimmed.to_owned()),
        };
        Some(Value::Scalar(scalar))
    }

    fn decode_array(&self, element: &Element) -> Value {
        let mut items = Vec::new();

        for (key, item) in keyed_items(element) {
            let index = match key.trim().parse::<usize>() {
                Ok(index) if index <= MAX_LIST_INDEX => index,
                _ => {
                    debug!(key, "skipping dt_array item with unusable index");
                    continue;
                }
            };
            let Some(value) = self.decode_first(&item.children) else {
                debug!(key, "skipping dt_array item with no decodable content");
                continue;
            };
            if index >= items.len() {
                items.resize_with(index + 1, Value::absent);
            }
            items[index] = value;
        }

        Value::List(items)
    }

    fn decode_assoc(&self, element: &Element) -> Value {
        let mut entries = Map::new();

        for (key, item) in keyed_items(element) {
            let Some(value) = self.decode_first(&item.children) else {
                debug!(key, "skipping dt_assoc item with no decodable content");
                continue;
            };
            entries.insert(key.to_owned(), value);
        }

        Value::Map(entries)
    }
}

/// Non-empty `item` children of a container, paired with their `key`.
fn keyed_items(container: &Element) -> impl Iterator<Item = (&str, &Element)> {
    container
        .child_elements()
        .filter(|child| child.name == ITEM)
        .filter(|item| !item.text_content().trim().is_empty())
        .filter_map(|item| match item.key.as_deref() {
            Some(key) => Some((key, item)),
            None => {
                debug!("skipping item without a key attribute");
                None
            }
        })
}
