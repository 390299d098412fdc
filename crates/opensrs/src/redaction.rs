//! Credential scrubbing for request renderings that end up in logs.

use crate::codec::ITEM;
use crate::element::{Element, Node};

/// `item` keys whose values are replaced by [`PLACEHOLDER`].
pub const CREDENTIAL_KEYS: [&str; 2] = ["reg_username", "reg_password"];

pub const PLACEHOLDER: &str = "FILTERED";

/// Returns a copy of `element` with the content of every credential `item`,
/// at any depth, replaced by [`PLACEHOLDER`].
pub fn redact(element: &Element) -> Element {
    let mut copy = element.clone();
    redact_in_place(&mut copy);
    copy
}

fn redact_in_place(element: &mut Element) {
    if is_credential(element) {
        element.set_text(PLACEHOLDER);
        return;
    }
    for child in &mut element.children {
        if let Node::Element(child) = child {
            redact_in_place(child);
        }
    }
}

fn is_credential(element: &Element) -> bool {
    element.name == ITEM
        && element
            .key
            .as_deref()
            .is_some_and(|key| CREDENTIAL_KEYS.contains(&key))
}
