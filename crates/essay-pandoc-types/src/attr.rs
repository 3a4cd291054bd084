/*
 * attr.rs
 * Copyright (c) 2025 Posit, PBC
 */

use hashlink::LinkedHashMap;

/// `(identifier, classes, key-value attributes)`.
///
/// Key-value pairs keep their insertion order. Pandoc allows a key to repeat;
/// here a repeated key keeps its first position and takes the last value.
pub type Attr = (String, Vec<String>, LinkedHashMap<String, String>);

pub fn empty_attr() -> Attr {
    (String::new(), vec![], LinkedHashMap::new())
}

pub fn is_empty_attr(attr: &Attr) -> bool {
    attr.0.is_empty() && attr.1.is_empty() && attr.2.is_empty()
}

pub fn has_class(attr: &Attr, class: &str) -> bool {
    attr.1.iter().any(|c| c == class)
}

/// Append `class` unless it is already present. Returns true if it was added.
pub fn add_class(attr: &mut Attr, class: &str) -> bool {
    if has_class(attr, class) {
        return false;
    }
    attr.1.push(class.to_string());
    true
}
