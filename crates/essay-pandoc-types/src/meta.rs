/*
 * meta.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::block::Blocks;
use crate::inline::{Inlines, stringify};
use hashlink::LinkedHashMap;
use serde::{Deserialize, Serialize};

// Pandoc's MetaValue notably does not support numbers or nulls, so we don't either
// https://pandoc.org/lua-filters.html#type-metavalue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetaValue {
    MetaString(String),
    MetaBool(bool),
    MetaInlines(Inlines),
    MetaBlocks(Blocks),
    MetaList(Vec<MetaValue>),
    MetaMap(LinkedHashMap<String, MetaValue>),
}

impl Default for MetaValue {
    fn default() -> Self {
        MetaValue::MetaMap(LinkedHashMap::new())
    }
}

pub type Meta = LinkedHashMap<String, MetaValue>;

impl MetaValue {
    /// Get a value by key if this is a MetaMap
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        match self {
            MetaValue::MetaMap(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetaValue::MetaBool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text of a string-like value.
    ///
    /// YAML scalars arrive from Pandoc as `MetaInlines`, so those are
    /// flattened; `MetaString` is returned as is.
    pub fn as_text(&self) -> Option<String> {
        match self {
            MetaValue::MetaString(s) => Some(s.clone()),
            MetaValue::MetaInlines(inlines) => Some(stringify(inlines)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::{Inline, Space, Str};

    #[test]
    fn test_default_is_empty_map() {
        assert_eq!(MetaValue::default(), MetaValue::MetaMap(LinkedHashMap::new()));
    }

    #[test]
    fn test_get_on_map() {
        let mut map = LinkedHashMap::new();
        map.insert("flag".to_string(), MetaValue::MetaBool(true));
        let value = MetaValue::MetaMap(map);
        assert_eq!(value.get("flag").and_then(MetaValue::as_bool), Some(true));
        assert!(value.get("missing").is_none());
        assert!(MetaValue::MetaBool(true).get("flag").is_none());
    }

    #[test]
    fn test_as_text_flattens_inlines() {
        let value = MetaValue::MetaInlines(vec![
            Inline::Str(Str::new("two")),
            Inline::Space(Space),
            Inline::Str(Str::new("words")),
        ]);
        assert_eq!(value.as_text().as_deref(), Some("two words"));
        assert_eq!(
            MetaValue::MetaString("span".to_string()).as_text().as_deref(),
            Some("span")
        );
        assert_eq!(MetaValue::MetaBool(false).as_text(), None);
    }
}
