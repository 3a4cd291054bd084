/*
 * pandoc.rs
 * Copyright (c) 2025 Posit, PBC
 */

pub use crate::block::Blocks;
pub use crate::meta::Meta;

/// The pandoc-types API version this crate models.
pub const API_VERSION: [u64; 3] = [1, 23, 1];

/*
 * A data structure that mimics Pandoc's `data Pandoc` type, plus the
 * api version the document was produced with so it can be echoed back.
 */

#[derive(Debug, Clone, PartialEq)]
pub struct Pandoc {
    pub api_version: Vec<u64>,
    pub meta: Meta,
    pub blocks: Blocks,
}

impl Default for Pandoc {
    fn default() -> Self {
        Pandoc {
            api_version: API_VERSION.to_vec(),
            meta: Meta::new(),
            blocks: Vec::new(),
        }
    }
}

impl Pandoc {
    /// True when the major and minor parts match [`API_VERSION`].
    pub fn is_supported_api_version(&self) -> bool {
        self.api_version.len() >= 2 && self.api_version[..2] == API_VERSION[..2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_current_api_version() {
        let doc = Pandoc::default();
        assert_eq!(doc.api_version, vec![1, 23, 1]);
        assert!(doc.is_supported_api_version());
    }

    #[test]
    fn test_patch_level_is_ignored() {
        let doc = Pandoc {
            api_version: vec![1, 23, 0],
            ..Pandoc::default()
        };
        assert!(doc.is_supported_api_version());
    }

    #[test]
    fn test_older_minor_is_unsupported() {
        let doc = Pandoc {
            api_version: vec![1, 22, 2, 1],
            ..Pandoc::default()
        };
        assert!(!doc.is_supported_api_version());
        let empty = Pandoc {
            api_version: vec![],
            ..Pandoc::default()
        };
        assert!(!empty.is_supported_api_version());
    }
}
