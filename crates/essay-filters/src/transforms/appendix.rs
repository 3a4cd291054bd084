/*
 * transforms/appendix.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Appendix heading labels.
 */

//! Appendix heading labels.
//!
//! A raw TeX block containing `\appendix` marks the start of the appendix.
//! The marker block is removed, and every heading after it is prefixed with
//! its appendix label ("A", "A.1", ...) and marked `unnumbered` so the
//! renderer does not number it a second time.

use essay_pandoc_types::{Block, Pandoc, RawBlock};

use crate::config::AppendixConfig;
use crate::filter_context::FilterContext;
use crate::filters::{Filter, FilterReturn, topdown_traverse};
use crate::heading_labels::{HeadingLabeler, LabelError};
use crate::transforms::AstTransform;

pub struct AppendixTransform {
    marker: String,
    marker_formats: Vec<String>,
}

impl AppendixTransform {
    pub fn new(config: &AppendixConfig) -> Self {
        Self {
            marker: config.marker.clone(),
            marker_formats: config.marker_formats.clone(),
        }
    }

    fn is_marker(&self, raw: &RawBlock) -> bool {
        self.marker_formats.iter().any(|f| *f == raw.format) && raw.text.contains(&self.marker)
    }
}

impl Default for AppendixTransform {
    fn default() -> Self {
        Self::new(&AppendixConfig::default())
    }
}

impl AstTransform for AppendixTransform {
    fn name(&self) -> &str {
        "appendix"
    }

    fn transform(&self, ast: &mut Pandoc, ctx: &mut FilterContext) {
        // One labeler per document; the marker and the headings share it,
        // so both are handled by a single block callback.
        let mut labeler = HeadingLabeler::new();
        let mut filter = Filter::new().with_block(|block, ctx| match block {
            Block::RawBlock(raw) if self.is_marker(&raw) => {
                labeler.observe_marker();
                FilterReturn::FilterResult(vec![], false)
            }
            Block::Header(mut header) => {
                if let Err(err) = labeler.label_header(&mut header) {
                    let message = format!(
                        "cannot label appendix heading '{}': {}",
                        essay_pandoc_types::stringify(&header.content),
                        err
                    );
                    // Only a malformed depth is fatal; the header passes through otherwise.
                    match err {
                        LabelError::InvalidDepth(_) => ctx.error(message),
                        LabelError::TopLevelOverflow(_) | LabelError::NoTopLevelHeading(_) => {
                            ctx.warn(message)
                        }
                    }
                }
                FilterReturn::Unchanged(Block::Header(header))
            }
            other => FilterReturn::Unchanged(other),
        });

        let doc = std::mem::take(ast);
        *ast = topdown_traverse(doc, &mut filter, ctx);
    }
}
