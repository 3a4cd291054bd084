/*
 * transforms/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Document transforms and the pipeline that runs them.
 */

//! Document transforms and the pipeline that runs them.
//!
//! - [`AppendixTransform`] - Letters headings after the appendix marker
//! - [`AnnotationTransform`] - Rewrites `\todo{}`/`\AT{}`/`\AS{}` raw inlines
//!
//! Each transform walks the whole document once. Problems are reported
//! through the [`FilterContext`] rather than by aborting the walk.

mod annotations;
mod appendix;

pub use annotations::{AnnotationTransform, rewrite_annotation};
pub use appendix::AppendixTransform;

use crate::filter_context::FilterContext;
use essay_pandoc_types::Pandoc;

/// Trait for AST transformations.
pub trait AstTransform {
    /// Human-readable name for this transform.
    ///
    /// Used for logging and debugging.
    fn name(&self) -> &str;

    /// Apply the transformation to the AST.
    fn transform(&self, ast: &mut Pandoc, ctx: &mut FilterContext);
}

/// A pipeline of AST transforms to execute in order.
///
/// Transforms run in insertion order.
#[derive(Default)]
pub struct TransformPipeline {
    transforms: Vec<Box<dyn AstTransform>>,
}

impl TransformPipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transform to the pipeline.
    pub fn push(&mut self, transform: Box<dyn AstTransform>) {
        self.transforms.push(transform);
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    /// Execute all transforms in insertion order.
    pub fn execute(&self, ast: &mut Pandoc, ctx: &mut FilterContext) {
        for transform in &self.transforms {
            tracing::debug!(transform = transform.name(), "Running transform");
            transform.transform(ast, ctx);
        }
    }
}
