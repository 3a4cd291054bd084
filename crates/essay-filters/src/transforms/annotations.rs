/*
 * transforms/annotations.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Margin annotations from TeX review macros.
 */

//! Margin annotations from TeX review macros.
//!
//! Drafts mark review comments with `\todo{...}`, `\AT{...}` and `\AS{...}`.
//! Pandoc keeps these as raw TeX inlines; this transform turns them into
//! `aside` annotations the HTML template floats into the margin.

use essay_pandoc_types::{Attr, Inline, Inlines, Pandoc, RawInline, Space, Span, Str};
use hashlink::LinkedHashMap;

use crate::config::{AnnotationConfig, AnnotationStyle};
use crate::filter_context::FilterContext;
use crate::filters::{Filter, FilterReturn, topdown_traverse};
use crate::transforms::AstTransform;

const ASIDE_CLASS: &str = "aside";

struct AnnotationKind {
    opener: &'static str,
    /// Extra class and visible prefix for tagged annotations
    tag: Option<&'static str>,
}

// Tried in order; the first opener that matches wins.
static ANNOTATION_KINDS: [AnnotationKind; 3] = [
    AnnotationKind {
        opener: "\\todo{",
        tag: None,
    },
    AnnotationKind {
        opener: "\\AT{",
        tag: Some("AT"),
    },
    AnnotationKind {
        opener: "\\AS{",
        tag: Some("AS"),
    },
];

/// Rewrite a raw `\todo{}`, `\AT{}` or `\AS{}` inline.
///
/// Returns `None` when `text` is not exactly one of the macros (the closing
/// brace must be the last character). Nested braces are not balanced; the
/// content is everything between the opener and the final `}`.
pub fn rewrite_annotation(text: &str, style: AnnotationStyle) -> Option<Inline> {
    let (kind, content) = ANNOTATION_KINDS.iter().find_map(|kind| {
        text.strip_prefix(kind.opener)
            .and_then(|rest| rest.strip_suffix('}'))
            .map(|content| (kind, content))
    })?;

    let display = match kind.tag {
        Some(tag) => format!("{}: {}", tag, content),
        None => content.to_string(),
    };

    let inline = match style {
        AnnotationStyle::Element => {
            let html = match kind.tag {
                Some(tag) => format!("<aside class=\"{}\">{}</aside>", tag, display),
                None => format!("<aside>{}</aside>", display),
            };
            Inline::RawInline(RawInline::new("html", html))
        }
        AnnotationStyle::Span => {
            let mut classes = vec![ASIDE_CLASS.to_string()];
            classes.extend(kind.tag.map(str::to_string));
            let attr: Attr = (String::new(), classes, LinkedHashMap::new());
            Inline::Span(Span {
                attr,
                content: text_to_inlines(&display),
            })
        }
    };
    Some(inline)
}

/// Split text on whitespace runs into `Str`/`Space` tokens, one `Space`
/// per run, with leading and trailing whitespace dropped.
fn text_to_inlines(text: &str) -> Inlines {
    let mut inlines = vec![];
    for word in text.split_whitespace() {
        if !inlines.is_empty() {
            inlines.push(Inline::Space(Space));
        }
        inlines.push(Inline::Str(Str::new(word)));
    }
    inlines
}

pub struct AnnotationTransform {
    style: AnnotationStyle,
    source_formats: Vec<String>,
}

impl AnnotationTransform {
    pub fn new(config: &AnnotationConfig) -> Self {
        Self {
            style: config.style,
            source_formats: config.source_formats.clone(),
        }
    }
}

impl Default for AnnotationTransform {
    fn default() -> Self {
        Self::new(&AnnotationConfig::default())
    }
}

impl AstTransform for AnnotationTransform {
    fn name(&self) -> &str {
        "annotations"
    }

    fn transform(&self, ast: &mut Pandoc, ctx: &mut FilterContext) {
        let mut rewritten = 0usize;
        {
            let mut filter = Filter::new().with_raw_inline(|raw, _ctx| {
                if !self.source_formats.iter().any(|f| *f == raw.format) {
                    return FilterReturn::Unchanged(raw);
                }
                match rewrite_annotation(&raw.text, self.style) {
                    Some(inline) => {
                        rewritten += 1;
                        FilterReturn::FilterResult(vec![inline], false)
                    }
                    None => FilterReturn::Unchanged(raw),
                }
            });
            let doc = std::mem::take(ast);
            *ast = topdown_traverse(doc, &mut filter, ctx);
        }
        tracing::debug!(count = rewritten, style = self.style.as_str(), "Rewrote annotations");
    }
}
