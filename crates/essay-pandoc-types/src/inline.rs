/*
 * inline.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::attr::Attr;
use crate::block::Blocks;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Inline {
    Str(Str),
    Emph(Emph),
    Underline(Underline),
    Strong(Strong),
    Strikeout(Strikeout),
    Superscript(Superscript),
    Subscript(Subscript),
    SmallCaps(SmallCaps),
    Quoted(Quoted),
    Cite(Cite),
    Code(Code),
    Space(Space),
    SoftBreak(SoftBreak),
    LineBreak(LineBreak),
    Math(Math),
    RawInline(RawInline),
    Link(Link),
    Image(Image),
    Note(Note),
    Span(Span),
}

pub type Inlines = Vec<Inline>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuoteType {
    SingleQuote,
    DoubleQuote,
}

/// `(url, title)`
pub type Target = (String, String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MathType {
    InlineMath,
    DisplayMath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Str {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emph {
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Underline {
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strong {
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strikeout {
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Superscript {
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscript {
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmallCaps {
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quoted {
    pub quote_type: QuoteType,
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cite {
    pub citations: Vec<Citation>,
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Code {
    pub attr: Attr,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Math {
    pub math_type: MathType,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInline {
    pub format: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub attr: Attr,
    pub content: Inlines,
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub attr: Attr,
    pub content: Inlines,
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub content: Blocks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub attr: Attr,
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineBreak;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftBreak;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub id: String,
    pub prefix: Inlines,
    pub suffix: Inlines,
    pub mode: CitationMode,
    pub note_num: i64,
    pub hash: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CitationMode {
    AuthorInText,
    SuppressAuthor,
    NormalCitation,
}

pub trait AsInline {
    fn as_inline(self) -> Inline;
}

macro_rules! impl_as_inline {
    ($($type:ident),*) => {
        $(
            impl AsInline for $type {
                fn as_inline(self) -> Inline {
                    Inline::$type(self)
                }
            }
        )*
    };
}

impl AsInline for Inline {
    fn as_inline(self) -> Inline {
        self
    }
}

impl_as_inline!(
    Str,
    Emph,
    Underline,
    Strong,
    Strikeout,
    Superscript,
    Subscript,
    SmallCaps,
    Quoted,
    Cite,
    Code,
    Space,
    SoftBreak,
    LineBreak,
    Math,
    RawInline,
    Link,
    Image,
    Note,
    Span
);

pub fn is_empty_target(target: &Target) -> bool {
    target.0.is_empty() && target.1.is_empty()
}

impl Str {
    pub fn new(text: impl Into<String>) -> Self {
        Str { text: text.into() }
    }
}

impl RawInline {
    pub fn new(format: impl Into<String>, text: impl Into<String>) -> Self {
        RawInline {
            format: format.into(),
            text: text.into(),
        }
    }
}

/// Concatenate the text of the inlines the way Pandoc's `stringify` does
/// for the node kinds that carry text. Spaces and breaks become a single space.
pub fn stringify(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Str(s) => out.push_str(&s.text),
            Inline::Code(c) => out.push_str(&c.text),
            Inline::Math(m) => out.push_str(&m.text),
            Inline::Space(_) | Inline::SoftBreak(_) | Inline::LineBreak(_) => out.push(' '),
            Inline::Emph(Emph { content })
            | Inline::Underline(Underline { content })
            | Inline::Strong(Strong { content })
            | Inline::Strikeout(Strikeout { content })
            | Inline::Superscript(Superscript { content })
            | Inline::Subscript(Subscript { content })
            | Inline::SmallCaps(SmallCaps { content })
            | Inline::Quoted(Quoted { content, .. })
            | Inline::Cite(Cite { content, .. })
            | Inline::Link(Link { content, .. })
            | Inline::Image(Image { content, .. })
            | Inline::Span(Span { content, .. }) => out.push_str(&stringify(content)),
            Inline::RawInline(_) | Inline::Note(_) => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::empty_attr;

    #[test]
    fn test_as_inline_str() {
        let inline = Str::new("hello").as_inline();
        assert_eq!(inline, Inline::Str(Str::new("hello")));
    }

    #[test]
    fn test_as_inline_identity() {
        let inline = Inline::Space(Space);
        assert_eq!(inline.clone().as_inline(), inline);
    }

    #[test]
    fn test_is_empty_target() {
        assert!(is_empty_target(&(String::new(), String::new())));
        assert!(!is_empty_target(&("https://example.com".to_string(), String::new())));
    }

    #[test]
    fn test_stringify_nested() {
        let inlines = vec![
            Inline::Str(Str::new("Null")),
            Inline::Space(Space),
            Inline::Emph(Emph {
                content: vec![Inline::Str(Str::new("safety"))],
            }),
            Inline::RawInline(RawInline::new("tex", "\\todo{x}")),
        ];
        assert_eq!(stringify(&inlines), "Null safety");
    }

    #[test]
    fn test_stringify_code_and_span() {
        let inlines = vec![Inline::Span(Span {
            attr: empty_attr(),
            content: vec![Inline::Code(Code {
                attr: empty_attr(),
                text: "Option<T>".to_string(),
            })],
        })];
        assert_eq!(stringify(&inlines), "Option<T>");
    }
}
