/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Pandoc AST type definitions for the essay filters.
 *
 * This crate provides pure data type definitions for the Pandoc AST,
 * mirroring the types from pandoc-types (API 1.23) in Haskell. It carries
 * no I/O; the JSON codec lives next to the filters that use it.
 */

pub mod attr;
pub mod block;
pub mod caption;
pub mod inline;
pub mod list;
pub mod meta;
pub mod pandoc;
pub mod table;

// Re-export commonly used types at the crate root
pub use attr::{Attr, add_class, empty_attr, has_class, is_empty_attr};
pub use block::{
    Block, BlockQuote, Blocks, BulletList, CodeBlock, DefinitionList, Div, Figure, Header,
    HorizontalRule, LineBlock, OrderedList, Paragraph, Plain, RawBlock,
};
pub use caption::Caption;
pub use inline::{
    AsInline, Citation, CitationMode, Cite, Code, Emph, Image, Inline, Inlines, LineBreak, Link,
    Math, MathType, Note, QuoteType, Quoted, RawInline, SmallCaps, SoftBreak, Space, Span, Str,
    Strikeout, Strong, Subscript, Superscript, Target, Underline, is_empty_target, stringify,
};
pub use list::{ListAttributes, ListNumberDelim, ListNumberStyle};
pub use meta::{Meta, MetaValue};
pub use pandoc::{API_VERSION, Pandoc};
pub use table::{Alignment, Cell, ColSpec, ColWidth, Row, Table, TableBody, TableFoot, TableHead};
