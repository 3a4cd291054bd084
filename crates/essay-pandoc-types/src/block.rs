/*
 * block.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::attr::Attr;
use crate::caption::Caption;
use crate::inline::Inlines;
use crate::list::ListAttributes;
use crate::table::Table;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Plain(Plain),
    Paragraph(Paragraph),
    LineBlock(LineBlock),
    CodeBlock(CodeBlock),
    RawBlock(RawBlock),
    BlockQuote(BlockQuote),
    OrderedList(OrderedList),
    BulletList(BulletList),
    DefinitionList(DefinitionList),
    Header(Header),
    HorizontalRule(HorizontalRule),
    Table(Table),
    Figure(Figure),
    Div(Div),
}

pub type Blocks = Vec<Block>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plain {
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineBlock {
    pub content: Vec<Inlines>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub attr: Attr,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    pub format: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockQuote {
    pub content: Blocks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedList {
    pub attr: ListAttributes,
    pub content: Vec<Blocks>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletList {
    pub content: Vec<Blocks>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionList {
    pub content: Vec<(Inlines, Vec<Blocks>)>,
}

/// A section heading. `level` is 1-based; Pandoc itself never produces 0,
/// but nothing stops a JSON producer from doing so.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub level: usize,
    pub attr: Attr,
    pub content: Inlines,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizontalRule;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub attr: Attr,
    pub caption: Caption,
    pub content: Blocks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Div {
    pub attr: Attr,
    pub content: Blocks,
}

impl RawBlock {
    pub fn new(format: impl Into<String>, text: impl Into<String>) -> Self {
        RawBlock {
            format: format.into(),
            text: text.into(),
        }
    }
}
