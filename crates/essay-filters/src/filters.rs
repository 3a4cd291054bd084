/*
 * filters.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::filter_context::FilterContext;
use essay_pandoc_types::{
    self as pandoc, AsInline, Block, Blocks, Inline, Inlines, Meta, MetaValue, Pandoc,
};

// filters are destructive and take ownership of the input

pub enum FilterReturn<T, U> {
    Unchanged(T),
    // (replacement nodes, walk the children of each replacement).
    // The callback is never re-applied to its own replacement.
    FilterResult(U, bool),
}

type InlineFilterFn<'a, T> = Box<dyn FnMut(T, &mut FilterContext) -> FilterReturn<T, Inlines> + 'a>;
type BlockFilterFn<'a, T> = Box<dyn FnMut(T, &mut FilterContext) -> FilterReturn<T, Blocks> + 'a>;
type InlineFilterField<'a, T> = Option<InlineFilterFn<'a, T>>;
type BlockFilterField<'a, T> = Option<BlockFilterFn<'a, T>>;

/// A set of callbacks applied top-down to a document.
///
/// A callback registered for a specific node kind wins over the generic
/// `inline`/`block` callback for that kind.
#[derive(Default)]
pub struct Filter<'a> {
    pub inline: InlineFilterField<'a, Inline>,
    pub block: BlockFilterField<'a, Block>,

    pub str: InlineFilterField<'a, pandoc::Str>,
    pub emph: InlineFilterField<'a, pandoc::Emph>,
    pub underline: InlineFilterField<'a, pandoc::Underline>,
    pub strong: InlineFilterField<'a, pandoc::Strong>,
    pub strikeout: InlineFilterField<'a, pandoc::Strikeout>,
    pub superscript: InlineFilterField<'a, pandoc::Superscript>,
    pub subscript: InlineFilterField<'a, pandoc::Subscript>,
    pub small_caps: InlineFilterField<'a, pandoc::SmallCaps>,
    pub quoted: InlineFilterField<'a, pandoc::Quoted>,
    pub cite: InlineFilterField<'a, pandoc::Cite>,
    pub code: InlineFilterField<'a, pandoc::Code>,
    pub space: InlineFilterField<'a, pandoc::Space>,
    pub soft_break: InlineFilterField<'a, pandoc::SoftBreak>,
    pub line_break: InlineFilterField<'a, pandoc::LineBreak>,
    pub math: InlineFilterField<'a, pandoc::Math>,
    pub raw_inline: InlineFilterField<'a, pandoc::RawInline>,
    pub link: InlineFilterField<'a, pandoc::Link>,
    pub image: InlineFilterField<'a, pandoc::Image>,
    pub note: InlineFilterField<'a, pandoc::Note>,
    pub span: InlineFilterField<'a, pandoc::Span>,

    pub paragraph: BlockFilterField<'a, pandoc::Paragraph>,
    pub plain: BlockFilterField<'a, pandoc::Plain>,
    pub code_block: BlockFilterField<'a, pandoc::CodeBlock>,
    pub raw_block: BlockFilterField<'a, pandoc::RawBlock>,
    pub bullet_list: BlockFilterField<'a, pandoc::BulletList>,
    pub ordered_list: BlockFilterField<'a, pandoc::OrderedList>,
    pub block_quote: BlockFilterField<'a, pandoc::BlockQuote>,
    pub div: BlockFilterField<'a, pandoc::Div>,
    pub figure: BlockFilterField<'a, pandoc::Figure>,
    pub line_block: BlockFilterField<'a, pandoc::LineBlock>,
    pub definition_list: BlockFilterField<'a, pandoc::DefinitionList>,
    pub header: BlockFilterField<'a, pandoc::Header>,
    pub table: BlockFilterField<'a, pandoc::Table>,
    pub horizontal_rule: BlockFilterField<'a, pandoc::HorizontalRule>,
}

impl Filter<'static> {
    pub fn new() -> Filter<'static> {
        Self::default()
    }
}

impl<'a> Filter<'a> {
    pub fn with_inline<F>(mut self, f: F) -> Filter<'a>
    where
        F: FnMut(Inline, &mut FilterContext) -> FilterReturn<Inline, Inlines> + 'a,
    {
        self.inline = Some(Box::new(f));
        self
    }

    pub fn with_block<F>(mut self, f: F) -> Filter<'a>
    where
        F: FnMut(Block, &mut FilterContext) -> FilterReturn<Block, Blocks> + 'a,
    {
        self.block = Some(Box::new(f));
        self
    }
}

macro_rules! define_filter_with_methods {
    ($return:ident, $($field:ident),* $(,)?) => {
        impl<'a> Filter<'a> {

            $(
                paste::paste! {
                    pub fn [<with_ $field>]<F>(mut self, filter: F) -> Filter<'a>
                    where
                        F: FnMut(pandoc::[<$field:camel>], &mut FilterContext) -> FilterReturn<pandoc::[<$field:camel>], $return> + 'a,
                    {
                        self.$field = Some(Box::new(filter));
                        self
                    }
                }
            )*
        }
    };
}

define_filter_with_methods!(
    Inlines,
    str,
    emph,
    underline,
    strong,
    strikeout,
    superscript,
    subscript,
    small_caps,
    quoted,
    cite,
    code,
    space,
    soft_break,
    line_break,
    math,
    raw_inline,
    link,
    image,
    note,
    span
);

define_filter_with_methods!(
    Blocks,
    plain,
    paragraph,
    line_block,
    code_block,
    raw_block,
    block_quote,
    ordered_list,
    bullet_list,
    definition_list,
    header,
    horizontal_rule,
    table,
    figure,
    div
);

// Macro to reduce repetition in filter logic
macro_rules! handle_inline_filter {
    ($variant:ident, $value:ident, $filter_field:ident, $filter:expr, $ctx:expr) => {
        if let Some(f) = &mut $filter.$filter_field {
            return inlines_apply_and_maybe_recurse!($value, f, $filter, $ctx);
        } else if let Some(f) = &mut $filter.inline {
            return inlines_apply_and_maybe_recurse!($value.as_inline(), f, $filter, $ctx);
        } else {
            vec![traverse_inline_structure(
                Inline::$variant($value),
                $filter,
                $ctx,
            )]
        }
    };
}

macro_rules! handle_block_filter {
    ($variant:ident, $value:ident, $filter_field:ident, $filter:expr, $ctx:expr) => {
        if let Some(f) = &mut $filter.$filter_field {
            return blocks_apply_and_maybe_recurse!($value, f, $filter, $ctx);
        } else if let Some(f) = &mut $filter.block {
            return blocks_apply_and_maybe_recurse!(Block::$variant($value), f, $filter, $ctx);
        } else {
            vec![traverse_block_structure(
                Block::$variant($value),
                $filter,
                $ctx,
            )]
        }
    };
}

trait InlineFilterableStructure {
    fn filter_structure(self, filter: &mut Filter, ctx: &mut FilterContext) -> Inline;
}

macro_rules! impl_inline_filterable_terminal {
    ($($variant:ident),*) => {
        $(
            impl InlineFilterableStructure for pandoc::$variant {
                fn filter_structure(self, _: &mut Filter, _ctx: &mut FilterContext) -> Inline {
                    Inline::$variant(self)
                }
            }
        )*
    };
}
impl_inline_filterable_terminal!(Str, Code, Space, SoftBreak, LineBreak, Math, RawInline);

macro_rules! impl_inline_filterable_simple {
    ($($variant:ident),*) => {
        $(
            impl InlineFilterableStructure for pandoc::$variant {
                fn filter_structure(self, filter: &mut Filter, ctx: &mut FilterContext) -> Inline {
                    Inline::$variant(pandoc::$variant {
                        content: topdown_traverse_inlines(self.content, filter, ctx),
                        ..self
                    })
                }
            }
        )*
    };
}

impl_inline_filterable_simple!(
    Emph,
    Underline,
    Strong,
    Strikeout,
    Superscript,
    Subscript,
    SmallCaps,
    Quoted,
    Link,
    Image,
    Span
);

impl InlineFilterableStructure for pandoc::Note {
    fn filter_structure(self, filter: &mut Filter, ctx: &mut FilterContext) -> Inline {
        Inline::Note(pandoc::Note {
            content: topdown_traverse_blocks(self.content, filter, ctx),
        })
    }
}

impl InlineFilterableStructure for pandoc::Cite {
    fn filter_structure(self, filter: &mut Filter, ctx: &mut FilterContext) -> Inline {
        Inline::Cite(traverse_cite(self, filter, ctx))
    }
}

impl InlineFilterableStructure for Inline {
    fn filter_structure(self, filter: &mut Filter, ctx: &mut FilterContext) -> Inline {
        traverse_inline_structure(self, filter, ctx)
    }
}

trait BlockFilterableStructure {
    fn filter_structure(self, filter: &mut Filter, ctx: &mut FilterContext) -> Block;
}

macro_rules! impl_block_filterable {
    ($($variant:ident),*) => {
        $(
            impl BlockFilterableStructure for pandoc::$variant {
                fn filter_structure(self, filter: &mut Filter, ctx: &mut FilterContext) -> Block {
                    traverse_block_structure(Block::$variant(self), filter, ctx)
                }
            }
        )*
    };
}
impl_block_filterable!(
    Plain,
    Paragraph,
    LineBlock,
    CodeBlock,
    RawBlock,
    BlockQuote,
    OrderedList,
    BulletList,
    DefinitionList,
    Header,
    HorizontalRule,
    Table,
    Figure,
    Div
);

impl BlockFilterableStructure for Block {
    fn filter_structure(self, filter: &mut Filter, ctx: &mut FilterContext) -> Block {
        traverse_block_structure(self, filter, ctx)
    }
}

macro_rules! inlines_apply_and_maybe_recurse {
    ($item:expr, $filter_fn:expr, $filter:expr, $ctx:expr) => {
        match $filter_fn($item, $ctx) {
            FilterReturn::Unchanged(inline) => vec![inline.filter_structure($filter, $ctx)],
            FilterReturn::FilterResult(new_content, recurse) => {
                if !recurse {
                    new_content
                } else {
                    new_content
                        .into_iter()
                        .map(|inline| traverse_inline_structure(inline, $filter, $ctx))
                        .collect()
                }
            }
        }
    };
}

macro_rules! blocks_apply_and_maybe_recurse {
    ($item:expr, $filter_fn:expr, $filter:expr, $ctx:expr) => {
        match $filter_fn($item, $ctx) {
            FilterReturn::Unchanged(block) => vec![block.filter_structure($filter, $ctx)],
            FilterReturn::FilterResult(new_content, recurse) => {
                if !recurse {
                    new_content
                } else {
                    new_content
                        .into_iter()
                        .map(|block| traverse_block_structure(block, $filter, $ctx))
                        .collect()
                }
            }
        }
    };
}

pub fn topdown_traverse_inline(
    inline: Inline,
    filter: &mut Filter,
    ctx: &mut FilterContext,
) -> Inlines {
    match inline {
        Inline::Str(s) => {
            handle_inline_filter!(Str, s, str, filter, ctx)
        }
        Inline::Emph(e) => {
            handle_inline_filter!(Emph, e, emph, filter, ctx)
        }
        Inline::Underline(u) => {
            handle_inline_filter!(Underline, u, underline, filter, ctx)
        }
        Inline::Strong(sg) => {
            handle_inline_filter!(Strong, sg, strong, filter, ctx)
        }
        Inline::Strikeout(st) => {
            handle_inline_filter!(Strikeout, st, strikeout, filter, ctx)
        }
        Inline::Superscript(sp) => {
            handle_inline_filter!(Superscript, sp, superscript, filter, ctx)
        }
        Inline::Subscript(sb) => {
            handle_inline_filter!(Subscript, sb, subscript, filter, ctx)
        }
        Inline::SmallCaps(sc) => {
            handle_inline_filter!(SmallCaps, sc, small_caps, filter, ctx)
        }
        Inline::Quoted(q) => {
            handle_inline_filter!(Quoted, q, quoted, filter, ctx)
        }
        Inline::Cite(c) => {
            handle_inline_filter!(Cite, c, cite, filter, ctx)
        }
        Inline::Code(co) => {
            handle_inline_filter!(Code, co, code, filter, ctx)
        }
        Inline::Space(sp) => {
            handle_inline_filter!(Space, sp, space, filter, ctx)
        }
        Inline::SoftBreak(sb) => {
            handle_inline_filter!(SoftBreak, sb, soft_break, filter, ctx)
        }
        Inline::LineBreak(lb) => {
            handle_inline_filter!(LineBreak, lb, line_break, filter, ctx)
        }
        Inline::Math(m) => {
            handle_inline_filter!(Math, m, math, filter, ctx)
        }
        Inline::RawInline(ri) => {
            handle_inline_filter!(RawInline, ri, raw_inline, filter, ctx)
        }
        Inline::Link(l) => {
            handle_inline_filter!(Link, l, link, filter, ctx)
        }
        Inline::Image(i) => {
            handle_inline_filter!(Image, i, image, filter, ctx)
        }
        Inline::Note(note) => {
            handle_inline_filter!(Note, note, note, filter, ctx)
        }
        Inline::Span(span) => {
            handle_inline_filter!(Span, span, span, filter, ctx)
        }
    }
}

pub fn topdown_traverse_block(
    block: Block,
    filter: &mut Filter,
    ctx: &mut FilterContext,
) -> Blocks {
    match block {
        Block::Paragraph(para) => {
            handle_block_filter!(Paragraph, para, paragraph, filter, ctx)
        }
        Block::CodeBlock(code) => {
            handle_block_filter!(CodeBlock, code, code_block, filter, ctx)
        }
        Block::RawBlock(raw) => {
            handle_block_filter!(RawBlock, raw, raw_block, filter, ctx)
        }
        Block::BulletList(list) => {
            handle_block_filter!(BulletList, list, bullet_list, filter, ctx)
        }
        Block::OrderedList(list) => {
            handle_block_filter!(OrderedList, list, ordered_list, filter, ctx)
        }
        Block::BlockQuote(quote) => {
            handle_block_filter!(BlockQuote, quote, block_quote, filter, ctx)
        }
        Block::Div(div) => {
            handle_block_filter!(Div, div, div, filter, ctx)
        }
        Block::Figure(figure) => {
            handle_block_filter!(Figure, figure, figure, filter, ctx)
        }
        Block::Plain(plain) => {
            handle_block_filter!(Plain, plain, plain, filter, ctx)
        }
        Block::LineBlock(line_block) => {
            handle_block_filter!(LineBlock, line_block, line_block, filter, ctx)
        }
        Block::DefinitionList(def_list) => {
            handle_block_filter!(DefinitionList, def_list, definition_list, filter, ctx)
        }
        Block::Header(header) => {
            handle_block_filter!(Header, header, header, filter, ctx)
        }
        Block::Table(table) => {
            handle_block_filter!(Table, table, table, filter, ctx)
        }
        Block::HorizontalRule(hr) => {
            handle_block_filter!(HorizontalRule, hr, horizontal_rule, filter, ctx)
        }
    }
}

pub fn topdown_traverse_inlines(
    vec: Inlines,
    filter: &mut Filter,
    ctx: &mut FilterContext,
) -> Inlines {
    let mut result = vec![];
    for inline in vec {
        result.extend(topdown_traverse_inline(inline, filter, ctx));
    }
    result
}

pub fn topdown_traverse_blocks(
    vec: Blocks,
    filter: &mut Filter,
    ctx: &mut FilterContext,
) -> Blocks {
    let mut result = vec![];
    for block in vec {
        result.extend(topdown_traverse_block(block, filter, ctx));
    }
    result
}

fn traverse_cite(cite: pandoc::Cite, filter: &mut Filter, ctx: &mut FilterContext) -> pandoc::Cite {
    pandoc::Cite {
        citations: cite
            .citations
            .into_iter()
            .map(|cit| pandoc::Citation {
                prefix: topdown_traverse_inlines(cit.prefix, filter, ctx),
                suffix: topdown_traverse_inlines(cit.suffix, filter, ctx),
                ..cit
            })
            .collect(),
        content: topdown_traverse_inlines(cite.content, filter, ctx),
    }
}

/// Walk the children of `inline` without applying any callback to it.
pub fn traverse_inline_structure(
    inline: Inline,
    filter: &mut Filter,
    ctx: &mut FilterContext,
) -> Inline {
    match inline {
        // terminal inline types
        Inline::Str(_)
        | Inline::Code(_)
        | Inline::Space(_)
        | Inline::SoftBreak(_)
        | Inline::LineBreak(_)
        | Inline::Math(_)
        | Inline::RawInline(_) => inline,

        Inline::Emph(e) => e.filter_structure(filter, ctx),
        Inline::Underline(u) => u.filter_structure(filter, ctx),
        Inline::Strong(sg) => sg.filter_structure(filter, ctx),
        Inline::Strikeout(st) => st.filter_structure(filter, ctx),
        Inline::Superscript(sp) => sp.filter_structure(filter, ctx),
        Inline::Subscript(sb) => sb.filter_structure(filter, ctx),
        Inline::SmallCaps(sc) => sc.filter_structure(filter, ctx),
        Inline::Quoted(q) => q.filter_structure(filter, ctx),
        Inline::Cite(c) => c.filter_structure(filter, ctx),
        Inline::Link(l) => l.filter_structure(filter, ctx),
        Inline::Image(i) => i.filter_structure(filter, ctx),
        Inline::Note(note) => note.filter_structure(filter, ctx),
        Inline::Span(span) => span.filter_structure(filter, ctx),
    }
}

fn traverse_blocks_vec_nonterminal(
    blocks_vec: Vec<Blocks>,
    filter: &mut Filter,
    ctx: &mut FilterContext,
) -> Vec<Blocks> {
    blocks_vec
        .into_iter()
        .map(|blocks| topdown_traverse_blocks(blocks, filter, ctx))
        .collect()
}

fn traverse_caption(
    caption: pandoc::Caption,
    filter: &mut Filter,
    ctx: &mut FilterContext,
) -> pandoc::Caption {
    pandoc::Caption {
        short: caption
            .short
            .map(|short| topdown_traverse_inlines(short, filter, ctx)),
        long: topdown_traverse_blocks(caption.long, filter, ctx),
    }
}

fn traverse_row(row: pandoc::Row, filter: &mut Filter, ctx: &mut FilterContext) -> pandoc::Row {
    pandoc::Row {
        cells: row
            .cells
            .into_iter()
            .map(|cell| pandoc::Cell {
                content: topdown_traverse_blocks(cell.content, filter, ctx),
                ..cell
            })
            .collect(),
        ..row
    }
}

fn traverse_rows(
    rows: Vec<pandoc::Row>,
    filter: &mut Filter,
    ctx: &mut FilterContext,
) -> Vec<pandoc::Row> {
    rows.into_iter()
        .map(|row| traverse_row(row, filter, ctx))
        .collect()
}

/// Walk the children of `block` without applying any callback to it.
pub fn traverse_block_structure(
    block: Block,
    filter: &mut Filter,
    ctx: &mut FilterContext,
) -> Block {
    match block {
        // terminal block types
        Block::CodeBlock(_) | Block::RawBlock(_) | Block::HorizontalRule(_) => block,

        Block::Plain(plain) => Block::Plain(pandoc::Plain {
            content: topdown_traverse_inlines(plain.content, filter, ctx),
        }),
        Block::Paragraph(para) => Block::Paragraph(pandoc::Paragraph {
            content: topdown_traverse_inlines(para.content, filter, ctx),
        }),
        Block::LineBlock(line_block) => Block::LineBlock(pandoc::LineBlock {
            content: line_block
                .content
                .into_iter()
                .map(|line| topdown_traverse_inlines(line, filter, ctx))
                .collect(),
        }),
        Block::BlockQuote(quote) => Block::BlockQuote(pandoc::BlockQuote {
            content: topdown_traverse_blocks(quote.content, filter, ctx),
        }),
        Block::OrderedList(list) => Block::OrderedList(pandoc::OrderedList {
            content: traverse_blocks_vec_nonterminal(list.content, filter, ctx),
            ..list
        }),
        Block::BulletList(list) => Block::BulletList(pandoc::BulletList {
            content: traverse_blocks_vec_nonterminal(list.content, filter, ctx),
        }),
        Block::DefinitionList(list) => Block::DefinitionList(pandoc::DefinitionList {
            content: list
                .content
                .into_iter()
                .map(|(term, def)| {
                    (
                        topdown_traverse_inlines(term, filter, ctx),
                        traverse_blocks_vec_nonterminal(def, filter, ctx),
                    )
                })
                .collect(),
        }),
        Block::Header(header) => Block::Header(pandoc::Header {
            content: topdown_traverse_inlines(header.content, filter, ctx),
            ..header
        }),
        Block::Table(table) => Block::Table(pandoc::Table {
            caption: traverse_caption(table.caption, filter, ctx),
            head: pandoc::TableHead {
                rows: traverse_rows(table.head.rows, filter, ctx),
                ..table.head
            },
            bodies: table
                .bodies
                .into_iter()
                .map(|table_body| pandoc::TableBody {
                    head: traverse_rows(table_body.head, filter, ctx),
                    body: traverse_rows(table_body.body, filter, ctx),
                    ..table_body
                })
                .collect(),
            foot: pandoc::TableFoot {
                rows: traverse_rows(table.foot.rows, filter, ctx),
                ..table.foot
            },
            ..table
        }),
        Block::Figure(figure) => Block::Figure(pandoc::Figure {
            caption: traverse_caption(figure.caption, filter, ctx),
            content: topdown_traverse_blocks(figure.content, filter, ctx),
            ..figure
        }),
        Block::Div(div) => Block::Div(pandoc::Div {
            content: topdown_traverse_blocks(div.content, filter, ctx),
            ..div
        }),
    }
}

pub fn topdown_traverse_meta_value(
    value: MetaValue,
    filter: &mut Filter,
    ctx: &mut FilterContext,
) -> MetaValue {
    match value {
        MetaValue::MetaMap(entries) => MetaValue::MetaMap(topdown_traverse_meta(entries, filter, ctx)),
        MetaValue::MetaList(items) => MetaValue::MetaList(
            items
                .into_iter()
                .map(|item| topdown_traverse_meta_value(item, filter, ctx))
                .collect(),
        ),
        MetaValue::MetaBlocks(content) => {
            MetaValue::MetaBlocks(topdown_traverse_blocks(content, filter, ctx))
        }
        MetaValue::MetaInlines(content) => {
            MetaValue::MetaInlines(topdown_traverse_inlines(content, filter, ctx))
        }
        value => value,
    }
}

pub fn topdown_traverse_meta(meta: Meta, filter: &mut Filter, ctx: &mut FilterContext) -> Meta {
    meta.into_iter()
        .map(|(key, value)| (key, topdown_traverse_meta_value(value, filter, ctx)))
        .collect()
}

/// Walk the whole document: metadata first, then the body, each in
/// document order with parents before children.
pub fn topdown_traverse(doc: Pandoc, filter: &mut Filter, ctx: &mut FilterContext) -> Pandoc {
    let meta = topdown_traverse_meta(doc.meta, filter, ctx);
    let blocks = topdown_traverse_blocks(doc.blocks, filter, ctx);
    Pandoc {
        api_version: doc.api_version,
        meta,
        blocks,
    }
}
