/*
 * json.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Writer for the Pandoc JSON AST (pandoc-types 1.23).
 */

use essay_pandoc_types::{
    Alignment, Attr, Block, Caption, Cell, Citation, CitationMode, ColSpec, ColWidth, Inline,
    ListAttributes, ListNumberDelim, ListNumberStyle, MathType, Meta, MetaValue, Pandoc,
    QuoteType, Row, Table, TableBody, TableFoot, TableHead, Target,
};
use serde_json::{Map, Value, json};

fn write_attr(attr: &Attr) -> Value {
    let kvs: Vec<Value> = attr.2.iter().map(|(k, v)| json!([k, v])).collect();
    json!([attr.0, attr.1, kvs])
}

fn write_target(target: &Target) -> Value {
    json!([target.0, target.1])
}

fn write_citation_mode(mode: &CitationMode) -> Value {
    let tag = match mode {
        CitationMode::NormalCitation => "NormalCitation",
        CitationMode::AuthorInText => "AuthorInText",
        CitationMode::SuppressAuthor => "SuppressAuthor",
    };
    json!({ "t": tag })
}

fn write_citation(citation: &Citation) -> Value {
    json!({
        "citationId": citation.id,
        "citationPrefix": write_inlines(&citation.prefix),
        "citationSuffix": write_inlines(&citation.suffix),
        "citationMode": write_citation_mode(&citation.mode),
        "citationNoteNum": citation.note_num,
        "citationHash": citation.hash,
    })
}

fn tagged(t: &str, c: Value) -> Value {
    json!({ "t": t, "c": c })
}

fn write_inline(inline: &Inline) -> Value {
    match inline {
        Inline::Str(s) => tagged("Str", json!(s.text)),
        Inline::Space(_) => json!({ "t": "Space" }),
        Inline::SoftBreak(_) => json!({ "t": "SoftBreak" }),
        Inline::LineBreak(_) => json!({ "t": "LineBreak" }),
        Inline::Emph(e) => tagged("Emph", write_inlines(&e.content)),
        Inline::Underline(u) => tagged("Underline", write_inlines(&u.content)),
        Inline::Strong(s) => tagged("Strong", write_inlines(&s.content)),
        Inline::Strikeout(s) => tagged("Strikeout", write_inlines(&s.content)),
        Inline::Superscript(s) => tagged("Superscript", write_inlines(&s.content)),
        Inline::Subscript(s) => tagged("Subscript", write_inlines(&s.content)),
        Inline::SmallCaps(s) => tagged("SmallCaps", write_inlines(&s.content)),
        Inline::Quoted(q) => {
            let quote_type = match q.quote_type {
                QuoteType::SingleQuote => "SingleQuote",
                QuoteType::DoubleQuote => "DoubleQuote",
            };
            tagged(
                "Quoted",
                json!([{ "t": quote_type }, write_inlines(&q.content)]),
            )
        }
        Inline::Cite(c) => {
            let citations: Vec<Value> = c.citations.iter().map(write_citation).collect();
            tagged("Cite", json!([citations, write_inlines(&c.content)]))
        }
        Inline::Code(c) => tagged("Code", json!([write_attr(&c.attr), c.text])),
        Inline::Math(m) => {
            let math_type = match m.math_type {
                MathType::InlineMath => "InlineMath",
                MathType::DisplayMath => "DisplayMath",
            };
            tagged("Math", json!([{ "t": math_type }, m.text]))
        }
        Inline::RawInline(raw) => tagged("RawInline", json!([raw.format, raw.text])),
        Inline::Link(link) => tagged(
            "Link",
            json!([
                write_attr(&link.attr),
                write_inlines(&link.content),
                write_target(&link.target)
            ]),
        ),
        Inline::Image(image) => tagged(
            "Image",
            json!([
                write_attr(&image.attr),
                write_inlines(&image.content),
                write_target(&image.target)
            ]),
        ),
        Inline::Note(note) => tagged("Note", write_blocks(&note.content)),
        Inline::Span(span) => tagged(
            "Span",
            json!([write_attr(&span.attr), write_inlines(&span.content)]),
        ),
    }
}

fn write_inlines(inlines: &[Inline]) -> Value {
    Value::Array(inlines.iter().map(write_inline).collect())
}

fn write_blocks(blocks: &[Block]) -> Value {
    Value::Array(blocks.iter().map(write_block).collect())
}

fn write_blockss(items: &[Vec<Block>]) -> Value {
    Value::Array(items.iter().map(|b| write_blocks(b)).collect())
}

fn write_list_attributes(attr: &ListAttributes) -> Value {
    let number_style = match attr.1 {
        ListNumberStyle::Default => "DefaultStyle",
        ListNumberStyle::Example => "Example",
        ListNumberStyle::Decimal => "Decimal",
        ListNumberStyle::LowerRoman => "LowerRoman",
        ListNumberStyle::UpperRoman => "UpperRoman",
        ListNumberStyle::LowerAlpha => "LowerAlpha",
        ListNumberStyle::UpperAlpha => "UpperAlpha",
    };
    let number_delimiter = match attr.2 {
        ListNumberDelim::Default => "DefaultDelim",
        ListNumberDelim::Period => "Period",
        ListNumberDelim::OneParen => "OneParen",
        ListNumberDelim::TwoParens => "TwoParens",
    };
    json!([attr.0, { "t": number_style }, { "t": number_delimiter }])
}

fn write_caption(caption: &Caption) -> Value {
    let short = match &caption.short {
        Some(inlines) => write_inlines(inlines),
        None => Value::Null,
    };
    json!([short, write_blocks(&caption.long)])
}

fn write_alignment(alignment: &Alignment) -> Value {
    let tag = match alignment {
        Alignment::Left => "AlignLeft",
        Alignment::Center => "AlignCenter",
        Alignment::Right => "AlignRight",
        Alignment::Default => "AlignDefault",
    };
    json!({ "t": tag })
}

fn write_colspec(colspec: &ColSpec) -> Value {
    let width = match colspec.1 {
        ColWidth::Default => json!({ "t": "ColWidthDefault" }),
        ColWidth::Percentage(p) => tagged("ColWidth", json!(p)),
    };
    json!([write_alignment(&colspec.0), width])
}

fn write_cell(cell: &Cell) -> Value {
    json!([
        write_attr(&cell.attr),
        write_alignment(&cell.alignment),
        cell.row_span,
        cell.col_span,
        write_blocks(&cell.content)
    ])
}

fn write_row(row: &Row) -> Value {
    let cells: Vec<Value> = row.cells.iter().map(write_cell).collect();
    json!([write_attr(&row.attr), cells])
}

fn write_rows(rows: &[Row]) -> Value {
    Value::Array(rows.iter().map(write_row).collect())
}

fn write_table_head(head: &TableHead) -> Value {
    json!([write_attr(&head.attr), write_rows(&head.rows)])
}

fn write_table_body(body: &TableBody) -> Value {
    json!([
        write_attr(&body.attr),
        body.rowhead_columns,
        write_rows(&body.head),
        write_rows(&body.body)
    ])
}

fn write_table_foot(foot: &TableFoot) -> Value {
    json!([write_attr(&foot.attr), write_rows(&foot.rows)])
}

fn write_table(table: &Table) -> Value {
    let colspecs: Vec<Value> = table.colspec.iter().map(write_colspec).collect();
    let bodies: Vec<Value> = table.bodies.iter().map(write_table_body).collect();
    json!([
        write_attr(&table.attr),
        write_caption(&table.caption),
        colspecs,
        write_table_head(&table.head),
        bodies,
        write_table_foot(&table.foot)
    ])
}

fn write_block(block: &Block) -> Value {
    match block {
        Block::Plain(plain) => tagged("Plain", write_inlines(&plain.content)),
        Block::Paragraph(para) => tagged("Para", write_inlines(&para.content)),
        Block::LineBlock(lineblock) => {
            let lines: Vec<Value> = lineblock.content.iter().map(|l| write_inlines(l)).collect();
            tagged("LineBlock", json!(lines))
        }
        Block::CodeBlock(codeblock) => tagged(
            "CodeBlock",
            json!([write_attr(&codeblock.attr), codeblock.text]),
        ),
        Block::RawBlock(raw) => tagged("RawBlock", json!([raw.format, raw.text])),
        Block::BlockQuote(quote) => tagged("BlockQuote", write_blocks(&quote.content)),
        Block::OrderedList(list) => tagged(
            "OrderedList",
            json!([
                write_list_attributes(&list.attr),
                write_blockss(&list.content)
            ]),
        ),
        Block::BulletList(list) => tagged("BulletList", write_blockss(&list.content)),
        Block::DefinitionList(list) => {
            let items: Vec<Value> = list
                .content
                .iter()
                .map(|(term, defs)| json!([write_inlines(term), write_blockss(defs)]))
                .collect();
            tagged("DefinitionList", json!(items))
        }
        Block::Header(header) => tagged(
            "Header",
            json!([
                header.level,
                write_attr(&header.attr),
                write_inlines(&header.content)
            ]),
        ),
        Block::HorizontalRule(_) => json!({ "t": "HorizontalRule" }),
        Block::Table(table) => tagged("Table", write_table(table)),
        Block::Figure(figure) => tagged(
            "Figure",
            json!([
                write_attr(&figure.attr),
                write_caption(&figure.caption),
                write_blocks(&figure.content)
            ]),
        ),
        Block::Div(div) => tagged(
            "Div",
            json!([write_attr(&div.attr), write_blocks(&div.content)]),
        ),
    }
}

fn write_meta_value(value: &MetaValue) -> Value {
    match value {
        MetaValue::MetaString(s) => tagged("MetaString", json!(s)),
        MetaValue::MetaBool(b) => tagged("MetaBool", json!(b)),
        MetaValue::MetaInlines(inlines) => tagged("MetaInlines", write_inlines(inlines)),
        MetaValue::MetaBlocks(blocks) => tagged("MetaBlocks", write_blocks(blocks)),
        MetaValue::MetaList(items) => tagged(
            "MetaList",
            Value::Array(items.iter().map(write_meta_value).collect()),
        ),
        MetaValue::MetaMap(map) => tagged("MetaMap", write_meta(map)),
    }
}

fn write_meta(meta: &Meta) -> Value {
    let mut obj = Map::new();
    for (key, value) in meta {
        obj.insert(key.clone(), write_meta_value(value));
    }
    Value::Object(obj)
}

pub fn write_value(pandoc: &Pandoc) -> Value {
    json!({
        "pandoc-api-version": pandoc.api_version,
        "meta": write_meta(&pandoc.meta),
        "blocks": write_blocks(&pandoc.blocks),
    })
}

pub fn write<W: std::io::Write>(pandoc: &Pandoc, writer: &mut W) -> serde_json::Result<()> {
    serde_json::to_writer(writer, &write_value(pandoc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers;
    use essay_pandoc_types::{Header, RawInline, Space, Str, empty_attr};

    #[test]
    fn test_content_less_nodes_omit_c() {
        assert_eq!(write_inline(&Inline::Space(Space)), json!({"t": "Space"}));
        assert_eq!(
            write_block(&Block::HorizontalRule(essay_pandoc_types::HorizontalRule)),
            json!({"t": "HorizontalRule"})
        );
    }

    #[test]
    fn test_write_header() {
        let header = Block::Header(Header {
            level: 1,
            attr: empty_attr(),
            content: vec![Inline::Str(Str::new("A")), Inline::Space(Space)],
        });
        assert_eq!(
            write_block(&header),
            json!({"t": "Header", "c": [1, ["", [], []], [{"t": "Str", "c": "A"}, {"t": "Space"}]]})
        );
    }

    #[test]
    fn test_write_raw_inline() {
        let raw = Inline::RawInline(RawInline::new("html", "<aside>x</aside>"));
        assert_eq!(
            write_inline(&raw),
            json!({"t": "RawInline", "c": ["html", "<aside>x</aside>"]})
        );
    }

    #[test]
    fn test_api_version_is_echoed() {
        let value = json!({"pandoc-api-version": [1, 22, 2, 1], "meta": {}, "blocks": []});
        let pandoc = readers::json::read_value(&value).unwrap();
        assert_eq!(write_value(&pandoc), value);
    }

    #[test]
    fn test_default_list_attributes_round_trip() {
        let value = json!({
            "pandoc-api-version": [1, 23, 1],
            "meta": {},
            "blocks": [{"t": "OrderedList", "c": [
                [1, {"t": "DefaultStyle"}, {"t": "DefaultDelim"}],
                [[{"t": "Plain", "c": [{"t": "Str", "c": "x"}]}]]
            ]}]
        });
        let pandoc = readers::json::read_value(&value).unwrap();
        assert_eq!(write_value(&pandoc), value);
    }
}
