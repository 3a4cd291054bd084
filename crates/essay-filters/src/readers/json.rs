/*
 * json.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Reader for the Pandoc JSON AST (pandoc-types 1.23).
 */

use essay_pandoc_types::{
    Alignment, Attr, Block, BlockQuote, BulletList, Caption, Cell, Citation, CitationMode, Cite,
    Code, CodeBlock, ColSpec, ColWidth, DefinitionList, Div, Emph, Figure, Header, HorizontalRule,
    Image, Inline, Inlines, LineBlock, LineBreak, Link, ListAttributes, ListNumberDelim,
    ListNumberStyle, Math, MathType, Meta, MetaValue, Note, OrderedList, Pandoc, Paragraph, Plain,
    QuoteType, Quoted, RawBlock, RawInline, Row, SmallCaps, SoftBreak, Space, Span, Str,
    Strikeout, Strong, Subscript, Superscript, Table, TableBody, TableFoot, TableHead, Target,
    Underline,
};
use hashlink::LinkedHashMap;
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum JsonReadError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Invalid type: {0}")]
    InvalidType(String),
    #[error("Unsupported variant: {0}")]
    UnsupportedVariant(String),
}

type Result<T> = std::result::Result<T, JsonReadError>;

fn invalid(msg: impl Into<String>) -> JsonReadError {
    JsonReadError::InvalidType(msg.into())
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| invalid(format!("Expected object for {}", what)))
}

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| invalid(format!("Expected array for {}", what)))
}

/// An array that must have exactly `len` elements.
fn as_tuple<'a>(value: &'a Value, len: usize, what: &str) -> Result<&'a [Value]> {
    let arr = as_array(value, what)?;
    if arr.len() != len {
        return Err(invalid(format!(
            "{} array must have {} elements",
            what, len
        )));
    }
    Ok(arr)
}

fn as_string(value: &Value, what: &str) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(format!("{} must be string", what)))
}

fn as_int(value: &Value, what: &str) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| invalid(format!("{} must be integer", what)))
}

fn tag<'a>(obj: &'a Map<String, Value>) -> Result<&'a str> {
    obj.get("t")
        .and_then(|v| v.as_str())
        .ok_or_else(|| JsonReadError::MissingField("t".to_string()))
}

fn content<'a>(obj: &'a Map<String, Value>) -> Result<&'a Value> {
    obj.get("c")
        .ok_or_else(|| JsonReadError::MissingField("c".to_string()))
}

/// Read a `{"t": ...}` object that carries only its tag.
fn read_enum_tag<'a>(value: &'a Value, what: &str) -> Result<&'a str> {
    tag(as_object(value, what)?)
}

fn read_attr(value: &Value) -> Result<Attr> {
    let arr = as_tuple(value, 3, "Attr")?;
    let id = as_string(&arr[0], "Attr id")?;
    let classes = as_array(&arr[1], "Attr classes")?
        .iter()
        .map(|v| as_string(v, "Class"))
        .collect::<Result<Vec<_>>>()?;

    let mut kvs = LinkedHashMap::new();
    for kv in as_array(&arr[2], "Attr key-values")? {
        let pair = as_tuple(kv, 2, "Key-value pair")?;
        kvs.insert(as_string(&pair[0], "Key")?, as_string(&pair[1], "Value")?);
    }
    Ok((id, classes, kvs))
}

fn read_target(value: &Value) -> Result<Target> {
    let arr = as_tuple(value, 2, "Target")?;
    Ok((
        as_string(&arr[0], "Target url")?,
        as_string(&arr[1], "Target title")?,
    ))
}

fn read_citation_mode(value: &Value) -> Result<CitationMode> {
    match read_enum_tag(value, "CitationMode")? {
        "NormalCitation" => Ok(CitationMode::NormalCitation),
        "AuthorInText" => Ok(CitationMode::AuthorInText),
        "SuppressAuthor" => Ok(CitationMode::SuppressAuthor),
        t => Err(JsonReadError::UnsupportedVariant(format!(
            "CitationMode: {}",
            t
        ))),
    }
}

fn read_citation(value: &Value) -> Result<Citation> {
    let obj = as_object(value, "Citation")?;
    let field = |name: &str| {
        obj.get(name)
            .ok_or_else(|| JsonReadError::MissingField(name.to_string()))
    };
    Ok(Citation {
        id: as_string(field("citationId")?, "citationId")?,
        prefix: read_inlines(field("citationPrefix")?)?,
        suffix: read_inlines(field("citationSuffix")?)?,
        mode: read_citation_mode(field("citationMode")?)?,
        note_num: as_int(field("citationNoteNum")?, "citationNoteNum")?,
        hash: as_int(field("citationHash")?, "citationHash")?,
    })
}

fn read_quote_type(value: &Value) -> Result<QuoteType> {
    match read_enum_tag(value, "QuoteType")? {
        "SingleQuote" => Ok(QuoteType::SingleQuote),
        "DoubleQuote" => Ok(QuoteType::DoubleQuote),
        t => Err(JsonReadError::UnsupportedVariant(format!(
            "QuoteType: {}",
            t
        ))),
    }
}

fn read_math_type(value: &Value) -> Result<MathType> {
    match read_enum_tag(value, "MathType")? {
        "InlineMath" => Ok(MathType::InlineMath),
        "DisplayMath" => Ok(MathType::DisplayMath),
        t => Err(JsonReadError::UnsupportedVariant(format!("MathType: {}", t))),
    }
}

/// `[attr, inlines]` payload shared by Span.
fn read_attr_inlines(value: &Value, what: &str) -> Result<(Attr, Inlines)> {
    let arr = as_tuple(value, 2, what)?;
    Ok((read_attr(&arr[0])?, read_inlines(&arr[1])?))
}

/// `[format, text]` payload shared by RawInline and RawBlock.
fn read_format_text(value: &Value, what: &str) -> Result<(String, String)> {
    let arr = as_tuple(value, 2, what)?;
    Ok((
        as_string(&arr[0], &format!("{} format", what))?,
        as_string(&arr[1], &format!("{} text", what))?,
    ))
}

fn read_inline(value: &Value) -> Result<Inline> {
    let obj = as_object(value, "Inline")?;
    let t = tag(obj)?;

    match t {
        "Str" => Ok(Inline::Str(Str {
            text: as_string(content(obj)?, "Str content")?,
        })),
        "Space" => Ok(Inline::Space(Space)),
        "SoftBreak" => Ok(Inline::SoftBreak(SoftBreak)),
        "LineBreak" => Ok(Inline::LineBreak(LineBreak)),
        "Emph" => Ok(Inline::Emph(Emph {
            content: read_inlines(content(obj)?)?,
        })),
        "Underline" => Ok(Inline::Underline(Underline {
            content: read_inlines(content(obj)?)?,
        })),
        "Strong" => Ok(Inline::Strong(Strong {
            content: read_inlines(content(obj)?)?,
        })),
        "Strikeout" => Ok(Inline::Strikeout(Strikeout {
            content: read_inlines(content(obj)?)?,
        })),
        "Superscript" => Ok(Inline::Superscript(Superscript {
            content: read_inlines(content(obj)?)?,
        })),
        "Subscript" => Ok(Inline::Subscript(Subscript {
            content: read_inlines(content(obj)?)?,
        })),
        "SmallCaps" => Ok(Inline::SmallCaps(SmallCaps {
            content: read_inlines(content(obj)?)?,
        })),
        "Quoted" => {
            let arr = as_tuple(content(obj)?, 2, "Quoted")?;
            Ok(Inline::Quoted(Quoted {
                quote_type: read_quote_type(&arr[0])?,
                content: read_inlines(&arr[1])?,
            }))
        }
        "Cite" => {
            let arr = as_tuple(content(obj)?, 2, "Cite")?;
            let citations = as_array(&arr[0], "Cite citations")?
                .iter()
                .map(read_citation)
                .collect::<Result<Vec<_>>>()?;
            Ok(Inline::Cite(Cite {
                citations,
                content: read_inlines(&arr[1])?,
            }))
        }
        "Code" => {
            let arr = as_tuple(content(obj)?, 2, "Code")?;
            Ok(Inline::Code(Code {
                attr: read_attr(&arr[0])?,
                text: as_string(&arr[1], "Code text")?,
            }))
        }
        "Math" => {
            let arr = as_tuple(content(obj)?, 2, "Math")?;
            Ok(Inline::Math(Math {
                math_type: read_math_type(&arr[0])?,
                text: as_string(&arr[1], "Math text")?,
            }))
        }
        "RawInline" => {
            let (format, text) = read_format_text(content(obj)?, "RawInline")?;
            Ok(Inline::RawInline(RawInline { format, text }))
        }
        "Link" | "Image" => {
            let arr = as_tuple(content(obj)?, 3, t)?;
            let attr = read_attr(&arr[0])?;
            let content = read_inlines(&arr[1])?;
            let target = read_target(&arr[2])?;
            if t == "Link" {
                Ok(Inline::Link(Link {
                    attr,
                    content,
                    target,
                }))
            } else {
                Ok(Inline::Image(Image {
                    attr,
                    content,
                    target,
                }))
            }
        }
        "Note" => Ok(Inline::Note(Note {
            content: read_blocks(content(obj)?)?,
        })),
        "Span" => {
            let (attr, content) = read_attr_inlines(content(obj)?, "Span")?;
            Ok(Inline::Span(Span { attr, content }))
        }
        _ => Err(JsonReadError::UnsupportedVariant(format!("Inline: {}", t))),
    }
}

fn read_inlines(value: &Value) -> Result<Inlines> {
    as_array(value, "Inlines")?.iter().map(read_inline).collect()
}

fn read_blocks(value: &Value) -> Result<Vec<Block>> {
    as_array(value, "blocks")?.iter().map(read_block).collect()
}

fn read_blockss(value: &Value) -> Result<Vec<Vec<Block>>> {
    as_array(value, "blockss")?.iter().map(read_blocks).collect()
}

fn read_list_attributes(value: &Value) -> Result<ListAttributes> {
    let arr = as_tuple(value, 3, "ListAttributes")?;
    let start = as_int(&arr[0], "ListAttributes start number")?;

    let number_style = match read_enum_tag(&arr[1], "ListNumberStyle")? {
        "DefaultStyle" => ListNumberStyle::Default,
        "Example" => ListNumberStyle::Example,
        "Decimal" => ListNumberStyle::Decimal,
        "LowerRoman" => ListNumberStyle::LowerRoman,
        "UpperRoman" => ListNumberStyle::UpperRoman,
        "LowerAlpha" => ListNumberStyle::LowerAlpha,
        "UpperAlpha" => ListNumberStyle::UpperAlpha,
        t => {
            return Err(JsonReadError::UnsupportedVariant(format!(
                "ListNumberStyle: {}",
                t
            )));
        }
    };

    let number_delimiter = match read_enum_tag(&arr[2], "ListNumberDelim")? {
        "DefaultDelim" => ListNumberDelim::Default,
        "Period" => ListNumberDelim::Period,
        "OneParen" => ListNumberDelim::OneParen,
        "TwoParens" => ListNumberDelim::TwoParens,
        t => {
            return Err(JsonReadError::UnsupportedVariant(format!(
                "ListNumberDelim: {}",
                t
            )));
        }
    };

    Ok((start, number_style, number_delimiter))
}

fn read_caption(value: &Value) -> Result<Caption> {
    let arr = as_tuple(value, 2, "Caption")?;
    let short = if arr[0].is_null() {
        None
    } else {
        Some(read_inlines(&arr[0])?)
    };
    Ok(Caption {
        short,
        long: read_blocks(&arr[1])?,
    })
}

fn read_alignment(value: &Value) -> Result<Alignment> {
    match read_enum_tag(value, "Alignment")? {
        "AlignLeft" => Ok(Alignment::Left),
        "AlignCenter" => Ok(Alignment::Center),
        "AlignRight" => Ok(Alignment::Right),
        "AlignDefault" => Ok(Alignment::Default),
        t => Err(JsonReadError::UnsupportedVariant(format!(
            "Alignment: {}",
            t
        ))),
    }
}

fn read_colwidth(value: &Value) -> Result<ColWidth> {
    let obj = as_object(value, "ColWidth")?;
    match tag(obj)? {
        "ColWidthDefault" => Ok(ColWidth::Default),
        "ColWidth" => {
            let width = content(obj)?
                .as_f64()
                .ok_or_else(|| invalid("ColWidth percentage must be number"))?;
            Ok(ColWidth::Percentage(width))
        }
        t => Err(JsonReadError::UnsupportedVariant(format!("ColWidth: {}", t))),
    }
}

fn read_colspec(value: &Value) -> Result<ColSpec> {
    let arr = as_tuple(value, 2, "ColSpec")?;
    Ok((read_alignment(&arr[0])?, read_colwidth(&arr[1])?))
}

fn read_cell(value: &Value) -> Result<Cell> {
    let arr = as_tuple(value, 5, "Cell")?;
    Ok(Cell {
        attr: read_attr(&arr[0])?,
        alignment: read_alignment(&arr[1])?,
        row_span: as_int(&arr[2], "Cell row_span")?,
        col_span: as_int(&arr[3], "Cell col_span")?,
        content: read_blocks(&arr[4])?,
    })
}

fn read_rows(value: &Value) -> Result<Vec<Row>> {
    as_array(value, "rows")?.iter().map(read_row).collect()
}

fn read_row(value: &Value) -> Result<Row> {
    let arr = as_tuple(value, 2, "Row")?;
    let cells = as_array(&arr[1], "Row cells")?
        .iter()
        .map(read_cell)
        .collect::<Result<Vec<_>>>()?;
    Ok(Row {
        attr: read_attr(&arr[0])?,
        cells,
    })
}

fn read_table_head(value: &Value) -> Result<TableHead> {
    let arr = as_tuple(value, 2, "TableHead")?;
    Ok(TableHead {
        attr: read_attr(&arr[0])?,
        rows: read_rows(&arr[1])?,
    })
}

fn read_table_body(value: &Value) -> Result<TableBody> {
    let arr = as_tuple(value, 4, "TableBody")?;
    Ok(TableBody {
        attr: read_attr(&arr[0])?,
        rowhead_columns: as_int(&arr[1], "TableBody rowhead_columns")?,
        head: read_rows(&arr[2])?,
        body: read_rows(&arr[3])?,
    })
}

fn read_table_foot(value: &Value) -> Result<TableFoot> {
    let arr = as_tuple(value, 2, "TableFoot")?;
    Ok(TableFoot {
        attr: read_attr(&arr[0])?,
        rows: read_rows(&arr[1])?,
    })
}

fn read_table(value: &Value) -> Result<Table> {
    let arr = as_tuple(value, 6, "Table")?;
    let colspec = as_array(&arr[2], "Table colspecs")?
        .iter()
        .map(read_colspec)
        .collect::<Result<Vec<_>>>()?;
    let bodies = as_array(&arr[4], "Table bodies")?
        .iter()
        .map(read_table_body)
        .collect::<Result<Vec<_>>>()?;
    Ok(Table {
        attr: read_attr(&arr[0])?,
        caption: read_caption(&arr[1])?,
        colspec,
        head: read_table_head(&arr[3])?,
        bodies,
        foot: read_table_foot(&arr[5])?,
    })
}

fn read_block(value: &Value) -> Result<Block> {
    let obj = as_object(value, "Block")?;
    let t = tag(obj)?;

    match t {
        "Plain" => Ok(Block::Plain(Plain {
            content: read_inlines(content(obj)?)?,
        })),
        "Para" => Ok(Block::Paragraph(Paragraph {
            content: read_inlines(content(obj)?)?,
        })),
        "LineBlock" => {
            let lines = as_array(content(obj)?, "LineBlock")?
                .iter()
                .map(read_inlines)
                .collect::<Result<Vec<_>>>()?;
            Ok(Block::LineBlock(LineBlock { content: lines }))
        }
        "CodeBlock" => {
            let arr = as_tuple(content(obj)?, 2, "CodeBlock")?;
            Ok(Block::CodeBlock(CodeBlock {
                attr: read_attr(&arr[0])?,
                text: as_string(&arr[1], "CodeBlock text")?,
            }))
        }
        "RawBlock" => {
            let (format, text) = read_format_text(content(obj)?, "RawBlock")?;
            Ok(Block::RawBlock(RawBlock { format, text }))
        }
        "BlockQuote" => Ok(Block::BlockQuote(BlockQuote {
            content: read_blocks(content(obj)?)?,
        })),
        "OrderedList" => {
            let arr = as_tuple(content(obj)?, 2, "OrderedList")?;
            Ok(Block::OrderedList(OrderedList {
                attr: read_list_attributes(&arr[0])?,
                content: read_blockss(&arr[1])?,
            }))
        }
        "BulletList" => Ok(Block::BulletList(BulletList {
            content: read_blockss(content(obj)?)?,
        })),
        "DefinitionList" => {
            let items = as_array(content(obj)?, "DefinitionList")?
                .iter()
                .map(|item| {
                    let pair = as_tuple(item, 2, "DefinitionList item")?;
                    Ok((read_inlines(&pair[0])?, read_blockss(&pair[1])?))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Block::DefinitionList(DefinitionList { content: items }))
        }
        "Header" => {
            let arr = as_tuple(content(obj)?, 3, "Header")?;
            let level = as_int(&arr[0], "Header level")?;
            let level = usize::try_from(level)
                .map_err(|_| invalid(format!("Header level must be non-negative, got {}", level)))?;
            Ok(Block::Header(Header {
                level,
                attr: read_attr(&arr[1])?,
                content: read_inlines(&arr[2])?,
            }))
        }
        "HorizontalRule" => Ok(Block::HorizontalRule(HorizontalRule)),
        "Table" => Ok(Block::Table(read_table(content(obj)?)?)),
        "Figure" => {
            let arr = as_tuple(content(obj)?, 3, "Figure")?;
            Ok(Block::Figure(Figure {
                attr: read_attr(&arr[0])?,
                caption: read_caption(&arr[1])?,
                content: read_blocks(&arr[2])?,
            }))
        }
        "Div" => {
            let arr = as_tuple(content(obj)?, 2, "Div")?;
            Ok(Block::Div(Div {
                attr: read_attr(&arr[0])?,
                content: read_blocks(&arr[1])?,
            }))
        }
        _ => Err(JsonReadError::UnsupportedVariant(format!("Block: {}", t))),
    }
}

fn read_meta_value(value: &Value) -> Result<MetaValue> {
    let obj = as_object(value, "MetaValue")?;
    let t = tag(obj)?;

    match t {
        "MetaString" => Ok(MetaValue::MetaString(as_string(
            content(obj)?,
            "MetaString content",
        )?)),
        "MetaBool" => content(obj)?
            .as_bool()
            .map(MetaValue::MetaBool)
            .ok_or_else(|| invalid("MetaBool content must be boolean")),
        "MetaInlines" => Ok(MetaValue::MetaInlines(read_inlines(content(obj)?)?)),
        "MetaBlocks" => Ok(MetaValue::MetaBlocks(read_blocks(content(obj)?)?)),
        "MetaList" => Ok(MetaValue::MetaList(
            as_array(content(obj)?, "MetaList")?
                .iter()
                .map(read_meta_value)
                .collect::<Result<Vec<_>>>()?,
        )),
        "MetaMap" => Ok(MetaValue::MetaMap(read_meta(content(obj)?)?)),
        _ => Err(JsonReadError::UnsupportedVariant(format!(
            "MetaValue: {}",
            t
        ))),
    }
}

fn read_meta(value: &Value) -> Result<Meta> {
    as_object(value, "Meta")?
        .iter()
        .map(|(key, value)| Ok((key.clone(), read_meta_value(value)?)))
        .collect()
}

fn read_api_version(value: &Value) -> Result<Vec<u64>> {
    as_array(value, "pandoc-api-version")?
        .iter()
        .map(|v| {
            v.as_u64()
                .ok_or_else(|| invalid("pandoc-api-version entries must be non-negative integers"))
        })
        .collect()
}

pub fn read_value(value: &Value) -> Result<Pandoc> {
    let obj = as_object(value, "Pandoc")?;

    let api_version = read_api_version(
        obj.get("pandoc-api-version")
            .ok_or_else(|| JsonReadError::MissingField("pandoc-api-version".to_string()))?,
    )?;
    let meta = read_meta(
        obj.get("meta")
            .ok_or_else(|| JsonReadError::MissingField("meta".to_string()))?,
    )?;
    let blocks = read_blocks(
        obj.get("blocks")
            .ok_or_else(|| JsonReadError::MissingField("blocks".to_string()))?,
    )?;

    let pandoc = Pandoc {
        api_version,
        meta,
        blocks,
    };
    if !pandoc.is_supported_api_version() {
        tracing::warn!(
            api_version = ?pandoc.api_version,
            expected = ?essay_pandoc_types::API_VERSION,
            "Pandoc API version differs from the one these filters were written against"
        );
    }
    Ok(pandoc)
}

pub fn read<R: std::io::Read>(reader: &mut R) -> Result<Pandoc> {
    let json: Value = serde_json::from_reader(reader)?;
    read_value(&json)
}
