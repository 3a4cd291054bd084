/*
 * test_json_roundtrip.rs
 * Copyright (c) 2025 Posit, PBC
 */

use essay_filters::{readers, writers};
use serde_json::{Value, json};

fn roundtrip(value: &Value) -> Value {
    let pandoc = readers::json::read_value(value).expect("Failed to read JSON");
    writers::json::write_value(&pandoc)
}

fn attr(id: &str) -> Value {
    json!([id, ["c1", "c2"], [["k1", "v1"], ["k2", "v2"]]])
}

#[test]
fn test_json_roundtrip_all_inlines() {
    let inlines = json!([
        {"t": "Str", "c": "s"},
        {"t": "Emph", "c": [{"t": "Str", "c": "e"}]},
        {"t": "Underline", "c": []},
        {"t": "Strong", "c": []},
        {"t": "Strikeout", "c": []},
        {"t": "Superscript", "c": []},
        {"t": "Subscript", "c": []},
        {"t": "SmallCaps", "c": []},
        {"t": "Quoted", "c": [{"t": "DoubleQuote"}, [{"t": "Str", "c": "q"}]]},
        {"t": "Quoted", "c": [{"t": "SingleQuote"}, []]},
        {"t": "Cite", "c": [[{
            "citationId": "knuth",
            "citationPrefix": [{"t": "Str", "c": "see"}],
            "citationSuffix": [],
            "citationMode": {"t": "NormalCitation"},
            "citationNoteNum": 1,
            "citationHash": 0
        }], [{"t": "Str", "c": "[@knuth]"}]]},
        {"t": "Code", "c": [attr("code"), "x + 1"]},
        {"t": "Space"},
        {"t": "SoftBreak"},
        {"t": "LineBreak"},
        {"t": "Math", "c": [{"t": "InlineMath"}, "e^x"]},
        {"t": "Math", "c": [{"t": "DisplayMath"}, "\\int"]},
        {"t": "RawInline", "c": ["tex", "\\todo{x}"]},
        {"t": "Link", "c": [attr(""), [{"t": "Str", "c": "l"}], ["https://example.com", "title"]]},
        {"t": "Image", "c": [attr("img"), [], ["a.png", ""]]},
        {"t": "Note", "c": [{"t": "Para", "c": [{"t": "Str", "c": "n"}]}]},
        {"t": "Span", "c": [attr("sp"), [{"t": "Str", "c": "sp"}]]}
    ]);
    let doc = json!({
        "pandoc-api-version": [1, 23, 1],
        "meta": {},
        "blocks": [{"t": "Para", "c": inlines}]
    });
    assert_eq!(roundtrip(&doc), doc);
}

#[test]
fn test_json_roundtrip_all_blocks() {
    let cell = json!([attr(""), {"t": "AlignDefault"}, 1, 1, [{"t": "Plain", "c": [{"t": "Str", "c": "cell"}]}]]);
    let row = json!([["", [], []], [cell]]);
    let doc = json!({
        "pandoc-api-version": [1, 23, 1],
        "meta": {},
        "blocks": [
            {"t": "Plain", "c": [{"t": "Str", "c": "p"}]},
            {"t": "LineBlock", "c": [[{"t": "Str", "c": "l1"}], [{"t": "Str", "c": "l2"}]]},
            {"t": "CodeBlock", "c": [attr("cb"), "fn main() {}"]},
            {"t": "RawBlock", "c": ["html", "<hr/>"]},
            {"t": "BlockQuote", "c": [{"t": "Para", "c": []}]},
            {"t": "OrderedList", "c": [[3, {"t": "LowerRoman"}, {"t": "TwoParens"}], [[{"t": "Plain", "c": []}]]]},
            {"t": "BulletList", "c": [[{"t": "Plain", "c": []}], []]},
            {"t": "DefinitionList", "c": [[[{"t": "Str", "c": "term"}], [[{"t": "Para", "c": []}]]]]},
            {"t": "Header", "c": [2, attr("h"), [{"t": "Str", "c": "h"}]]},
            {"t": "HorizontalRule"},
            {"t": "Table", "c": [
                attr("tbl"),
                [null, [{"t": "Plain", "c": [{"t": "Str", "c": "cap"}]}]],
                [[{"t": "AlignLeft"}, {"t": "ColWidth", "c": 0.5}], [{"t": "AlignRight"}, {"t": "ColWidthDefault"}]],
                [["", [], []], [row.clone()]],
                [[["", [], []], 0, [], [row.clone()]]],
                [["", [], []], []]
            ]},
            {"t": "Figure", "c": [
                attr("fig"),
                [[{"t": "Str", "c": "short"}], [{"t": "Plain", "c": [{"t": "Str", "c": "long"}]}]],
                [{"t": "Plain", "c": []}]
            ]},
            {"t": "Div", "c": [attr("d"), [{"t": "HorizontalRule"}]]}
        ]
    });
    assert_eq!(roundtrip(&doc), doc);
}

#[test]
fn test_json_roundtrip_meta_preserves_key_order() {
    let doc = json!({
        "pandoc-api-version": [1, 23, 1],
        "meta": {
            "title": {"t": "MetaInlines", "c": [{"t": "Str", "c": "Essay"}]},
            "draft": {"t": "MetaBool", "c": true},
            "authors": {"t": "MetaList", "c": [{"t": "MetaString", "c": "A"}]},
            "abstract": {"t": "MetaBlocks", "c": [{"t": "Para", "c": []}]},
            "essay-filters": {"t": "MetaMap", "c": {"z": {"t": "MetaBool", "c": false}, "a": {"t": "MetaString", "c": ""}}}
        },
        "blocks": []
    });
    let written = serde_json::to_string(&roundtrip(&doc)).unwrap();
    assert_eq!(written, serde_json::to_string(&doc).unwrap());
}

#[test]
fn test_json_roundtrip_preserves_attribute_order() {
    let doc = json!({
        "pandoc-api-version": [1, 23, 1],
        "meta": {},
        "blocks": [{"t": "Div", "c": [["", ["z", "a", "m"], [["zz", "1"], ["aa", "2"]]], []]}]
    });
    let written = serde_json::to_string(&roundtrip(&doc)).unwrap();
    assert_eq!(written, serde_json::to_string(&doc).unwrap());
}

#[test]
fn test_json_roundtrip_through_bytes() {
    let text = r#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[{"t":"Para","c":[{"t":"Str","c":"Hi"},{"t":"Space"},{"t":"Str","c":"there"}]}]}"#;
    let pandoc = readers::json::read(&mut text.as_bytes()).unwrap();
    let mut out = Vec::new();
    writers::json::write(&pandoc, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), text);
}
