/*
 * heading_labels.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Appendix-style heading labels.
//!
//! After the appendix marker, top-level headings are lettered ("A", "B", ...)
//! and deeper headings get dotted decimal sublevels under their letter
//! ("A.1", "A.1.2"). A [`HeadingLabeler`] is created once per document and
//! fed headings in document order.

use essay_pandoc_types::{Header, Inline, Space, Str, add_class};

/// Class that tells the renderer not to number a heading itself.
pub const UNNUMBERED_CLASS: &str = "unnumbered";

const ALPHABET_LEN: usize = 26;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    #[error("heading depth must be at least 1, got {0}")]
    InvalidDepth(usize),
    #[error("appendix has more than 26 top-level headings (heading {0} has no letter)")]
    TopLevelOverflow(usize),
    #[error("appendix heading at depth {0} comes before any top-level appendix heading")]
    NoTopLevelHeading(usize),
}

#[derive(Debug, Default, Clone)]
pub struct HeadingLabeler {
    in_appendix: bool,
    // levels[i] counts headings at depth i + 1 since the last shallower one
    levels: Vec<usize>,
}

impl HeadingLabeler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch appendix mode on. It is never switched off again.
    pub fn observe_marker(&mut self) {
        if !self.in_appendix {
            tracing::debug!("Appendix marker observed; labeling subsequent headings");
        }
        self.in_appendix = true;
    }

    pub fn in_appendix(&self) -> bool {
        self.in_appendix
    }

    pub fn levels(&self) -> &[usize] {
        &self.levels
    }

    /// Advance the counters for a heading at `depth` and return its label.
    ///
    /// The counter stack is truncated to `depth` entries, padded with zeros
    /// up to `depth`, and its last entry incremented. Skipped depths
    /// therefore show up as `0` ("A.0.1"). On error the stack is unchanged.
    pub fn label_heading(&mut self, depth: usize) -> Result<String, LabelError> {
        if depth < 1 {
            return Err(LabelError::InvalidDepth(depth));
        }

        let mut levels = self.levels.clone();
        levels.truncate(depth);
        levels.resize(depth, 0);
        if let Some(last) = levels.last_mut() {
            *last += 1;
        }

        let label = to_label(&levels)?;
        self.levels = levels;
        Ok(label)
    }

    /// Label `header` in place: prepend the label and a space to its
    /// content and mark it unnumbered.
    ///
    /// Does nothing before the appendix marker has been observed.
    pub fn label_header(&mut self, header: &mut Header) -> Result<Option<String>, LabelError> {
        if !self.in_appendix {
            return Ok(None);
        }
        let label = self.label_heading(header.level)?;
        header.content.insert(0, Inline::Space(Space));
        header.content.insert(0, Inline::Str(Str::new(label.clone())));
        add_class(&mut header.attr, UNNUMBERED_CLASS);
        tracing::debug!(label = %label, id = %header.attr.0, "Labeled appendix heading");
        Ok(Some(label))
    }
}

/// Render a counter stack as a label, e.g. `[1, 2]` as `"A.2"`.
pub fn to_label(levels: &[usize]) -> Result<String, LabelError> {
    let Some((&top, rest)) = levels.split_first() else {
        return Err(LabelError::InvalidDepth(0));
    };
    if top == 0 {
        return Err(LabelError::NoTopLevelHeading(levels.len()));
    }
    let letter = top_level_letter(top)?;

    let mut label = letter.to_string();
    for n in rest {
        label.push('.');
        label.push_str(&n.to_string());
    }
    Ok(label)
}

fn top_level_letter(n: usize) -> Result<char, LabelError> {
    if n > ALPHABET_LEN {
        return Err(LabelError::TopLevelOverflow(n));
    }
    // n is in 1..=26 here, so the offset fits in a u8
    Ok(char::from(b'A' + (n - 1) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use essay_pandoc_types::{empty_attr, has_class};

    fn labels_for(depths: &[usize]) -> Vec<String> {
        let mut labeler = HeadingLabeler::new();
        labeler.observe_marker();
        depths
            .iter()
            .map(|d| labeler.label_heading(*d).unwrap())
            .collect()
    }

    #[test]
    fn test_mixed_depth_sequence() {
        assert_eq!(labels_for(&[1, 2, 2, 1, 2]), vec!["A", "A.1", "A.2", "B", "B.1"]);
    }

    #[test]
    fn test_skipped_level_pads_with_zero() {
        assert_eq!(labels_for(&[1, 3]), vec!["A", "A.0.1"]);
        assert_eq!(labels_for(&[1, 2, 4]), vec!["A", "A.1", "A.1.0.1"]);
    }

    #[test]
    fn test_subheading_before_any_top_level_heading() {
        let mut labeler = HeadingLabeler::new();
        labeler.observe_marker();
        assert_eq!(labeler.label_heading(2), Err(LabelError::NoTopLevelHeading(2)));
        assert!(labeler.levels().is_empty());
        assert_eq!(labeler.label_heading(1), Ok("A".to_string()));
    }

    #[test]
    fn test_shallower_heading_resets_deeper_counters() {
        insta::assert_snapshot!(
            labels_for(&[1, 2, 3, 3, 2, 3, 1, 3]).join(" "),
            @"A A.1 A.1.1 A.1.2 A.2 A.2.1 B B.0.1"
        );
    }

    #[test]
    fn test_levels_track_last_depth() {
        let mut labeler = HeadingLabeler::new();
        labeler.observe_marker();
        labeler.label_heading(1).unwrap();
        labeler.label_heading(3).unwrap();
        assert_eq!(labeler.levels(), &[1, 0, 1]);
        labeler.label_heading(2).unwrap();
        assert_eq!(labeler.levels(), &[1, 1]);
    }

    #[test]
    fn test_invalid_depth_leaves_stack_alone() {
        let mut labeler = HeadingLabeler::new();
        labeler.observe_marker();
        labeler.label_heading(1).unwrap();
        labeler.label_heading(2).unwrap();
        assert_eq!(labeler.label_heading(0), Err(LabelError::InvalidDepth(0)));
        assert_eq!(labeler.levels(), &[1, 1]);
    }

    #[test]
    fn test_top_level_overflow() {
        let mut labeler = HeadingLabeler::new();
        labeler.observe_marker();
        for _ in 0..25 {
            labeler.label_heading(1).unwrap();
        }
        assert_eq!(labeler.label_heading(1), Ok("Z".to_string()));
        assert_eq!(labeler.label_heading(1), Err(LabelError::TopLevelOverflow(27)));
        assert_eq!(labeler.levels(), &[26]);
        // deeper headings under Z still work
        assert_eq!(labeler.label_heading(2), Ok("Z.1".to_string()));
    }

    #[test]
    fn test_to_label() {
        assert_eq!(to_label(&[1]), Ok("A".to_string()));
        assert_eq!(to_label(&[2, 10, 3]), Ok("B.10.3".to_string()));
        assert_eq!(to_label(&[]), Err(LabelError::InvalidDepth(0)));
        assert_eq!(to_label(&[0, 1]), Err(LabelError::NoTopLevelHeading(2)));
        assert_eq!(to_label(&[27]), Err(LabelError::TopLevelOverflow(27)));
    }

    #[test]
    fn test_label_header_before_marker_is_noop() {
        let mut labeler = HeadingLabeler::new();
        let mut header = Header {
            level: 1,
            attr: empty_attr(),
            content: vec![Inline::Str(Str::new("Intro"))],
        };
        let before = header.clone();
        assert_eq!(labeler.label_header(&mut header), Ok(None));
        assert_eq!(header, before);
        assert!(labeler.levels().is_empty());
    }

    #[test]
    fn test_label_header_prefixes_and_marks_once() {
        let mut labeler = HeadingLabeler::new();
        labeler.observe_marker();
        let mut header = Header {
            level: 1,
            attr: (
                "proofs".to_string(),
                vec![UNNUMBERED_CLASS.to_string()],
                Default::default(),
            ),
            content: vec![Inline::Str(Str::new("Proofs"))],
        };
        assert_eq!(labeler.label_header(&mut header), Ok(Some("A".to_string())));
        assert_eq!(
            header.content,
            vec![
                Inline::Str(Str::new("A")),
                Inline::Space(Space),
                Inline::Str(Str::new("Proofs"))
            ]
        );
        assert_eq!(header.attr.0, "proofs");
        assert_eq!(header.attr.1, vec![UNNUMBERED_CLASS.to_string()]);
        assert!(has_class(&header.attr, UNNUMBERED_CLASS));
    }
}
