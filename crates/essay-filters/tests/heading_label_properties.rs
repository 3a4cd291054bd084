/*
 * heading_label_properties.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Property tests for appendix heading labels.
 */

use essay_filters::heading_labels::{HeadingLabeler, to_label};
use essay_pandoc_types::{Header, Inline, Str, empty_attr};
use proptest::prelude::*;

fn labeler() -> HeadingLabeler {
    let mut labeler = HeadingLabeler::new();
    labeler.observe_marker();
    labeler
}

fn letter(label: &str) -> char {
    label.chars().next().unwrap()
}

// Depth sequences that open with a top-level heading and leave room for
// one more before running out of letters.
fn depths() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..=6, 0..60)
        .prop_map(|mut ds| {
            ds.insert(0, 1);
            ds
        })
        .prop_filter("at most 25 top-level headings", |ds| {
            ds.iter().filter(|d| **d == 1).count() <= 25
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn stack_length_matches_last_depth(ds in depths()) {
        let mut labeler = labeler();
        for d in &ds {
            labeler.label_heading(*d).unwrap();
            prop_assert_eq!(labeler.levels().len(), *d);
        }
    }

    #[test]
    fn label_has_one_component_per_depth(ds in depths()) {
        let mut labeler = labeler();
        for d in &ds {
            let label = labeler.label_heading(*d).unwrap();
            prop_assert_eq!(label.split('.').count(), *d);
            prop_assert_eq!(to_label(labeler.levels()).unwrap(), label);
        }
    }

    #[test]
    fn letter_advances_only_at_depth_one(ds in depths()) {
        let mut labeler = labeler();
        let mut current: Option<char> = None;
        for d in &ds {
            let l = letter(&labeler.label_heading(*d).unwrap());
            if *d == 1 {
                let expected = match current {
                    None => 'A',
                    Some(c) => char::from(c as u8 + 1),
                };
                prop_assert_eq!(l, expected);
                current = Some(l);
            } else {
                prop_assert_eq!(Some(l), current);
            }
        }
    }

    #[test]
    fn deeper_counters_reset_after_shallower_heading(
        prefix in depths(),
        shallow in 1usize..=3,
        extra in 1usize..=3,
    ) {
        let mut labeler = labeler();
        for d in &prefix {
            labeler.label_heading(*d).unwrap();
        }
        labeler.label_heading(shallow).unwrap();
        let label = labeler.label_heading(shallow + extra).unwrap();
        // every component deeper than `shallow` restarts: zeros then a final 1
        let components: Vec<&str> = label.split('.').collect();
        prop_assert_eq!(components[components.len() - 1], "1");
        for c in &components[shallow..components.len() - 1] {
            prop_assert_eq!(*c, "0");
        }
    }

    #[test]
    fn unnumbered_is_added_once(times in 1usize..5) {
        let mut labeler = labeler();
        let mut header = Header {
            level: 1,
            attr: empty_attr(),
            content: vec![Inline::Str(Str::new("X"))],
        };
        for _ in 0..times {
            labeler.label_header(&mut header).unwrap();
        }
        let count = header.attr.1.iter().filter(|c| *c == "unnumbered").count();
        prop_assert_eq!(count, 1);
        // the original text is kept as the last inline
        prop_assert_eq!(header.content.last(), Some(&Inline::Str(Str::new("X"))));
        prop_assert_eq!(header.content.len(), 1 + 2 * times);
    }

    #[test]
    fn nothing_is_labeled_before_the_marker(ds in depths()) {
        let mut labeler = HeadingLabeler::new();
        for d in &ds {
            let mut header = Header {
                level: *d,
                attr: empty_attr(),
                content: vec![],
            };
            prop_assert_eq!(labeler.label_header(&mut header), Ok(None));
            prop_assert!(header.content.is_empty());
            prop_assert!(header.attr.1.is_empty());
        }
        prop_assert!(labeler.levels().is_empty());
    }
}
