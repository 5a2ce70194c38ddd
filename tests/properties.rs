// Property tests for the invariants summaries and selections rely on

use kirinuki::config::{SummarizeConfig, WeightsConfig};
use kirinuki::text::FragmentBuilder;
use kirinuki::{
    DenseTextTree, LineNumberStyle, OffsetRange, SummarizeOptions, SummarizeSettings,
    SupportedLanguage, TextEdit, adjust_selection, parse_document, parse_document_named,
    summarize_one,
};
use proptest::prelude::*;

fn rust_like_text() -> impl Strategy<Value = String> {
    "[a-z(){};=: \n]{0,120}"
}

fn line_number_style() -> impl Strategy<Value = LineNumberStyle> {
    prop_oneof![
        Just(LineNumberStyle::None),
        Just(LineNumberStyle::OmittedRanges),
        Just(LineNumberStyle::Full),
    ]
}

fn weights_config() -> impl Strategy<Value = WeightsConfig> {
    (
        proptest::option::of(0.0f64..200.0),
        proptest::option::of(0.0f64..10.0),
        proptest::option::of(0.0f64..50.0),
        proptest::option::of(1.0f64..5.0),
    )
        .prop_map(|(scope, depth, distance, below_selection_multiplier)| WeightsConfig {
            scope,
            depth,
            distance,
            below_selection_multiplier,
        })
}

fn summarize_config() -> impl Strategy<Value = SummarizeConfig> {
    (
        proptest::option::of(0usize..10_000),
        proptest::option::of(weights_config()),
        proptest::option::of(any::<bool>()),
        proptest::option::of(any::<bool>()),
        proptest::option::of(line_number_style()),
        proptest::option::of("[.…]{1,3}"),
    )
        .prop_map(
            |(budget, weights, preserve, always_ellipsis, style, ellipsis)| SummarizeConfig {
                budget,
                weights,
                preserve_type_checking: preserve,
                import_kind_pattern: None,
                always_ellipsis_for_elisions: always_ellipsis,
                line_number_style: style,
                ellipsis,
            },
        )
}

proptest! {
    #[test]
    fn prop_dense_leaves_cover_the_document(text in rust_like_text()) {
        let overlay = parse_document(&text, SupportedLanguage::Rust).unwrap();
        let tree = DenseTextTree::build(&text, Some(&overlay)).unwrap();

        let mut cursor = 0;
        for leaf in tree.leaves() {
            let range = tree.node(leaf).range;
            prop_assert_eq!(range.start, cursor);
            prop_assert!(!range.is_empty() || text.is_empty());
            cursor = range.end;
        }
        prop_assert_eq!(cursor, text.len());
    }

    #[test]
    fn prop_summary_respects_budget(
        text in rust_like_text(),
        budget in 0usize..160,
        style in line_number_style(),
    ) {
        let overlay = parse_document(&text, SupportedLanguage::Rust).unwrap();
        let options = SummarizeOptions::new(SummarizeSettings {
            line_number_style: style,
            ..Default::default()
        });
        let projected = summarize_one(&text, Some(&overlay), None, budget, &options).unwrap();
        prop_assert!(projected.text().chars().count() <= budget);
    }

    #[test]
    fn prop_summary_grows_with_budget(
        text in rust_like_text(),
        budget in 0usize..160,
        extra in 0usize..80,
        selection in proptest::option::of((0usize..120, 0usize..20)),
    ) {
        let overlay = parse_document(&text, SupportedLanguage::Rust).unwrap();
        let selection = selection.map(|(start, len)| {
            let start = start.min(text.len());
            OffsetRange::new(start, (start + len).min(text.len()))
        });
        let options = SummarizeOptions::default();
        let smaller = summarize_one(&text, Some(&overlay), selection, budget, &options).unwrap();
        let larger =
            summarize_one(&text, Some(&overlay), selection, budget + extra, &options).unwrap();
        prop_assert!(
            smaller.text().chars().count() <= larger.text().chars().count(),
            "{:?} is longer than {:?}",
            smaller.text(),
            larger.text()
        );
    }

    #[test]
    fn prop_offsets_outside_replacements_round_trip(
        text in rust_like_text(),
        budget in 0usize..160,
    ) {
        let overlay = parse_document(&text, SupportedLanguage::Rust).unwrap();
        let projected =
            summarize_one(&text, Some(&overlay), None, budget, &SummarizeOptions::default())
                .unwrap();
        let replacements = projected.edit().replacements();

        for offset in 0..=text.len() {
            let touched = replacements
                .iter()
                .any(|edit| edit.range.start <= offset && offset <= edit.range.end);
            if touched {
                continue;
            }
            prop_assert_eq!(projected.project_back(projected.project(offset)), offset);
        }
    }

    #[test]
    fn prop_summary_is_edit_of_original(
        text in rust_like_text(),
        budget in 0usize..160,
    ) {
        let overlay = parse_document(&text, SupportedLanguage::Rust).unwrap();
        let projected =
            summarize_one(&text, Some(&overlay), None, budget, &SummarizeOptions::default())
                .unwrap();
        prop_assert_eq!(projected.edit().apply(&text), projected.text());
    }

    #[test]
    fn prop_compose_matches_sequential_application(
        original in "[a-c\n]{0,30}",
        middle in "[a-c\n]{0,30}",
        last in "[a-c\n]{0,30}",
    ) {
        let first = TextEdit::compute(&original, &middle);
        let second = TextEdit::compute(&middle, &last);
        let composed = first.compose(&second);
        prop_assert_eq!(composed.apply(&original), last);
    }

    #[test]
    fn prop_inverse_restores_original(original in "[a-c\n]{0,30}", modified in "[a-c\n]{0,30}") {
        let edit = TextEdit::compute(&original, &modified);
        let restored = edit.inverse(&original).apply(&edit.apply(&original));
        prop_assert_eq!(restored, original);
    }

    #[test]
    fn prop_split_originals_yield_the_same_edit(
        (text, points) in "[a-z \n]{0,40}".prop_flat_map(|text| {
            let len = text.len();
            (Just(text), proptest::collection::vec(0..=len, 3))
        }),
        before in "[…x]{0,2}",
        after in "[…x]{0,2}",
    ) {
        let mut points = points;
        points.sort_unstable();
        let (start, split, end) = (points[0], points[1], points[2]);
        let prefix = OffsetRange::new(0, start / 2);

        // the left half is wrapped in its own concatenation so the builder cannot join it
        let mut left = FragmentBuilder::new();
        left.push_literal(&before);
        left.push_original(&text, OffsetRange::new(start, split));
        let mut halves = FragmentBuilder::new();
        halves.push_original(&text, prefix);
        halves.push(left.build());
        halves.push_original(&text, OffsetRange::new(split, end));
        halves.push_literal(&after);

        let mut whole = FragmentBuilder::new();
        whole.push_original(&text, prefix);
        whole.push_literal(&before);
        whole.push_original(&text, OffsetRange::new(start, end));
        whole.push_literal(&after);

        prop_assert_eq!(
            halves.build().to_edit(text.len()).unwrap(),
            whole.build().to_edit(text.len()).unwrap()
        );
    }

    #[test]
    fn prop_config_merge_is_idempotent(a in summarize_config(), b in summarize_config()) {
        prop_assert_eq!(SummarizeConfig::merge(a.clone(), a.clone()), a.clone());
        let merged = SummarizeConfig::merge(a, b.clone());
        prop_assert_eq!(SummarizeConfig::merge(merged.clone(), b), merged);
    }

    #[test]
    fn prop_selection_with_content_only_grows(
        text in rust_like_text(),
        start in 0usize..120,
        len in 0usize..40,
    ) {
        let start = start.min(text.len());
        let end = (start + len).min(text.len());
        let selection = OffsetRange::new(start, end);
        let selected = selection.substring(&text);
        prop_assume!(!selected.trim().is_empty());
        prop_assume!(!selected.starts_with('\n'));

        let syntax = parse_document_named(&text, SupportedLanguage::Rust).unwrap();
        let adjustment = adjust_selection(&syntax, &text, selection).unwrap();
        prop_assert!(adjustment.adjusted.contains_range(&selection));
    }
}
