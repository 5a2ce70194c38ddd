use crate::text::{PositionMapper, ProjectedText, SingleEdit, TextEdit};

/// Number of decimal digits of `n`
pub(crate) fn digits(n: usize) -> usize {
    n.checked_ilog10().map_or(1, |log| log as usize + 1)
}

/// Upper bound of the characters `number_lines` adds to an output with `line_breaks` breaks
pub(crate) fn prefix_estimate(line_breaks: usize, original_line_count: usize) -> usize {
    (line_breaks + 1) * (digits(original_line_count) + 2)
}

/// Prefix every projected line with `<n>: `, n being its 1-based original line.
///
/// A trailing empty line after a final line break gets no prefix.
pub(crate) fn number_lines(projected: &ProjectedText) -> ProjectedText {
    let text = projected.text();
    if text.is_empty() {
        return projected.clone();
    }

    let original_lines = projected.original_transformer();
    let line_starts = std::iter::once(0)
        .chain(text.match_indices('\n').map(|(at, _)| at + 1))
        .filter(|&start| start < text.len());

    let prefixes = line_starts
        .map(|start| {
            let original = projected.project_back(start);
            let line = original_lines.offset_to_position(original).line + 1;
            SingleEdit::insert(start, format!("{line}: "))
        })
        .collect();

    projected.compose(&TextEdit::from_sorted(prefixes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::OffsetRange;
    use rstest::rstest;

    #[rstest]
    #[case::zero(0, 1)]
    #[case::one(9, 1)]
    #[case::two(10, 2)]
    #[case::three(999, 3)]
    fn test_digits(#[case] n: usize, #[case] expected: usize) {
        assert_eq!(digits(n), expected);
    }

    #[test]
    fn test_number_lines_uses_original_lines() {
        let original = "a\nb\nc\nd\n";
        // drop lines 2 and 3
        let edit = TextEdit::single(OffsetRange::new(2, 6), "…\n");
        let projected = ProjectedText::new(original, edit);
        assert_eq!(projected.text(), "a\n…\nd\n");

        let numbered = number_lines(&projected);
        assert_eq!(numbered.text(), "1: a\n2: …\n4: d\n");
        assert_eq!(numbered.original_text(), original);
        assert_eq!(numbered.edit().apply(original), numbered.text());
    }

    #[test]
    fn test_empty_stays_empty() {
        let projected = ProjectedText::new("abc", TextEdit::single(OffsetRange::new(0, 3), ""));
        assert_eq!(number_lines(&projected).text(), "");
    }

    #[test]
    fn test_estimate_is_upper_bound() {
        let original = (1..=120).map(|n| format!("line {n}\n")).collect::<String>();
        let projected = ProjectedText::unchanged(original.clone());
        let numbered = number_lines(&projected);
        let added = numbered.text().len() - projected.text().len();
        let line_breaks = projected.text().matches('\n').count();
        assert!(added <= prefix_estimate(line_breaks, 121));
    }
}
