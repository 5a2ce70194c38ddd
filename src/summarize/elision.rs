use super::options::{LineNumberStyle, SummarizeSettings};
use crate::text::{
    FragmentBuilder, OffsetRange, PositionMapper, PositionTransformer, floor_char_boundary,
};

/// How a run of elided siblings is written into the output
#[derive(Debug, Clone)]
pub(crate) struct ElisionStyle {
    ellipsis: String,
    line_number_style: LineNumberStyle,
    always_ellipsis: bool,
}

impl ElisionStyle {
    pub(crate) fn from_settings(settings: &SummarizeSettings) -> Self {
        Self {
            ellipsis: settings.ellipsis.clone(),
            line_number_style: settings.line_number_style,
            always_ellipsis: settings.always_ellipsis_for_elisions,
        }
    }

    /// Marker replacing `content`, the non-whitespace span of an elided run
    fn marker(
        &self,
        run_text: &str,
        content: OffsetRange,
        text: &str,
        lines: &PositionTransformer,
    ) -> String {
        if self.line_number_style != LineNumberStyle::OmittedRanges
            || self.always_ellipsis
            || !run_text.contains('\n')
        {
            return self.ellipsis.clone();
        }
        let first = lines.offset_to_position(content.start).line + 1;
        let last_char = floor_char_boundary(text, content.end.saturating_sub(1));
        let last = lines.offset_to_position(last_char).line + 1;
        if first == last {
            format!("/* Line {first} omitted */")
        } else {
            format!("/* Lines {first}-{last} omitted */")
        }
    }
}

/// Context of one maximal run of non-surviving siblings
pub(crate) struct ElidedRun {
    pub range: OffsetRange,
    /// A surviving sibling precedes the run
    pub has_previous: bool,
    /// A surviving sibling follows the run
    pub has_next: bool,
}

/// Write `run` into `builder`.
///
/// Whitespace-only runs stay verbatim. A run opening its parent before a
/// surviving sibling is dropped without a marker, keeping only the indentation
/// of that sibling. A run sitting between `{` and `}` folds into the braces.
/// Otherwise the marker keeps the run's indentation.
pub(crate) fn push_elided_run<'a>(
    builder: &mut FragmentBuilder<'a>,
    text: &'a str,
    lines: &PositionTransformer,
    style: &ElisionStyle,
    run: &ElidedRun,
) {
    let range = run.range;
    let run_text = range.substring(text);
    let content = run_text.trim();
    if content.is_empty() {
        builder.push_original(text, range);
        return;
    }

    let leading_len = run_text.len() - run_text.trim_start().len();
    let trailing_len = run_text.len() - run_text.trim_end().len();

    if !run.has_previous && run.has_next {
        let trailing = &run_text[run_text.len() - trailing_len..];
        if let Some(line_break) = trailing.rfind('\n') {
            let indent_start = range.end - trailing_len + line_break + 1;
            builder.push_original(text, OffsetRange::new(indent_start, range.end));
        }
        return;
    }

    let content_range = OffsetRange::new(range.start + leading_len, range.end - trailing_len);
    let marker = style.marker(run_text, content_range, text, lines);

    if run.has_previous
        && run.has_next
        && text[..range.start].trim_end().ends_with('{')
        && text[range.end..].trim_start().starts_with('}')
    {
        builder.push_literal(&marker);
        return;
    }

    let leading = &run_text[..leading_len];
    let indent_start = match leading.rfind('\n') {
        Some(line_break) => range.start + line_break,
        None => range.start,
    };
    builder.push_original(text, OffsetRange::new(indent_start, range.start + leading_len));
    builder.push_literal(&marker);
    if run.has_next {
        builder.push_original(text, OffsetRange::new(range.end - trailing_len, range.end));
    }
}
