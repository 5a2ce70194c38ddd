//! Snapping a raw selection onto syntactically meaningful bounds.
//!
//! Runs once before summarization, on the same text and syntax tree.

mod tree;

use crate::error::KirinukiResult;
use crate::syntax::OverlayNode;
use crate::text::{OffsetRange, floor_char_boundary};
use serde::Serialize;
use tree::{Gap, Location, SelectionTree, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionAdjustment {
    pub adjusted: OffsetRange,
    /// The raw selection after clamping to the document
    pub original: OffsetRange,
}

/// Expand `selection` to the nearest syntactically meaningful span.
///
/// The raw selection is clamped to the document first. Fails only when the
/// syntax tree has overlapping siblings.
pub fn adjust_selection(
    syntax: &OverlayNode,
    text: &str,
    selection: OffsetRange,
) -> KirinukiResult<SelectionAdjustment> {
    let start = floor_char_boundary(text, selection.start);
    let end = floor_char_boundary(text, selection.end).max(start);
    let original = OffsetRange::new(start, end);

    let tree = SelectionTree::build(text, syntax)?;

    let mut range = original;
    if range.substring(text).trim().is_empty() {
        match snap_to_content(text, range) {
            Some(snapped) => range = snapped,
            None => {
                log::trace!(
                    target: "kirinuki::selection",
                    "No content next to blank selection {original}"
                );
                return Ok(SelectionAdjustment {
                    adjusted: original,
                    original,
                });
            }
        }
    }

    range = skip_leading_line_break(text, range);
    range = extend_over_indentation(text, range);

    let mut iterations = 0usize;
    loop {
        let next = expand_once(&tree, text, range);
        iterations += 1;
        if next == range {
            break;
        }
        range = next;
    }

    log::trace!(
        target: "kirinuki::selection",
        "Adjusted {original} to {range} in {iterations} iteration(s)"
    );
    Ok(SelectionAdjustment {
        adjusted: range,
        original,
    })
}

/// Walk outward from a blank selection, one character per side per step,
/// until a non-whitespace character is found. Line breaks and the document
/// edges stop a side; the left side wins ties.
fn snap_to_content(text: &str, range: OffsetRange) -> Option<OffsetRange> {
    let mut left = Some(range.start);
    let mut right = Some(range.end);

    while left.is_some() || right.is_some() {
        if let Some(offset) = left {
            left = match text[..offset].chars().next_back() {
                None | Some('\n') => None,
                Some(c) if !c.is_whitespace() => {
                    return Some(OffsetRange::new(offset - c.len_utf8(), offset));
                }
                Some(c) => Some(offset - c.len_utf8()),
            };
        }
        if let Some(offset) = right {
            right = match text[offset..].chars().next() {
                None | Some('\n') => None,
                Some(c) if !c.is_whitespace() => {
                    return Some(OffsetRange::new(offset, offset + c.len_utf8()));
                }
                Some(c) => Some(offset + c.len_utf8()),
            };
        }
    }
    None
}

/// A selection starting on the line break that ends a non-blank line starts
/// on the next line instead
fn skip_leading_line_break(text: &str, range: OffsetRange) -> OffsetRange {
    if range.is_empty() || !text[range.start..].starts_with('\n') {
        return range;
    }
    let line_start = text[..range.start].rfind('\n').map_or(0, |at| at + 1);
    if text[line_start..range.start].trim().is_empty() {
        return range;
    }
    OffsetRange::new(range.start + 1, range.end)
}

fn is_horizontal_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Move each bound over spaces and tabs, but only when that reaches the line boundary
fn extend_over_indentation(text: &str, range: OffsetRange) -> OffsetRange {
    let before = &text[..range.start];
    let indent_start = before.trim_end_matches(is_horizontal_whitespace).len();
    let start = if indent_start == 0 || text[..indent_start].ends_with('\n') {
        indent_start
    } else {
        range.start
    };

    let after = &text[range.end..];
    let trailing = after.len() - after.trim_start_matches(is_horizontal_whitespace).len();
    let trailing_end = range.end + trailing;
    let end = if trailing_end == text.len() || text[trailing_end..].starts_with('\n') {
        trailing_end
    } else {
        range.end
    };

    OffsetRange::new(start, end)
}

/// First and last non-whitespace characters inside `range`
fn content_bounds(text: &str, range: OffsetRange) -> Option<OffsetRange> {
    let slice = range.substring(text);
    let trimmed_start = slice.trim_start();
    if trimmed_start.is_empty() {
        return None;
    }
    let start = range.start + (slice.len() - trimmed_start.len());
    let end = range.start + slice.trim_end().len();
    Some(OffsetRange::new(start, end))
}

fn selected_content(text: &str, gap: Gap, selection: OffsetRange) -> bool {
    gap.range
        .intersection(&selection)
        .is_some_and(|selected| !selected.substring(text).trim().is_empty())
}

/// One round of gap matching and leaf completion for both bounds
fn expand_once(tree: &SelectionTree, text: &str, range: OffsetRange) -> OffsetRange {
    let mut expanded = range;
    for (offset, side) in [(range.start, Side::Start), (range.end, Side::End)] {
        match tree.locate(offset, side) {
            Location::Leaf(leaf) => {
                if !expanded.contains_range(&leaf) {
                    expanded = expanded.join(&leaf);
                }
            }
            Location::Gap(gap) => {
                let matching = tree.matching_gap(gap);
                if selected_content(text, gap, range) || selected_content(text, matching, range) {
                    for bounds in [gap, matching]
                        .into_iter()
                        .filter_map(|gap| content_bounds(text, gap.range))
                    {
                        expanded = expanded.join(&bounds);
                    }
                }
            }
        }
    }
    expanded
}
