use super::range::OffsetRange;
use crate::error::{KirinukiError, KirinukiResult};
use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

/// Replace `range` (in the original text) with `text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleEdit {
    pub range: OffsetRange,
    pub text: String,
}

impl SingleEdit {
    pub fn new(range: OffsetRange, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(OffsetRange::empty(offset), text)
    }

    pub fn delete(range: OffsetRange) -> Self {
        Self::new(range, String::new())
    }

    /// Length change this replacement causes
    pub fn len_delta(&self) -> i64 {
        self.text.len() as i64 - self.range.len() as i64
    }
}

/// Which side of a zero-width insertion an offset sitting on it maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    Left,
    Right,
}

/// Ordered, non-overlapping list of replacements against one original text
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextEdit {
    replacements: Vec<SingleEdit>,
}

impl TextEdit {
    /// Create an edit, validating that replacements are sorted and do not overlap
    pub fn new(replacements: Vec<SingleEdit>) -> KirinukiResult<Self> {
        for pair in replacements.windows(2) {
            if pair[0].range.end > pair[1].range.start {
                return Err(KirinukiError::invalid_edit(format!(
                    "replacement {} overlaps or precedes {}",
                    pair[1].range, pair[0].range
                )));
            }
        }
        Ok(Self { replacements })
    }

    /// Build from replacements produced in order by this crate
    pub(crate) fn from_sorted(replacements: Vec<SingleEdit>) -> Self {
        debug_assert!(
            replacements
                .windows(2)
                .all(|pair| pair[0].range.end <= pair[1].range.start)
        );
        Self { replacements }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(range: OffsetRange, text: impl Into<String>) -> Self {
        Self {
            replacements: vec![SingleEdit::new(range, text)],
        }
    }

    pub fn replacements(&self) -> &[SingleEdit] {
        &self.replacements
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    /// Minimal edit turning `original` into `modified`, from a character diff
    pub fn compute(original: &str, modified: &str) -> Self {
        let diff = TextDiff::from_chars(original, modified);
        let mut replacements = Vec::new();
        let mut pending: Option<SingleEdit> = None;
        let mut old_offset = 0;

        for change in diff.iter_all_changes() {
            let value = change.value();
            match change.tag() {
                ChangeTag::Equal => {
                    replacements.extend(pending.take());
                    old_offset += value.len();
                }
                ChangeTag::Delete => {
                    let edit = pending
                        .get_or_insert_with(|| SingleEdit::insert(old_offset, String::new()));
                    old_offset += value.len();
                    edit.range.end = old_offset;
                }
                ChangeTag::Insert => {
                    pending
                        .get_or_insert_with(|| SingleEdit::insert(old_offset, String::new()))
                        .text
                        .push_str(value);
                }
            }
        }
        replacements.extend(pending);

        Self::from_sorted(replacements)
    }

    /// Apply to `original`. Replacement ranges must lie within it.
    pub fn apply(&self, original: &str) -> String {
        let projected_len = (original.len() as i64
            + self.replacements.iter().map(SingleEdit::len_delta).sum::<i64>())
        .max(0) as usize;
        let mut result = String::with_capacity(projected_len);
        let mut cursor = 0;
        for edit in &self.replacements {
            result.push_str(&original[cursor..edit.range.start]);
            result.push_str(&edit.text);
            cursor = edit.range.end;
        }
        result.push_str(&original[cursor..]);
        result
    }

    /// Map an original offset into the edited text.
    ///
    /// Offsets strictly inside a replaced range map to the start of its replacement.
    pub fn apply_to_offset(&self, offset: usize) -> usize {
        self.map_offset(offset, Bias::Left)
    }

    pub fn map_offset(&self, offset: usize, bias: Bias) -> usize {
        let mut delta: i64 = 0;
        for edit in &self.replacements {
            if offset < edit.range.start {
                break;
            }
            if offset == edit.range.start && (bias == Bias::Left || !edit.range.is_empty()) {
                break;
            }
            if offset < edit.range.end {
                return (edit.range.start as i64 + delta) as usize;
            }
            delta += edit.len_delta();
        }
        (offset as i64 + delta).max(0) as usize
    }

    /// Map an offset of the edited text back into the original.
    ///
    /// Offsets strictly inside inserted text map to the start of the replaced range.
    pub fn apply_inverse_to_offset(&self, offset: usize) -> usize {
        let mut delta: i64 = 0;
        for edit in &self.replacements {
            let new_start = (edit.range.start as i64 + delta) as usize;
            let new_end = new_start + edit.text.len();
            if offset <= new_start {
                break;
            }
            if offset < new_end {
                return edit.range.start;
            }
            delta += edit.len_delta();
        }
        (offset as i64 - delta).max(0) as usize
    }

    /// Edit that turns `self.apply(original)` back into `original`
    pub fn inverse(&self, original: &str) -> TextEdit {
        let mut delta: i64 = 0;
        let replacements = self
            .replacements
            .iter()
            .map(|edit| {
                let start = (edit.range.start as i64 + delta) as usize;
                delta += edit.len_delta();
                SingleEdit::new(
                    OffsetRange::new(start, start + edit.text.len()),
                    edit.range.substring(original),
                )
            })
            .collect();
        TextEdit::from_sorted(replacements)
    }

    /// Compose with `next`, which is expressed against `self.apply(original)`.
    ///
    /// The result applies to `original` directly. Touching replacements are merged.
    pub fn compose(&self, next: &TextEdit) -> TextEdit {
        if self.is_empty() {
            return next.clone();
        }
        if next.is_empty() {
            return self.clone();
        }

        let pieces = IntermediatePieces::new(self);
        // (intermediate key, replacement in original coordinates)
        let mut items: Vec<((usize, usize), SingleEdit)> = Vec::new();
        let mut absorbed = vec![false; self.replacements.len()];

        let mut index = 0;
        let edits = &next.replacements;
        while index < edits.len() {
            let first = &edits[index];
            let cluster_start = pieces.extend_start(first.range.start);
            let mut cluster_end = pieces.extend_end(first.range.end);
            let mut text = pieces
                .slice(cluster_start, first.range.start)
                .to_string();
            text.push_str(&first.text);
            let mut last_end = first.range.end;
            index += 1;

            while index < edits.len() && pieces.extend_start(edits[index].range.start) < cluster_end
            {
                let edit = &edits[index];
                text.push_str(pieces.slice(last_end, edit.range.start));
                text.push_str(&edit.text);
                last_end = edit.range.end;
                cluster_end = cluster_end.max(pieces.extend_end(edit.range.end));
                index += 1;
            }
            text.push_str(pieces.slice(last_end, cluster_end));

            for (piece_index, piece) in pieces.pieces.iter().enumerate() {
                let covered = if piece.inter.is_empty() {
                    cluster_start < piece.inter.start && piece.inter.start < cluster_end
                } else {
                    piece.inter.start < cluster_end && piece.inter.end > cluster_start
                };
                if covered {
                    absorbed[piece_index] = true;
                }
            }

            let orig_start = pieces.orig_start(cluster_start);
            let orig_end = pieces.orig_end(cluster_end).max(orig_start);
            items.push((
                (cluster_start, cluster_end),
                SingleEdit::new(OffsetRange::new(orig_start, orig_end), text),
            ));
        }

        for (piece_index, piece) in pieces.pieces.iter().enumerate() {
            if !absorbed[piece_index] {
                items.push((
                    (piece.inter.start, piece.inter.end),
                    self.replacements[piece_index].clone(),
                ));
            }
        }

        // zero-width keys tie between a deletion and an insertion at the same spot
        items.sort_by_key(|(key, edit)| (key.0, key.1, edit.range.start, edit.range.end));
        let mut merged: Vec<SingleEdit> = Vec::with_capacity(items.len());
        for (_, edit) in items {
            match merged.last_mut() {
                Some(last) if last.range.end >= edit.range.start => {
                    last.range.start = last.range.start.min(edit.range.start);
                    last.range.end = last.range.end.max(edit.range.end);
                    last.text.push_str(&edit.text);
                }
                _ => merged.push(edit),
            }
        }
        TextEdit::from_sorted(merged)
    }

    /// Re-express `self` (against a common ancestor) against `base.apply(ancestor)`.
    ///
    /// Returns `None` when a replacement of `self` overlaps one of `base`.
    pub fn try_rebase(&self, base: &TextEdit) -> Option<TextEdit> {
        let mut rebased = Vec::with_capacity(self.replacements.len());
        for edit in &self.replacements {
            if base
                .replacements
                .iter()
                .any(|other| edit.range.intersects(&other.range))
            {
                return None;
            }
            let range = if edit.range.is_empty() {
                let at = base.map_offset(edit.range.start, Bias::Left);
                OffsetRange::empty(at)
            } else {
                let start = base.map_offset(edit.range.start, Bias::Right);
                let end = base.map_offset(edit.range.end, Bias::Left).max(start);
                OffsetRange::new(start, end)
            };
            rebased.push(SingleEdit::new(range, edit.text.clone()));
        }
        Some(TextEdit::from_sorted(rebased))
    }

    /// Like [`TextEdit::try_rebase`], treating a conflict as an invariant violation
    pub fn rebase(&self, base: &TextEdit) -> KirinukiResult<TextEdit> {
        self.try_rebase(base).ok_or_else(|| {
            KirinukiError::rebase_conflict(format!(
                "{} replacement(s) overlap the {} replacement(s) of the base edit",
                self.replacements.len(),
                base.replacements.len()
            ))
        })
    }
}

/// A replacement of the first edit, located in the intermediate text
struct Piece<'e> {
    inter: OffsetRange,
    orig: OffsetRange,
    text: &'e str,
}

/// Replacements of an edit positioned in the text that edit produces
struct IntermediatePieces<'e> {
    pieces: Vec<Piece<'e>>,
}

impl<'e> IntermediatePieces<'e> {
    fn new(edit: &'e TextEdit) -> Self {
        let mut delta: i64 = 0;
        let pieces = edit
            .replacements
            .iter()
            .map(|replacement| {
                let start = (replacement.range.start as i64 + delta) as usize;
                delta += replacement.len_delta();
                Piece {
                    inter: OffsetRange::new(start, start + replacement.text.len()),
                    orig: replacement.range,
                    text: &replacement.text,
                }
            })
            .collect();
        Self { pieces }
    }

    fn strictly_inside(&self, offset: usize) -> Option<&Piece<'e>> {
        self.pieces
            .iter()
            .find(|piece| piece.inter.start < offset && offset < piece.inter.end)
    }

    fn extend_start(&self, offset: usize) -> usize {
        self.strictly_inside(offset)
            .map_or(offset, |piece| piece.inter.start)
    }

    fn extend_end(&self, offset: usize) -> usize {
        self.strictly_inside(offset)
            .map_or(offset, |piece| piece.inter.end)
    }

    /// Intermediate text between two offsets that lie inside one inserted piece
    fn slice(&self, start: usize, end: usize) -> &'e str {
        if start >= end {
            return "";
        }
        match self
            .pieces
            .iter()
            .find(|piece| piece.inter.start <= start && end <= piece.inter.end)
        {
            Some(piece) => &piece.text[start - piece.inter.start..end - piece.inter.start],
            None => {
                debug_assert!(false, "slice [{start}, {end}) outside inserted text");
                ""
            }
        }
    }

    /// Original offset for a cluster start, after any deletions at `offset`
    fn orig_start(&self, offset: usize) -> usize {
        if let Some(piece) = self
            .pieces
            .iter()
            .find(|piece| !piece.inter.is_empty() && piece.inter.start == offset)
        {
            return piece.orig.start;
        }
        let delta: i64 = self
            .pieces
            .iter()
            .filter(|piece| piece.inter.end <= offset)
            .map(|piece| piece.inter.len() as i64 - piece.orig.len() as i64)
            .sum();
        (offset as i64 - delta).max(0) as usize
    }

    /// Original offset for a cluster end, before any deletions at `offset`
    fn orig_end(&self, offset: usize) -> usize {
        if let Some(piece) = self
            .pieces
            .iter()
            .find(|piece| !piece.inter.is_empty() && piece.inter.end == offset)
        {
            return piece.orig.end;
        }
        let delta: i64 = self
            .pieces
            .iter()
            .filter(|piece| piece.inter.start < offset)
            .map(|piece| piece.inter.len() as i64 - piece.orig.len() as i64)
            .sum();
        (offset as i64 - delta).max(0) as usize
    }
}
