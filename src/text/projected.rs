use super::edit::{Bias, TextEdit};
use super::position::{Position, PositionMapper, PositionTransformer, Range};
use super::range::{OffsetRange, floor_char_boundary};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::sync::OnceLock;

/// An original text plus the edit that derives a projected text from it.
///
/// Offsets and ranges can be mapped in both directions. The projected text
/// and the position transformers are built on first use.
#[derive(Debug)]
pub struct ProjectedText {
    original_text: String,
    edit: TextEdit,
    text: OnceLock<String>,
    original_transformer: OnceLock<PositionTransformer>,
    projected_transformer: OnceLock<PositionTransformer>,
}

impl Clone for ProjectedText {
    fn clone(&self) -> Self {
        Self::new(self.original_text.clone(), self.edit.clone())
    }
}

impl ProjectedText {
    pub fn new(original_text: impl Into<String>, edit: TextEdit) -> Self {
        Self {
            original_text: original_text.into(),
            edit,
            text: OnceLock::new(),
            original_transformer: OnceLock::new(),
            projected_transformer: OnceLock::new(),
        }
    }

    /// Projection that leaves the text unchanged
    pub fn unchanged(original_text: impl Into<String>) -> Self {
        Self::new(original_text, TextEdit::empty())
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn edit(&self) -> &TextEdit {
        &self.edit
    }

    pub fn text(&self) -> &str {
        self.text.get_or_init(|| self.edit.apply(&self.original_text))
    }

    pub fn is_original_unchanged(&self) -> bool {
        self.edit.is_empty()
    }

    pub fn original_transformer(&self) -> &PositionTransformer {
        self.original_transformer
            .get_or_init(|| PositionTransformer::new(&self.original_text))
    }

    pub fn projected_transformer(&self) -> &PositionTransformer {
        self.projected_transformer
            .get_or_init(|| PositionTransformer::new(self.text()))
    }

    /// Map an original offset into the projected text, clamping to valid offsets
    pub fn project(&self, original_offset: usize) -> usize {
        let offset = floor_char_boundary(&self.original_text, original_offset);
        floor_char_boundary(self.text(), self.edit.apply_to_offset(offset))
    }

    /// Map a projected offset back into the original text, clamping to valid offsets
    pub fn project_back(&self, projected_offset: usize) -> usize {
        let offset = floor_char_boundary(self.text(), projected_offset);
        floor_char_boundary(
            &self.original_text,
            self.edit.apply_inverse_to_offset(offset),
        )
    }

    /// Map an original range; the result keeps `start <= end`
    pub fn project_offset_range(&self, range: OffsetRange) -> OffsetRange {
        let start = self.project(range.start);
        let end = if range.is_empty() {
            start
        } else {
            let text_len = self.text().len();
            let end = self
                .edit
                .map_offset(range.end.min(self.original_text.len()), Bias::Left);
            floor_char_boundary(self.text(), end.min(text_len))
        };
        OffsetRange::new(start, end.max(start))
    }

    pub fn project_back_offset_range(&self, range: OffsetRange) -> OffsetRange {
        let start = self.project_back(range.start);
        let end = self.project_back(range.end).max(start);
        OffsetRange::new(start, end)
    }

    pub fn project_position(&self, position: Position) -> Position {
        let offset = self.original_transformer().position_to_offset(position);
        self.projected_transformer()
            .offset_to_position(self.project(offset))
    }

    pub fn project_back_position(&self, position: Position) -> Position {
        let offset = self.projected_transformer().position_to_offset(position);
        self.original_transformer()
            .offset_to_position(self.project_back(offset))
    }

    /// Map an original position range into the projected text
    pub fn project_range(&self, range: Range) -> Range {
        let offsets = self.original_transformer().range_to_offset_range(range);
        self.projected_transformer()
            .offset_range_to_range(self.project_offset_range(offsets))
    }

    pub fn project_back_range(&self, range: Range) -> Range {
        let offsets = self.projected_transformer().range_to_offset_range(range);
        self.original_transformer()
            .offset_range_to_range(self.project_back_offset_range(offsets))
    }

    /// Re-express an edit against the original as an edit against the projected text.
    ///
    /// Returns `None` if it touches text this projection replaced.
    pub fn try_rebase(&self, edit: &TextEdit) -> Option<TextEdit> {
        edit.try_rebase(&self.edit)
    }

    /// Apply a further edit expressed against the projected text
    pub fn compose(&self, edit: &TextEdit) -> ProjectedText {
        ProjectedText::new(self.original_text.clone(), self.edit.compose(edit))
    }
}

impl Serialize for ProjectedText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ProjectedText", 2)?;
        state.serialize_field("text", self.text())?;
        state.serialize_field("edit", &self.edit)?;
        state.end()
    }
}
