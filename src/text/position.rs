use super::range::{OffsetRange, floor_char_boundary};
use line_index::{LineCol, LineIndex, TextSize};
use serde::{Deserialize, Serialize};

/// Zero-based line and byte column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Pair of positions, `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Trait for mapping between positions and byte offsets
pub trait PositionMapper {
    /// Convert a position to a byte offset, clamping to the line and document end
    fn position_to_offset(&self, position: Position) -> usize;

    /// Convert a byte offset to a position, clamping to the document end
    fn offset_to_position(&self, offset: usize) -> Position;

    /// Convert a byte range to a position range
    fn offset_range_to_range(&self, range: OffsetRange) -> Range {
        Range::new(
            self.offset_to_position(range.start),
            self.offset_to_position(range.end),
        )
    }

    /// Convert a position range to a byte range
    fn range_to_offset_range(&self, range: Range) -> OffsetRange {
        let start = self.position_to_offset(range.start);
        let end = self.position_to_offset(range.end).max(start);
        OffsetRange::new(start, end)
    }
}

/// Offset/position transformer for one text, backed by a precomputed line index
pub struct PositionTransformer {
    text: String,
    index: LineIndex,
}

impl PositionTransformer {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            index: LineIndex::new(text),
        }
    }

    /// Number of lines; an empty text and a text ending in `\n` both count the last empty line
    pub fn line_count(&self) -> usize {
        self.index.line_col(TextSize::from(self.text.len() as u32)).line as usize + 1
    }

    /// Byte offset where `line` starts, if the line exists
    pub fn line_start(&self, line: u32) -> Option<usize> {
        self.index
            .offset(LineCol { line, col: 0 })
            .map(|offset| u32::from(offset) as usize)
    }

    /// Byte offset where `line` ends, excluding its line break
    pub fn line_end(&self, line: u32) -> Option<usize> {
        self.line_start(line)?;
        let end = match self.line_start(line + 1) {
            Some(next) => next - 1,
            None => self.text.len(),
        };
        Some(end)
    }
}

impl std::fmt::Debug for PositionTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionTransformer")
            .field("lines", &self.line_count())
            .finish()
    }
}

impl PositionMapper for PositionTransformer {
    fn position_to_offset(&self, position: Position) -> usize {
        let Some(line_start) = self.line_start(position.line) else {
            return self.text.len();
        };
        let line_end = self.line_end(position.line).unwrap_or(self.text.len());
        let offset = (line_start + position.character as usize).min(line_end);
        floor_char_boundary(&self.text, offset)
    }

    fn offset_to_position(&self, offset: usize) -> Position {
        let offset = floor_char_boundary(&self.text, offset);
        let line_col = self.index.line_col(TextSize::from(offset as u32));
        Position::new(line_col.line, line_col.col)
    }
}
