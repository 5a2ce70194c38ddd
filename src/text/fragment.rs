//! Immutable string fragments.
//!
//! A fragment is either literal text, a verbatim slice of the original text, or
//! a concatenation of fragments. A fragment whose original slices appear in
//! increasing order can be converted into the [`TextEdit`] that produces its
//! text from the original.

use super::edit::{SingleEdit, TextEdit};
use super::range::OffsetRange;
use crate::error::{KirinukiError, KirinukiResult};
use std::borrow::Cow;
use std::rc::Rc;

/// Line/column extent of a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextLength {
    pub line_count: usize,
    /// Bytes after the last line break
    pub column_count: usize,
}

impl TextLength {
    pub fn of(text: &str) -> Self {
        match text.rfind('\n') {
            Some(last) => Self {
                line_count: count_line_breaks(text),
                column_count: text.len() - last - 1,
            },
            None => Self {
                line_count: 0,
                column_count: text.len(),
            },
        }
    }
}

fn count_line_breaks(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n').count()
}

fn count_chars(text: &str) -> usize {
    text.chars().count()
}

#[derive(Debug, Clone)]
pub enum StringFragment<'a> {
    Literal(LiteralFragment),
    Original(OriginalFragment<'a>),
    Concatenated(ConcatenatedFragment<'a>),
}

#[derive(Debug, Clone)]
pub struct LiteralFragment {
    text: Rc<str>,
    chars: usize,
    line_breaks: usize,
}

impl LiteralFragment {
    pub fn new(text: &str) -> Self {
        Self {
            text: Rc::from(text),
            chars: count_chars(text),
            line_breaks: count_line_breaks(text),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Verbatim slice `range` of `source`
#[derive(Debug, Clone, Copy)]
pub struct OriginalFragment<'a> {
    pub range: OffsetRange,
    source: &'a str,
    chars: usize,
    line_breaks: usize,
}

impl<'a> OriginalFragment<'a> {
    pub fn new(source: &'a str, range: OffsetRange) -> Self {
        let text = range.substring(source);
        Self {
            range,
            source,
            chars: count_chars(text),
            line_breaks: count_line_breaks(text),
        }
    }

    pub fn text(&self) -> &'a str {
        self.range.substring(self.source)
    }

    /// Drop leading whitespace
    pub fn trim_start(&self) -> Self {
        let text = self.text();
        let trimmed = text.len() - text.trim_start().len();
        Self::new(
            self.source,
            OffsetRange::new(self.range.start + trimmed, self.range.end),
        )
    }

    /// Drop trailing whitespace
    pub fn trim_end(&self) -> Self {
        let text = self.text();
        let trimmed = text.len() - text.trim_end().len();
        Self::new(
            self.source,
            OffsetRange::new(self.range.start, self.range.end - trimmed),
        )
    }

    /// Join with a fragment that starts where this one ends in the same source
    pub fn try_join(&self, next: &OriginalFragment<'a>) -> Option<OriginalFragment<'a>> {
        if !std::ptr::eq(self.source, next.source) || self.range.end != next.range.start {
            return None;
        }
        Some(Self {
            range: OffsetRange::new(self.range.start, next.range.end),
            source: self.source,
            chars: self.chars + next.chars,
            line_breaks: self.line_breaks + next.line_breaks,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ConcatenatedFragment<'a> {
    parts: Rc<[StringFragment<'a>]>,
    len: usize,
    chars: usize,
    line_breaks: usize,
}

impl<'a> ConcatenatedFragment<'a> {
    pub fn parts(&self) -> &[StringFragment<'a>] {
        &self.parts
    }
}

impl<'a> StringFragment<'a> {
    pub fn literal(text: &str) -> Self {
        StringFragment::Literal(LiteralFragment::new(text))
    }

    pub fn original(source: &'a str, range: OffsetRange) -> Self {
        StringFragment::Original(OriginalFragment::new(source, range))
    }

    pub fn empty() -> Self {
        Self::literal("")
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        match self {
            StringFragment::Literal(literal) => literal.text.len(),
            StringFragment::Original(original) => original.range.len(),
            StringFragment::Concatenated(concat) => concat.len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length in `char`s, the unit budgets are measured in
    pub fn char_len(&self) -> usize {
        match self {
            StringFragment::Literal(literal) => literal.chars,
            StringFragment::Original(original) => original.chars,
            StringFragment::Concatenated(concat) => concat.chars,
        }
    }

    pub fn line_breaks(&self) -> usize {
        match self {
            StringFragment::Literal(literal) => literal.line_breaks,
            StringFragment::Original(original) => original.line_breaks,
            StringFragment::Concatenated(concat) => concat.line_breaks,
        }
    }

    pub fn text(&self) -> Cow<'_, str> {
        match self {
            StringFragment::Literal(literal) => Cow::Borrowed(literal.text()),
            StringFragment::Original(original) => Cow::Borrowed(original.text()),
            StringFragment::Concatenated(_) => {
                let mut text = String::with_capacity(self.len());
                self.write_into(&mut text);
                Cow::Owned(text)
            }
        }
    }

    pub fn text_length(&self) -> TextLength {
        TextLength::of(&self.text())
    }

    fn write_into(&self, out: &mut String) {
        match self {
            StringFragment::Literal(literal) => out.push_str(literal.text()),
            StringFragment::Original(original) => out.push_str(original.text()),
            StringFragment::Concatenated(concat) => {
                for part in concat.parts.iter() {
                    part.write_into(out);
                }
            }
        }
    }

    /// Edit that turns the original text (of length `original_len`) into this fragment's text.
    ///
    /// Fails when original slices are out of order or overlap.
    pub fn to_edit(&self, original_len: usize) -> KirinukiResult<TextEdit> {
        let mut writer = EditWriter::default();
        writer.visit(self)?;
        Ok(writer.finish(original_len))
    }
}

#[derive(Default)]
struct EditWriter {
    replacements: Vec<SingleEdit>,
    cursor: usize,
    pending: String,
}

impl EditWriter {
    fn visit(&mut self, fragment: &StringFragment<'_>) -> KirinukiResult<()> {
        match fragment {
            StringFragment::Literal(literal) => self.pending.push_str(literal.text()),
            StringFragment::Original(original) => {
                let range = original.range;
                if range.start < self.cursor {
                    return Err(KirinukiError::invalid_edit(format!(
                        "original slice {} starts before {}",
                        range, self.cursor
                    )));
                }
                self.flush(range.start);
                self.cursor = range.end;
            }
            StringFragment::Concatenated(concat) => {
                for part in concat.parts.iter() {
                    self.visit(part)?;
                }
            }
        }
        Ok(())
    }

    /// Replace everything between the cursor and `until` with the pending text
    fn flush(&mut self, until: usize) {
        if self.pending.is_empty() && until == self.cursor {
            return;
        }
        self.replacements.push(SingleEdit::new(
            OffsetRange::new(self.cursor, until),
            std::mem::take(&mut self.pending),
        ));
    }

    fn finish(mut self, original_len: usize) -> TextEdit {
        self.flush(original_len.max(self.cursor));
        TextEdit::from_sorted(self.replacements)
    }
}

/// Accumulates fragments in order, joining contiguous original slices eagerly
#[derive(Debug, Default)]
pub struct FragmentBuilder<'a> {
    parts: Vec<StringFragment<'a>>,
}

impl<'a> FragmentBuilder<'a> {
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    pub fn push(&mut self, fragment: StringFragment<'a>) {
        if fragment.is_empty() {
            return;
        }
        match (self.parts.last_mut(), &fragment) {
            (Some(StringFragment::Original(last)), StringFragment::Original(next)) => {
                if let Some(joined) = last.try_join(next) {
                    *last = joined;
                    return;
                }
            }
            (Some(StringFragment::Literal(last)), StringFragment::Literal(next)) => {
                let mut text = last.text().to_string();
                text.push_str(next.text());
                *last = LiteralFragment::new(&text);
                return;
            }
            _ => {}
        }
        self.parts.push(fragment);
    }

    pub fn push_literal(&mut self, text: &str) {
        self.push(StringFragment::literal(text));
    }

    pub fn push_original(&mut self, source: &'a str, range: OffsetRange) {
        self.push(StringFragment::original(source, range));
    }

    pub fn build(mut self) -> StringFragment<'a> {
        match self.parts.len() {
            0 => StringFragment::empty(),
            1 => self.parts.pop().unwrap_or_else(StringFragment::empty),
            _ => {
                let len = self.parts.iter().map(StringFragment::len).sum();
                let chars = self.parts.iter().map(StringFragment::char_len).sum();
                let line_breaks = self.parts.iter().map(StringFragment::line_breaks).sum();
                StringFragment::Concatenated(ConcatenatedFragment {
                    parts: Rc::from(self.parts),
                    len,
                    chars,
                    line_breaks,
                })
            }
        }
    }
}
