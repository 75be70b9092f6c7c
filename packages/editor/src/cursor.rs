//! Cursor and selection tracking across re-renders of the code surface.
//!
//! Re-highlighting replaces every text segment of the surface, which would
//! otherwise lose the caret. The tracker captures character offsets before the
//! re-render and maps them back onto the new segments afterwards.

use serde::{Deserialize, Serialize};

/// Selection in character offsets, `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Build a selection from two ends in either order
    pub fn new(anchor: usize, head: usize) -> Self {
        Self {
            start: anchor.min(head),
            end: anchor.max(head),
        }
    }

    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.collapsed()
    }

    /// Clamp both ends into `0..=len`
    pub fn clamp(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }
}

/// Position inside a rendered buffer: segment index plus char offset within it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub segment: usize,
    pub offset: usize,
}

/// The editing surface as a sequence of text segments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedBuffer {
    segments: Vec<String>,
}

impl RenderedBuffer {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(vec![text.to_string()])
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn text(&self) -> String {
        self.segments.concat()
    }

    pub fn char_len(&self) -> usize {
        self.segments.iter().map(|s| s.chars().count()).sum()
    }

    /// Segment holding a char offset. A boundary offset resolves to the end of
    /// the earlier segment. `None` when the offset is past the end or there is
    /// nothing rendered.
    pub fn locate(&self, offset: usize) -> Option<Position> {
        let mut consumed = 0;
        for (segment, text) in self.segments.iter().enumerate() {
            let len = text.chars().count();
            if offset <= consumed + len {
                return Some(Position {
                    segment,
                    offset: offset - consumed,
                });
            }
            consumed += len;
        }
        None
    }

    /// Char offset of a position, `None` if it does not exist
    pub fn offset_of(&self, position: Position) -> Option<usize> {
        let target = self.segments.get(position.segment)?;
        if position.offset > target.chars().count() {
            return None;
        }
        let before: usize = self.segments[..position.segment]
            .iter()
            .map(|s| s.chars().count())
            .sum();
        Some(before + position.offset)
    }
}

/// Remembers a selection across one re-render
#[derive(Debug, Clone, Default)]
pub struct CursorTracker {
    captured: Option<Selection>,
}

impl CursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the selection before the surface is re-rendered
    pub fn capture(&mut self, selection: Selection) {
        self.captured = Some(selection);
    }

    pub fn captured(&self) -> Option<Selection> {
        self.captured
    }

    /// Rebuild the captured selection on the new render, clamped to its
    /// length. Collapses to 0 if no valid position can be resolved.
    pub fn restore(&self, render: &RenderedBuffer) -> Selection {
        let Some(selection) = self.captured else {
            return Selection::caret(0);
        };
        let selection = selection.clamp(render.char_len());

        let resolved = render
            .locate(selection.start)
            .zip(render.locate(selection.end))
            .and_then(|(start, end)| Some(Selection::new(render.offset_of(start)?, render.offset_of(end)?)));

        match resolved {
            Some(selection) => selection,
            None => {
                tracing::debug!(?selection, "selection could not be restored, collapsing");
                Selection::caret(0)
            }
        }
    }
}

/// Replace the selection with a single newline. The returned buffer ends the
/// inserted line with an empty marker segment so the caret has a node to land
/// on; the caret sits right after the newline.
pub fn insert_newline(text: &str, selection: Selection) -> (RenderedBuffer, Selection) {
    let selection = selection.clamp(text.chars().count());
    let start = byte_index(text, selection.start);
    let end = byte_index(text, selection.end);

    let mut segments = vec![text[..start].to_string(), "\n".to_string(), String::new()];
    if end < text.len() {
        segments.push(text[end..].to_string());
    }

    (RenderedBuffer::new(segments), Selection::caret(selection.start + 1))
}

/// 1-based line labels, one per `\n`-separated line
pub fn line_numbers(text: &str) -> Vec<String> {
    text.split('\n')
        .enumerate()
        .map(|(index, _)| (index + 1).to_string())
        .collect()
}

/// Byte index of a char offset, clamped to the end of `text`
pub fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_normalizes() {
        let selection = Selection::new(5, 2);
        assert_eq!(selection, Selection { start: 2, end: 5 });
        assert_eq!(selection.len(), 3);
        assert!(!selection.collapsed());
        assert_eq!(selection.clamp(3), Selection { start: 2, end: 3 });
    }

    #[test]
    fn test_locate_across_segments() {
        let render = RenderedBuffer::new(vec!["<".into(), "h1".into(), ">hi".into()]);
        assert_eq!(render.locate(0), Some(Position { segment: 0, offset: 0 }));
        assert_eq!(render.locate(1), Some(Position { segment: 0, offset: 1 }));
        assert_eq!(render.locate(2), Some(Position { segment: 1, offset: 1 }));
        assert_eq!(render.locate(6), Some(Position { segment: 2, offset: 3 }));
        assert_eq!(render.locate(7), None);

        assert_eq!(render.offset_of(Position { segment: 2, offset: 1 }), Some(4));
        assert_eq!(render.offset_of(Position { segment: 2, offset: 9 }), None);
    }

    #[test]
    fn test_caret_survives_rerender() {
        let mut tracker = CursorTracker::new();
        tracker.capture(Selection::caret(2));

        let render = RenderedBuffer::new(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(tracker.restore(&render), Selection::caret(2));
    }

    #[test]
    fn test_restore_clamps_to_shorter_render() {
        let mut tracker = CursorTracker::new();
        tracker.capture(Selection::new(3, 10));

        let render = RenderedBuffer::from_text("abcd");
        assert_eq!(tracker.restore(&render), Selection { start: 3, end: 4 });
    }

    #[test]
    fn test_restore_on_empty_render_collapses() {
        let mut tracker = CursorTracker::new();
        tracker.capture(Selection::new(1, 2));
        assert_eq!(tracker.restore(&RenderedBuffer::default()), Selection::caret(0));
    }

    #[test]
    fn test_insert_newline_replaces_selection() {
        let (render, caret) = insert_newline("abcdef", Selection::new(2, 4));
        assert_eq!(render.text(), "ab\nef");
        assert_eq!(caret, Selection::caret(3));
        assert_eq!(render.segments()[2], "");
    }

    #[test]
    fn test_insert_newline_once_per_press() {
        let (render, caret) = insert_newline("ab", Selection::caret(2));
        assert_eq!(render.text(), "ab\n");
        assert_eq!(render.text().matches('\n').count(), 1);
        assert_eq!(caret, Selection::caret(3));
        assert!(render.locate(caret.start).is_some());
    }

    #[test]
    fn test_multibyte_offsets() {
        let (render, caret) = insert_newline("日本語", Selection::caret(1));
        assert_eq!(render.text(), "日\n本語");
        assert_eq!(caret.start, 2);
    }

    #[test]
    fn test_line_numbers() {
        assert_eq!(line_numbers("a\nb\nc"), vec!["1", "2", "3"]);
        assert_eq!(line_numbers(""), vec!["1"]);
        assert_eq!(line_numbers("x\n"), vec!["1", "2"]);
    }
}
