use listcore::{EditOp, LineSource};
use ropey::Rope;
use std::borrow::Cow;

use crate::change::{Change, ChangeOrigin, ChangeSet};

const HISTORY_LIMIT: usize = 100;

/// A text document with a single cursor and linear undo history.
///
/// Every mutation returns the [`ChangeSet`] describing it so the caller can
/// notify extensions.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    cursor: usize,
    revision: u64,
    modified: bool,
    // Undo/Redo support
    history: Vec<BufferState>,
    history_index: usize,
}

#[derive(Clone)]
struct BufferState {
    content: String,
    cursor: usize,
}

impl Buffer {
    pub fn new() -> Self {
        Self::from_content("")
    }

    pub fn from_content(content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
            cursor: 0,
            revision: 0,
            modified: false,
            history: vec![BufferState {
                content: content.to_string(),
                cursor: 0,
            }],
            history_index: 0,
        }
    }

    /// Replaces the whole document and resets history.
    pub fn set_content(&mut self, content: &str) -> ChangeSet {
        let change = self.replace(0, self.rope.len_chars(), content);
        self.cursor = 0;
        self.modified = false;
        self.history = vec![BufferState {
            content: content.to_string(),
            cursor: 0,
        }];
        self.history_index = 0;
        ChangeSet::new(ChangeOrigin::Programmatic, vec![change])
    }

    pub fn get_content(&self) -> String {
        self.rope.to_string()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Incremented by every change to the text.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.rope.len_chars());
    }

    /// Moves the cursor to `column` of `line`, clamped to the line.
    pub fn goto(&mut self, line: usize, column: usize) {
        let line = line.min(self.rope.len_lines().saturating_sub(1));
        let line_len = self.line_text(line).map_or(0, |text| text.chars().count());
        self.cursor = self.rope.line_to_char(line) + column.min(line_len);
    }

    /// Cursor as (line, column).
    pub fn cursor_position(&self) -> (usize, usize) {
        let line = self.rope.char_to_line(self.cursor);
        (line, self.cursor - self.rope.line_to_char(line))
    }

    pub fn insert_text(&mut self, text: &str) -> ChangeSet {
        let at = self.cursor;
        let change = self.replace(at, at, text);
        self.cursor = change.to_b;
        let origin = if text.chars().count() > 1 {
            ChangeOrigin::Paste
        } else {
            ChangeOrigin::Input
        };
        self.commit(origin, vec![change])
    }

    pub fn insert_newline(&mut self) -> ChangeSet {
        let at = self.cursor;
        let change = self.replace(at, at, "\n");
        self.cursor = change.to_b;
        self.commit(ChangeOrigin::Input, vec![change])
    }

    pub fn delete_backward(&mut self) -> Option<ChangeSet> {
        if self.cursor == 0 {
            return None;
        }
        self.delete_range(self.cursor - 1, self.cursor)
    }

    pub fn delete_forward(&mut self) -> Option<ChangeSet> {
        if self.cursor >= self.rope.len_chars() {
            return None;
        }
        self.delete_range(self.cursor, self.cursor + 1)
    }

    pub fn delete_range(&mut self, from: usize, to: usize) -> Option<ChangeSet> {
        let to = to.min(self.rope.len_chars());
        if from >= to {
            return None;
        }
        let change = self.replace(from, to, "");
        self.cursor = from;
        Some(self.commit(ChangeOrigin::Delete, vec![change]))
    }

    /// Applies a batch of non-overlapping edits, all computed against the
    /// current text, as a single change.
    pub fn apply_edits(&mut self, edits: &[EditOp], origin: ChangeOrigin) -> ChangeSet {
        let mut sorted: Vec<&EditOp> = edits.iter().collect();
        sorted.sort_by_key(|e| e.start);

        let mut changes = Vec::with_capacity(sorted.len());
        let mut shift: isize = 0;
        for edit in sorted {
            let from = (edit.start as isize + shift) as usize;
            let to = (edit.end as isize + shift) as usize;
            let mut change = self.replace(from, to, &edit.insert);
            change.from_a = edit.start;
            change.to_a = edit.end;
            shift += edit.delta();
            changes.push(change);
        }
        self.cursor = self.cursor.min(self.rope.len_chars());
        self.commit(origin, changes)
    }

    pub fn undo(&mut self) -> Option<ChangeSet> {
        if self.history_index == 0 {
            return None;
        }
        self.history_index -= 1;
        Some(self.restore(ChangeOrigin::Undo))
    }

    pub fn redo(&mut self) -> Option<ChangeSet> {
        if self.history_index + 1 >= self.history.len() {
            return None;
        }
        self.history_index += 1;
        Some(self.restore(ChangeOrigin::Redo))
    }

    fn restore(&mut self, origin: ChangeOrigin) -> ChangeSet {
        let state = self.history[self.history_index].clone();
        let change = self.replace(0, self.rope.len_chars(), &state.content);
        self.cursor = state.cursor.min(self.rope.len_chars());
        self.modified = true;
        ChangeSet::new(origin, vec![change])
    }

    fn replace(&mut self, from: usize, to: usize, text: &str) -> Change {
        let deleted = self.rope.slice(from..to).to_string();
        self.rope.remove(from..to);
        self.rope.insert(from, text);
        self.revision += 1;
        Change {
            from_a: from,
            to_a: to,
            from_b: from,
            to_b: from + text.chars().count(),
            deleted,
            inserted: text.to_string(),
        }
    }

    fn commit(&mut self, origin: ChangeOrigin, changes: Vec<Change>) -> ChangeSet {
        self.modified = true;
        self.save_state();
        ChangeSet::new(origin, changes)
    }

    fn save_state(&mut self) {
        let current_state = BufferState {
            content: self.rope.to_string(),
            cursor: self.cursor,
        };

        if let Some(last_state) = self.history.get(self.history_index) {
            if last_state.content == current_state.content {
                return;
            }
        }

        self.history.truncate(self.history_index + 1);
        self.history.push(current_state);
        self.history_index += 1;

        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
            self.history_index -= 1;
        }
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for Buffer {
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        let slice = self.rope.get_line(line)?;
        let mut text = slice.to_string();
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }
        Some(Cow::Owned(text))
    }

    fn line_start(&self, line: usize) -> usize {
        self.rope.line_to_char(line.min(self.rope.len_lines()))
    }

    fn line_of_offset(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.rope.len_chars()))
    }
}
