use serde::{Deserialize, Serialize};

/// A single replacement of the chars in `start..end` by `insert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditOp {
    pub start: usize,
    pub end: usize,
    pub insert: String,
}

impl EditOp {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            insert: text.into(),
        }
    }

    pub fn replace(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            insert: text.into(),
        }
    }

    pub fn delete(start: usize, end: usize) -> Self {
        Self::replace(start, end, String::new())
    }

    /// Change in document length, in chars, caused by this edit.
    pub fn delta(&self) -> isize {
        self.insert.chars().count() as isize - (self.end - self.start) as isize
    }
}

/// Edits produced for one user action, together with where the cursor should
/// land once they are applied.
///
/// Edits are sorted by `start` and never overlap. Offsets refer to the
/// document the batch was computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditBatch {
    pub edits: Vec<EditOp>,
    pub cursor: Option<usize>,
}

impl EditBatch {
    pub fn new(mut edits: Vec<EditOp>) -> Self {
        edits.sort_by_key(|e| e.start);
        debug_assert!(
            edits.windows(2).all(|w| w[0].end <= w[1].start),
            "overlapping edits in batch"
        );
        Self {
            edits,
            cursor: None,
        }
    }

    pub fn with_cursor(mut self, cursor: usize) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Maps an offset in the original document to the edited one. Offsets
    /// inside a replaced range move to the end of its replacement.
    pub fn map_offset(&self, offset: usize) -> usize {
        let mut shift: isize = 0;
        for edit in &self.edits {
            if edit.start > offset || (edit.start == offset && edit.end > offset) {
                break;
            }
            if offset < edit.end {
                return (edit.start as isize + shift) as usize + edit.insert.chars().count();
            }
            shift += edit.delta();
        }
        (offset as isize + shift) as usize
    }

    /// Applies every edit to `text` at once and returns the result.
    pub fn apply_to(&self, text: &str) -> String {
        let mut chars: Vec<char> = text.chars().collect();
        for edit in self.edits.iter().rev() {
            let end = edit.end.min(chars.len());
            let start = edit.start.min(end);
            chars.splice(start..end, edit.insert.chars());
        }
        chars.into_iter().collect()
    }
}
