use listcore::EditOp;
use serde::{Deserialize, Serialize};

/// Where a document change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOrigin {
    Input,
    Delete,
    Paste,
    Undo,
    Redo,
    /// Edits applied by code, including whole-document replacement.
    Programmatic,
}

impl ChangeOrigin {
    /// Changes the user made directly, as opposed to history replays and
    /// edits issued by extensions.
    pub fn is_user_edit(self) -> bool {
        matches!(self, ChangeOrigin::Input | ChangeOrigin::Delete | ChangeOrigin::Paste)
    }
}

/// One replaced range. `from_a..to_a` is in the document before the change,
/// `from_b..to_b` in the document after it. Offsets are in chars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub from_a: usize,
    pub to_a: usize,
    pub from_b: usize,
    pub to_b: usize,
    pub deleted: String,
    pub inserted: String,
}

impl Change {
    /// Text removed without anything typed in its place.
    pub fn is_delete(&self) -> bool {
        !self.deleted.is_empty() && self.inserted.is_empty()
    }

    pub fn inserts_line_break(&self) -> bool {
        self.inserted.contains('\n')
    }

    fn delta(&self) -> isize {
        self.inserted.chars().count() as isize - (self.to_a - self.from_a) as isize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub origin: ChangeOrigin,
    pub changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new(origin: ChangeOrigin, changes: Vec<Change>) -> Self {
        Self { origin, changes }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn first_delete(&self) -> Option<&Change> {
        self.changes.iter().find(|c| c.is_delete())
    }

    pub fn first_line_break(&self) -> Option<&Change> {
        self.changes.iter().find(|c| c.inserts_line_break())
    }

    /// Moves `edit`, computed against the document before this change set,
    /// onto the document after it. Returns `None` when a change touches the
    /// edited range, except for text typed right after it.
    pub fn rebase(&self, edit: &EditOp) -> Option<EditOp> {
        let mut shift: isize = 0;
        for change in &self.changes {
            if change.to_a < edit.start {
                shift += change.delta();
            } else if change.from_a > edit.end
                || (change.from_a == edit.end && change.from_a == change.to_a)
            {
                continue;
            } else {
                return None;
            }
        }
        Some(EditOp::replace(
            (edit.start as isize + shift) as usize,
            (edit.end as isize + shift) as usize,
            edit.insert.clone(),
        ))
    }
}
