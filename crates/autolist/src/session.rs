use anyhow::Result;
use serde::{Deserialize, Serialize};
use listcore::{EditBatch, EditOp};
use tokio::sync::mpsc::{self, error::TryRecvError};

use crate::buffer::Buffer;
use crate::change::{ChangeOrigin, ChangeSet};
use crate::extension::{DeferredEdit, Extension, ExtensionManager, TaskQueue};

/// A user action replayed against the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditorAction {
    Type { text: String },
    Enter,
    Backspace,
    Delete { from: usize, to: usize },
    Goto { line: usize, column: usize },
    Undo,
    Redo,
}

/// Single-threaded editing loop: user actions are applied and announced to
/// extensions immediately, edits extensions schedule run on the next
/// [`Session::tick`].
pub struct Session {
    buffer: Buffer,
    extensions: ExtensionManager,
    queue: TaskQueue,
    tasks: mpsc::UnboundedReceiver<DeferredEdit>,
    // Changes since the last tick, with the revision each one produced
    journal: Vec<(u64, ChangeSet)>,
}

impl Session {
    pub fn new(buffer: Buffer) -> Self {
        let (queue, tasks) = TaskQueue::channel();
        Self {
            buffer,
            extensions: ExtensionManager::new(),
            queue,
            tasks,
            journal: Vec::new(),
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn load_extension(&mut self, extension: Box<dyn Extension>) -> Result<()> {
        self.extensions.load_extension(extension, self.queue.clone())
    }

    pub fn list_extensions(&self) -> Vec<(&str, &str)> {
        self.extensions.list_extensions()
    }

    /// Replaces the whole document, as opening a file does.
    pub fn set_content(&mut self, content: &str) -> Result<()> {
        let change = self.buffer.set_content(content);
        self.notify(&change)
    }

    /// Performs `action` and notifies extensions of the resulting change.
    pub fn dispatch(&mut self, action: EditorAction) -> Result<()> {
        let change = match action {
            EditorAction::Type { text } => Some(self.buffer.insert_text(&text)),
            EditorAction::Enter => Some(self.buffer.insert_newline()),
            EditorAction::Backspace => self.buffer.delete_backward(),
            EditorAction::Delete { from, to } => self.buffer.delete_range(from, to),
            EditorAction::Goto { line, column } => {
                self.buffer.goto(line, column);
                None
            }
            EditorAction::Undo => self.buffer.undo(),
            EditorAction::Redo => self.buffer.redo(),
        };
        if let Some(change) = change {
            self.notify(&change)?;
        }
        Ok(())
    }

    /// Runs every task scheduled so far and returns how many were applied.
    pub fn tick(&mut self) -> Result<usize> {
        let mut applied = 0;
        loop {
            let task = match self.tasks.try_recv() {
                Ok(task) => task,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };
            if task.batch.is_empty() {
                continue;
            }
            let (edits, cursor) = if task.revision == self.buffer.revision() {
                (task.batch.edits, task.batch.cursor)
            } else {
                let Some(edits) = self.rebase(task.revision, &task.batch.edits) else {
                    log::debug!(
                        "Dropping edit computed for revision {}: text it covers changed (buffer is at {})",
                        task.revision,
                        self.buffer.revision()
                    );
                    continue;
                };
                let batch = EditBatch::new(edits);
                let cursor = batch.map_offset(self.buffer.cursor());
                (batch.edits, Some(cursor))
            };
            let change = self.buffer.apply_edits(&edits, ChangeOrigin::Programmatic);
            if let Some(cursor) = cursor {
                self.buffer.set_cursor(cursor);
            }
            applied += 1;
            self.notify(&change)?;
        }
        self.journal.clear();
        Ok(applied)
    }

    /// Moves `edits`, computed at `revision`, past every change made since.
    fn rebase(&self, revision: u64, edits: &[EditOp]) -> Option<Vec<EditOp>> {
        let mut edits = edits.to_vec();
        for (_, change) in self.journal.iter().filter(|(after, _)| *after > revision) {
            edits = edits
                .iter()
                .map(|edit| change.rebase(edit))
                .collect::<Option<Vec<_>>>()?;
        }
        log::debug!("Rebased {} edit(s) from revision {}", edits.len(), revision);
        Some(edits)
    }

    /// Dispatches `action` and lets the loop turn once.
    pub fn run(&mut self, action: EditorAction) -> Result<()> {
        self.dispatch(action)?;
        self.tick()?;
        Ok(())
    }

    pub fn shutdown(&mut self) -> Result<()> {
        self.extensions.stop_all()?;
        log::info!("Session stopped at revision {}", self.buffer.revision());
        Ok(())
    }

    fn notify(&mut self, change: &ChangeSet) -> Result<()> {
        self.journal.push((self.buffer.revision(), change.clone()));
        self.extensions.handle_change(&self.buffer, change)
    }
}
