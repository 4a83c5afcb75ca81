use anyhow::Result;
use listcore::{EditBatch, LineSource, Synthesizer};

use crate::buffer::Buffer;
use crate::change::ChangeSet;
use crate::config::Config;
use crate::extension::{DeferredEdit, Extension, TaskQueue};

/// Continues ordered lists on Enter and renumbers them after deletions.
///
/// Changes replayed from history or issued programmatically are ignored, so
/// the edits this extension schedules never trigger it again.
pub struct ListContinuation {
    config: Config,
    synthesizer: Synthesizer,
    queue: Option<TaskQueue>,
}

impl ListContinuation {
    pub fn new(config: Config) -> Self {
        let synthesizer = Synthesizer::with_families(&config.families);
        Self {
            config,
            synthesizer,
            queue: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.queue.is_some()
    }

    /// Decides which edits, if any, follow from `change`. `doc` must already
    /// contain the change.
    pub fn edits_for<S: LineSource + ?Sized>(&self, doc: &S, change: &ChangeSet) -> Option<EditBatch> {
        if !self.config.enabled || !change.origin.is_user_edit() {
            return None;
        }

        if let Some(delete) = change.first_delete() {
            if !self.config.renumber_on_delete {
                return None;
            }
            return self
                .synthesizer
                .renumber_after_merge(doc, delete.from_b, &delete.deleted);
        }

        if let Some(insert) = change.first_line_break() {
            if !self.config.continue_on_enter {
                return None;
            }
            return self.synthesizer.continue_list(doc, insert.from_b, insert.to_b);
        }

        None
    }
}

impl Extension for ListContinuation {
    fn name(&self) -> &str {
        "List Continuation"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn start(&mut self, queue: TaskQueue) -> Result<()> {
        log::debug!("Recognizing {:?}", self.synthesizer.families());
        self.queue = Some(queue);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.queue = None;
        Ok(())
    }

    fn on_change(&mut self, buffer: &Buffer, change: &ChangeSet) -> Result<()> {
        let Some(queue) = &self.queue else {
            return Ok(());
        };
        let Some(batch) = self.edits_for(buffer, change) else {
            return Ok(());
        };
        log::debug!(
            "Scheduling {} list edit(s) against revision {}",
            batch.edits.len(),
            buffer.revision()
        );
        queue.schedule(DeferredEdit {
            revision: buffer.revision(),
            batch,
        })
    }
}
