use anyhow::{anyhow, Result};
use listcore::EditBatch;
use tokio::sync::mpsc;

use crate::buffer::Buffer;
use crate::change::ChangeSet;

/// Edits an extension wants applied on the next turn of the event loop.
///
/// `revision` is the buffer revision the batch was computed against. If the
/// buffer has changed since, the session moves the edits past the newer
/// changes and drops the task when one of them touched an edited range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredEdit {
    pub revision: u64,
    pub batch: EditBatch,
}

/// Sending half of the session's task queue, handed to extensions on start.
#[derive(Debug, Clone)]
pub struct TaskQueue {
    sender: mpsc::UnboundedSender<DeferredEdit>,
}

impl TaskQueue {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DeferredEdit>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn schedule(&self, task: DeferredEdit) -> Result<()> {
        self.sender
            .send(task)
            .map_err(|_| anyhow!("Task queue is closed"))
    }
}

/// Receives document changes and may schedule follow-up edits.
pub trait Extension {
    fn name(&self) -> &str;
    fn version(&self) -> &str;
    fn start(&mut self, queue: TaskQueue) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    fn on_change(&mut self, buffer: &Buffer, change: &ChangeSet) -> Result<()>;
}

#[derive(Default)]
pub struct ExtensionManager {
    extensions: Vec<Box<dyn Extension>>,
}

impl ExtensionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_extension(&mut self, mut extension: Box<dyn Extension>, queue: TaskQueue) -> Result<()> {
        extension.start(queue)?;
        log::info!("Loaded extension {} {}", extension.name(), extension.version());
        self.extensions.push(extension);
        Ok(())
    }

    pub fn handle_change(&mut self, buffer: &Buffer, change: &ChangeSet) -> Result<()> {
        for extension in &mut self.extensions {
            extension.on_change(buffer, change)?;
        }
        Ok(())
    }

    pub fn stop_all(&mut self) -> Result<()> {
        for extension in &mut self.extensions {
            extension.stop()?;
        }
        Ok(())
    }

    pub fn list_extensions(&self) -> Vec<(&str, &str)> {
        self.extensions.iter().map(|e| (e.name(), e.version())).collect()
    }
}
