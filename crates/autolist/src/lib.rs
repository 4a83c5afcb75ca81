// Autolist library exports

pub mod buffer;
pub mod change;
pub mod config;
pub mod continuation;
pub mod extension;
pub mod session;

pub use buffer::Buffer;
pub use change::{Change, ChangeOrigin, ChangeSet};
pub use config::Config;
pub use continuation::ListContinuation;
pub use extension::{DeferredEdit, Extension, ExtensionManager, TaskQueue};
pub use session::{EditorAction, Session};
