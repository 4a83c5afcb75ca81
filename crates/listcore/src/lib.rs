pub mod codec;
pub mod edit;
pub mod pattern;
pub mod source;
pub mod synth;

pub use codec::{decode, encode, MarkerFamily};
pub use edit::{EditBatch, EditOp};
pub use pattern::{classify, decompose, identify, LineDecomposition};
pub use source::{LineSource, TextSnapshot};
pub use synth::Synthesizer;
