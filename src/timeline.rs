//! Sequential timeline assembly.
//!
//! Requests are placed back to back: each clip's trim and duration are snapped to its own asset's
//! frame grid first and then to the sequence grid, so offsets never drift.

pub mod builder;
pub mod format;
pub mod request;

pub use builder::{Timeline, TimelineClip};
pub use format::SequenceFormat;
pub use request::{ClipRequest, TimeValue};
