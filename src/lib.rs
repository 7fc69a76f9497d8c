#![forbid(unsafe_code)]
//! Frame-accurate timeline documents for non-linear video editors.
//!
//! An ordered list of [`ClipRequest`]s is probed once per unique source, laid out back to back
//! with exact rational time, and rendered either as FCPXML 1.8 (Final Cut Pro X) or as xmeml v5
//! (Final Cut Pro 7, Premiere Pro, DaVinci Resolve).

pub mod assets;
pub mod effects;
pub mod emit;
pub mod foundation;
pub mod generator;
pub mod timecode;
pub mod timeline;

pub use assets::{Asset, AssetId, AssetRegistry, Ffprobe, MetadataProbe, ProbeReport, RecordedProbe};
pub use emit::{Document, DocumentStamp, EditorKind, Emitter, RenderRequest};
pub use foundation::core::{Dimensions, FrameRate};
pub use foundation::error::{CutError, CutResult};
pub use foundation::rational::Fraction;
pub use generator::{Generator, GeneratorOptions};
pub use timecode::Timecode;
pub use timeline::{ClipRequest, SequenceFormat, TimeValue, Timeline, TimelineClip};
