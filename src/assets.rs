//! Source media: metadata probing, path handling and the deduplicated asset registry.

pub mod paths;
pub mod probe;
pub mod registry;

pub use probe::{Ffprobe, MetadataProbe, ProbeReport, RecordedProbe};
pub use registry::{Asset, AssetId, AssetRegistry, MusicAsset};
