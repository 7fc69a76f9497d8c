use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::assets::probe::{Ffprobe, MetadataProbe};
use crate::assets::registry::AssetRegistry;
use crate::emit::{Document, DocumentStamp, EditorKind, RenderRequest};
use crate::foundation::error::{CutError, CutResult};
use crate::foundation::rational::Fraction;
use crate::timeline::request::{ClipRequest, TimeValue, validate_requests};
use crate::timeline::{SequenceFormat, Timeline};

/// Caller options for one generator.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Target editor family.
    pub editor: EditorKind,
    /// Integer sequence rate; the first clip's exact rate when absent.
    pub sequence_frame_rate: Option<u32>,
    pub sequence_width: Option<u32>,
    pub sequence_height: Option<u32>,
    /// Rewrite `/mnt/<d>/...` media paths to `D:/...` file URLs.
    pub windows_file_paths: bool,
    /// Music bed laid on a second audio track (xmeml only).
    pub audio_track: Option<PathBuf>,
    /// Skip into the music bed.
    pub audio_start: Option<TimeValue>,
}

/// Validated requests plus the probed, frozen asset registry.
///
/// Every unique source is probed once when the generator is built; rendering afterwards is a
/// pure read of that state.
#[derive(Debug)]
pub struct Generator {
    requests: Vec<ClipRequest>,
    options: GeneratorOptions,
    audio_start: Fraction,
    registry: AssetRegistry,
    format: SequenceFormat,
}

impl Generator {
    /// Build a generator that probes sources with `ffprobe` from `PATH`.
    pub fn new(requests: Vec<ClipRequest>, options: GeneratorOptions) -> CutResult<Self> {
        Self::with_probe(requests, options, &Ffprobe::default())
    }

    /// Build a generator with an explicit metadata probe.
    #[tracing::instrument(skip_all, fields(clips = requests.len(), editor = %options.editor))]
    pub fn with_probe(
        requests: Vec<ClipRequest>,
        options: GeneratorOptions,
        probe: &dyn MetadataProbe,
    ) -> CutResult<Self> {
        validate_requests(&requests)?;
        SequenceFormat::check_overrides(
            options.sequence_frame_rate,
            options.sequence_width,
            options.sequence_height,
        )?;
        let audio_start = options
            .audio_start
            .map(TimeValue::to_fraction)
            .transpose()?
            .unwrap_or(Fraction::ZERO);
        let music = options
            .audio_track
            .as_deref()
            .map(absolute_music_path)
            .transpose()?;

        let registry = AssetRegistry::build(
            &requests,
            music.as_deref(),
            options.windows_file_paths,
            probe,
        )?;
        let first = registry
            .first()
            .ok_or_else(|| CutError::invalid_input("no clips provided"))?;
        let format = SequenceFormat::resolve(
            options.sequence_frame_rate,
            options.sequence_width,
            options.sequence_height,
            first,
        )?;

        Ok(Self {
            requests,
            options,
            audio_start,
            registry,
            format,
        })
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn format(&self) -> &SequenceFormat {
        &self.format
    }

    /// Lay the requests out on the sequence grid.
    pub fn timeline(&self) -> CutResult<Timeline> {
        Timeline::build(&self.requests, &self.registry, &self.format)
    }

    /// Render with fresh UUIDs and the current time.
    pub fn render(&self) -> CutResult<Document> {
        self.render_with_stamp(&DocumentStamp::now())
    }

    /// Render with a caller-provided stamp; identical inputs give identical documents.
    pub fn render_with_stamp(&self, stamp: &DocumentStamp) -> CutResult<Document> {
        let timeline = self.timeline()?;
        let req = RenderRequest {
            timeline: &timeline,
            registry: &self.registry,
            format: &self.format,
            stamp,
            audio_start: self.audio_start,
        };
        self.options.editor.emitter().render(&req)
    }

    /// Render and write the document to `path`.
    pub fn save(&self, path: &Path) -> CutResult<()> {
        self.render()?.save(path)
    }
}

fn absolute_music_path(path: &Path) -> CutResult<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(CutError::invalid_input("audio track path must be non-empty"));
    }
    let abs = std::path::absolute(path)
        .with_context(|| format!("resolve audio track '{}'", path.display()))?;
    if !abs.exists() {
        return Err(CutError::ReferenceNotFound(abs));
    }
    Ok(abs)
}

#[cfg(test)]
#[path = "../tests/unit/generator.rs"]
mod tests;
