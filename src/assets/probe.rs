use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::foundation::error::{CutError, CutResult};

/// Color space label written for every probed video stream.
pub const REC709_COLOR_SPACE: &str = "1-1-1 (Rec. 709)";

/// Container tag holding Panasonic semi-pro camera metadata as embedded XML.
const PANASONIC_XML_TAG: &str = "com.panasonic.Semi-Pro.metadata.xml";

/// Technical metadata for one media file, shaped like `ffprobe -show_format -show_streams` JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProbeReport {
    /// Elementary streams in container order.
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
    /// Container-level information.
    #[serde(default)]
    pub format: ProbeFormat,
}

/// One elementary stream.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProbeStream {
    /// `video`, `audio`, `data`, ...
    pub codec_type: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Exact rate as a ratio string, e.g. `30000/1001`.
    pub r_frame_rate: Option<String>,
    /// Audio sample rate as reported (a decimal string).
    pub sample_rate: Option<String>,
    pub color_space: Option<String>,
    pub color_primaries: Option<String>,
    pub color_transfer: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub side_data_list: Vec<SideData>,
}

/// Stream side data entry; only display-matrix rotation is read.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SideData {
    pub rotation: Option<f64>,
}

/// Container-level information.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProbeFormat {
    /// Container duration in seconds (a decimal string).
    pub duration: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl ProbeReport {
    /// First stream tagged `video`.
    pub fn video_stream(&self) -> Option<&ProbeStream> {
        self.streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
    }

    /// First stream tagged `audio`.
    pub fn audio_stream(&self) -> Option<&ProbeStream> {
        self.streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("audio"))
    }

    /// Container duration in seconds, zero when absent or unparseable.
    pub fn duration_seconds(&self) -> f64 {
        self.format
            .duration
            .as_deref()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d >= 0.0)
            .unwrap_or(0.0)
    }

    /// Sample rate of the first audio stream.
    pub fn audio_sample_rate(&self) -> Option<u32> {
        self.audio_stream()?
            .sample_rate
            .as_deref()
            .and_then(|s| s.trim().parse::<u32>().ok())
    }

    /// Embedded camera timecode string.
    ///
    /// Lookup order: any stream `timecode` tag, the container `timecode` tag, then the
    /// `<StartTimecode>` element of Panasonic semi-pro XML metadata.
    pub fn timecode_tag(&self) -> Option<String> {
        let non_empty = |s: &&String| !s.trim().is_empty();

        if let Some(tc) = self
            .streams
            .iter()
            .find_map(|s| s.tags.get("timecode").filter(non_empty))
        {
            return Some(tc.clone());
        }
        if let Some(tc) = self.format.tags.get("timecode").filter(non_empty) {
            return Some(tc.clone());
        }
        self.format
            .tags
            .get(PANASONIC_XML_TAG)
            .and_then(|xml| element_text(xml, "StartTimecode"))
    }

    /// Rotation of the video stream in degrees.
    ///
    /// Display-matrix side data wins over the legacy `rotate` tag; absent both, zero.
    pub fn rotation(&self) -> i32 {
        let Some(video) = self.video_stream() else {
            return 0;
        };
        if let Some(r) = video.side_data_list.iter().find_map(|sd| sd.rotation) {
            return r as i32;
        }
        video
            .tags
            .get("rotate")
            .and_then(|r| r.trim().parse::<f64>().ok())
            .map(|r| r as i32)
            .unwrap_or(0)
    }
}

impl ProbeStream {
    /// FCPX color space label for this stream.
    ///
    /// Every observed primaries/transfer combination maps to Rec. 709.
    pub fn color_space_label(&self) -> &'static str {
        REC709_COLOR_SPACE
    }
}

/// Trimmed, unescaped text of the first non-empty `name` element in `xml`.
fn element_text(xml: &str, name: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text_start = true;
    reader.config_mut().trim_text_end = true;

    let mut buf = Vec::new();
    let mut inside = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => inside = e.local_name().as_ref() == name.as_bytes(),
            Ok(Event::Text(e)) if inside => {
                let text = e.unescape().ok()?;
                let text = text.trim();
                if !text.is_empty() {
                    return Some(text.to_owned());
                }
            }
            Ok(Event::End(_)) => inside = false,
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }
}

/// Source of technical metadata for media files.
///
/// Called once per unique path while an asset registry is built.
pub trait MetadataProbe {
    /// Inspect `path`. Failures carry the probe's raw diagnostic.
    fn probe(&self, path: &Path) -> CutResult<ProbeReport>;
}

/// Probe backed by the `ffprobe` executable.
#[derive(Clone, Debug)]
pub struct Ffprobe {
    program: PathBuf,
}

impl Default for Ffprobe {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffprobe"),
        }
    }
}

impl Ffprobe {
    /// Use a specific `ffprobe` binary instead of the one on `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl MetadataProbe for Ffprobe {
    #[tracing::instrument(skip(self), fields(program = %self.program.display()))]
    fn probe(&self, path: &Path) -> CutResult<ProbeReport> {
        let out = std::process::Command::new(&self.program)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .map_err(|e| CutError::probe(path, format!("failed to run ffprobe: {e}")))?;

        if !out.status.success() {
            let mut diagnostic = String::from_utf8_lossy(&out.stdout).into_owned();
            diagnostic.push_str(&String::from_utf8_lossy(&out.stderr));
            return Err(CutError::probe(path, diagnostic));
        }

        serde_json::from_slice(&out.stdout)
            .map_err(|e| CutError::probe(path, format!("ffprobe json parse failed: {e}")))
    }
}

/// In-memory probe answering from previously captured reports.
///
/// Every call is recorded so callers can check how often a path was inspected.
#[derive(Debug, Default)]
pub struct RecordedProbe {
    reports: BTreeMap<PathBuf, ProbeReport>,
    calls: RefCell<Vec<PathBuf>>,
}

impl RecordedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the report returned for `path`.
    pub fn with_report(mut self, path: impl Into<PathBuf>, report: ProbeReport) -> Self {
        self.reports.insert(path.into(), report);
        self
    }

    /// Register ffprobe-shaped JSON for `path`.
    pub fn with_json(self, path: impl Into<PathBuf>, json: serde_json::Value) -> CutResult<Self> {
        let report: ProbeReport = serde_json::from_value(json)
            .map_err(|e| CutError::serde(format!("probe report: {e}")))?;
        Ok(self.with_report(path, report))
    }

    /// Paths probed so far, in call order.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.borrow().clone()
    }
}

impl MetadataProbe for RecordedProbe {
    fn probe(&self, path: &Path) -> CutResult<ProbeReport> {
        self.calls.borrow_mut().push(path.to_path_buf());
        self.reports.get(path).cloned().ok_or_else(|| {
            CutError::probe(
                path,
                format!("{}: No such file or directory", path.display()),
            )
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/probe.rs"]
mod tests;
