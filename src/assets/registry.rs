use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use md5::{Digest as _, Md5};

use crate::assets::paths::{base_name, file_name, file_url, normalize_abs_path};
use crate::assets::probe::{MetadataProbe, ProbeReport};
use crate::foundation::core::{Dimensions, FrameRate};
use crate::foundation::error::{CutError, CutResult};
use crate::foundation::rational::Fraction;
use crate::timecode;
use crate::timeline::request::ClipRequest;

/// Stable asset identifier (`r` + MD5 hex of the absolute path).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Identifier for an absolute path. Same path, same id, on every run.
    pub fn for_path(abs_path: &Path) -> Self {
        Self(format!("r{}", path_digest_hex(abs_path)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// UUID-shaped uid (8-4-4-4-12) built from the same digest as [`AssetId`].
pub fn asset_uid(abs_path: &Path) -> String {
    let hex = path_digest_hex(abs_path);
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

fn path_digest_hex(abs_path: &Path) -> String {
    hex::encode(Md5::digest(abs_path.to_string_lossy().as_bytes()))
}

/// A deduplicated source media file with its probed technical metadata.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Asset {
    pub id: AssetId,
    pub uid: String,
    /// Normalized absolute path; the registry key.
    pub path: PathBuf,
    pub filename: String,
    pub basename: String,
    pub file_url: String,
    /// Container duration snapped to the asset's own frame grid.
    pub duration: Fraction,
    pub frame_rate: FrameRate,
    pub dimensions: Dimensions,
    pub audio_rate: Option<u32>,
    /// Embedded camera start timecode as an offset; zero when absent.
    pub timecode: Fraction,
    /// Resolved rotation in degrees (request override, else probe).
    pub rotation: i32,
    pub color_space: &'static str,
}

impl Asset {
    /// Duration of one native frame.
    pub fn frame_duration(&self) -> Fraction {
        self.frame_rate.frame_duration()
    }

    fn from_report(
        abs_path: PathBuf,
        report: &ProbeReport,
        rotation_override: Option<i32>,
        windows_paths: bool,
    ) -> CutResult<Self> {
        let video = report
            .video_stream()
            .ok_or_else(|| CutError::probe(&abs_path, "no video stream found"))?;
        let (Some(width), Some(height)) = (video.width, video.height) else {
            return Err(CutError::probe(&abs_path, "missing video dimensions"));
        };
        let frame_rate = video
            .r_frame_rate
            .as_deref()
            .ok_or_else(|| CutError::probe(&abs_path, "missing video r_frame_rate"))
            .and_then(|r| {
                FrameRate::parse(r).map_err(|e| CutError::probe(&abs_path, e.to_string()))
            })?;

        let duration = Fraction::from_seconds(report.duration_seconds())?
            .round_to_frame_boundary(frame_rate.frame_duration());
        let filename = file_name(&abs_path);

        Ok(Self {
            id: AssetId::for_path(&abs_path),
            uid: asset_uid(&abs_path),
            basename: base_name(&abs_path),
            file_url: file_url(&abs_path, windows_paths),
            filename,
            duration,
            frame_rate,
            dimensions: Dimensions { width, height },
            audio_rate: report.audio_sample_rate(),
            timecode: timecode::decode(report.timecode_tag().as_deref(), frame_rate),
            rotation: rotation_override.unwrap_or_else(|| report.rotation()),
            color_space: video.color_space_label(),
            path: abs_path,
        })
    }
}

/// Secondary audio file (music bed) laid under the picture timeline.
#[derive(Clone, Debug, serde::Serialize)]
pub struct MusicAsset {
    pub id: AssetId,
    pub path: PathBuf,
    pub filename: String,
    pub basename: String,
    pub file_url: String,
    /// Exact container duration (not snapped to any frame grid).
    pub duration: Fraction,
    pub sample_rate: Option<u32>,
}

impl MusicAsset {
    fn from_report(abs_path: PathBuf, report: &ProbeReport, windows_paths: bool) -> CutResult<Self> {
        Ok(Self {
            id: AssetId::for_path(&abs_path),
            filename: file_name(&abs_path),
            basename: base_name(&abs_path),
            file_url: file_url(&abs_path, windows_paths),
            duration: Fraction::from_seconds(report.duration_seconds())?,
            sample_rate: report.audio_sample_rate(),
            path: abs_path,
        })
    }
}

/// Frozen map of every unique clip source, in first-reference order.
#[derive(Clone, Debug, Default)]
pub struct AssetRegistry {
    assets: Vec<Asset>,
    by_path: BTreeMap<PathBuf, usize>,
    music: Option<MusicAsset>,
}

impl AssetRegistry {
    /// Probe every unique request path exactly once (and the music bed, if any).
    ///
    /// Rotation overrides are asset-scoped: the first request for a path that carries one sets
    /// the rotation for every clip of that path, including earlier ones.
    #[tracing::instrument(skip_all, fields(clips = requests.len()))]
    pub fn build(
        requests: &[ClipRequest],
        music: Option<&Path>,
        windows_paths: bool,
        probe: &dyn MetadataProbe,
    ) -> CutResult<Self> {
        let mut order = Vec::<PathBuf>::new();
        let mut overrides = BTreeMap::<PathBuf, i32>::new();
        for request in requests {
            let abs = normalize_abs_path(&request.path)?;
            if let Some(rotation) = request.rotation {
                overrides.entry(abs.clone()).or_insert(rotation);
            }
            if !order.contains(&abs) {
                order.push(abs);
            }
        }

        let music = music
            .map(|path| {
                let abs = normalize_abs_path(path)?;
                if abs.exists() {
                    Ok(abs)
                } else {
                    Err(CutError::ReferenceNotFound(abs))
                }
            })
            .transpose()?;

        let mut registry = Self::default();
        for abs in order {
            tracing::debug!(path = %abs.display(), "probing clip source");
            let report = probe.probe(&abs)?;
            let rotation = overrides.get(&abs).copied();
            let asset = Asset::from_report(abs.clone(), &report, rotation, windows_paths)?;
            registry.by_path.insert(abs, registry.assets.len());
            registry.assets.push(asset);
        }

        if let Some(abs) = music {
            tracing::debug!(path = %abs.display(), "probing music bed");
            let report = probe.probe(&abs)?;
            registry.music = Some(MusicAsset::from_report(abs, &report, windows_paths)?);
        }

        Ok(registry)
    }

    /// Asset registered for `path` (compared in normalized absolute form).
    pub fn get(&self, path: &Path) -> Option<&Asset> {
        let abs = normalize_abs_path(path).ok()?;
        self.by_path.get(&abs).map(|&i| &self.assets[i])
    }

    /// Asset with identifier `id`.
    pub fn by_id(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.iter().find(|a| &a.id == id)
    }

    /// Assets in first-reference order.
    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter()
    }

    pub fn first(&self) -> Option<&Asset> {
        self.assets.first()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn music(&self) -> Option<&MusicAsset> {
        self.music.as_ref()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/registry.rs"]
mod tests;
