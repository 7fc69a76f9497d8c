//! FCPXML 1.8 emitter.
//!
//! All time values are written as exact fraction strings (`1001/24000s`), so offsets and
//! durations land on frame boundaries without conversion.

use std::io;

use quick_xml::Writer;

use crate::assets::registry::{Asset, AssetRegistry};
use crate::effects::motion::MotionParams;
use crate::effects::remap;
use crate::emit::xml::{document_writer, finish, io_error};
use crate::emit::{Document, EditorKind, Emitter, RenderRequest};
use crate::foundation::error::{CutError, CutResult};
use crate::timeline::{SequenceFormat, TimelineClip};

/// Id of the single `format` resource shared by the sequence and every asset.
pub const FORMAT_ID: &str = "r1";

/// Gain applied to every dialogue clip.
pub const VOLUME_ADJUSTMENT: &str = "-13.100000000000001db";

const FCPXML_VERSION: &str = "1.8";

/// Writes FCPXML for Final Cut Pro X. The music bed is not represented.
#[derive(Clone, Copy, Debug, Default)]
pub struct FcpxEmitter;

impl Emitter for FcpxEmitter {
    fn kind(&self) -> EditorKind {
        EditorKind::Fcpx
    }

    #[tracing::instrument(skip_all, fields(clips = req.timeline.clips.len()))]
    fn render(&self, req: &RenderRequest<'_>) -> CutResult<Document> {
        let first = req
            .registry
            .first()
            .ok_or_else(|| CutError::invalid_input("no clips provided"))?;
        let clips = req
            .timeline
            .clips
            .iter()
            .map(|clip| {
                let asset = req.registry.by_id(&clip.asset).ok_or_else(|| {
                    CutError::invalid_input(format!("clip references unknown asset {}", clip.asset))
                })?;
                Ok((clip, asset))
            })
            .collect::<CutResult<Vec<_>>>()?;

        let mut w = document_writer("fcpxml")?;
        w.create_element("fcpxml")
            .with_attribute(("version", FCPXML_VERSION))
            .write_inner_content(|w| -> io::Result<()> {
                write_resources(w, req.registry, req.format)?;
                write_library(w, req, first, &clips)
            })
            .map_err(io_error)?;

        Ok(Document {
            kind: EditorKind::Fcpx,
            xml: finish(w)?,
        })
    }
}

fn write_resources<W: io::Write>(
    w: &mut Writer<W>,
    registry: &AssetRegistry,
    format: &SequenceFormat,
) -> io::Result<()> {
    w.create_element("resources")
        .write_inner_content(|w| -> io::Result<()> {
            w.create_element("format")
                .with_attribute(("id", FORMAT_ID))
                .with_attribute(("height", format.dimensions.height.to_string().as_str()))
                .with_attribute(("width", format.dimensions.width.to_string().as_str()))
                .with_attribute(("frameDuration", format.frame_duration().to_string().as_str()))
                .with_attribute(("colorSpace", format.color_space))
                .write_empty()?;
            for asset in registry.iter() {
                write_asset(w, asset)?;
            }
            Ok(())
        })?;
    Ok(())
}

fn write_asset<W: io::Write>(w: &mut Writer<W>, asset: &Asset) -> io::Result<()> {
    let start = asset.timecode.to_string();
    let duration = asset.duration.to_string();
    let audio_rate = asset.audio_rate.map(|r| r.to_string());

    let mut el = w
        .create_element("asset")
        .with_attribute(("id", asset.id.as_str()))
        .with_attribute(("name", asset.filename.as_str()))
        .with_attribute(("uid", asset.uid.as_str()))
        .with_attribute(("src", asset.file_url.as_str()))
        .with_attribute(("start", start.as_str()));
    if let Some(rate) = &audio_rate {
        el = el.with_attribute(("audioRate", rate.as_str()));
    }
    el.with_attribute(("hasAudio", if audio_rate.is_some() { "1" } else { "0" }))
        .with_attribute(("hasVideo", "1"))
        .with_attribute(("format", FORMAT_ID))
        .with_attribute(("duration", duration.as_str()))
        .write_empty()?;
    Ok(())
}

fn write_library<W: io::Write>(
    w: &mut Writer<W>,
    req: &RenderRequest<'_>,
    first: &Asset,
    clips: &[(&TimelineClip, &Asset)],
) -> io::Result<()> {
    let event_uid = req.stamp.event_uid.to_string();
    let project_uid = req.stamp.project_uid.to_string();
    let project_name = format!("{} {}", first.basename, req.stamp.suffix());
    let mod_date = req.stamp.mod_date();
    let sequence_duration = req.timeline.duration.to_string();

    w.create_element("library")
        .with_attribute(("location", "./"))
        .write_inner_content(|w| -> io::Result<()> {
            w.create_element("event")
                .with_attribute(("name", first.basename.as_str()))
                .with_attribute(("uid", event_uid.as_str()))
                .write_inner_content(|w| -> io::Result<()> {
                    w.create_element("project")
                        .with_attribute(("name", project_name.as_str()))
                        .with_attribute(("uid", project_uid.as_str()))
                        .with_attribute(("modDate", mod_date.as_str()))
                        .write_inner_content(|w| -> io::Result<()> {
                            w.create_element("sequence")
                                .with_attribute(("duration", sequence_duration.as_str()))
                                .with_attribute(("format", FORMAT_ID))
                                .with_attribute(("tcStart", "0s"))
                                .with_attribute(("audioRate", "48k"))
                                .write_inner_content(|w| -> io::Result<()> {
                                    w.create_element("spine").write_inner_content(
                                        |w| -> io::Result<()> {
                                            for (clip, asset) in clips {
                                                write_asset_clip(w, clip, asset, req.format)?;
                                            }
                                            Ok(())
                                        },
                                    )?;
                                    Ok(())
                                })?;
                            Ok(())
                        })?;
                    Ok(())
                })?;
            Ok(())
        })?;
    Ok(())
}

fn write_asset_clip<W: io::Write>(
    w: &mut Writer<W>,
    clip: &TimelineClip,
    asset: &Asset,
    format: &SequenceFormat,
) -> io::Result<()> {
    let start = clip.source_start.to_string();
    let offset = clip.offset.to_string();
    let duration = clip.duration.to_string();
    let motion = MotionParams::compensate(asset.dimensions, clip.rotation, format.dimensions);

    w.create_element("asset-clip")
        .with_attribute(("name", asset.filename.as_str()))
        .with_attribute(("ref", asset.id.as_str()))
        .with_attribute(("start", start.as_str()))
        .with_attribute(("offset", offset.as_str()))
        .with_attribute(("duration", duration.as_str()))
        .with_attribute(("audioRole", "dialogue"))
        .write_inner_content(|w| -> io::Result<()> {
            if clip.is_retimed() {
                write_time_map(w, clip, asset)?;
            }
            if let Some(m) = motion {
                if m.fill {
                    w.create_element("adjust-conform")
                        .with_attribute(("type", "fill"))
                        .write_empty()?;
                }
                if m.rotation != 0 {
                    w.create_element("adjust-transform")
                        .with_attribute(("rotation", m.rotation.to_string().as_str()))
                        .write_empty()?;
                }
            }
            w.create_element("adjust-volume")
                .with_attribute(("amount", VOLUME_ADJUSTMENT))
                .write_empty()?;
            Ok(())
        })?;
    Ok(())
}

fn write_time_map<W: io::Write>(
    w: &mut Writer<W>,
    clip: &TimelineClip,
    asset: &Asset,
) -> io::Result<()> {
    // Map times share the clip's local timeline, which begins at `start`.
    let span = remap::source_span(clip, asset.frame_duration());
    let local_end = clip.source_start.add(clip.duration);
    let points = [
        (clip.source_start.to_string(), clip.source_start.to_string()),
        (local_end.to_string(), clip.source_start.add(span).to_string()),
    ];
    w.create_element("timeMap")
        .write_inner_content(|w| -> io::Result<()> {
            for (time, value) in &points {
                w.create_element("timept")
                    .with_attribute(("time", time.as_str()))
                    .with_attribute(("value", value.as_str()))
                    .with_attribute(("interp", "smooth2"))
                    .write_empty()?;
            }
            Ok(())
        })?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/emit/fcpx.rs"]
mod tests;
