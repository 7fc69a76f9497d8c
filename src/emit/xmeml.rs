//! XML Interchange Format (xmeml v5) emitter, read by Final Cut Pro 7, Premiere Pro and Resolve.
//!
//! Times are integer frame counts against a declared `timebase`/`ntsc` pair: sequence values use
//! the sequence rate, clip in/out points and file metadata use each asset's own rate.

use std::io;

use quick_xml::Writer;

use crate::assets::registry::{Asset, MusicAsset};
use crate::effects::motion::MotionParams;
use crate::effects::music::MusicPlacement;
use crate::effects::remap::SpeedRemap;
use crate::emit::xml::{document_writer, finish, flag, io_error, text};
use crate::emit::{Document, EditorKind, Emitter, RenderRequest};
use crate::foundation::core::FrameRate;
use crate::foundation::error::{CutError, CutResult};
use crate::timeline::SequenceFormat;

const XMEML_VERSION: &str = "5";
const SAMPLE_DEPTH: u32 = 16;
const OUTPUT_CHANNELS: u32 = 2;

/// Writes xmeml for the FCP7 family of editors.
#[derive(Clone, Copy, Debug, Default)]
pub struct XmemlEmitter;

/// `<rate>` values for one frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RateTag {
    timebase: u32,
    ntsc: bool,
    drop_frame: bool,
}

impl RateTag {
    fn of(rate: FrameRate) -> Self {
        Self {
            timebase: rate.nominal(),
            ntsc: rate.is_ntsc(),
            drop_frame: rate.is_drop_frame_rate(),
        }
    }

    fn display_format(self) -> &'static str {
        if self.drop_frame { "DF" } else { "NDF" }
    }

    fn write<W: io::Write>(self, w: &mut Writer<W>) -> io::Result<()> {
        w.create_element("rate")
            .write_inner_content(|w| -> io::Result<()> {
                text(w, "timebase", self.timebase)?;
                text(w, "ntsc", flag(self.ntsc))
            })?;
        Ok(())
    }

    fn write_timecode<W: io::Write>(self, w: &mut Writer<W>, frame: i64) -> io::Result<()> {
        w.create_element("timecode")
            .write_inner_content(|w| -> io::Result<()> {
                self.write(w)?;
                text(w, "frame", frame)?;
                text(w, "displayformat", self.display_format())
            })?;
        Ok(())
    }
}

/// Frame-resolved values for one timeline clip.
struct ClipItem<'a> {
    index: usize,
    asset: &'a Asset,
    start: i64,
    end: i64,
    duration: i64,
    source_in: i64,
    source_out: i64,
    rate: RateTag,
    asset_frames: i64,
    timecode_frame: i64,
    motion: Option<MotionParams>,
    remap: Option<SpeedRemap>,
}

impl ClipItem<'_> {
    fn video_id(&self) -> String {
        format!("clipitem-video-{}", self.index)
    }

    fn audio_id(&self) -> String {
        format!("clipitem-audio-{}", self.index)
    }

    fn file_id(&self) -> String {
        format!("file-{}", self.asset.id)
    }
}

impl Emitter for XmemlEmitter {
    fn kind(&self) -> EditorKind {
        EditorKind::Fcp7
    }

    #[tracing::instrument(skip_all, fields(clips = req.timeline.clips.len()))]
    fn render(&self, req: &RenderRequest<'_>) -> CutResult<Document> {
        let format = req.format;
        let first = req
            .registry
            .first()
            .ok_or_else(|| CutError::invalid_input("no clips provided"))?;
        let sequence_frame = format.frame_duration();
        let sequence_frames = req.timeline.frame_count(format);

        let mut items = Vec::with_capacity(req.timeline.clips.len());
        for (i, clip) in req.timeline.clips.iter().enumerate() {
            let asset = req.registry.by_id(&clip.asset).ok_or_else(|| {
                CutError::invalid_input(format!("clip references unknown asset {}", clip.asset))
            })?;
            let asset_frame = asset.frame_duration();
            let start = clip.offset.to_frame_count(sequence_frame);
            let duration = clip.duration.to_frame_count(sequence_frame);
            let remap = SpeedRemap::plan(clip, asset_frame, sequence_frame);
            let source_in = clip.source_in.to_frame_count(asset_frame);
            let source_out = match &remap {
                Some(r) => r.source_out,
                None => source_in + clip.source_duration.to_frame_count(asset_frame),
            };

            items.push(ClipItem {
                index: i + 1,
                asset,
                start,
                end: start + duration,
                duration,
                source_in,
                source_out,
                rate: RateTag::of(asset.frame_rate),
                asset_frames: asset.duration.to_frame_count(asset_frame),
                timecode_frame: asset.timecode.to_frame_count(asset_frame),
                motion: MotionParams::compensate(asset.dimensions, clip.rotation, format.dimensions),
                remap,
            });
        }

        let music = req.registry.music().map(|m| {
            let placement =
                MusicPlacement::place(m.duration, req.audio_start, sequence_frames, sequence_frame);
            (m, placement)
        });

        let sequence_uid = req.stamp.sequence_uid.to_string();
        let sequence_id = format!("sequence-{sequence_uid}");
        let sequence_name = format!("{} {}", first.basename, req.stamp.suffix());
        let rate = RateTag::of(format.frame_rate);

        let mut w = document_writer("xmeml")?;
        w.create_element("xmeml")
            .with_attribute(("version", XMEML_VERSION))
            .write_inner_content(|w| -> io::Result<()> {
                w.create_element("sequence")
                    .with_attribute(("id", sequence_id.as_str()))
                    .write_inner_content(|w| -> io::Result<()> {
                        text(w, "uuid", &sequence_uid)?;
                        text(w, "name", &sequence_name)?;
                        text(w, "duration", sequence_frames)?;
                        rate.write(w)?;
                        text(w, "in", 0)?;
                        text(w, "out", sequence_frames)?;
                        rate.write_timecode(w, 0)?;
                        w.create_element("media")
                            .write_inner_content(|w| -> io::Result<()> {
                                write_video(w, format, rate, &items)?;
                                write_audio(w, format, rate, &items, music)
                            })?;
                        Ok(())
                    })?;
                Ok(())
            })
            .map_err(io_error)?;

        Ok(Document {
            kind: EditorKind::Fcp7,
            xml: finish(w)?,
        })
    }
}

fn write_video<W: io::Write>(
    w: &mut Writer<W>,
    format: &SequenceFormat,
    rate: RateTag,
    items: &[ClipItem<'_>],
) -> io::Result<()> {
    w.create_element("video")
        .write_inner_content(|w| -> io::Result<()> {
            w.create_element("format")
                .write_inner_content(|w| -> io::Result<()> {
                    write_video_characteristics(
                        w,
                        rate,
                        format.dimensions.width,
                        format.dimensions.height,
                    )
                })?;
            w.create_element("track")
                .write_inner_content(|w| -> io::Result<()> {
                    for item in items {
                        write_video_clipitem(w, item, format.audio_rate)?;
                    }
                    Ok(())
                })?;
            Ok(())
        })?;
    Ok(())
}

fn write_audio<W: io::Write>(
    w: &mut Writer<W>,
    format: &SequenceFormat,
    rate: RateTag,
    items: &[ClipItem<'_>],
    music: Option<(&MusicAsset, MusicPlacement)>,
) -> io::Result<()> {
    w.create_element("audio")
        .write_inner_content(|w| -> io::Result<()> {
            text(w, "numOutputChannels", OUTPUT_CHANNELS)?;
            w.create_element("format")
                .write_inner_content(|w| -> io::Result<()> {
                    write_audio_characteristics(w, format.audio_rate)
                })?;
            w.create_element("track")
                .write_inner_content(|w| -> io::Result<()> {
                    for item in items {
                        write_audio_clipitem(w, item, format.audio_rate)?;
                    }
                    Ok(())
                })?;
            if let Some((asset, placement)) = music {
                w.create_element("track")
                    .write_inner_content(|w| -> io::Result<()> {
                        write_music_clipitem(w, asset, placement, rate, format.audio_rate)
                    })?;
            }
            Ok(())
        })?;
    Ok(())
}

fn write_video_characteristics<W: io::Write>(
    w: &mut Writer<W>,
    rate: RateTag,
    width: u32,
    height: u32,
) -> io::Result<()> {
    w.create_element("samplecharacteristics")
        .write_inner_content(|w| -> io::Result<()> {
            rate.write(w)?;
            text(w, "width", width)?;
            text(w, "height", height)?;
            text(w, "anamorphic", "FALSE")?;
            text(w, "pixelaspectratio", "square")?;
            text(w, "fielddominance", "none")
        })?;
    Ok(())
}

fn write_audio_characteristics<W: io::Write>(w: &mut Writer<W>, sample_rate: u32) -> io::Result<()> {
    w.create_element("samplecharacteristics")
        .write_inner_content(|w| -> io::Result<()> {
            text(w, "samplerate", sample_rate)?;
            text(w, "sampledepth", SAMPLE_DEPTH)
        })?;
    Ok(())
}

/// Shared head of video and audio clip items: name, placement and in/out.
fn write_clip_timing<W: io::Write>(w: &mut Writer<W>, item: &ClipItem<'_>) -> io::Result<()> {
    text(w, "name", &item.asset.basename)?;
    text(w, "enabled", "TRUE")?;
    text(w, "duration", item.duration)?;
    text(w, "start", item.start)?;
    text(w, "end", item.end)?;
    text(w, "in", item.source_in)?;
    text(w, "out", item.source_out)
}

fn write_source_track<W: io::Write>(w: &mut Writer<W>, media: &str) -> io::Result<()> {
    w.create_element("sourcetrack")
        .write_inner_content(|w| -> io::Result<()> {
            text(w, "mediatype", media)?;
            text(w, "trackindex", 1)
        })?;
    Ok(())
}

fn write_video_clipitem<W: io::Write>(
    w: &mut Writer<W>,
    item: &ClipItem<'_>,
    sequence_audio_rate: u32,
) -> io::Result<()> {
    let id = item.video_id();
    let file_id = item.file_id();
    let asset = item.asset;
    let audio_rate = asset.audio_rate.unwrap_or(sequence_audio_rate);

    w.create_element("clipitem")
        .with_attribute(("id", id.as_str()))
        .write_inner_content(|w| -> io::Result<()> {
            write_clip_timing(w, item)?;
            w.create_element("file")
                .with_attribute(("id", file_id.as_str()))
                .write_inner_content(|w| -> io::Result<()> {
                    text(w, "name", &asset.filename)?;
                    text(w, "pathurl", &asset.file_url)?;
                    item.rate.write(w)?;
                    text(w, "duration", item.asset_frames)?;
                    item.rate.write_timecode(w, item.timecode_frame)?;
                    w.create_element("media")
                        .write_inner_content(|w| -> io::Result<()> {
                            w.create_element("video")
                                .write_inner_content(|w| -> io::Result<()> {
                                    write_video_characteristics(
                                        w,
                                        item.rate,
                                        asset.dimensions.width,
                                        asset.dimensions.height,
                                    )
                                })?;
                            w.create_element("audio")
                                .write_inner_content(|w| -> io::Result<()> {
                                    write_audio_characteristics(w, audio_rate)
                                })?;
                            Ok(())
                        })?;
                    Ok(())
                })?;
            write_source_track(w, "video")?;
            if let Some(motion) = &item.motion {
                write_motion_filter(w, motion)?;
            }
            if let Some(remap) = &item.remap {
                write_time_remap_filter(w, remap)?;
            }
            write_links(w, item)
        })?;
    Ok(())
}

fn write_audio_clipitem<W: io::Write>(
    w: &mut Writer<W>,
    item: &ClipItem<'_>,
    sequence_audio_rate: u32,
) -> io::Result<()> {
    let id = item.audio_id();
    let file_id = item.file_id();
    let asset = item.asset;
    let audio_rate = asset.audio_rate.unwrap_or(sequence_audio_rate);

    w.create_element("clipitem")
        .with_attribute(("id", id.as_str()))
        .write_inner_content(|w| -> io::Result<()> {
            write_clip_timing(w, item)?;
            w.create_element("file")
                .with_attribute(("id", file_id.as_str()))
                .write_inner_content(|w| -> io::Result<()> {
                    text(w, "name", &asset.filename)?;
                    text(w, "pathurl", &asset.file_url)?;
                    item.rate.write(w)?;
                    text(w, "duration", item.asset_frames)?;
                    w.create_element("media")
                        .write_inner_content(|w| -> io::Result<()> {
                            w.create_element("audio")
                                .write_inner_content(|w| -> io::Result<()> {
                                    write_audio_characteristics(w, audio_rate)
                                })?;
                            Ok(())
                        })?;
                    Ok(())
                })?;
            write_source_track(w, "audio")?;
            text(w, "channelcount", OUTPUT_CHANNELS)?;
            write_links(w, item)
        })?;
    Ok(())
}

fn write_links<W: io::Write>(w: &mut Writer<W>, item: &ClipItem<'_>) -> io::Result<()> {
    let video_id = item.video_id();
    let audio_id = item.audio_id();
    w.create_element("link")
        .write_inner_content(|w| -> io::Result<()> {
            text(w, "linkclipref", &video_id)?;
            text(w, "mediatype", "video")?;
            text(w, "trackindex", 1)?;
            text(w, "clipindex", item.index)
        })?;
    w.create_element("link")
        .write_inner_content(|w| -> io::Result<()> {
            text(w, "linkclipref", &audio_id)?;
            text(w, "mediatype", "audio")?;
            text(w, "trackindex", 1)?;
            text(w, "clipindex", item.index)?;
            text(w, "groupindex", 1)
        })?;
    Ok(())
}

fn write_effect_header<W: io::Write>(w: &mut Writer<W>, name: &str, id: &str) -> io::Result<()> {
    text(w, "name", name)?;
    text(w, "effectid", id)?;
    text(w, "effectcategory", "motion")?;
    text(w, "effecttype", "motion")?;
    text(w, "mediatype", "video")
}

fn write_motion_filter<W: io::Write>(w: &mut Writer<W>, motion: &MotionParams) -> io::Result<()> {
    let scale = motion.scale_label();
    w.create_element("filter")
        .write_inner_content(|w| -> io::Result<()> {
            w.create_element("effect")
                .write_inner_content(|w| -> io::Result<()> {
                    write_effect_header(w, "Basic Motion", "basic")?;
                    text(w, "pproBypass", "false")?;
                    w.create_element("parameter")
                        .write_inner_content(|w| -> io::Result<()> {
                            text(w, "parameterid", "scale")?;
                            text(w, "name", "Scale")?;
                            text(w, "valuemin", 0)?;
                            text(w, "valuemax", 1000)?;
                            text(w, "value", &scale)
                        })?;
                    if motion.rotation != 0 {
                        w.create_element("parameter")
                            .write_inner_content(|w| -> io::Result<()> {
                                text(w, "parameterid", "rotation")?;
                                text(w, "name", "Rotation")?;
                                text(w, "valuemin", -8640)?;
                                text(w, "valuemax", 8640)?;
                                text(w, "value", motion.rotation)
                            })?;
                    }
                    w.create_element("parameter")
                        .write_inner_content(|w| -> io::Result<()> {
                            text(w, "parameterid", "center")?;
                            text(w, "name", "Center")?;
                            w.create_element("value")
                                .write_inner_content(|w| -> io::Result<()> {
                                    text(w, "horiz", 0)?;
                                    text(w, "vert", 0)
                                })?;
                            Ok(())
                        })?;
                    Ok(())
                })?;
            Ok(())
        })?;
    Ok(())
}

fn write_time_remap_filter<W: io::Write>(w: &mut Writer<W>, remap: &SpeedRemap) -> io::Result<()> {
    let percent = remap.percent_label();
    w.create_element("filter")
        .write_inner_content(|w| -> io::Result<()> {
            w.create_element("effect")
                .write_inner_content(|w| -> io::Result<()> {
                    write_effect_header(w, "Time Remap", "timeremap")?;
                    write_simple_parameter(w, "variablespeed", "0")?;
                    write_simple_parameter(w, "speed", &percent)?;
                    write_simple_parameter(w, "reverse", "FALSE")?;
                    write_simple_parameter(w, "frameblending", "FALSE")?;
                    w.create_element("parameter")
                        .write_inner_content(|w| -> io::Result<()> {
                            text(w, "parameterid", "graphdict")?;
                            text(w, "name", "graphdict")?;
                            text(w, "valuemin", 0)?;
                            text(w, "valuemax", remap.timeline_frames)?;
                            for kf in &remap.keyframes {
                                w.create_element("keyframe")
                                    .write_inner_content(|w| -> io::Result<()> {
                                        text(w, "when", kf.when)?;
                                        text(w, "value", kf.value)
                                    })?;
                            }
                            Ok(())
                        })?;
                    Ok(())
                })?;
            Ok(())
        })?;
    Ok(())
}

fn write_simple_parameter<W: io::Write>(w: &mut Writer<W>, id: &str, value: &str) -> io::Result<()> {
    w.create_element("parameter")
        .write_inner_content(|w| -> io::Result<()> {
            text(w, "parameterid", id)?;
            text(w, "name", id)?;
            text(w, "value", value)
        })?;
    Ok(())
}

fn write_music_clipitem<W: io::Write>(
    w: &mut Writer<W>,
    music: &MusicAsset,
    placement: MusicPlacement,
    rate: RateTag,
    sequence_audio_rate: u32,
) -> io::Result<()> {
    let file_id = format!("file-music-{}", music.id);
    let sample_rate = music.sample_rate.unwrap_or(sequence_audio_rate);

    w.create_element("clipitem")
        .with_attribute(("id", "clipitem-music-1"))
        .write_inner_content(|w| -> io::Result<()> {
            text(w, "name", &music.basename)?;
            text(w, "enabled", "TRUE")?;
            text(w, "duration", placement.effective_frames)?;
            text(w, "start", 0)?;
            text(w, "end", placement.effective_frames)?;
            text(w, "in", placement.in_frame)?;
            text(w, "out", placement.out_frame)?;
            w.create_element("file")
                .with_attribute(("id", file_id.as_str()))
                .write_inner_content(|w| -> io::Result<()> {
                    text(w, "name", &music.filename)?;
                    text(w, "pathurl", &music.file_url)?;
                    rate.write(w)?;
                    text(w, "duration", placement.asset_frames)?;
                    w.create_element("media")
                        .write_inner_content(|w| -> io::Result<()> {
                            w.create_element("audio")
                                .write_inner_content(|w| -> io::Result<()> {
                                    write_audio_characteristics(w, sample_rate)
                                })?;
                            Ok(())
                        })?;
                    Ok(())
                })?;
            write_source_track(w, "audio")?;
            text(w, "channelcount", OUTPUT_CHANNELS)
        })?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/emit/xmeml.rs"]
mod tests;
