use crate::foundation::rational::Fraction;
use crate::timeline::builder::TimelineClip;

/// A `(when, value)` point of a time-remap graph, both in frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Keyframe {
    pub when: i64,
    pub value: i64,
}

/// Mapping from timeline frames to source frames for a clip with speed != 1.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SpeedRemap {
    /// Source in point (asset frames).
    pub source_in: i64,
    /// `source_in + consumed`.
    pub source_out: i64,
    /// Source frames read while the clip plays.
    pub consumed: i64,
    /// Clip length in sequence frames.
    pub timeline_frames: i64,
    pub speed: Fraction,
    pub keyframes: [Keyframe; 2],
}

impl SpeedRemap {
    /// Remap for `clip`, or `None` when it plays at unit speed.
    pub fn plan(clip: &TimelineClip, asset_frame: Fraction, sequence_frame: Fraction) -> Option<Self> {
        if !clip.is_retimed() {
            return None;
        }
        let timeline_frames = clip.duration.to_frame_count(sequence_frame);
        let consumed = clip.speed.mul_int(timeline_frames).to_frame_count(Fraction::ONE);
        let source_in = clip.source_in.to_frame_count(asset_frame);

        Some(Self {
            source_in,
            source_out: source_in + consumed,
            consumed,
            timeline_frames,
            speed: clip.speed,
            keyframes: [
                Keyframe { when: 0, value: 0 },
                Keyframe {
                    when: timeline_frames,
                    value: consumed,
                },
            ],
        })
    }

    /// Playback speed as a percentage label (`50`, `200`, `33.33`).
    pub fn percent_label(&self) -> String {
        super::two_decimals(self.speed.to_f64() * 100.0)
    }
}

/// Source time read by a retimed clip, snapped to the asset grid.
pub fn source_span(clip: &TimelineClip, asset_frame: Fraction) -> Fraction {
    clip.duration
        .mul(clip.speed)
        .round_to_frame_boundary(asset_frame)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/remap.rs"]
mod tests;
