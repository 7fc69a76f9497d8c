use crate::assets::registry::{AssetId, AssetRegistry};
use crate::foundation::error::{CutError, CutResult};
use crate::foundation::rational::Fraction;
use crate::timeline::format::SequenceFormat;
use crate::timeline::request::ClipRequest;

/// One clip placed on the timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimelineClip {
    pub asset: AssetId,
    /// Requested trim snapped to the asset's frame grid.
    pub source_in: Fraction,
    /// Embedded camera timecode plus `source_in`.
    pub source_start: Fraction,
    /// Duration on the asset's frame grid.
    pub source_duration: Fraction,
    /// Duration on the asset grid, then on the sequence grid.
    pub duration: Fraction,
    /// Sum of all previous clip durations.
    pub offset: Fraction,
    pub speed: Fraction,
    pub rotation: i32,
}

impl TimelineClip {
    /// `true` when the clip plays at a speed other than 1.
    pub fn is_retimed(&self) -> bool {
        self.speed != Fraction::ONE
    }

    /// Timeline end of the clip.
    pub fn end(&self) -> Fraction {
        self.offset.add(self.duration)
    }
}

/// Gapless, non-overlapping sequence of clips.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Timeline {
    pub clips: Vec<TimelineClip>,
    pub duration: Fraction,
}

impl Timeline {
    /// Place `requests` back to back.
    #[tracing::instrument(skip_all, fields(clips = requests.len()))]
    pub fn build(
        requests: &[ClipRequest],
        registry: &AssetRegistry,
        format: &SequenceFormat,
    ) -> CutResult<Self> {
        let sequence_frame = format.frame_duration();
        let mut offset = Fraction::ZERO;
        let mut clips = Vec::with_capacity(requests.len());

        for request in requests {
            let asset = registry.get(&request.path).ok_or_else(|| {
                CutError::invalid_input(format!(
                    "clip source '{}' is not registered",
                    request.path.display()
                ))
            })?;
            let asset_frame = asset.frame_duration();

            let requested_start = request.start.map(|s| s.to_fraction()).transpose()?;
            let source_in = requested_start
                .unwrap_or(Fraction::ZERO)
                .round_to_frame_boundary(asset_frame);

            let raw_duration = match (request.duration, requested_start) {
                (Some(d), _) => d.to_fraction()?,
                (None, Some(start)) if !start.is_zero() => asset.duration.subtract(source_in),
                (None, _) => asset.duration,
            };
            let source_duration = raw_duration.round_to_frame_boundary(asset_frame);
            let duration = source_duration.round_to_frame_boundary(sequence_frame);

            tracing::debug!(
                asset = %asset.id,
                source_in = %source_in,
                duration = %duration,
                offset = %offset,
                "placed clip"
            );

            clips.push(TimelineClip {
                asset: asset.id.clone(),
                source_in,
                source_start: asset.timecode.add(source_in),
                source_duration,
                duration,
                offset,
                speed: request.speed_fraction()?,
                rotation: asset.rotation,
            });
            offset = offset.add(duration);
        }

        Ok(Self {
            clips,
            duration: offset,
        })
    }

    /// Total length in sequence frames.
    pub fn frame_count(&self, format: &SequenceFormat) -> i64 {
        self.duration.to_frame_count(format.frame_duration())
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/builder.rs"]
mod tests;
