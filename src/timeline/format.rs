use crate::assets::registry::Asset;
use crate::foundation::core::{Dimensions, FrameRate};
use crate::foundation::error::{CutError, CutResult};
use crate::foundation::rational::Fraction;

/// Audio rate written when neither the options nor the first asset provide one.
pub const DEFAULT_AUDIO_RATE: u32 = 48_000;

/// Frame grid and picture geometry of the output sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SequenceFormat {
    pub frame_rate: FrameRate,
    pub dimensions: Dimensions,
    pub color_space: &'static str,
    pub audio_rate: u32,
}

impl SequenceFormat {
    /// Reject override values no asset could make valid.
    pub fn check_overrides(
        frame_rate: Option<u32>,
        width: Option<u32>,
        height: Option<u32>,
    ) -> CutResult<()> {
        if frame_rate == Some(0) {
            return Err(CutError::invalid_input("sequence frame rate must be > 0"));
        }
        if width == Some(0) || height == Some(0) {
            return Err(CutError::invalid_input("sequence dimensions must be > 0"));
        }
        Ok(())
    }

    /// Sequence format taken from the first clip's asset, with per-field overrides.
    pub fn resolve(
        frame_rate: Option<u32>,
        width: Option<u32>,
        height: Option<u32>,
        first: &Asset,
    ) -> CutResult<Self> {
        Self::check_overrides(frame_rate, width, height)?;
        let frame_rate = match frame_rate {
            Some(fps) => FrameRate::integer(fps)
                .map_err(|_| CutError::invalid_input("sequence frame rate must be > 0"))?,
            None => first.frame_rate,
        };
        Ok(Self {
            frame_rate,
            dimensions: Dimensions {
                width: width.unwrap_or(first.dimensions.width),
                height: height.unwrap_or(first.dimensions.height),
            },
            color_space: first.color_space,
            audio_rate: first.audio_rate.unwrap_or(DEFAULT_AUDIO_RATE),
        })
    }

    /// Duration of one sequence frame.
    pub fn frame_duration(&self) -> Fraction {
        self.frame_rate.frame_duration()
    }

    /// Nominal integer rate used as the XMEML timebase.
    pub fn timebase(&self) -> u32 {
        self.frame_rate.nominal()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/format.rs"]
mod tests;
