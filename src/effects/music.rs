use crate::foundation::rational::Fraction;

/// Placement of the music bed on the second audio track, in sequence frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct MusicPlacement {
    /// Requested skip into the music file.
    pub offset_frames: i64,
    /// Full length of the music file.
    pub asset_frames: i64,
    /// Frames actually laid down: the music is trimmed to the picture length.
    pub effective_frames: i64,
    pub in_frame: i64,
    pub out_frame: i64,
}

impl MusicPlacement {
    /// Trim a music bed of `music_duration` starting `audio_start` into the file so it runs
    /// under `sequence_frames` of picture.
    pub fn place(
        music_duration: Fraction,
        audio_start: Fraction,
        sequence_frames: i64,
        sequence_frame: Fraction,
    ) -> Self {
        let offset_frames = audio_start.to_frame_count(sequence_frame);
        let asset_frames = music_duration.to_frame_count(sequence_frame);
        let effective_frames = asset_frames.min(sequence_frames);
        Self {
            offset_frames,
            asset_frames,
            effective_frames,
            in_frame: offset_frames,
            out_frame: offset_frames + effective_frames,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/music.rs"]
mod tests;
