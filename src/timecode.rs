//! SMPTE timecode decoding.
//!
//! Camera files carry their start timecode as text (`01:00:00:00`, or `01:00:00;00` for
//! drop-frame). Editors expect the asset start as an exact offset, so decoding goes straight from
//! the four clock fields to a frame count and then to a [`Fraction`] of seconds.

use std::fmt;

use crate::foundation::core::FrameRate;
use crate::foundation::rational::Fraction;

/// Parsed `HH:MM:SS:FF` / `HH:MM:SS;FF` clock value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timecode {
    /// Hours field.
    pub hours: u32,
    /// Minutes field.
    pub minutes: u32,
    /// Seconds field.
    pub seconds: u32,
    /// Frames field.
    pub frames: u32,
    /// `true` when the string used the `;` drop-frame marker.
    pub drop_marker: bool,
}

impl Timecode {
    /// Parse a four-field timecode string. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let drop_marker = s.contains(';');
        let mut fields = [0u32; 4];
        let mut count = 0;
        for part in s.split([':', ';']) {
            if count == fields.len() {
                return None;
            }
            fields[count] = part.trim().parse().ok()?;
            count += 1;
        }
        if count != fields.len() {
            return None;
        }
        let [hours, minutes, seconds, frames] = fields;
        Some(Self {
            hours,
            minutes,
            seconds,
            frames,
            drop_marker,
        })
    }

    /// Non-drop-frame timecode for an absolute frame count.
    pub fn from_frame_count(frame_count: u64, rate: FrameRate) -> Self {
        let fps = u64::from(rate.nominal().max(1));
        let frames = frame_count % fps;
        let total_seconds = frame_count / fps;
        Self {
            hours: (total_seconds / 3600) as u32,
            minutes: ((total_seconds / 60) % 60) as u32,
            seconds: (total_seconds % 60) as u32,
            frames: frames as u32,
            drop_marker: false,
        }
    }

    /// `true` when this value must be counted with drop-frame rules at `rate`.
    pub fn is_drop_frame(&self, rate: FrameRate) -> bool {
        let nominal = rate.nominal();
        self.drop_marker && (nominal == 30 || nominal == 60) && rate.is_drop_frame_rate()
    }

    /// Absolute frame count at `rate`, clamped at zero.
    pub fn frame_count(&self, rate: FrameRate) -> u64 {
        let nominal = i64::from(rate.nominal());
        let clock_seconds = i64::from(self.hours) * 3600
            + i64::from(self.minutes) * 60
            + i64::from(self.seconds);
        let mut total = clock_seconds * nominal + i64::from(self.frames);

        if self.is_drop_frame(rate) {
            let drop_per_minute = if nominal == 60 { 4 } else { 2 };
            let total_minutes = i64::from(self.hours) * 60 + i64::from(self.minutes);
            total -= drop_per_minute * (total_minutes - total_minutes / 10);
        }

        total.max(0) as u64
    }

    /// Exact offset in seconds: frame count times the frame duration of `rate`.
    pub fn to_fraction(&self, rate: FrameRate) -> Fraction {
        rate.frame_duration().mul_int(self.frame_count(rate) as i64)
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.drop_marker { ';' } else { ':' };
        write!(
            f,
            "{:02}:{:02}:{:02}{sep}{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}

/// Decode an optional timecode string at `rate`; missing or unparseable input is zero.
pub fn decode(timecode: Option<&str>, rate: FrameRate) -> Fraction {
    timecode
        .filter(|s| !s.trim().is_empty())
        .and_then(Timecode::parse)
        .filter(|_| rate.nominal() > 0)
        .map(|tc| tc.to_fraction(rate))
        .unwrap_or(Fraction::ZERO)
}

#[cfg(test)]
#[path = "../tests/unit/timecode.rs"]
mod tests;
