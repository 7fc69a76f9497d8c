use crate::foundation::error::{CutError, CutResult};
use crate::foundation::rational::Fraction;

/// Exact frames-per-second represented as a reduced rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameRate {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl FrameRate {
    /// Create a validated, reduced frame rate.
    pub fn new(num: u32, den: u32) -> CutResult<Self> {
        if den == 0 {
            return Err(CutError::invalid_input("frame rate denominator must be > 0"));
        }
        if num == 0 {
            return Err(CutError::invalid_input("frame rate numerator must be > 0"));
        }
        let g = crate::foundation::rational::gcd(u128::from(num), u128::from(den)) as u32;
        Ok(Self {
            num: num / g,
            den: den / g,
        })
    }

    /// Integer frame rate such as a sequence override (`25` => `25/1`).
    pub fn integer(fps: u32) -> CutResult<Self> {
        Self::new(fps, 1)
    }

    /// Parse an ffprobe-style ratio such as `30000/1001` or `25/1`.
    pub fn parse(s: &str) -> CutResult<Self> {
        let invalid = || CutError::invalid_input(format!("invalid frame rate '{s}'"));
        let (num, den) = s.trim().split_once('/').ok_or_else(invalid)?;
        let num = num.trim().parse::<u32>().map_err(|_| invalid())?;
        let den = den.trim().parse::<u32>().map_err(|_| invalid())?;
        Self::new(num, den).map_err(|_| invalid())
    }

    /// Duration of one frame in seconds (`den/num`).
    pub fn frame_duration(self) -> Fraction {
        Fraction::from_ratio(self.den, self.num)
    }

    /// Nominal integer rate (`30000/1001` => `30`), rounded half away from zero.
    pub fn nominal(self) -> u32 {
        let num = u64::from(self.num);
        let den = u64::from(self.den);
        ((2 * num + den) / (2 * den)) as u32
    }

    /// `true` when the exact rate is a non-integer NTSC variant.
    pub fn is_ntsc(self) -> bool {
        self.den != 1
    }

    /// `true` for the two rates that use drop-frame timecode (29.97 and 59.94).
    pub fn is_drop_frame_rate(self) -> bool {
        self.den == 1001 && (self.num == 30_000 || self.num == 60_000)
    }
}

impl std::fmt::Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Pixel dimensions of a picture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Return `true` when height exceeds width.
    pub fn is_portrait(self) -> bool {
        self.height > self.width
    }

    /// Return `true` when width exceeds height.
    pub fn is_landscape(self) -> bool {
        self.width > self.height
    }

    /// Swap width and height.
    pub fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
