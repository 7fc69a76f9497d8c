use std::path::PathBuf;
use std::str::FromStr;

use crate::foundation::error::{CutError, CutResult};
use crate::foundation::rational::Fraction;

/// A time value supplied by the caller: float seconds or an exact fraction string.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    /// Seconds as a number (`2.5`).
    Seconds(f64),
    /// Exact fraction (`"1001/24000s"`).
    Exact(Fraction),
}

impl TimeValue {
    /// Exact value; seconds go through the fixed-scale conversion.
    pub fn to_fraction(self) -> CutResult<Fraction> {
        match self {
            Self::Seconds(s) if s < 0.0 => Err(CutError::invalid_input(format!(
                "time value {s} must not be negative"
            ))),
            Self::Seconds(s) => Fraction::from_seconds(s),
            Self::Exact(f) if f.numer() < 0 => Err(CutError::invalid_input(format!(
                "time value {f} must not be negative"
            ))),
            Self::Exact(f) => Ok(f),
        }
    }
}

impl From<f64> for TimeValue {
    fn from(s: f64) -> Self {
        Self::Seconds(s)
    }
}

impl From<Fraction> for TimeValue {
    fn from(f: Fraction) -> Self {
        Self::Exact(f)
    }
}

impl FromStr for TimeValue {
    type Err = CutError;

    fn from_str(s: &str) -> CutResult<Self> {
        s.parse().map(Self::Exact)
    }
}

fn default_speed() -> f64 {
    1.0
}

/// One clip of the requested cut, in timeline order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClipRequest {
    /// Absolute path of the source media.
    #[serde(default)]
    pub path: PathBuf,
    /// Trim into the source; zero when absent.
    #[serde(default, alias = "start_at", skip_serializing_if = "Option::is_none")]
    pub start: Option<TimeValue>,
    /// Length to use; the rest of the source when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<TimeValue>,
    /// Playback speed ratio (`0.5` is half speed).
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Rotation override in degrees, applied to every clip of the same source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<i32>,
}

impl ClipRequest {
    /// Full-length, unit-speed clip of `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            start: None,
            duration: None,
            speed: default_speed(),
            rotation: None,
        }
    }

    pub fn with_start(mut self, start: impl Into<TimeValue>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn with_duration(mut self, duration: impl Into<TimeValue>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_rotation(mut self, degrees: i32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    /// Exact speed ratio.
    pub fn speed_fraction(&self) -> CutResult<Fraction> {
        Fraction::from_seconds(self.speed)
    }

    /// Check everything that can be checked without probing.
    pub(crate) fn validate(&self, index: usize) -> CutResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(CutError::invalid_input(format!(
                "clip at index {index} must have a path"
            )));
        }
        if let Some(start) = self.start {
            start.to_fraction()?;
        }
        if let Some(duration) = self.duration {
            duration.to_fraction()?;
        }
        if !self.speed.is_finite() || self.speed <= 0.0 || !self.speed_fraction()?.is_positive() {
            return Err(CutError::invalid_input(format!(
                "clip at index {index} has invalid speed {}",
                self.speed
            )));
        }
        Ok(())
    }
}

/// Validate the whole request list; relative paths are reported together.
pub(crate) fn validate_requests(requests: &[ClipRequest]) -> CutResult<()> {
    if requests.is_empty() {
        return Err(CutError::invalid_input("no clips provided"));
    }
    for (index, request) in requests.iter().enumerate() {
        request.validate(index)?;
    }

    let relative: Vec<String> = requests
        .iter()
        .filter(|r| !r.path.is_absolute())
        .map(|r| r.path.display().to_string())
        .collect();
    if !relative.is_empty() {
        return Err(CutError::invalid_input(format!(
            "all clip paths must be absolute; relative paths found: {}",
            relative.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/request.rs"]
mod tests;
