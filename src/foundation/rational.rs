//! Exact rational time values.
//!
//! Every timeline quantity (offsets, durations, frame durations, embedded timecodes) is carried as
//! a [`Fraction`] of seconds. Values are always kept in lowest terms with a positive denominator,
//! so equality is structural and the serialized form (`"1001/24000s"`, `"4s"`, `"0s"`) is
//! canonical.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{CutError, CutResult};

/// Fixed denominator used by [`Fraction::from_seconds`].
pub const SECONDS_SCALE: i64 = 10_000;

/// Exact rational number of seconds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fraction {
    num: i64,
    den: i64, // always > 0
}

impl Fraction {
    /// Canonical zero, rendered as `0s`.
    pub const ZERO: Self = Self { num: 0, den: 1 };

    /// Exactly one second.
    pub const ONE: Self = Self { num: 1, den: 1 };

    /// Build a reduced fraction from `num / den`.
    pub fn reduce(num: i64, den: i64) -> CutResult<Self> {
        if den == 0 {
            return Err(CutError::invalid_input(format!(
                "fraction {num}/0 has a zero denominator"
            )));
        }
        Ok(Self::from_wide(i128::from(num), i128::from(den)))
    }

    /// Whole number of seconds.
    pub const fn from_int(n: i64) -> Self {
        Self { num: n, den: 1 }
    }

    /// Convert floating-point seconds using a fixed denominator of [`SECONDS_SCALE`].
    ///
    /// This is the only place where a float enters timeline math.
    pub fn from_seconds(seconds: f64) -> CutResult<Self> {
        if !seconds.is_finite() {
            return Err(CutError::invalid_input(format!(
                "time value {seconds} is not a finite number of seconds"
            )));
        }
        let scaled = (seconds * SECONDS_SCALE as f64).round();
        if scaled.abs() >= i64::MAX as f64 {
            return Err(CutError::invalid_input(format!(
                "time value {seconds} is out of range"
            )));
        }
        Self::reduce(scaled as i64, SECONDS_SCALE)
    }

    /// Reduced numerator.
    pub fn numer(self) -> i64 {
        self.num
    }

    /// Reduced (positive) denominator.
    pub fn denom(self) -> i64 {
        self.den
    }

    /// Return `true` for the canonical zero.
    pub fn is_zero(self) -> bool {
        self.num == 0
    }

    /// Return `true` when the value is strictly greater than zero.
    pub fn is_positive(self) -> bool {
        self.num > 0
    }

    /// Exact sum.
    pub fn add(self, other: Self) -> Self {
        let num = i128::from(self.num) * i128::from(other.den)
            + i128::from(other.num) * i128::from(self.den);
        Self::from_wide(num, i128::from(self.den) * i128::from(other.den))
    }

    /// Exact difference, clamped so the result is never negative.
    pub fn subtract(self, other: Self) -> Self {
        let num = i128::from(self.num) * i128::from(other.den)
            - i128::from(other.num) * i128::from(self.den);
        if num <= 0 {
            return Self::ZERO;
        }
        Self::from_wide(num, i128::from(self.den) * i128::from(other.den))
    }

    /// Exact product.
    pub fn mul(self, other: Self) -> Self {
        Self::from_wide(
            i128::from(self.num) * i128::from(other.num),
            i128::from(self.den) * i128::from(other.den),
        )
    }

    /// Multiply by an integer count (e.g. frames times frame duration).
    pub fn mul_int(self, n: i64) -> Self {
        Self::from_wide(i128::from(self.num) * i128::from(n), i128::from(self.den))
    }

    /// Number of whole frames in `self`, rounding to nearest with ties away from zero.
    ///
    /// A non-positive `frame_duration` yields zero frames.
    pub fn to_frame_count(self, frame_duration: Self) -> i64 {
        if frame_duration.num <= 0 {
            return 0;
        }
        let num = i128::from(self.num) * i128::from(frame_duration.den);
        let den = i128::from(self.den) * i128::from(frame_duration.num);
        narrow(div_round_half_away(num, den))
    }

    /// Snap to the nearest multiple of `frame_duration`.
    pub fn round_to_frame_boundary(self, frame_duration: Self) -> Self {
        frame_duration.mul_int(self.to_frame_count(frame_duration))
    }

    /// Lossy conversion for display-only values (percentages, logs).
    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Ratio of two unsigned counts; a zero `den` yields zero.
    pub(crate) fn from_ratio(num: u32, den: u32) -> Self {
        if den == 0 {
            return Self::ZERO;
        }
        Self::from_wide(i128::from(num), i128::from(den))
    }

    fn from_wide(num: i128, den: i128) -> Self {
        if num == 0 {
            return Self::ZERO;
        }
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
        let g = gcd(num.unsigned_abs(), den.unsigned_abs()) as i128;
        Self {
            num: narrow(num / g),
            den: narrow(den / g),
        }
    }
}

/// Euclidean greatest common divisor.
pub fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

fn div_round_half_away(num: i128, den: i128) -> i128 {
    // den > 0
    if num >= 0 {
        (2 * num + den) / (2 * den)
    } else {
        -((2 * -num + den) / (2 * den))
    }
}

// Saturates; timeline values stay many orders of magnitude below the i64 range.
fn narrow(v: i128) -> i64 {
    v.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

impl Default for Fraction {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = i128::from(self.num) * i128::from(other.den);
        let rhs = i128::from(other.num) * i128::from(self.den);
        lhs.cmp(&rhs)
    }
}

impl std::ops::Add for Fraction {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Fraction::add(self, rhs)
    }
}

impl std::iter::Sum for Fraction {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Fraction::add)
    }
}

impl fmt::Debug for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fraction({self})")
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}s", self.num)
        } else {
            write!(f, "{}/{}s", self.num, self.den)
        }
    }
}

impl FromStr for Fraction {
    type Err = CutError;

    /// Parse `N/Ds` or `Ns`.
    fn from_str(s: &str) -> CutResult<Self> {
        let malformed = || CutError::invalid_input(format!("malformed time fraction '{s}'"));
        let body = s.trim().strip_suffix('s').ok_or_else(malformed)?;
        let parse = |part: &str| -> CutResult<i64> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            part.parse::<i64>().map_err(|_| malformed())
        };
        match body.split_once('/') {
            Some((n, d)) => Self::reduce(parse(n)?, parse(d)?),
            None => Ok(Self::from_int(parse(body)?)),
        }
    }
}

impl TryFrom<String> for Fraction {
    type Error = CutError;

    fn try_from(s: String) -> CutResult<Self> {
        s.parse()
    }
}

impl From<Fraction> for String {
    fn from(f: Fraction) -> Self {
        f.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/rational.rs"]
mod tests;
