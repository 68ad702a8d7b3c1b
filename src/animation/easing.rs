//! Easing curves for card animations.
//!
//! Names follow the `powerN.mode` convention common to web tweening
//! libraries (`power3.out`, `power1.inOut`, `none`). `powerN` raises progress
//! to the power N + 1; a bare `powerN` means `powerN.out`.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::FolioError;

/// Highest supported power.
const MAX_POWER: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Easing {
    /// Linear interpolation (no easing).
    Linear,
    /// Slow start.
    In(u8),
    /// Fast start, slow end.
    Out(u8),
    /// Slow start and end.
    InOut(u8),
}

impl Easing {
    /// Default for layout moves.
    pub const POWER3_OUT: Easing = Easing::Out(3);
    /// Used for the expanded card and hover scale.
    pub const POWER2_OUT: Easing = Easing::Out(2);

    /// Evaluate the curve at `t`, clamped to [0, 1].
    #[inline]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::In(p) => t.powi(exponent(p)),
            Easing::Out(p) => 1.0 - (1.0 - t).powi(exponent(p)),
            Easing::InOut(p) => {
                let e = exponent(p);
                if t < 0.5 {
                    (2.0 * t).powi(e) / 2.0
                } else {
                    1.0 - (2.0 * (1.0 - t)).powi(e) / 2.0
                }
            }
        }
    }
}

fn exponent(power: u8) -> i32 {
    i32::from(power.clamp(1, MAX_POWER)) + 1
}

impl Default for Easing {
    fn default() -> Self {
        Self::POWER3_OUT
    }
}

impl FromStr for Easing {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.eq_ignore_ascii_case("none") || name.eq_ignore_ascii_case("linear") {
            return Ok(Easing::Linear);
        }

        let unknown = || FolioError::UnknownEasing(s.to_string());
        let (family, mode) = match name.split_once('.') {
            Some((family, mode)) => (family, mode),
            None => (name, "out"),
        };
        let power = family
            .strip_prefix("power")
            .and_then(|p| p.parse::<u8>().ok())
            .filter(|p| (1..=MAX_POWER).contains(p))
            .ok_or_else(unknown)?;

        match mode {
            "in" => Ok(Easing::In(power)),
            "out" => Ok(Easing::Out(power)),
            "inOut" | "inout" => Ok(Easing::InOut(power)),
            _ => Err(unknown()),
        }
    }
}

impl TryFrom<String> for Easing {
    type Error = FolioError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => write!(f, "none"),
            Easing::In(p) => write!(f, "power{}.in", p),
            Easing::Out(p) => write!(f, "power{}.out", p),
            Easing::InOut(p) => write!(f, "power{}.inOut", p),
        }
    }
}
