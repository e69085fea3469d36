//! Named easing curves.
//!
//! Curves are written the way tween engines name them: `<curve>.<direction>`,
//! e.g. `power3.out` or `power2.inOut`. A bare curve name (`power2`) means the
//! `out` direction; `none` and `linear` both name the identity curve.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Base shape of an easing curve, expressed as its `in` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    Linear,
    /// Polynomial curve `t^(n+1)` for `n` in `1..=4`.
    Power(u8),
    Sine,
    Expo,
    Circ,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EaseDirection {
    In,
    #[default]
    Out,
    InOut,
}

/// A named easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ease {
    pub curve: Curve,
    pub direction: EaseDirection,
}

impl Ease {
    pub const LINEAR: Ease = Ease::new(Curve::Linear, EaseDirection::Out);
    pub const POWER2_IN_OUT: Ease = Ease::new(Curve::Power(2), EaseDirection::InOut);
    pub const POWER3_OUT: Ease = Ease::new(Curve::Power(3), EaseDirection::Out);
    pub const POWER4_OUT: Ease = Ease::new(Curve::Power(4), EaseDirection::Out);

    pub const fn new(curve: Curve, direction: EaseDirection) -> Self {
        Self { curve, direction }
    }

    /// Map normalized progress `t` (clamped to `0.0..=1.0`) through the curve.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self.direction {
            EaseDirection::In => self.ease_in(t),
            EaseDirection::Out => 1.0 - self.ease_in(1.0 - t),
            EaseDirection::InOut => {
                if t < 0.5 {
                    self.ease_in(2.0 * t) / 2.0
                } else {
                    1.0 - self.ease_in(2.0 * (1.0 - t)) / 2.0
                }
            }
        }
    }

    fn ease_in(&self, t: f64) -> f64 {
        match self.curve {
            Curve::Linear => t,
            Curve::Power(n) => t.powi(i32::from(n) + 1),
            Curve::Sine => 1.0 - (t * PI / 2.0).cos(),
            Curve::Expo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * (t - 1.0))
                }
            }
            Curve::Circ => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
        }
    }
}

impl Default for Ease {
    fn default() -> Self {
        Self::POWER3_OUT
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let curve = match self.curve {
            Curve::Linear => return f.write_str("none"),
            Curve::Power(n) => return write!(f, "power{n}.{}", direction_suffix(self.direction)),
            Curve::Sine => "sine",
            Curve::Expo => "expo",
            Curve::Circ => "circ",
        };
        write!(f, "{curve}.{}", direction_suffix(self.direction))
    }
}

fn direction_suffix(direction: EaseDirection) -> &'static str {
    match direction {
        EaseDirection::In => "in",
        EaseDirection::Out => "out",
        EaseDirection::InOut => "inOut",
    }
}

impl FromStr for Ease {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let unknown = || ConfigError::UnknownEase(s.to_string());
        if name.eq_ignore_ascii_case("none") || name.eq_ignore_ascii_case("linear") {
            return Ok(Self::LINEAR);
        }

        let (curve_name, direction) = match name.split_once('.') {
            Some((curve, dir)) => {
                let direction = match dir.to_ascii_lowercase().as_str() {
                    "in" => EaseDirection::In,
                    "out" => EaseDirection::Out,
                    "inout" => EaseDirection::InOut,
                    _ => return Err(unknown()),
                };
                (curve, direction)
            }
            None => (name, EaseDirection::Out),
        };

        let curve = match curve_name.to_ascii_lowercase().as_str() {
            "power0" => Curve::Linear,
            "power1" | "quad" => Curve::Power(1),
            "power2" | "cubic" => Curve::Power(2),
            "power3" | "quart" => Curve::Power(3),
            "power4" | "quint" | "strong" => Curve::Power(4),
            "sine" => Curve::Sine,
            "expo" => Curve::Expo,
            "circ" => Curve::Circ,
            _ => return Err(unknown()),
        };
        Ok(Self::new(curve, direction))
    }
}

impl TryFrom<String> for Ease {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ease> for String {
    fn from(ease: Ease) -> Self {
        ease.to_string()
    }
}
