//! The nine orbit curve families.

use std::f64::consts::{SQRT_2, TAU};
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Epicycloid fixed-circle radius as a fraction of the orbit radius.
const EPICYCLOID_A: f64 = 0.6;
/// Epicycloid rolling-circle radius as a fraction of the orbit radius.
const EPICYCLOID_B: f64 = 0.2;
/// Smallest lemniscate denominator; keeps the singular angle finite.
const LEMNISCATE_MIN_DENOM: f64 = 1e-6;

/// Shape of an orbit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrbitCurve {
    #[default]
    Circle,
    Ellipse,
    InclinedEllipse,
    Lissajous,
    Rose,
    Lemniscate,
    Trefoil,
    #[serde(rename = "figure8Knot")]
    Figure8Knot,
    Epicycloid,
}

impl OrbitCurve {
    /// Every curve family.
    pub const ALL: [OrbitCurve; 9] = [
        OrbitCurve::Circle,
        OrbitCurve::Ellipse,
        OrbitCurve::InclinedEllipse,
        OrbitCurve::Lissajous,
        OrbitCurve::Rose,
        OrbitCurve::Lemniscate,
        OrbitCurve::Trefoil,
        OrbitCurve::Figure8Knot,
        OrbitCurve::Epicycloid,
    ];

    /// Stable name used in config files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            OrbitCurve::Circle => "circle",
            OrbitCurve::Ellipse => "ellipse",
            OrbitCurve::InclinedEllipse => "inclinedEllipse",
            OrbitCurve::Lissajous => "lissajous",
            OrbitCurve::Rose => "rose",
            OrbitCurve::Lemniscate => "lemniscate",
            OrbitCurve::Trefoil => "trefoil",
            OrbitCurve::Figure8Knot => "figure8Knot",
            OrbitCurve::Epicycloid => "epicycloid",
        }
    }

    /// Time for one full loop at angular speed `speed`, or `None` when stationary.
    pub fn period(speed: f64) -> Option<f64> {
        (speed != 0.0).then(|| TAU / speed.abs())
    }
}

/// Unknown names fall back to a circle.
impl FromStr for OrbitCurve {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(OrbitCurve::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .unwrap_or(OrbitCurve::Circle))
    }
}

impl std::fmt::Display for OrbitCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Size, speed and shape controls shared by all curve families.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitParams {
    /// Primary radius `R`.
    pub radius_x: f64,
    /// Secondary radius, used by ellipses and the Lissajous vertical swing.
    pub radius_y: f64,
    /// Angular speed in radians per second.
    pub speed: f64,
    /// Phase offset in radians.
    pub phase: f64,
    /// Tilt about the x-axis for the inclined ellipse, in radians.
    pub inclination: f64,
    /// Harmonic count for Lissajous and rose curves.
    pub harmonics: u32,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            radius_x: 3.0,
            radius_y: 2.0,
            speed: 0.5,
            phase: 0.0,
            inclination: 0.4,
            harmonics: 3,
        }
    }
}

/// Position on `curve` after `t` seconds. Stateless: equal inputs give equal outputs.
pub fn orbit_position(t: f64, curve: OrbitCurve, p: &OrbitParams) -> DVec3 {
    let r = p.radius_x;
    let ry = p.radius_y;
    let k = p.harmonics as f64;
    let theta = p.speed * t + p.phase;
    let (s, c) = theta.sin_cos();

    match curve {
        OrbitCurve::Circle => DVec3::new(r * c, 0.0, r * s),
        OrbitCurve::Ellipse => DVec3::new(r * c, 0.0, ry * s),
        OrbitCurve::InclinedEllipse => {
            let z_base = ry * s;
            let (si, ci) = p.inclination.sin_cos();
            DVec3::new(r * c, si * z_base, ci * z_base)
        }
        OrbitCurve::Lissajous => DVec3::new(r * s, ry * (k * p.speed * t).sin(), r * c),
        OrbitCurve::Rose => {
            let rho = r * (k * theta).cos();
            DVec3::new(rho * c, 0.0, rho * s)
        }
        OrbitCurve::Lemniscate => {
            let denom = (1.0 + (2.0 * theta).sin()).max(LEMNISCATE_MIN_DENOM);
            let rho = r * SQRT_2 * (2.0 * theta).cos() / denom;
            DVec3::new(rho * c, 0.0, rho * s)
        }
        OrbitCurve::Trefoil => {
            DVec3::new(
                s + 2.0 * (2.0 * theta).sin(),
                c - 2.0 * (2.0 * theta).cos(),
                -(3.0 * theta).sin(),
            ) * (0.3 * r)
        }
        OrbitCurve::Figure8Knot => {
            let ring = 2.0 + (2.0 * theta).cos();
            DVec3::new(
                ring * (3.0 * theta).cos(),
                (2.0 * theta).sin(),
                ring * (3.0 * theta).sin(),
            ) * (0.25 * r)
        }
        OrbitCurve::Epicycloid => {
            let a = EPICYCLOID_A * r;
            let b = EPICYCLOID_B * r;
            let ratio = (EPICYCLOID_A + EPICYCLOID_B) / EPICYCLOID_B;
            DVec3::new(
                (a + b) * c - b * (ratio * theta).cos(),
                0.0,
                (a + b) * s - b * (ratio * theta).sin(),
            )
        }
    }
}
