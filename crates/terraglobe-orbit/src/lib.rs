//! Decorative orbit paths for satellite bodies and the bounded trails they leave.
//!
//! Curves are parametric shapes, not physics: a position is a pure function of
//! elapsed time and the body's orbit parameters.

mod curve;
mod trail;

pub use curve::{OrbitCurve, OrbitParams, orbit_position};
pub use trail::TrailBuffer;
