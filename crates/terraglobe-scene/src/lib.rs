//! Scene state for the globe viewer.
//!
//! [`SceneState`] owns every body, drives orbits and trails from an external
//! clock, applies decoded images under "latest request wins" rules, and hands
//! meshes to a [`RenderSurface`].

mod body;
mod error;
mod render;
mod state;

#[cfg(test)]
mod state_tests;

pub use body::{BodyConfig, BodyId, BodyPatch, GeometryConfig, OrbitConfig, ShadingConfig, TrailConfig};
pub use error::SceneError;
pub use render::RenderSurface;
pub use state::{DisplaySettings, LoadOutcome, PollSummary, SceneState};
