//! Parameter definitions with units and documented semantics.
//!
//! All tuning constants of the backgrounds live here with:
//! - Units (world units, seconds, pixels, radians)
//! - Documented ranges and meanings
//! - The values the landing page shipped with as defaults

mod cluster;
mod render;
mod surface;
mod wave;

// Re-export all types
pub use cluster::{ChromeMaterial, ClusterCamera, ClusterParams, PostProcess};
pub use render::{RecordingConfig, RenderConfig};
pub use surface::{SurfaceCamera, SurfaceParams};
pub use wave::{WaveParams, WaveSpeed};
