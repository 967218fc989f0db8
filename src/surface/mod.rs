//! Animated topographic surface: a static grid displaced by fBm on the GPU.

mod mesh;
mod shading;
mod system;

// Re-export public types
pub use mesh::{SurfaceMesh, Vertex};
pub use shading::{
    contour_distance, grid_distance, layer_fragment, line_alpha, surface_color, MIN_DERIVATIVE,
};
pub use system::{elevation, NoiseSurfaceRenderer, SurfaceFrame, SurfaceState, SurfaceUniforms};
