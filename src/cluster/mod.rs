//! Ring of reflective orbit bodies on an even spherical distribution.

mod material;
mod sphere;
mod system;

// Re-export public types
pub use material::{chrome_material, MaterialUniforms};
pub use sphere::{SphereMesh, SphereVertex};
pub use system::{
    base_positions, BodyInstance, BodyTransform, ClusterFrame, ClusterState, OrbitingSphereCluster,
};
