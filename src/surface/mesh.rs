//! Static surface grid in the XZ plane.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::params::SurfaceParams;

/// Vertex data for the surface mesh (position + grid coordinate)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Regular grid covering a square footprint, created once
pub struct SurfaceMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Places the footprint in the world (scale, then vertical offset)
    pub model: Mat4,
}

impl SurfaceMesh {
    /// Create the flat grid described by `params`
    pub fn new(params: &SurfaceParams) -> Self {
        let nx = params.subdivisions_x.max(1);
        let nz = params.subdivisions_z.max(1);
        let half_size = params.size / 2.0;

        let mut vertices = Vec::with_capacity((nx + 1) * (nz + 1));
        let mut indices = Vec::with_capacity(nx * nz * 6);

        for z in 0..=nz {
            for x in 0..=nx {
                let u = x as f32 / nx as f32;
                let v = z as f32 / nz as f32;
                vertices.push(Vertex {
                    position: [u * params.size - half_size, 0.0, v * params.size - half_size],
                    uv: [u, v],
                });
            }
        }

        // Counter-clockwise winding seen from +Y
        for z in 0..nz {
            for x in 0..nx {
                let top_left = (z * (nx + 1) + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * (nx + 1) + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        let model = Mat4::from_translation(Vec3::new(0.0, params.model_offset_y, 0.0))
            * Mat4::from_scale(Vec3::splat(params.model_scale));

        Self {
            vertices,
            indices,
            model,
        }
    }

    /// World-space XZ position of every vertex before displacement
    pub fn world_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices
            .iter()
            .map(|v| self.model.transform_point3(Vec3::from_array(v.position)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footprint_extent() {
        let params = SurfaceParams {
            subdivisions_x: 4,
            subdivisions_z: 2,
            ..Default::default()
        };
        let mesh = SurfaceMesh::new(&params);

        let first = mesh.vertices.first().unwrap();
        let last = mesh.vertices.last().unwrap();
        assert_eq!(first.position, [-5.0, 0.0, -5.0]);
        assert_eq!(last.position, [5.0, 0.0, 5.0]);
        assert_eq!(last.uv, [1.0, 1.0]);

        // Model scale 3 and offset -1 apply in world space
        let world_last = mesh.world_positions().last().unwrap();
        assert_eq!(world_last, Vec3::new(15.0, -1.0, 15.0));
    }

    #[test]
    fn test_triangles_face_up() {
        let params = SurfaceParams {
            subdivisions_x: 1,
            subdivisions_z: 1,
            ..Default::default()
        };
        let mesh = SurfaceMesh::new(&params);
        for tri in mesh.indices.chunks(3) {
            let p = |i: u32| Vec3::from_array(mesh.vertices[i as usize].position);
            let normal = (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]));
            assert!(normal.y > 0.0);
        }
    }
}
