//! Uniformly tessellated UV sphere shared by every orbit body.

use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};

/// Vertex data for the sphere mesh (position + normal)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Unit-radius sphere, created once and instanced per body
pub struct SphereMesh {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Build a sphere with `width_segments` around the equator and
    /// `height_segments` from pole to pole
    pub fn new(width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);

        let mut vertices = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
        for y in 0..=hs {
            let v = y as f32 / hs as f32;
            let polar = v * PI;
            for x in 0..=ws {
                let u = x as f32 / ws as f32;
                let azimuth = u * 2.0 * PI;
                let normal = [
                    -azimuth.cos() * polar.sin(),
                    polar.cos(),
                    azimuth.sin() * polar.sin(),
                ];
                vertices.push(SphereVertex {
                    position: normal,
                    normal,
                });
            }
        }

        let mut indices = Vec::with_capacity((ws * hs * 6) as usize);
        let row = ws + 1;
        for y in 0..hs {
            for x in 0..ws {
                let a = y * row + x + 1;
                let b = y * row + x;
                let c = (y + 1) * row + x;
                let d = (y + 1) * row + x + 1;

                // Pole rows collapse to single triangles
                if y != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if y != hs - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_sphere_counts() {
        let mesh = SphereMesh::new(32, 32);
        assert_eq!(mesh.vertices.len(), 33 * 33);
        // Full quads everywhere except the two pole rows
        assert_eq!(mesh.indices.len(), (32 * 32 * 2 - 2 * 32) * 3);
    }

    #[test]
    fn test_vertices_on_unit_sphere() {
        let mesh = SphereMesh::new(12, 8);
        for v in &mesh.vertices {
            let len = Vec3::from_array(v.position).length();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_triangles_face_outward() {
        let mesh = SphereMesh::new(16, 16);
        for tri in mesh.indices.chunks(3) {
            let p = |i: u32| Vec3::from_array(mesh.vertices[i as usize].position);
            let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }
}
