//! Per-frame surface update: clock, camera and shader uniforms.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

use super::mesh::SurfaceMesh;
use crate::frame::FrameTime;
use crate::noise::fbm;
use crate::params::{RenderConfig, SurfaceParams};

/// Uniform buffer for the topography shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SurfaceUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color: [f32; 3],
    pub time: f32,
    pub noise_scale: f32,
    pub time_scale: f32,
    pub elevation_exponent: f32,
    pub elevation_amplitude: f32,
    pub drift: [f32; 2],
    pub grid_frequency: f32,
    pub contour_frequency: f32,
    pub octaves: u32,
    pub opacity: f32,
    /// Opacity the finished layer is composited at
    pub layer_opacity: f32,
    pub _padding: f32,
}

/// Surface state carried between ticks
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceState {
    /// Surface clock fed to the shader (elapsed_s * clock_scale)
    pub u_time: f32,
    /// Viewport aspect ratio used for the projection
    pub aspect: f32,
}

/// Output of one surface tick
#[derive(Debug, Clone, Copy)]
pub struct SurfaceFrame {
    pub uniforms: SurfaceUniforms,
}

/// Height of the surface at world position (x, z) for surface clock `u_time`
///
/// `pow(fbm((x, z) * noise_scale + drift * u_time * time_scale), exponent) * amplitude`
pub fn elevation(params: &SurfaceParams, x: f32, z: f32, u_time: f32) -> f32 {
    let p = Vec2::new(x, z) * params.noise_scale + params.drift * (u_time * params.time_scale);
    fbm(p, params.octaves).powf(params.elevation_exponent) * params.elevation_amplitude
}

/// Topographic wireframe background
pub struct NoiseSurfaceRenderer {
    pub params: SurfaceParams,
    pub mesh: SurfaceMesh,
    near_plane: f32,
    far_plane: f32,
    layer_opacity: f32,
}

impl NoiseSurfaceRenderer {
    pub fn new(params: SurfaceParams, render_config: &RenderConfig) -> Self {
        let mesh = SurfaceMesh::new(&params);
        Self {
            params,
            mesh,
            near_plane: render_config.near_plane,
            far_plane: render_config.far_plane,
            layer_opacity: render_config.layer_opacity,
        }
    }

    /// Initial state for a viewport of the given aspect ratio
    pub fn initial_state(&self, aspect: f32) -> SurfaceState {
        SurfaceState {
            u_time: 0.0,
            aspect,
        }
    }

    /// Advance the surface to `time`
    ///
    /// Only the clock changes; geometry stays static and the GPU displaces
    /// it from the returned uniforms.
    pub fn tick(&self, state: SurfaceState, time: FrameTime) -> (SurfaceState, SurfaceFrame) {
        let state = SurfaceState {
            u_time: time.elapsed_s * self.params.clock_scale,
            ..state
        };
        let frame = SurfaceFrame {
            uniforms: self.uniforms(&state),
        };
        (state, frame)
    }

    fn view_proj(&self, aspect: f32) -> Mat4 {
        let camera = &self.params.camera;
        let view = Mat4::look_at_rh(
            Vec3::from_array(camera.position),
            Vec3::from_array(camera.target),
            Vec3::Y,
        );
        let proj = Mat4::perspective_rh(
            camera.fov_degrees.to_radians(),
            aspect.max(1e-3),
            self.near_plane,
            self.far_plane,
        );
        proj * view
    }

    fn uniforms(&self, state: &SurfaceState) -> SurfaceUniforms {
        let p = &self.params;
        SurfaceUniforms {
            view_proj: self.view_proj(state.aspect).to_cols_array_2d(),
            model: self.mesh.model.to_cols_array_2d(),
            color: p.color.to_linear(),
            time: state.u_time,
            noise_scale: p.noise_scale,
            time_scale: p.time_scale,
            elevation_exponent: p.elevation_exponent,
            elevation_amplitude: p.elevation_amplitude,
            drift: p.drift.to_array(),
            grid_frequency: p.grid_frequency,
            contour_frequency: p.contour_frequency,
            octaves: p.octaves,
            opacity: p.opacity,
            layer_opacity: self.layer_opacity,
            _padding: 0.0,
        }
    }

    /// Per-vertex elevation at surface clock `u_time` (CPU reference of the
    /// vertex stage)
    pub fn vertex_elevations(&self, u_time: f32) -> Vec<f32> {
        self.mesh
            .world_positions()
            .map(|p| elevation(&self.params, p.x, p.z, u_time))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_surface() -> NoiseSurfaceRenderer {
        let params = SurfaceParams {
            subdivisions_x: 16,
            subdivisions_z: 16,
            ..Default::default()
        };
        NoiseSurfaceRenderer::new(params, &RenderConfig::default())
    }

    #[test]
    fn test_uniform_layout_matches_wgsl() {
        // Two mat4x4, then four 16-byte rows
        assert_eq!(std::mem::size_of::<SurfaceUniforms>(), 192);
        assert_eq!(std::mem::offset_of!(SurfaceUniforms, drift), 160);
        assert_eq!(std::mem::offset_of!(SurfaceUniforms, layer_opacity), 184);
    }

    #[test]
    fn test_tick_scales_clock() {
        let surface = small_surface();
        let state = surface.initial_state(16.0 / 9.0);
        let (state, frame) = surface.tick(state, FrameTime::fixed(120, 1.0 / 60.0));

        assert!((state.u_time - 0.5).abs() < 1e-5);
        assert_eq!(frame.uniforms.time, state.u_time);
        assert_eq!(frame.uniforms.octaves, 4);
    }

    #[test]
    fn test_uniforms_carry_layer_opacity() {
        let render_config = RenderConfig {
            layer_opacity: 0.25,
            ..Default::default()
        };
        let surface = NoiseSurfaceRenderer::new(small_surface().params, &render_config);
        let (_, frame) = surface.tick(surface.initial_state(1.0), FrameTime::fixed(0, 0.0));
        assert_eq!(frame.uniforms.layer_opacity, 0.25);
        // Line opacity is independent of the layer
        assert_eq!(frame.uniforms.opacity, surface.params.opacity);

        let default = small_surface();
        let (_, frame) = default.tick(default.initial_state(1.0), FrameTime::default());
        assert_eq!(frame.uniforms.layer_opacity, 0.6);
    }

    #[test]
    fn test_tick_is_deterministic() {
        let surface = small_surface();
        let state = surface.initial_state(1.5);
        let time = FrameTime::fixed(42, 1.0 / 60.0);
        let (a, fa) = surface.tick(state, time);
        let (b, fb) = surface.tick(a, time);
        assert_eq!(a, b);
        assert_eq!(
            bytemuck::bytes_of(&fa.uniforms),
            bytemuck::bytes_of(&fb.uniforms)
        );
    }

    #[test]
    fn test_elevation_bounds() {
        let surface = small_surface();
        for u_time in [0.0, 3.7, 250.0] {
            for h in surface.vertex_elevations(u_time) {
                assert!(h >= 0.0);
                assert!(h < surface.params.elevation_amplitude);
            }
        }
    }

    #[test]
    fn test_elevation_evolves_with_time() {
        let surface = small_surface();
        let before = surface.vertex_elevations(0.0);
        let after = surface.vertex_elevations(10.0);
        assert_ne!(before, after);
    }

    #[test]
    fn test_drift_direction() {
        // With x-only drift, advancing time equals shifting x
        let params = SurfaceParams {
            drift: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        let shift = 2.0 * params.time_scale / params.noise_scale;
        let a = elevation(&params, 1.0, 0.4, 2.0);
        let b = elevation(&params, 1.0 + shift, 0.4, 0.0);
        assert!((a - b).abs() < 1e-4);
    }
}
