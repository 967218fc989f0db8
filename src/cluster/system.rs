//! Orbit, breathing and pulse animation of the cluster bodies.

use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use super::sphere::SphereMesh;
use crate::frame::FrameTime;
use crate::params::{ClusterParams, RenderConfig};

/// Evenly distribute `count` points over a sphere of `radius`
///
/// `phi = acos(-1 + 2i/N)`, `theta = sqrt(N pi) phi`.
pub fn base_positions(count: usize, radius: f32) -> Vec<Vec3> {
    let n = count as f32;
    (0..count)
        .map(|i| {
            let phi = (-1.0 + 2.0 * i as f32 / n).acos();
            let theta = (n * PI).sqrt() * phi;
            radius
                * Vec3::new(
                    theta.cos() * phi.sin(),
                    theta.sin() * phi.sin(),
                    phi.cos(),
                )
        })
        .collect()
}

/// Rendered transform of one body for a single frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransform {
    pub position: Vec3,
    pub scale: f32,
    /// Euler angles about X and Y (radians)
    pub rotation: Vec2,
}

impl BodyTransform {
    /// Local-to-group matrix (translate, rotate XYZ, scale)
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0);
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), rotation, self.position)
    }
}

/// Per-instance data uploaded for each body
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct BodyInstance {
    pub model: [[f32; 4]; 4],
}

/// Cluster state carried between ticks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterState {
    /// Accumulated self-rotation of every body
    pub orientations: Vec<Vec2>,
    pub aspect: f32,
}

/// Output of one cluster tick
#[derive(Debug, Clone)]
pub struct ClusterFrame {
    pub bodies: Vec<BodyTransform>,
    pub instances: Vec<BodyInstance>,
    pub view_proj: Mat4,
    pub camera_pos: Vec3,
}

/// Orbiting sphere cluster background
pub struct OrbitingSphereCluster {
    pub params: ClusterParams,
    pub sphere: SphereMesh,
    /// Computed once, never mutated
    base_positions: Vec<Vec3>,
    group: Mat4,
    near_plane: f32,
    far_plane: f32,
}

impl OrbitingSphereCluster {
    pub fn new(params: ClusterParams, render_config: &RenderConfig) -> Self {
        let base_positions = base_positions(params.body_count, params.orbit_radius);
        let sphere = SphereMesh::new(params.sphere_segments, params.sphere_segments);
        let group = Mat4::from_rotation_x(params.group_rotation_x);
        Self {
            params,
            sphere,
            base_positions,
            group,
            near_plane: render_config.near_plane,
            far_plane: render_config.far_plane,
        }
    }

    pub fn base_positions(&self) -> &[Vec3] {
        &self.base_positions
    }

    pub fn initial_state(&self, aspect: f32) -> ClusterState {
        ClusterState {
            orientations: vec![Vec2::ZERO; self.base_positions.len()],
            aspect,
        }
    }

    /// Orbital speed of body `i`, interpolated between speed_min and speed_max
    pub fn speed(&self, i: usize) -> f32 {
        let p = &self.params;
        p.speed_min + (i as f32 / p.body_count as f32) * (p.speed_max - p.speed_min)
    }

    /// Phase offset of body `i`
    pub fn phase(&self, i: usize) -> f32 {
        i as f32 * 2.0 * PI / self.params.body_count as f32
    }

    /// Position of body `i` at time `t`, a pure function of `(i, t)`
    pub fn position(&self, i: usize, t: f32) -> Vec3 {
        let p = &self.params;
        let phase = self.phase(i);
        let wobble = (t * p.wobble_frequency + phase).sin() * p.wobble_amplitude;
        let breathing = self.base_positions[i] * (1.0 + wobble);
        let angle = t * self.speed(i) * p.rotation_damping;
        Mat4::from_rotation_y(angle).transform_point3(breathing)
    }

    /// Uniform scale of body `i` at time `t`
    pub fn scale(&self, i: usize, t: f32) -> f32 {
        let p = &self.params;
        p.base_scale + (t * p.scale_speed + self.phase(i)).sin() * p.scale_variation
    }

    /// Advance every body to `time`
    ///
    /// Position and scale come from `time.elapsed_s` alone; only the
    /// tumble accumulates, by `tumble_rate * dt` per frame.
    pub fn tick(&self, state: ClusterState, time: FrameTime) -> (ClusterState, ClusterFrame) {
        let t = time.elapsed_s;
        let step = self.params.tumble_rate * time.dt_s;

        let orientations: Vec<Vec2> = state
            .orientations
            .iter()
            .map(|o| *o + Vec2::splat(step))
            .collect();

        let bodies: Vec<BodyTransform> = orientations
            .iter()
            .enumerate()
            .map(|(i, rotation)| BodyTransform {
                position: self.position(i, t),
                scale: self.scale(i, t),
                rotation: *rotation,
            })
            .collect();

        let instances = bodies
            .iter()
            .map(|body| BodyInstance {
                model: (self.group * body.matrix()).to_cols_array_2d(),
            })
            .collect();

        let camera_pos = Vec3::from_array(self.params.camera.position);
        let frame = ClusterFrame {
            bodies,
            instances,
            view_proj: self.view_proj(state.aspect),
            camera_pos,
        };

        let state = ClusterState {
            orientations,
            ..state
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cluster() -> OrbitingSphereCluster {
        OrbitingSphereCluster::new(ClusterParams::default(), &RenderConfig::default())
    }

    #[test]
    fn test_base_positions_on_orbit_sphere() {
        let positions = base_positions(13, 1.2);
        assert_eq!(positions.len(), 13);
        for p in positions {
            assert!((p.length() - 1.2).abs() < 1e-5);
        }
    }

    #[test]
    fn test_first_body_at_south_pole() {
        let positions = base_positions(13, 1.2);
        assert!(positions[0].distance(Vec3::new(0.0, 0.0, -1.2)) < 1e-5);
    }

    #[test]
    fn test_speed_and_phase_interpolation() {
        let c = cluster();
        assert_eq!(c.speed(0), 0.5);
        assert!(c.speed(12) < 1.5);
        assert!((c.speed(12) - (0.5 + 12.0 / 13.0)).abs() < 1e-6);
        assert_eq!(c.phase(0), 0.0);
    }

    #[test]
    fn test_at_time_zero_body_zero_is_at_base() {
        let c = cluster();
        // wobble = sin(0) = 0 and the orbit angle is 0
        assert!(c.position(0, 0.0).distance(c.base_positions()[0]) < 1e-6);
    }

    #[test]
    fn test_same_time_gives_same_transforms() {
        let c = cluster();
        let state = c.initial_state(1.0);
        let time = FrameTime {
            elapsed_s: 12.5,
            dt_s: 0.0,
            frame: 750,
        };
        let (state, first) = c.tick(state, time);
        let (_, second) = c.tick(state, time);
        assert_eq!(first.bodies, second.bodies);
    }

    #[test]
    fn test_tumble_accumulates_with_dt() {
        let c = cluster();
        let state = c.initial_state(1.0);
        let (state, _) = c.tick(state, FrameTime::fixed(1, 0.5));
        let (state, frame) = c.tick(state, FrameTime::fixed(2, 0.5));

        let expected = 2.0 * 0.5 * c.params.tumble_rate;
        for o in &state.orientations {
            assert!((o.x - expected).abs() < 1e-7);
            assert!((o.y - expected).abs() < 1e-7);
        }
        assert_eq!(frame.instances.len(), 13);
    }

    #[test]
    fn test_base_positions_never_change() {
        let c = cluster();
        let before = c.base_positions().to_vec();
        let mut state = c.initial_state(1.0);
        for frame in 0..10 {
            state = c.tick(state, FrameTime::fixed(frame, 0.1)).0;
        }
        assert_eq!(before, c.base_positions());
    }

    proptest! {
        #[test]
        fn scale_stays_within_variation(i in 0usize..13, t in -1.0e4f32..1.0e4) {
            let c = cluster();
            let p = &c.params;
            let s = c.scale(i, t);
            prop_assert!(s >= p.base_scale - p.scale_variation - 1e-6);
            prop_assert!(s <= p.base_scale + p.scale_variation + 1e-6);
        }

        #[test]
        fn orbit_radius_breathes_within_wobble(i in 0usize..13, t in 0.0f32..1.0e3) {
            let c = cluster();
            let r = c.position(i, t).length();
            let radius = c.params.orbit_radius;
            prop_assert!(r >= radius * (1.0 - c.params.wobble_amplitude) - 1e-4);
            prop_assert!(r <= radius * (1.0 + c.params.wobble_amplitude) + 1e-4);
        }
    }
}
