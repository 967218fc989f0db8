//! Orbiting sphere cluster motion, material and post-process parameters.

use crate::color::Rgb;

/// Orbit and pulse parameters for the sphere cluster
#[derive(Debug, Clone)]
pub struct ClusterParams {
    /// Number of orbit bodies
    pub body_count: usize,

    /// Radius of the sphere the base positions are distributed on (world units)
    pub orbit_radius: f32,

    /// Orbital speed of body 0 (radians per second before damping)
    pub speed_min: f32,

    /// Orbital speed approached by the last body
    pub speed_max: f32,

    /// Multiplier on the orbit angle
    pub rotation_damping: f32,

    /// Relative breathing amplitude of the orbit radius (0.1 = ±10%)
    pub wobble_amplitude: f32,

    /// Breathing angular frequency (radians per second)
    pub wobble_frequency: f32,

    /// Rendered sphere radius at rest (world units)
    pub base_scale: f32,

    /// Pulse amplitude around base_scale (world units)
    pub scale_variation: f32,

    /// Pulse angular frequency (radians per second)
    pub scale_speed: f32,

    /// Self-rotation rate applied to X and Y (radians per second)
    pub tumble_rate: f32,

    /// Rotation of the whole group about X (radians)
    pub group_rotation_x: f32,

    /// Sphere tessellation (width and height segments)
    pub sphere_segments: u32,

    pub material: ChromeMaterial,
    pub post: PostProcess,
    pub camera: ClusterCamera,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            body_count: 13,
            orbit_radius: 1.2,
            speed_min: 0.5,
            speed_max: 1.5,
            rotation_damping: 0.5,
            wobble_amplitude: 0.1,
            wobble_frequency: 2.0,
            base_scale: 0.15,
            scale_variation: 0.01,
            scale_speed: 0.5,
            tumble_rate: 0.01,
            group_rotation_x: -std::f32::consts::PI,
            sphere_segments: 32,
            material: ChromeMaterial::default(),
            post: PostProcess::default(),
            camera: ClusterCamera::default(),
        }
    }
}

/// Physically based chrome material shared by every body
#[derive(Debug, Clone)]
pub struct ChromeMaterial {
    pub color: Rgb,
    pub emissive: Rgb,
    pub emissive_intensity: f32,
    /// 0 = dielectric, 1 = metal
    pub metalness: f32,
    pub roughness: f32,
    /// Strength of the clear lacquer layer (0-1)
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    /// Multiplier on environment reflections
    pub env_intensity: f32,
}

impl Default for ChromeMaterial {
    fn default() -> Self {
        Self {
            color: Rgb::from_hex(0xFFAA00),    // Gold
            emissive: Rgb::from_hex(0xFF6600), // Orange glow
            emissive_intensity: 0.5,
            metalness: 0.6,
            roughness: 0.4,
            clearcoat: 0.7,
            clearcoat_roughness: 0.1,
            env_intensity: 1.0,
        }
    }
}

/// Environment reflection and bloom settings
#[derive(Debug, Clone)]
pub struct PostProcess {
    /// Reflect a procedural studio environment
    pub env_map: bool,

    /// Run the bloom pass
    pub bloom: bool,

    /// Luminance above which pixels contribute to bloom
    pub bloom_threshold: f32,

    /// Soft knee width around the threshold
    pub bloom_knee: f32,

    /// Bloom contribution added back onto the scene
    pub bloom_intensity: f32,

    /// Gaussian blur radius at half resolution (texels)
    pub bloom_radius: f32,
}

impl Default for PostProcess {
    fn default() -> Self {
        Self {
            env_map: true,
            bloom: true,
            bloom_threshold: 0.6,
            bloom_knee: 0.2,
            bloom_intensity: 1.2,
            bloom_radius: 4.0,
        }
    }
}

/// Perspective camera framing the cluster
#[derive(Debug, Clone)]
pub struct ClusterCamera {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_degrees: f32,
}

impl Default for ClusterCamera {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 5.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 45.0,
        }
    }
}
