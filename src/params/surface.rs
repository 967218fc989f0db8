//! Noise surface geometry, elevation and shading parameters.

use glam::Vec2;

use crate::color::Rgb;

/// Topographic noise surface parameters
#[derive(Debug, Clone)]
pub struct SurfaceParams {
    /// Side length of the square footprint before the model scale (world units)
    pub size: f32,

    /// Grid subdivisions along X (vertices per row = subdivisions + 1)
    pub subdivisions_x: usize,

    /// Grid subdivisions along Z
    pub subdivisions_z: usize,

    /// Uniform model scale applied to the footprint
    pub model_scale: f32,

    /// Vertical model offset (world units)
    pub model_offset_y: f32,

    /// Surface clock multiplier: u_time = elapsed_s * clock_scale
    pub clock_scale: f32,

    /// Time offset multiplier inside the noise lookup
    pub time_scale: f32,

    /// Direction the time offset drifts the noise domain along ((1, 1) = both axes)
    pub drift: Vec2,

    /// Spatial frequency of the noise lookup (cycles per world unit)
    pub noise_scale: f32,

    /// fBm octave count (4-6 looks natural)
    pub octaves: u32,

    /// Exponent applied to the raw fBm value (>1 sharpens peaks)
    pub elevation_exponent: f32,

    /// Height multiplier after the exponent (world units)
    pub elevation_amplitude: f32,

    /// Grid line density (lines per world unit)
    pub grid_frequency: f32,

    /// Contour lines per unit of elevation
    pub contour_frequency: f32,

    /// Base surface color
    pub color: Rgb,

    /// Overall line opacity multiplier (0-1)
    pub opacity: f32,

    pub camera: SurfaceCamera,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            size: 10.0,
            subdivisions_x: 200,
            subdivisions_z: 200,
            model_scale: 3.0,
            model_offset_y: -1.0,
            clock_scale: 0.25,
            time_scale: 0.1,
            drift: Vec2::ONE,
            noise_scale: 0.8,
            octaves: 4,
            elevation_exponent: 1.5,
            elevation_amplitude: 2.5,
            grid_frequency: 2.0,
            contour_frequency: 8.0,
            color: Rgb::from_hex(0xFFAA00), // Deep orange
            opacity: 0.6,
            camera: SurfaceCamera::default(),
        }
    }
}

/// Fixed perspective camera looking down at the surface
#[derive(Debug, Clone)]
pub struct SurfaceCamera {
    /// Eye position (world units)
    pub position: [f32; 3],

    /// Look-at target (world units)
    pub target: [f32; 3],

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,
}

impl Default for SurfaceCamera {
    fn default() -> Self {
        Self {
            position: [0.0, 8.0, 8.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 45.0,
        }
    }
}
