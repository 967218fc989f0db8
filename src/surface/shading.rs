//! CPU mirror of the fragment stage in `topography.wgsl`.
//!
//! The shader evaluates these per pixel with `fwidth` supplying the
//! screen-space derivatives; here the derivatives are explicit inputs.

use glam::Vec2;

use crate::noise::fract;

/// Floor applied to every screen-space derivative before dividing by it
pub const MIN_DERIVATIVE: f32 = 1e-4;

/// Distance to the nearest grid line, in pixels
///
/// `p` is the grid coordinate, `fw` its screen-space derivative.
pub fn grid_distance(p: Vec2, fw: Vec2) -> f32 {
    let fw = fw.abs().max(Vec2::splat(MIN_DERIVATIVE));
    let offset = p - Vec2::splat(0.5);
    let d = Vec2::new(fract(offset.x) - 0.5, fract(offset.y) - 0.5).abs() / fw;
    d.x.min(d.y)
}

/// Distance to the nearest contour band, in pixels
pub fn contour_distance(elevation: f32, frequency: f32, fw: f32) -> f32 {
    let fw = fw.abs().max(MIN_DERIVATIVE);
    (fract(elevation * frequency) - 0.5).abs() / fw
}

/// Blend sharp line and soft glow into the output alpha
///
/// `lines` is the minimum pixel distance over every line family.
pub fn line_alpha(lines: f32, opacity: f32) -> f32 {
    let line = 1.0 - smoothstep(0.0, 1.5, lines);
    let glow = 1.0 - smoothstep(0.0, 3.0, lines);
    mix(glow * 0.2, line, line) * opacity
}

/// Elevation-tinted base color
pub fn surface_color(color: [f32; 3], elevation: f32) -> [f32; 3] {
    let t = elevation * 0.5 + 0.5;
    color.map(|c| mix(c * 0.5, c * 1.2, t))
}

/// Premultiplied fragment output for a premultiplied-alpha blend
///
/// Drawn over a backdrop already dimmed by `layer_opacity`, this gives the
/// same pixel as compositing the undimmed surface over the undimmed
/// backdrop and then fading the result by `layer_opacity`.
pub fn layer_fragment(color: [f32; 3], alpha: f32, layer_opacity: f32) -> [f32; 4] {
    let [r, g, b] = color.map(|c| c * alpha * layer_opacity);
    [r, g, b, alpha]
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_derivative_is_clamped() {
        let d = grid_distance(Vec2::new(0.25, 0.75), Vec2::ZERO);
        assert!(d.is_finite());

        let c = contour_distance(0.3, 8.0, 0.0);
        assert!(c.is_finite());
        assert!(line_alpha(c, 0.6).is_finite());
    }

    #[test]
    fn test_on_line_is_opaque() {
        // Integer grid coordinates sit exactly on a line
        let d = grid_distance(Vec2::new(2.0, 0.3), Vec2::splat(0.01));
        assert!(d < 1e-3);
        assert!((line_alpha(d, 0.6) - 0.6).abs() < 1e-4);
    }

    #[test]
    fn test_far_from_lines_is_clear() {
        assert_eq!(line_alpha(10.0, 0.6), 0.0);
    }

    #[test]
    fn test_glow_between_line_and_clear() {
        // Past the sharp line but inside the glow falloff
        let alpha = line_alpha(2.0, 1.0);
        assert!(alpha > 0.0 && alpha < 0.2);
    }

    #[test]
    fn test_layer_fragment_dims_lines_with_backdrop() {
        let color = [1.0, 0.66, 0.0];
        let backdrop = [0.01, 0.004, 0.0];
        let (alpha, layer) = (0.6, 0.6);

        let [r, g, b, a] = layer_fragment(color, alpha, layer);
        let rgb = [r, g, b];
        let blended = rgb
            .iter()
            .zip(backdrop)
            .map(|(src, dst)| src + (1.0 - a) * dst * layer);

        for ((out, c), dst) in blended.zip(color).zip(backdrop) {
            let expected = layer * (alpha * c + (1.0 - alpha) * dst);
            assert!((out - expected).abs() < 1e-6);
        }
        // A fully lit line shows at the layer opacity, not full strength
        assert!((layer_fragment(color, 1.0, layer)[0] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_color_tint_range() {
        let low = surface_color([1.0, 0.5, 0.0], -1.0);
        let high = surface_color([1.0, 0.5, 0.0], 1.0);
        assert!((low[0] - 0.5).abs() < 1e-6);
        assert!((high[0] - 1.2).abs() < 1e-6);
        assert_eq!(low[2], 0.0);
    }
}
