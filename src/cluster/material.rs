//! Factory for the shared chrome material.

use bytemuck::{Pod, Zeroable};

use crate::params::ChromeMaterial;

/// Material uniform block for `orbit_body.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, PartialEq)]
pub struct MaterialUniforms {
    pub color: [f32; 3],
    pub metalness: f32,
    /// Emissive color premultiplied by its intensity
    pub emissive: [f32; 3],
    pub roughness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub env_intensity: f32,
    /// 1.0 when the studio environment is reflected, 0.0 otherwise
    pub env_enabled: f32,
}

/// Build the uniform block for `material`
pub fn chrome_material(material: &ChromeMaterial, env_map: bool) -> MaterialUniforms {
    let emissive = material
        .emissive
        .to_linear()
        .map(|c| c * material.emissive_intensity);

    MaterialUniforms {
        color: material.color.to_linear(),
        metalness: material.metalness.clamp(0.0, 1.0),
        emissive,
        // Fully smooth surfaces alias badly under the analytic highlight
        roughness: material.roughness.clamp(0.04, 1.0),
        clearcoat: material.clearcoat.clamp(0.0, 1.0),
        clearcoat_roughness: material.clearcoat_roughness.clamp(0.04, 1.0),
        env_intensity: material.env_intensity,
        env_enabled: if env_map { 1.0 } else { 0.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        assert_eq!(std::mem::size_of::<MaterialUniforms>(), 48);
    }

    #[test]
    fn test_env_toggle_and_emissive() {
        let params = ChromeMaterial::default();
        let with_env = chrome_material(&params, true);
        let without = chrome_material(&params, false);

        assert_eq!(with_env.env_enabled, 1.0);
        assert_eq!(without.env_enabled, 0.0);
        // #FF6600 at intensity 0.5: red channel is half of full linear red
        assert!((with_env.emissive[0] - 0.5).abs() < 1e-5);
        assert_eq!(with_env.metalness, 0.6);
    }
}
