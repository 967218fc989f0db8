//! Bloom post-process: threshold, half-resolution blur, composite.
//!
//! The composite also resolves the HDR scene to the output format, so it
//! runs even when bloom is disabled (with zero intensity).

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::{
    color_pass, fullscreen_pipeline, linear_sampler, sampler_entry, texture_entry, uniform_entry,
    GpuContext,
};
use crate::params::PostProcess;

/// Format for the HDR scene and bloom chain
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Uniform buffer for the bloom shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, PartialEq)]
pub struct BloomUniforms {
    /// Size of one source texel in uv units
    pub texel: [f32; 2],
    /// Blur axis ((1, 0) or (0, 1)); unused by the other stages
    pub direction: [f32; 2],
    pub threshold: f32,
    pub knee: f32,
    pub intensity: f32,
    pub radius: f32,
}

impl BloomUniforms {
    pub fn new(post: &PostProcess, texel: [f32; 2], direction: [f32; 2]) -> Self {
        Self {
            texel,
            direction,
            threshold: post.bloom_threshold,
            knee: post.bloom_knee,
            intensity: if post.bloom { post.bloom_intensity } else { 0.0 },
            radius: post.bloom_radius,
        }
    }
}

/// Half-resolution size of the bloom chain for a given output size
pub fn bloom_size(width: u32, height: u32) -> (u32, u32) {
    ((width / 2).max(1), (height / 2).max(1))
}

struct Stage {
    _buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct BloomPass {
    post: PostProcess,
    threshold_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    source_layout: wgpu::BindGroupLayout,
    composite_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    ping: wgpu::TextureView,
    pong: wgpu::TextureView,
    threshold: Stage,
    blur_h: Stage,
    blur_v: Stage,
    composite: Stage,
}

impl BloomPass {
    /// Build the bloom chain reading from `scene` (an HDR view of
    /// `width` x `height`)
    pub fn new(
        ctx: &GpuContext,
        post: &PostProcess,
        scene: &wgpu::TextureView,
        width: u32,
        height: u32,
    ) -> Self {
        let device = &ctx.device;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Bloom Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../bloom.wgsl").into()),
        });

        let source_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bloom Source Layout"),
            entries: &[uniform_entry(0), texture_entry(1), sampler_entry(2)],
        });
        let composite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bloom Composite Layout"),
            entries: &[
                uniform_entry(0),
                texture_entry(1),
                sampler_entry(2),
                texture_entry(3),
            ],
        });

        let threshold_pipeline = fullscreen_pipeline(
            device,
            "Bloom Threshold Pipeline",
            &shader,
            "fs_threshold",
            &source_layout,
            HDR_FORMAT,
            None,
        );
        let blur_pipeline = fullscreen_pipeline(
            device,
            "Bloom Blur Pipeline",
            &shader,
            "fs_blur",
            &source_layout,
            HDR_FORMAT,
            None,
        );
        let composite_pipeline = fullscreen_pipeline(
            device,
            "Bloom Composite Pipeline",
            &shader,
            "fs_composite",
            &composite_layout,
            ctx.format,
            None,
        );

        let sampler = linear_sampler(device, "Bloom Sampler");
        let (ping, pong) = create_chain(device, width, height);
        let stages = build_stages(
            device,
            post,
            &source_layout,
            &composite_layout,
            &sampler,
            scene,
            &ping,
            &pong,
            width,
            height,
        );

        Self {
            post: post.clone(),
            threshold_pipeline,
            blur_pipeline,
            composite_pipeline,
            source_layout,
            composite_layout,
            sampler,
            ping,
            pong,
            threshold: stages.0,
            blur_h: stages.1,
            blur_v: stages.2,
            composite: stages.3,
        }
    }

    /// Rebuild the chain for a new scene target
    pub fn resize(&mut self, ctx: &GpuContext, scene: &wgpu::TextureView, width: u32, height: u32) {
        let (ping, pong) = create_chain(&ctx.device, width, height);
        let stages = build_stages(
            &ctx.device,
            &self.post,
            &self.source_layout,
            &self.composite_layout,
            &self.sampler,
            scene,
            &ping,
            &pong,
            width,
            height,
        );
        self.ping = ping;
        self.pong = pong;
        self.threshold = stages.0;
        self.blur_h = stages.1;
        self.blur_v = stages.2;
        self.composite = stages.3;
    }

    /// Record the bloom chain and composite the result onto `output`
    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, output: &wgpu::TextureView) {
        if self.post.bloom {
            let stages = [
                (&self.threshold, &self.threshold_pipeline, &self.ping, "Bloom Threshold"),
                (&self.blur_h, &self.blur_pipeline, &self.pong, "Bloom Blur H"),
                (&self.blur_v, &self.blur_pipeline, &self.ping, "Bloom Blur V"),
            ];
            for (stage, pipeline, target, label) in stages {
                let mut pass = color_pass(encoder, label, target, Some(wgpu::Color::BLACK));
                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, &stage.bind_group, &[]);
                pass.draw(0..3, 0..1);
            }
        }

        let mut pass = color_pass(encoder, "Bloom Composite", output, Some(wgpu::Color::BLACK));
        pass.set_pipeline(&self.composite_pipeline);
        pass.set_bind_group(0, &self.composite.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

fn create_chain(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::TextureView, wgpu::TextureView) {
    let (w, h) = bloom_size(width, height);
    let make = |label: &str| {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: w,
                    height: h,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: HDR_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    };
    (make("Bloom Ping"), make("Bloom Pong"))
}

#[allow(clippy::too_many_arguments)]
fn build_stages(
    device: &wgpu::Device,
    post: &PostProcess,
    source_layout: &wgpu::BindGroupLayout,
    composite_layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    scene: &wgpu::TextureView,
    ping: &wgpu::TextureView,
    pong: &wgpu::TextureView,
    width: u32,
    height: u32,
) -> (Stage, Stage, Stage, Stage) {
    let (bw, bh) = bloom_size(width, height);
    let scene_texel = [1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32];
    let bloom_texel = [1.0 / bw as f32, 1.0 / bh as f32];

    let stage = |label: &str,
                 uniforms: BloomUniforms,
                 layout: &wgpu::BindGroupLayout,
                 views: &[&wgpu::TextureView]| {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let mut entries = vec![
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(views[0]),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ];
        if let Some(glow) = views.get(1) {
            entries.push(wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::TextureView(*glow),
            });
        }
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &entries,
        });
        Stage {
            _buffer: buffer,
            bind_group,
        }
    };

    (
        stage(
            "Bloom Threshold Stage",
            BloomUniforms::new(post, scene_texel, [0.0, 0.0]),
            source_layout,
            &[scene],
        ),
        stage(
            "Bloom Blur H Stage",
            BloomUniforms::new(post, bloom_texel, [1.0, 0.0]),
            source_layout,
            &[ping],
        ),
        stage(
            "Bloom Blur V Stage",
            BloomUniforms::new(post, bloom_texel, [0.0, 1.0]),
            source_layout,
            &[pong],
        ),
        stage(
            "Bloom Composite Stage",
            BloomUniforms::new(post, scene_texel, [0.0, 0.0]),
            composite_layout,
            &[scene, ping],
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<BloomUniforms>(), 32);
    }

    #[test]
    fn test_disabled_bloom_has_no_intensity() {
        let post = PostProcess {
            bloom: false,
            ..Default::default()
        };
        let uniforms = BloomUniforms::new(&post, [1.0, 1.0], [0.0, 0.0]);
        assert_eq!(uniforms.intensity, 0.0);
        assert_eq!(uniforms.threshold, post.bloom_threshold);
    }

    #[test]
    fn test_bloom_size_halves_and_floors_at_one() {
        assert_eq!(bloom_size(1280, 720), (640, 360));
        assert_eq!(bloom_size(1, 1), (1, 1));
    }
}
