//! Fullscreen gradient behind the topography surface.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::{color_pass, fullscreen_pipeline, uniform_layout, GpuContext};
use crate::params::RenderConfig;

/// Uniform buffer for the backdrop shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct BackdropUniforms {
    pub top: [f32; 3],
    pub opacity: f32,
    pub bottom: [f32; 3],
    pub _padding: f32,
}

impl BackdropUniforms {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            top: config.backdrop_top.to_linear(),
            opacity: config.layer_opacity,
            bottom: config.backdrop_bottom.to_linear(),
            _padding: 0.0,
        }
    }
}

pub struct BackdropPass {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
}

impl BackdropPass {
    pub fn new(ctx: &GpuContext, config: &RenderConfig) -> Self {
        let device = &ctx.device;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Backdrop Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../backdrop.wgsl").into()),
        });

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Backdrop Uniform Buffer"),
            contents: bytemuck::bytes_of(&BackdropUniforms::from_config(config)),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let layout = uniform_layout(device, "Backdrop Bind Group Layout");
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Backdrop Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        let pipeline = fullscreen_pipeline(
            device,
            "Backdrop Pipeline",
            &shader,
            "fs_main",
            &layout,
            ctx.format,
            None,
        );

        Self {
            pipeline,
            bind_group,
        }
    }

    /// Clear `view` and paint the gradient
    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut pass = color_pass(encoder, "Backdrop Pass", view, Some(wgpu::Color::BLACK));
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1); // Fullscreen triangle
    }
}
