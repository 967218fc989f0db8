//! Uploads the wave canvas raster and blits it fullscreen.

use super::{
    color_pass, fullscreen_pipeline, linear_sampler, sampler_entry, texture_entry, GpuContext,
};
use crate::wave::WaveCanvas;

struct CanvasTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

pub struct CanvasPass {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    target: CanvasTexture,
}

impl CanvasPass {
    pub fn new(ctx: &GpuContext, width: u32, height: u32) -> Self {
        let device = &ctx.device;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Canvas Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../canvas_blit.wgsl").into()),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Canvas Bind Group Layout"),
            entries: &[texture_entry(1), sampler_entry(2)],
        });

        let pipeline = fullscreen_pipeline(
            device,
            "Canvas Blit Pipeline",
            &shader,
            "fs_main",
            &layout,
            ctx.format,
            None,
        );

        let sampler = linear_sampler(device, "Canvas Sampler");
        let target = create_canvas_texture(device, &layout, &sampler, width, height);

        Self {
            pipeline,
            layout,
            sampler,
            target,
        }
    }

    /// Copy the canvas pixels to the GPU, reallocating on size change
    pub fn upload(&mut self, ctx: &GpuContext, canvas: &WaveCanvas) {
        let size = (canvas.width(), canvas.height());
        if size != self.target.size {
            log::debug!("Canvas texture resized to {}x{}", size.0, size.1);
            self.target =
                create_canvas_texture(&ctx.device, &self.layout, &self.sampler, size.0, size.1);
        }

        ctx.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            canvas.image().as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * size.0),
                rows_per_image: Some(size.1),
            },
            wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
        );
    }

    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut pass = color_pass(encoder, "Canvas Blit Pass", view, Some(wgpu::Color::BLACK));
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.target.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

fn create_canvas_texture(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    width: u32,
    height: u32,
) -> CanvasTexture {
    let (width, height) = (width.max(1), height.max(1));
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Wave Canvas Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        // Canvas bytes are sRGB encoded
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Canvas Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    CanvasTexture {
        texture,
        bind_group,
        size: (width, height),
    }
}
