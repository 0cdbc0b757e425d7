//! Fullscreen passes turning the spatial-domain FFT output into the
//! displacement and gradient/folding maps.

use wgpu::{
    BindGroupLayout, Buffer, CommandEncoder, Device, Queue, RenderPipeline, TextureView,
};

use super::compute::buffers::create_uniform_buffer;
use super::compute::params::ComposeParams;
use super::layouts::{create_displacement_layout, create_gradient_layout};
use super::pipelines::{create_fullscreen_pipeline, create_pipeline_layout, FULLSCREEN_QUAD_VERTICES};
use super::textures::OCEAN_MAP_FORMAT;

fn begin_fullscreen_pass<'e>(
    encoder: &'e mut CommandEncoder,
    label: &'static str,
    target: &'e TextureView,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            depth_slice: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

/// Writes `(Dx·choppy, Dy·choppy, Dz, 1)` per texel from the packed Dxyz buffer.
pub struct DisplacementComposer {
    pipeline: RenderPipeline,
    layout: BindGroupLayout,
    params: Buffer,
}

impl DisplacementComposer {
    pub fn new(device: &Device, initial: &ComposeParams) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("displacement_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/displacement.wgsl").into()),
        });

        let layout = create_displacement_layout(device);
        let pipeline_layout = create_pipeline_layout(device, "displacement_pipeline_layout", &[&layout]);
        let pipeline = create_fullscreen_pipeline(
            device,
            "displacement_pipeline",
            &pipeline_layout,
            &shader,
            "fs_displacement",
            OCEAN_MAP_FORMAT,
        );
        let params = create_uniform_buffer(device, "displacement_params", initial);

        Self {
            pipeline,
            layout,
            params,
        }
    }

    /// Record the pass reading `dxyz` and writing `target`.
    pub fn encode(
        &self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        params: &ComposeParams,
        dxyz: &Buffer,
        target: &TextureView,
    ) {
        queue.write_buffer(&self.params, 0, bytemuck::bytes_of(params));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("displacement_bind_group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.params.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: dxyz.as_entire_binding(),
                },
            ],
        });

        let mut pass = begin_fullscreen_pass(encoder, "displacement_pass", target);
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.draw(0..FULLSCREEN_QUAD_VERTICES, 0..1);
    }

    pub fn destroy(&self) {
        self.params.destroy();
    }
}

/// Writes `(normal.xyz, folding)` per texel from the displacement map.
pub struct GradientFoldingComposer {
    pipeline: RenderPipeline,
    layout: BindGroupLayout,
    params: Buffer,
}

impl GradientFoldingComposer {
    pub fn new(device: &Device, initial: &ComposeParams) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gradient_folding_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/gradient_folding.wgsl").into()),
        });

        let layout = create_gradient_layout(device);
        let pipeline_layout =
            create_pipeline_layout(device, "gradient_folding_pipeline_layout", &[&layout]);
        let pipeline = create_fullscreen_pipeline(
            device,
            "gradient_folding_pipeline",
            &pipeline_layout,
            &shader,
            "fs_gradient_folding",
            OCEAN_MAP_FORMAT,
        );
        let params = create_uniform_buffer(device, "gradient_folding_params", initial);

        Self {
            pipeline,
            layout,
            params,
        }
    }

    /// Record the pass reading `displacement` and writing `target`.
    pub fn encode(
        &self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        params: &ComposeParams,
        displacement: &TextureView,
        target: &TextureView,
    ) {
        queue.write_buffer(&self.params, 0, bytemuck::bytes_of(params));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gradient_folding_bind_group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.params.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(displacement),
                },
            ],
        });

        let mut pass = begin_fullscreen_pass(encoder, "gradient_folding_pass", target);
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.draw(0..FULLSCREEN_QUAD_VERTICES, 0..1);
    }

    pub fn destroy(&self) {
        self.params.destroy();
    }
}
