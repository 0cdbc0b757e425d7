//! Per-frame spectrum evolution pass.

use wgpu::{BindGroup, Buffer, CommandEncoder, ComputePipeline, Device, Queue};

use super::buffers::{create_uniform_buffer, SpectrumBuffers};
use super::params::{SpectrumFrameParams, SpectrumGridParams};
use crate::gpu::layouts::create_spectrum_layout;
use crate::gpu::pipelines::create_compute_pipeline;
use crate::spectrum::SpectrumConfig;

const WORKGROUP_SIZE: u32 = 16;

/// Computes H(t), Dx(t) and Dy(t) from the static H0/Omega tables.
pub struct SpectrumEvolver {
    pipeline: ComputePipeline,
    bind_group: BindGroup,
    grid_params: Buffer,
    frame_params: Buffer,
    dim: u32,
}

impl SpectrumEvolver {
    /// Build the pipeline and bind it to `buffers` for the simulator's lifetime.
    pub fn new(device: &Device, config: &SpectrumConfig, buffers: &SpectrumBuffers) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("update_spectrum_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/update_spectrum.wgsl").into()),
        });

        let layout = create_spectrum_layout(device);
        let pipeline = create_compute_pipeline(device, &shader, &layout, "update_spectrum");

        let grid_params =
            create_uniform_buffer(device, "spectrum_grid_params", &SpectrumGridParams::new(config));
        let frame_params =
            create_uniform_buffer(device, "spectrum_frame_params", &SpectrumFrameParams::new(0.0));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("update_spectrum_bind_group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffers.h0.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers.omega.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buffers.ht.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: grid_params.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: frame_params.as_entire_binding(),
                },
            ],
        });

        Self {
            pipeline,
            bind_group,
            grid_params,
            frame_params,
            dim: config.disp_map_dimension,
        }
    }

    /// Record the evolution dispatch for simulation time `time`.
    ///
    /// The time uniform is written through the queue, so it takes effect
    /// for the next submission that contains this pass.
    pub fn encode(&self, queue: &Queue, encoder: &mut CommandEncoder, time: f32) {
        queue.write_buffer(
            &self.frame_params,
            0,
            bytemuck::bytes_of(&SpectrumFrameParams::new(time)),
        );

        let groups = self.dim.div_ceil(WORKGROUP_SIZE);
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("update_spectrum_pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.dispatch_workgroups(groups, groups, 1);
    }

    pub fn destroy(&self) {
        self.grid_params.destroy();
        self.frame_params.destroy();
    }
}
