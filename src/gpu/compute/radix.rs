//! Batched 512×512 radix-8 Stockham FFT.
//!
//! Six butterfly stages, three per axis. Each stage reads 8 elements at
//! `istride` spacing, runs an 8-point DFT, applies twiddles and writes the
//! results at `ostride` spacing. The transform uses the negative exponent
//! and produces natural-order output, batched over `slices` independent
//! 512×512 grids laid out back to back.

use std::sync::Arc;
use wgpu::{Buffer, CommandEncoder, ComputePipeline, Device};

use super::buffers::{check_storage_buffer, create_uniform_buffer, ResourceError, COMPLEX_SIZE};
use super::butterfly::ButterflyKernel;
use super::params::RadixStageParams;
use crate::gpu::layouts::create_radix_layout;
use crate::gpu::pipelines::create_compute_pipeline;

/// Transform size per axis.
pub const FFT_DIMENSION: u32 = 512;

/// Number of butterfly stages in a plan.
pub const FFT_PARAM_SETS: usize = 6;

/// Threads per workgroup of the butterfly kernels.
pub const COHERENCY_GRANULARITY: u32 = 128;

/// Largest slice count whose elements are still addressable with `u32`.
pub const MAX_FFT_SLICES: u32 = u32::MAX / (FFT_DIMENSION * FFT_DIMENSION);

/// Stage parameter table of a plan. Pure function of the slice count.
#[derive(Debug, Clone, PartialEq)]
pub struct RadixPlan {
    slices: u32,
    stages: [RadixStageParams; FFT_PARAM_SETS],
}

impl RadixPlan {
    /// Build the stage table for `slices` batched 512×512 grids.
    ///
    /// Fails for zero slices or more than [`MAX_FFT_SLICES`].
    pub fn new(slices: u32) -> Result<Self, ResourceError> {
        let n = FFT_DIMENSION;
        let element_count = u64::from(slices)
            .checked_mul(u64::from(n * n))
            .filter(|&count| slices > 0 && count <= u64::from(u32::MAX))
            .ok_or(ResourceError::InvalidSliceCount(slices))?;

        let thread_count = (element_count / 8) as u32;
        let mut ostride = n * n / 8;
        let mut istride = ostride;
        let mut pstride = n;
        let mut phase_base = -std::f64::consts::TAU / (n as f64 * n as f64);

        let mut stages = [RadixStageParams::new(0, 0, 0, 0, 0.0); FFT_PARAM_SETS];
        stages[0] = RadixStageParams::new(thread_count, ostride, istride, pstride, phase_base as f32);

        for (i, stage) in stages.iter_mut().enumerate().skip(1) {
            istride /= 8;
            phase_base *= 8.0;
            // Second axis: outputs move across rows instead of within them.
            if i == 3 {
                ostride /= n;
                pstride = 1;
            }
            *stage = RadixStageParams::new(thread_count, ostride, istride, pstride, phase_base as f32);
        }

        Ok(Self { slices, stages })
    }

    pub fn slices(&self) -> u32 {
        self.slices
    }

    pub fn stages(&self) -> &[RadixStageParams; FFT_PARAM_SETS] {
        &self.stages
    }

    /// Complex elements transformed per call.
    pub fn element_count(&self) -> usize {
        self.slices as usize * (FFT_DIMENSION * FFT_DIMENSION) as usize
    }

    /// Size in bytes of the scratch buffer (and of the source/destination).
    pub fn buffer_size(&self) -> u64 {
        self.element_count() as u64 * COMPLEX_SIZE
    }

    /// Workgroups per stage dispatch.
    pub fn workgroups(&self) -> u32 {
        self.stages[0].thread_count / COHERENCY_GRANULARITY
    }

    /// Run the whole plan on the host with the same arithmetic as the GPU.
    ///
    /// `data` holds `element_count()` elements and receives the result.
    pub fn execute_on_host(&self, data: &mut [[f32; 2]]) {
        let mut tmp = vec![[0.0f32; 2]; data.len()];
        for (i, stage) in self.stages.iter().enumerate() {
            let kernel = ButterflyKernel::for_stage(stage);
            if i % 2 == 0 {
                kernel.apply(stage, data, &mut tmp);
            } else {
                kernel.apply(stage, &tmp, data);
            }
        }
    }
}

/// GPU side of a [`RadixPlan`]: stage uniforms, scratch buffer and kernels.
///
/// The scratch buffer is exclusively owned; `compute` takes `&mut self` so
/// two recordings cannot share it.
pub struct RadixFftEngine {
    device: Arc<Device>,
    plan: RadixPlan,
    layout: wgpu::BindGroupLayout,
    strided: ComputePipeline,
    unit_stride: ComputePipeline,
    stage_params: Vec<Buffer>,
    tmp: Buffer,
}

impl RadixFftEngine {
    /// Create the plan and allocate its scratch buffer.
    ///
    /// Out-of-range slice counts and scratch buffers above the device limits
    /// are rejected before anything is allocated.
    pub fn new(device: Arc<Device>, slices: u32) -> Result<Self, ResourceError> {
        let plan = RadixPlan::new(slices)?;
        check_storage_buffer(&device.limits(), "fft_tmp", plan.buffer_size())?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("radix008a_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/radix008a.wgsl").into()),
        });

        let layout = create_radix_layout(&device);
        let strided = create_compute_pipeline(
            &device,
            &shader,
            &layout,
            ButterflyKernel::Strided.entry_point(),
        );
        let unit_stride = create_compute_pipeline(
            &device,
            &shader,
            &layout,
            ButterflyKernel::UnitStride.entry_point(),
        );

        let stage_params = plan
            .stages()
            .iter()
            .enumerate()
            .map(|(i, stage)| create_uniform_buffer(&device, &format!("radix_stage_{}", i), stage))
            .collect();

        let tmp = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("fft_tmp_buffer"),
            size: plan.buffer_size(),
            usage: wgpu::BufferUsages::STORAGE,
            mapped_at_creation: false,
        });

        log::debug!(
            "Created radix plan: {} slices, {} workgroups per stage",
            plan.slices(),
            plan.workgroups()
        );

        Ok(Self {
            device,
            plan,
            layout,
            strided,
            unit_stride,
            stage_params,
            tmp,
        })
    }

    pub fn plan(&self) -> &RadixPlan {
        &self.plan
    }

    /// Record the six stages transforming `src` into `dst`.
    ///
    /// `src` is only read by the first stage; both buffers must hold
    /// `plan().element_count()` complex elements and must not alias.
    pub fn compute(&mut self, encoder: &mut CommandEncoder, src: &Buffer, dst: &Buffer) {
        for (i, stage) in self.plan.stages().iter().enumerate() {
            let (input, output) = match i {
                0 => (src, &self.tmp),
                _ if i % 2 == 1 => (&self.tmp, dst),
                _ => (dst, &self.tmp),
            };

            let bind_group = self.create_bind_group(input, output, &self.stage_params[i]);
            let pipeline = match ButterflyKernel::for_stage(stage) {
                ButterflyKernel::Strided => &self.strided,
                ButterflyKernel::UnitStride => &self.unit_stride,
            };

            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("radix008a_pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(self.plan.workgroups(), 1, 1);
        }
    }

    fn create_bind_group(&self, input: &Buffer, output: &Buffer, params: &Buffer) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("radix008a_bind_group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: input.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: output.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: params.as_entire_binding(),
                },
            ],
        })
    }
}

impl Drop for RadixFftEngine {
    fn drop(&mut self) {
        self.tmp.destroy();
        for buffer in &self.stage_params {
            buffer.destroy();
        }
    }
}
