//! Uniform parameter structs for the ocean compute and compose shaders.
//!
//! These structs must match the WGSL shader definitions exactly,
//! including alignment requirements (every struct is padded to 16 bytes).

use crate::spectrum::SpectrumConfig;

/// Per-stage parameters of the radix-8 butterfly kernel.
/// WGSL: struct RadixParams { thread_count, ostride, istride, pstride: u32, phase_base: f32, 3x pad }
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RadixStageParams {
    pub thread_count: u32,
    pub ostride: u32,
    pub istride: u32,
    pub pstride: u32,
    pub phase_base: f32,
    pub _padding: [u32; 3],
}

impl RadixStageParams {
    pub fn new(thread_count: u32, ostride: u32, istride: u32, pstride: u32, phase_base: f32) -> Self {
        Self {
            thread_count,
            ostride,
            istride,
            pstride,
            phase_base,
            _padding: [0; 3],
        }
    }
}

/// Grid layout parameters of the spectrum update, fixed per session.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpectrumGridParams {
    pub actual_dim: u32,
    pub in_width: u32,
    pub out_width: u32,
    pub out_height: u32,
    pub dx_address_offset: u32,
    pub dy_address_offset: u32,
    pub _padding: [u32; 2],
}

impl SpectrumGridParams {
    pub fn new(config: &SpectrumConfig) -> Self {
        Self {
            actual_dim: config.disp_map_dimension,
            in_width: config.input_width(),
            out_width: config.disp_map_dimension,
            out_height: config.disp_map_dimension,
            dx_address_offset: config.dx_address_offset(),
            dy_address_offset: config.dy_address_offset(),
            _padding: [0; 2],
        }
    }
}

/// Spectrum update parameters that change every frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpectrumFrameParams {
    pub time: f32,
    pub _padding: [f32; 3],
}

impl SpectrumFrameParams {
    pub fn new(time: f32) -> Self {
        Self {
            time,
            _padding: [0.0; 3],
        }
    }
}

/// Parameters shared by the displacement and gradient/folding passes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ComposeParams {
    pub choppy_scale: f32,
    pub grid_len: f32,
    pub out_width: u32,
    pub out_height: u32,
    pub dx_address_offset: u32,
    pub dy_address_offset: u32,
    pub _padding: [u32; 2],
}

impl ComposeParams {
    pub fn new(config: &SpectrumConfig, choppy_scale: f32, grid_len: f32) -> Self {
        Self {
            choppy_scale,
            grid_len,
            out_width: config.disp_map_dimension,
            out_height: config.disp_map_dimension,
            dx_address_offset: config.dx_address_offset(),
            dy_address_offset: config.dy_address_offset(),
            _padding: [0; 2],
        }
    }
}
