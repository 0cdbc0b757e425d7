//! Bind group layout builders for the ocean compute and compose passes.
//!
//! Provides reusable helpers for creating wgpu bind group layouts.

use wgpu::{BindGroupLayout, BindGroupLayoutEntry, Device, ShaderStages};

/// Builder for creating bind group layouts with common patterns.
pub struct BindGroupLayoutBuilder {
    label: Option<&'static str>,
    entries: Vec<BindGroupLayoutEntry>,
}

impl BindGroupLayoutBuilder {
    /// Create a new bind group layout builder.
    pub fn new(label: &'static str) -> Self {
        Self {
            label: Some(label),
            entries: Vec::new(),
        }
    }

    /// Add a uniform buffer entry.
    pub fn uniform(mut self, binding: u32, visibility: ShaderStages) -> Self {
        self.entries.push(BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        });
        self
    }

    /// Add a storage buffer entry.
    pub fn storage(mut self, binding: u32, visibility: ShaderStages, read_only: bool) -> Self {
        self.entries.push(BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        });
        self
    }

    /// Add a 2D float texture entry read with `textureLoad`.
    ///
    /// Marked non-filterable so 32-bit float targets can be bound.
    pub fn texture_2d(mut self, binding: u32, visibility: ShaderStages) -> Self {
        self.entries.push(BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: false },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        });
        self
    }

    /// Build the bind group layout.
    pub fn build(self, device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: self.label,
            entries: &self.entries,
        })
    }
}

/// Spectrum update layout (H0, Omega, Ht, grid params, frame params).
pub fn create_spectrum_layout(device: &Device) -> BindGroupLayout {
    BindGroupLayoutBuilder::new("update_spectrum_layout")
        .storage(0, ShaderStages::COMPUTE, true)
        .storage(1, ShaderStages::COMPUTE, true)
        .storage(2, ShaderStages::COMPUTE, false)
        .uniform(3, ShaderStages::COMPUTE)
        .uniform(4, ShaderStages::COMPUTE)
        .build(device)
}

/// Radix butterfly layout (source, destination, stage params).
pub fn create_radix_layout(device: &Device) -> BindGroupLayout {
    BindGroupLayoutBuilder::new("radix008a_layout")
        .storage(0, ShaderStages::COMPUTE, true)
        .storage(1, ShaderStages::COMPUTE, false)
        .uniform(2, ShaderStages::COMPUTE)
        .build(device)
}

/// Displacement compose layout (params, spatial-domain Dxyz buffer).
pub fn create_displacement_layout(device: &Device) -> BindGroupLayout {
    BindGroupLayoutBuilder::new("displacement_layout")
        .uniform(0, ShaderStages::FRAGMENT)
        .storage(1, ShaderStages::FRAGMENT, true)
        .build(device)
}

/// Gradient/folding compose layout (params, displacement texture).
pub fn create_gradient_layout(device: &Device) -> BindGroupLayout {
    BindGroupLayoutBuilder::new("gradient_folding_layout")
        .uniform(0, ShaderStages::FRAGMENT)
        .texture_2d(1, ShaderStages::FRAGMENT)
        .build(device)
}
