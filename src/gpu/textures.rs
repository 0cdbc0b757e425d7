//! Output render targets and texture readback.

use wgpu::{Device, Texture, TextureFormat, TextureUsages, TextureView};

use crate::gpu::compute::buffers::{map_for_read, ReadbackError};

/// Format of the displacement and gradient maps.
pub const OCEAN_MAP_FORMAT: TextureFormat = TextureFormat::Rgba32Float;

/// Usages an output target needs: written by a render pass, read by the
/// gradient pass, copied out for readback.
pub const OCEAN_MAP_USAGE: TextureUsages = TextureUsages::RENDER_ATTACHMENT
    .union(TextureUsages::TEXTURE_BINDING)
    .union(TextureUsages::COPY_SRC);

const BYTES_PER_TEXEL: u32 = 16;

/// Errors raised for caller-supplied output targets and their readback.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("{name} target must be {expected:?}, got {actual:?}")]
    WrongFormat {
        name: &'static str,
        expected: TextureFormat,
        actual: TextureFormat,
    },
    #[error("{name} target must be {expected}x{expected}, got {width}x{height}")]
    WrongSize {
        name: &'static str,
        expected: u32,
        width: u32,
        height: u32,
    },
    #[error("{name} target is missing usage flags {missing:?}")]
    MissingUsage {
        name: &'static str,
        missing: TextureUsages,
    },
    #[error("Texture readback failed: {0}")]
    Readback(#[from] ReadbackError),
}

/// A render target that owns both texture and view.
/// The texture must outlive its view, so we keep them together.
pub struct RenderTarget {
    texture: Texture,
    view: TextureView,
}

impl RenderTarget {
    /// Create a new render target with the specified usage flags.
    pub fn new(
        device: &Device,
        label: &str,
        width: u32,
        height: u32,
        format: TextureFormat,
        usage: TextureUsages,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    /// Create a square `Rgba32Float` ocean map.
    pub fn for_ocean_map(device: &Device, label: &str, dim: u32) -> Self {
        Self::new(device, label, dim, dim, OCEAN_MAP_FORMAT, OCEAN_MAP_USAGE)
    }

    /// Wrap a caller-owned texture after checking format, size and usage.
    pub fn from_texture(name: &'static str, texture: Texture, dim: u32) -> Result<Self, TargetError> {
        if texture.format() != OCEAN_MAP_FORMAT {
            return Err(TargetError::WrongFormat {
                name,
                expected: OCEAN_MAP_FORMAT,
                actual: texture.format(),
            });
        }
        if texture.width() != dim || texture.height() != dim {
            return Err(TargetError::WrongSize {
                name,
                expected: dim,
                width: texture.width(),
                height: texture.height(),
            });
        }
        let missing = OCEAN_MAP_USAGE - texture.usage();
        if !missing.is_empty() {
            return Err(TargetError::MissingUsage { name, missing });
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Self { texture, view })
    }

    /// Get the texture view for rendering or sampling.
    pub fn view(&self) -> &TextureView {
        &self.view
    }

    /// Get the underlying texture (for copy operations).
    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn width(&self) -> u32 {
        self.texture.width()
    }

    pub fn height(&self) -> u32 {
        self.texture.height()
    }
}

/// Displacement and gradient targets written by the compose passes.
pub struct OutputTargets {
    pub displacement: RenderTarget,
    pub gradient: RenderTarget,
}

impl OutputTargets {
    /// Allocate both maps at `dim × dim`.
    pub fn new(device: &Device, dim: u32) -> Self {
        Self {
            displacement: RenderTarget::for_ocean_map(device, "displacement_map", dim),
            gradient: RenderTarget::for_ocean_map(device, "gradient_map", dim),
        }
    }

    /// Use caller-owned textures as targets.
    pub fn from_textures(
        displacement: Texture,
        gradient: Texture,
        dim: u32,
    ) -> Result<Self, TargetError> {
        Ok(Self {
            displacement: RenderTarget::from_texture("displacement", displacement, dim)?,
            gradient: RenderTarget::from_texture("gradient", gradient, dim)?,
        })
    }

    pub fn dim(&self) -> u32 {
        self.displacement.width()
    }
}

/// Readback buffer for copying a float RGBA texture to the CPU.
pub struct ReadbackBuffer {
    buffer: wgpu::Buffer,
    width: u32,
    height: u32,
    padded_row_bytes: u32,
    unpadded_row_bytes: u32,
}

impl ReadbackBuffer {
    /// Create a new readback buffer sized for the given dimensions.
    pub fn new(device: &Device, width: u32, height: u32) -> Self {
        let unpadded_row_bytes = width * BYTES_PER_TEXEL;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_row_bytes = unpadded_row_bytes.div_ceil(align) * align;

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback_buffer"),
            size: (padded_row_bytes * height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            width,
            height,
            padded_row_bytes,
            unpadded_row_bytes,
        }
    }

    /// Get the padded bytes per row (for texture copy).
    pub fn padded_row_bytes(&self) -> u32 {
        self.padded_row_bytes
    }

    /// Record a copy of `texture` into this buffer.
    pub fn encode_copy(&self, encoder: &mut wgpu::CommandEncoder, texture: &Texture) {
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_row_bytes),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Read texels from the mapped buffer, removing row padding.
    pub fn read_texels(&self, device: &Device) -> Result<Vec<[f32; 4]>, TargetError> {
        let buffer_slice = self.buffer.slice(..);
        map_for_read(device, &buffer_slice)?;

        let data = buffer_slice.get_mapped_range();
        let mut texels = Vec::with_capacity((self.width * self.height) as usize);
        for row in 0..self.height {
            let start = (row * self.padded_row_bytes) as usize;
            let end = start + self.unpadded_row_bytes as usize;
            let row_floats: &[f32] = bytemuck::cast_slice(&data[start..end]);
            texels.extend(row_floats.chunks_exact(4).map(|t| [t[0], t[1], t[2], t[3]]));
        }
        drop(data);
        self.buffer.unmap();

        Ok(texels)
    }
}
