//! GPU buffer management for the spectrum and FFT passes.

use wgpu::util::DeviceExt;
use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::spectrum::InitialSpectrum;

/// Bytes per complex element (two `f32`).
pub const COMPLEX_SIZE: u64 = 8;

/// Channels packed into Ht/Dxyz: height, x-displacement, y-displacement.
pub const CHANNEL_COUNT: u32 = 3;

/// Allocation requests the device cannot satisfy.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResourceError {
    #[error("{resource} needs {requested}, device limit is {limit}")]
    LimitExceeded {
        resource: &'static str,
        requested: u64,
        limit: u64,
    },
    #[error("Radix plan slice count {0} is out of range")]
    InvalidSliceCount(u32),
}

/// Failures while mapping a staging buffer back to the CPU.
#[derive(Debug, thiserror::Error)]
pub enum ReadbackError {
    #[error("Device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),
    #[error("Map callback was dropped before completing")]
    CallbackDropped,
    #[error("Buffer map failed: {0}")]
    BufferMapFailed(#[from] wgpu::BufferAsyncError),
}

/// Map `slice` for reading and block until the mapping completes.
pub fn map_for_read(device: &Device, slice: &wgpu::BufferSlice<'_>) -> Result<(), ReadbackError> {
    let (sender, receiver) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    device.poll(wgpu::PollType::wait_indefinitely())?;
    receiver
        .recv()
        .map_err(|_| ReadbackError::CallbackDropped)??;
    Ok(())
}

/// Check a storage buffer request against the device limits.
pub fn check_storage_buffer(
    limits: &wgpu::Limits,
    resource: &'static str,
    size: u64,
) -> Result<(), ResourceError> {
    let limit = limits
        .max_buffer_size
        .min(u64::from(limits.max_storage_buffer_binding_size));
    if size > limit {
        return Err(ResourceError::LimitExceeded {
            resource,
            requested: size,
            limit,
        });
    }
    Ok(())
}

/// Check a square texture request against the device limits.
pub fn check_texture_dimension(
    limits: &wgpu::Limits,
    resource: &'static str,
    dim: u32,
) -> Result<(), ResourceError> {
    if dim > limits.max_texture_dimension_2d {
        return Err(ResourceError::LimitExceeded {
            resource,
            requested: dim as u64,
            limit: limits.max_texture_dimension_2d as u64,
        });
    }
    Ok(())
}

/// Size in bytes of the packed three-channel Ht/Dxyz buffers.
pub fn packed_channels_size(dim: u32) -> u64 {
    CHANNEL_COUNT as u64 * dim as u64 * dim as u64 * COMPLEX_SIZE
}

/// Static and per-frame buffers of one simulator.
pub struct SpectrumBuffers {
    /// H0, `(dim + 4) × (dim + 1)` complex, read-only after upload.
    pub h0: Buffer,
    /// Omega, same layout as H0, one `f32` per bin.
    pub omega: Buffer,
    /// Frequency-domain H(t), Dx(t), Dy(t).
    pub ht: Buffer,
    /// Spatial-domain result of the FFT.
    pub dxyz: Buffer,
}

impl SpectrumBuffers {
    /// Validate sizes against `limits` without allocating.
    pub fn check_limits(
        limits: &wgpu::Limits,
        spectrum_len: usize,
        dim: u32,
    ) -> Result<(), ResourceError> {
        check_storage_buffer(limits, "h0", spectrum_len as u64 * COMPLEX_SIZE)?;
        check_storage_buffer(limits, "omega", spectrum_len as u64 * 4)?;
        check_storage_buffer(limits, "ht", packed_channels_size(dim))?;
        check_storage_buffer(limits, "dxyz", packed_channels_size(dim))
    }

    /// Upload the initial spectrum and allocate the packed channel buffers.
    pub fn new(device: &Device, spectrum: &InitialSpectrum) -> Self {
        let h0 = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("h0_buffer"),
            contents: bytemuck::cast_slice(spectrum.h0()),
            usage: BufferUsages::STORAGE,
        });

        let omega = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("omega_buffer"),
            contents: bytemuck::cast_slice(spectrum.omega()),
            usage: BufferUsages::STORAGE,
        });

        let packed_size = packed_channels_size(spectrum.dim() as u32);
        let ht = Self::create_storage_buffer(device, "ht_buffer", packed_size);
        let dxyz = Self::create_storage_buffer(device, "dxyz_buffer", packed_size);

        Self { h0, omega, ht, dxyz }
    }

    fn create_storage_buffer(device: &Device, label: &str, size: u64) -> Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_SRC | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Release GPU memory now instead of waiting for the handles to drop.
    pub fn destroy(&self) {
        self.h0.destroy();
        self.omega.destroy();
        self.ht.destroy();
        self.dxyz.destroy();
    }
}

/// Create a uniform buffer initialised with `value`.
pub fn create_uniform_buffer<T: bytemuck::Pod>(device: &Device, label: &str, value: &T) -> Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(value),
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
    })
}

/// Copy `count` complex elements of `source` to the CPU.
///
/// Blocks until the GPU has finished all submitted work.
pub fn read_complex_buffer(
    device: &Device,
    queue: &Queue,
    source: &Buffer,
    count: usize,
) -> Result<Vec<[f32; 2]>, ReadbackError> {
    let size = count as u64 * COMPLEX_SIZE;
    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("complex_staging"),
        size,
        usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("complex_readback_encoder"),
    });
    encoder.copy_buffer_to_buffer(source, 0, &staging, 0, size);
    queue.submit(Some(encoder.finish()));

    let slice = staging.slice(..);
    map_for_read(device, &slice)?;

    let data = slice.get_mapped_range();
    let result: Vec<[f32; 2]> = bytemuck::cast_slice(&data).to_vec();
    drop(data);
    staging.unmap();

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_channels_size() {
        assert_eq!(packed_channels_size(512), 3 * 512 * 512 * 8);
    }

    #[test]
    fn test_check_storage_buffer_against_limits() {
        let limits = wgpu::Limits {
            max_storage_buffer_binding_size: 1 << 20,
            ..wgpu::Limits::default()
        };
        assert!(check_storage_buffer(&limits, "small", 1024).is_ok());

        let err = check_storage_buffer(&limits, "ht", packed_channels_size(512)).unwrap_err();
        assert_eq!(
            err,
            ResourceError::LimitExceeded {
                resource: "ht",
                requested: packed_channels_size(512),
                limit: 1 << 20,
            }
        );
    }

    #[test]
    fn test_check_texture_dimension() {
        let limits = wgpu::Limits {
            max_texture_dimension_2d: 256,
            ..wgpu::Limits::default()
        };
        let err = check_texture_dimension(&limits, "displacement_map", 512).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::LimitExceeded {
                requested: 512,
                limit: 256,
                ..
            }
        ));
    }

    #[test]
    fn test_readback_error_messages() {
        assert_eq!(
            ReadbackError::CallbackDropped.to_string(),
            "Map callback was dropped before completing"
        );
        let err = ReadbackError::from(wgpu::BufferAsyncError);
        assert!(matches!(err, ReadbackError::BufferMapFailed(_)));
        assert!(err.to_string().starts_with("Buffer map failed"));
    }

    #[tokio::test]
    async fn test_read_complex_buffer_returns_uploaded_values() {
        let ctx = match crate::gpu::GpuContext::new().await {
            Ok(ctx) => ctx,
            Err(_) => return,
        };

        let values: Vec<[f32; 2]> = (0..64).map(|i| [i as f32, -(i as f32)]).collect();
        let buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("readback_source"),
            contents: bytemuck::cast_slice(&values),
            usage: BufferUsages::STORAGE | BufferUsages::COPY_SRC,
        });

        let read = read_complex_buffer(&ctx.device, &ctx.queue, &buffer, values.len()).unwrap();
        assert_eq!(read, values);
    }
}
