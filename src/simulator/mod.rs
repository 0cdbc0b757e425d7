//! The ocean simulator: owns every GPU resource of one simulation and runs
//! the per-frame pipeline.
//!
//! Frame order, recorded into one command encoder and one submission:
//! 1. Spectrum evolution (H0, Omega, time -> Ht)
//! 2. Six radix-8 FFT stages (Ht -> Dxyz, through the plan's scratch buffer)
//! 3. Displacement compose (Dxyz -> displacement map)
//! 4. Gradient/folding compose (displacement map -> gradient map)

mod snapshot;
mod state;

pub use snapshot::{ChannelStats, FieldSnapshot};
pub use state::OceanState;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use wgpu::{Device, Queue};

use crate::gpu::compose::{DisplacementComposer, GradientFoldingComposer};
use crate::gpu::compute::buffers::{
    check_texture_dimension, read_complex_buffer, ReadbackError, ResourceError, SpectrumBuffers,
    CHANNEL_COUNT,
};
use crate::gpu::compute::params::ComposeParams;
use crate::gpu::compute::{RadixFftEngine, SpectrumEvolver};
use crate::gpu::context::{GpuContext, GpuError};
use crate::gpu::textures::{OutputTargets, ReadbackBuffer, RenderTarget, TargetError};
use crate::spectrum::{build_initial_spectrum, ConfigError, InitialSpectrum, SpectrumConfig};

/// Errors surfaced by the simulator.
#[derive(Debug, thiserror::Error)]
pub enum OceanError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Resource exhaustion: {0}")]
    ResourceExhaustion(#[from] ResourceError),
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    #[error("Output target error: {0}")]
    Target(#[from] TargetError),
    #[error("No output targets set")]
    MissingTargets,
    #[error("Buffer readback failed: {0}")]
    Readback(#[from] ReadbackError),
}

/// Immutable per-frame parameter snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// Simulation time (world time already multiplied by the time scale).
    pub time: f32,
    pub choppy_scale: f32,
    /// Grid cells per world unit.
    pub grid_len: f32,
}

/// Outcome of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// All passes were recorded and submitted.
    Rendered,
    /// No output targets are set; nothing was recorded.
    MissingTargets,
}

/// One ocean simulation on one device.
///
/// Created fully initialised by [`OceanSimulator::new`]; GPU buffers are
/// released on drop or by [`OceanSimulator::shutdown`].
pub struct OceanSimulator {
    device: Arc<Device>,
    queue: Arc<Queue>,
    config: SpectrumConfig,
    spectrum: InitialSpectrum,
    buffers: SpectrumBuffers,
    evolver: SpectrumEvolver,
    fft: RadixFftEngine,
    displacement: DisplacementComposer,
    gradient: GradientFoldingComposer,
    targets: Option<OutputTargets>,
    warned_missing_targets: bool,
}

impl OceanSimulator {
    /// Validate `config`, synthesize the initial spectrum from `rng` and
    /// allocate every buffer and pipeline.
    ///
    /// Nothing is allocated on the device if validation or a limit check fails.
    pub fn new<R: Rng + ?Sized>(
        device: Arc<Device>,
        queue: Arc<Queue>,
        config: SpectrumConfig,
        rng: &mut R,
    ) -> Result<Self, OceanError> {
        config.validate()?;

        let dim = config.disp_map_dimension;
        let limits = device.limits();
        let spectrum_len = (config.input_width() * config.input_height()) as usize;
        SpectrumBuffers::check_limits(&limits, spectrum_len, dim)?;
        check_texture_dimension(&limits, "output_target", dim)?;

        let spectrum = build_initial_spectrum(&config, rng);
        let buffers = SpectrumBuffers::new(&device, &spectrum);
        let evolver = SpectrumEvolver::new(&device, &config, &buffers);
        let fft = RadixFftEngine::new(device.clone(), CHANNEL_COUNT)?;

        let initial = ComposeParams::new(&config, config.choppy_scale, config.grid_len());
        let displacement = DisplacementComposer::new(&device, &initial);
        let gradient = GradientFoldingComposer::new(&device, &initial);

        log::info!(
            "Ocean simulator initialised: dim {}, patch length {}, {} FFT slices",
            dim,
            config.patch_length,
            CHANNEL_COUNT
        );

        Ok(Self {
            device,
            queue,
            config,
            spectrum,
            buffers,
            evolver,
            fft,
            displacement,
            gradient,
            targets: None,
            warned_missing_targets: false,
        })
    }

    /// [`OceanSimulator::new`] with a seeded `StdRng`.
    pub fn with_seed(
        device: Arc<Device>,
        queue: Arc<Queue>,
        config: SpectrumConfig,
        seed: u64,
    ) -> Result<Self, OceanError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new(device, queue, config, &mut rng)
    }

    /// Create a simulator on a [`GpuContext`] with a seeded RNG.
    pub fn from_context(
        ctx: &GpuContext,
        config: SpectrumConfig,
        seed: u64,
    ) -> Result<Self, OceanError> {
        Self::with_seed(ctx.device.clone(), ctx.queue.clone(), config, seed)
    }

    pub fn config(&self) -> &SpectrumConfig {
        &self.config
    }

    /// Host copy of the H0/Omega tables uploaded at initialisation.
    pub fn initial_spectrum(&self) -> &InitialSpectrum {
        &self.spectrum
    }

    /// Frequency-domain H(t), Dx(t), Dy(t) of the last frame.
    pub fn ht_buffer(&self) -> &wgpu::Buffer {
        &self.buffers.ht
    }

    /// Spatial-domain FFT output of the last frame.
    pub fn dxyz_buffer(&self) -> &wgpu::Buffer {
        &self.buffers.dxyz
    }

    pub fn output_targets(&self) -> Option<&OutputTargets> {
        self.targets.as_ref()
    }

    /// Set the textures written each frame. They must be `dim × dim`
    /// `Rgba32Float` with render, binding and copy-source usage.
    pub fn set_output_targets(&mut self, targets: OutputTargets) -> Result<(), OceanError> {
        let dim = self.config.disp_map_dimension;
        for (name, target) in [
            ("displacement", &targets.displacement),
            ("gradient", &targets.gradient),
        ] {
            if target.width() != dim || target.height() != dim {
                return Err(TargetError::WrongSize {
                    name,
                    expected: dim,
                    width: target.width(),
                    height: target.height(),
                }
                .into());
            }
        }

        self.targets = Some(targets);
        self.warned_missing_targets = false;
        Ok(())
    }

    /// Allocate simulator-owned targets of the right size and format.
    pub fn create_output_targets(&mut self) {
        self.targets = Some(OutputTargets::new(&self.device, self.config.disp_map_dimension));
        self.warned_missing_targets = false;
    }

    /// Remove and return the current targets.
    pub fn take_output_targets(&mut self) -> Option<OutputTargets> {
        self.targets.take()
    }

    /// Snapshot the parameters of the frame at `world_time` seconds.
    pub fn frame_params(&self, world_time: f32) -> FrameParams {
        FrameParams {
            time: world_time * self.config.time_scale,
            choppy_scale: self.config.choppy_scale,
            grid_len: self.config.grid_len(),
        }
    }

    /// Run the frame at `world_time` seconds.
    pub fn tick(&mut self, world_time: f32) -> FrameStatus {
        let frame = self.frame_params(world_time);
        self.execute(&frame)
    }

    /// Record and submit all passes for `frame`.
    ///
    /// Without output targets nothing is recorded and
    /// [`FrameStatus::MissingTargets`] is returned.
    pub fn execute(&mut self, frame: &FrameParams) -> FrameStatus {
        let Some(targets) = &self.targets else {
            if !self.warned_missing_targets {
                log::warn!("Skipping ocean frames until output targets are set");
                self.warned_missing_targets = true;
            }
            return FrameStatus::MissingTargets;
        };

        let compose = ComposeParams::new(&self.config, frame.choppy_scale, frame.grid_len);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ocean_frame_encoder"),
            });

        self.evolver.encode(&self.queue, &mut encoder, frame.time);
        self.fft
            .compute(&mut encoder, &self.buffers.ht, &self.buffers.dxyz);
        self.displacement.encode(
            &self.device,
            &self.queue,
            &mut encoder,
            &compose,
            &self.buffers.dxyz,
            targets.displacement.view(),
        );
        self.gradient.encode(
            &self.device,
            &self.queue,
            &mut encoder,
            &compose,
            targets.displacement.view(),
            targets.gradient.view(),
        );

        self.queue.submit(Some(encoder.finish()));
        log::debug!("Submitted ocean frame at t = {:.3}", frame.time);

        FrameStatus::Rendered
    }

    /// Copy the displacement map to the CPU. Waits for submitted frames.
    pub fn read_displacement(&self) -> Result<FieldSnapshot, OceanError> {
        let targets = self.targets.as_ref().ok_or(OceanError::MissingTargets)?;
        self.read_target(&targets.displacement)
    }

    /// Copy the gradient/folding map to the CPU. Waits for submitted frames.
    pub fn read_gradient(&self) -> Result<FieldSnapshot, OceanError> {
        let targets = self.targets.as_ref().ok_or(OceanError::MissingTargets)?;
        self.read_target(&targets.gradient)
    }

    /// Copy the spatial-domain FFT output (H, Dx, Dy channels back to back,
    /// before sign correction) to the CPU.
    pub fn read_spatial_domain(&self) -> Result<Vec<[f32; 2]>, OceanError> {
        read_complex_buffer(
            &self.device,
            &self.queue,
            &self.buffers.dxyz,
            self.fft.plan().element_count(),
        )
        .map_err(OceanError::from)
    }

    /// Refresh `state` with the current maps.
    pub fn capture_state(&self, state: &mut OceanState) -> Result<(), OceanError> {
        let displacement = self.read_displacement()?;
        let gradient = self.read_gradient()?;
        state.update(displacement, gradient);
        Ok(())
    }

    fn read_target(&self, target: &RenderTarget) -> Result<FieldSnapshot, OceanError> {
        let (width, height) = (target.width(), target.height());
        let readback = ReadbackBuffer::new(&self.device, width, height);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ocean_readback_encoder"),
            });
        readback.encode_copy(&mut encoder, target.texture());
        self.queue.submit(Some(encoder.finish()));

        let texels = readback.read_texels(&self.device)?;
        Ok(FieldSnapshot::new(width, height, texels))
    }

    /// Release all GPU resources now.
    pub fn shutdown(self) {
        log::info!("Ocean simulator shut down");
    }
}

impl Drop for OceanSimulator {
    fn drop(&mut self) {
        self.buffers.destroy();
        self.evolver.destroy();
        self.displacement.destroy();
        self.gradient.destroy();
        log::debug!("Released ocean simulator buffers");
    }
}
