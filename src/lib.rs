//! Ocean FFT Core
//!
//! GPU ocean height-field simulation: Phillips spectrum synthesis, per-frame
//! spectrum evolution and a batched radix-8 FFT, producing displacement and
//! gradient/folding maps for a renderer.
//!
//! # Features
//!
//! - Phillips spectrum and dispersion relation with an explicit, seedable RNG
//! - JSON-loadable, validated `SpectrumConfig`
//! - 512×512 radix-8 Stockham FFT over three packed channels via wgpu compute
//! - Displacement and normal/folding maps via fullscreen render passes
//! - CPU readback into `FieldSnapshot` and world-space queries via `OceanState`
//!
//! # Example
//!
//! ```no_run
//! use ocean_fft::{GpuContext, OceanSimulator, SpectrumConfig};
//!
//! let ctx = GpuContext::new_blocking()?;
//! let mut ocean = OceanSimulator::from_context(&ctx, SpectrumConfig::default(), 42)?;
//! ocean.create_output_targets();
//! ocean.tick(1.0);
//! let displacement = ocean.read_displacement()?;
//! println!("mean height {}", displacement.statistics()[2].mean);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod gpu;
pub mod simulator;
pub mod spectrum;

// Re-export commonly used types
pub use gpu::{
    ButterflyKernel, GpuContext, GpuError, OutputTargets, RadixFftEngine, RadixPlan,
    ReadbackError, RenderTarget, ResourceError, TargetError,
};
pub use simulator::{
    ChannelStats, FieldSnapshot, FrameParams, FrameStatus, OceanError, OceanSimulator, OceanState,
};
pub use spectrum::{build_initial_spectrum, ConfigError, InitialSpectrum, SpectrumConfig};
