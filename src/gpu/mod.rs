//! GPU compute and rendering using wgpu.
//!
//! Headless device setup, the spectrum and FFT compute passes, and the
//! two fullscreen passes that write the displacement and gradient maps.

pub mod compose;
pub mod compute;
pub mod context;
pub mod layouts;
pub mod pipelines;
pub mod textures;

pub use compose::{DisplacementComposer, GradientFoldingComposer};
pub use compute::{
    ButterflyKernel, RadixFftEngine, RadixPlan, ReadbackError, ResourceError, SpectrumEvolver,
};
pub use context::{GpuContext, GpuError};
pub use textures::{OutputTargets, RenderTarget, TargetError};
