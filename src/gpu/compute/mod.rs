//! GPU compute passes: spectrum evolution and the radix-8 FFT.

pub mod buffers;
pub mod butterfly;
pub mod evolver;
pub mod params;
pub mod radix;

pub use buffers::{read_complex_buffer, ReadbackError, ResourceError, SpectrumBuffers};
pub use butterfly::ButterflyKernel;
pub use evolver::SpectrumEvolver;
pub use params::RadixStageParams;
pub use radix::{
    RadixFftEngine, RadixPlan, COHERENCY_GRANULARITY, FFT_DIMENSION, FFT_PARAM_SETS, MAX_FFT_SLICES,
};
