//! Spectrum configuration and host-side initial spectrum synthesis.
//!
//! This module provides:
//! - `SpectrumConfig` with JSON loading and validation
//! - Phillips spectrum, Gaussian draws and the dispersion relation
//! - `build_initial_spectrum` producing the static H0/Omega tables

pub mod config;
pub mod phillips;

pub use config::{ConfigError, SpectrumConfig, SUPPORTED_DIMENSION};
pub use phillips::{
    build_initial_spectrum, dispersion, gauss, phillips, wave_vector, InitialSpectrum,
    GRAV_ACCEL,
};
