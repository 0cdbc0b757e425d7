//! Phillips spectrum configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// The only displacement map size the radix-8 plan supports.
pub const SUPPORTED_DIMENSION: u32 = 512;

/// Errors raised while loading or validating a [`SpectrumConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Displacement map dimension must be 512, got {0}")]
    InvalidDimension(u32),
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("Wind direction must have non-zero length")]
    ZeroWindDirection,
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Phillips spectrum configuration.
///
/// Immutable for the lifetime of a simulator; changing any field means
/// building a new simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumConfig {
    /// Size of the displacement map. Must be 512 for the radix-8 plan.
    pub disp_map_dimension: u32,
    /// Side length (world space) of the square patch. Typical value is 1000 ~ 2000.
    pub patch_length: f32,
    /// Multiplier applied to world time (controls simulation speed).
    pub time_scale: f32,
    /// Amplitude for the transverse wave. Around 1.0, not a world space height.
    pub wave_amplitude: f32,
    /// Wind direction. Normalized internally.
    pub wind_direction: [f32; 2],
    /// Larger wind speed gives larger wave crests. Around 100 ~ 1000.
    pub wind_speed: f32,
    /// Damping for waves moving against the wind. Smaller means stronger wind dependency.
    pub wind_dependency: f32,
    /// Amplitude of the longitudinal (choppy) wave. Higher values give pointy crests.
    pub choppy_scale: f32,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            disp_map_dimension: SUPPORTED_DIMENSION,
            patch_length: 2000.0,
            time_scale: 0.8,
            wave_amplitude: 0.35,
            wind_direction: [0.8, 0.6],
            wind_speed: 600.0,
            wind_dependency: 0.07,
            choppy_scale: 1.3,
        }
    }
}

impl SpectrumConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations that the plan cannot run or that would
    /// produce NaN/Inf in the spectrum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.disp_map_dimension != SUPPORTED_DIMENSION {
            return Err(ConfigError::InvalidDimension(self.disp_map_dimension));
        }

        let fields = [
            ("patch_length", self.patch_length),
            ("time_scale", self.time_scale),
            ("wave_amplitude", self.wave_amplitude),
            ("wind_direction.x", self.wind_direction[0]),
            ("wind_direction.y", self.wind_direction[1]),
            ("wind_speed", self.wind_speed),
            ("wind_dependency", self.wind_dependency),
            ("choppy_scale", self.choppy_scale),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }

        for (field, value) in [
            ("patch_length", self.patch_length),
            ("wind_speed", self.wind_speed),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        for (field, value) in [
            ("wave_amplitude", self.wave_amplitude),
            ("wind_dependency", self.wind_dependency),
            ("choppy_scale", self.choppy_scale),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let [wx, wy] = self.wind_direction;
        if wx * wx + wy * wy <= f32::EPSILON {
            return Err(ConfigError::ZeroWindDirection);
        }

        Ok(())
    }

    pub fn dim(&self) -> usize {
        self.disp_map_dimension as usize
    }

    /// Grid cells per world unit.
    pub fn grid_len(&self) -> f32 {
        self.disp_map_dimension as f32 / self.patch_length
    }

    /// Unit-length wind direction.
    pub fn normalized_wind(&self) -> [f32; 2] {
        let [x, y] = self.wind_direction;
        let len = (x * x + y * y).sqrt();
        if len > 0.0 {
            [x / len, y / len]
        } else {
            [0.0, 0.0]
        }
    }

    /// Row pitch of the H0/Omega buffers (four columns of padding).
    pub fn input_width(&self) -> u32 {
        self.disp_map_dimension + 4
    }

    /// Row count of the H0/Omega buffers (one extra row for the mirrored partner).
    pub fn input_height(&self) -> u32 {
        self.disp_map_dimension + 1
    }

    /// Element offset of the Dx channel inside the packed Ht buffer.
    pub fn dx_address_offset(&self) -> u32 {
        self.disp_map_dimension * self.disp_map_dimension
    }

    /// Element offset of the Dy channel inside the packed Ht buffer.
    pub fn dy_address_offset(&self) -> u32 {
        self.disp_map_dimension * self.disp_map_dimension * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SpectrumConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.disp_map_dimension, 512);
        assert_eq!(config.input_width(), 516);
        assert_eq!(config.input_height(), 513);
        assert_eq!(config.dx_address_offset(), 512 * 512);
        assert_eq!(config.dy_address_offset(), 2 * 512 * 512);
    }

    #[test]
    fn test_rejects_other_dimensions() {
        for dim in [0, 64, 256, 1024] {
            let config = SpectrumConfig {
                disp_map_dimension: dim,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidDimension(d)) if d == dim
            ));
        }
    }

    #[test]
    fn test_rejects_degenerate_physics() {
        let zero_patch = SpectrumConfig {
            patch_length: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero_patch.validate(),
            Err(ConfigError::NonPositive { field: "patch_length", .. })
        ));

        let zero_wind = SpectrumConfig {
            wind_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero_wind.validate(),
            Err(ConfigError::NonPositive { field: "wind_speed", .. })
        ));

        let no_direction = SpectrumConfig {
            wind_direction: [0.0, 0.0],
            ..Default::default()
        };
        assert!(matches!(
            no_direction.validate(),
            Err(ConfigError::ZeroWindDirection)
        ));

        let nan_amplitude = SpectrumConfig {
            wave_amplitude: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            nan_amplitude.validate(),
            Err(ConfigError::NonFinite { field: "wave_amplitude", .. })
        ));

        let negative_choppy = SpectrumConfig {
            choppy_scale: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            negative_choppy.validate(),
            Err(ConfigError::Negative { field: "choppy_scale", .. })
        ));
    }

    #[test]
    fn test_normalized_wind() {
        let config = SpectrumConfig {
            wind_direction: [3.0, 4.0],
            ..Default::default()
        };
        let [x, y] = config.normalized_wind();
        assert!((x - 0.6).abs() < 1e-6);
        assert!((y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_grid_len() {
        let config = SpectrumConfig::default();
        assert!((config.grid_len() - 0.256).abs() < 1e-6);
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let config = SpectrumConfig::from_json_str(r#"{ "wind_speed": 300.0 }"#).unwrap();
        assert_eq!(config.wind_speed, 300.0);
        assert_eq!(config.patch_length, 2000.0);
        assert_eq!(config.disp_map_dimension, 512);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = SpectrumConfig {
            choppy_scale: 2.0,
            wind_direction: [1.0, 0.0],
            ..Default::default()
        };
        let json = config.to_json_string().unwrap();
        let parsed = SpectrumConfig::from_json_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_invalid_json() {
        let result = SpectrumConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
