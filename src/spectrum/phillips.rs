//! Initial spectrum synthesis: Phillips spectrum, Gaussian amplitudes and
//! the deep-water dispersion relation.

use rand::Rng;
use std::f32::consts::PI;

use super::config::SpectrumConfig;

/// Acceleration of gravity in cm/s² (world units are centimetres).
pub const GRAV_ACCEL: f32 = 981.0;

pub(crate) const HALF_SQRT_2: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// UI-facing amplitudes are scaled down by this factor.
pub const AMPLITUDE_SCALE: f32 = 1e-7;

/// Static H0 and Omega tables, laid out with a row pitch of `dim + 4` and
/// `dim + 1` rows so that the conjugate partner of every output bin exists.
#[derive(Debug, Clone)]
pub struct InitialSpectrum {
    dim: usize,
    h0: Vec<[f32; 2]>,
    omega: Vec<f32>,
}

impl InitialSpectrum {
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Row pitch in elements.
    pub fn width(&self) -> usize {
        self.dim + 4
    }

    pub fn height(&self) -> usize {
        self.dim + 1
    }

    pub fn h0(&self) -> &[[f32; 2]] {
        &self.h0
    }

    pub fn omega(&self) -> &[f32] {
        &self.omega
    }

    /// H0 at grid coordinate (row `i`, column `j`), both in `0..=dim`.
    pub fn h0_at(&self, i: usize, j: usize) -> [f32; 2] {
        self.h0[i * self.width() + j]
    }

    pub fn omega_at(&self, i: usize, j: usize) -> f32 {
        self.omega[i * self.width() + j]
    }

    /// Wave vector of grid coordinate (row `i`, column `j`).
    pub fn wave_vector(&self, i: usize, j: usize, patch_length: f32) -> [f32; 2] {
        wave_vector(self.dim, i, j, patch_length)
    }
}

/// Standard normal draw via Box-Muller. `u1` is clamped away from zero.
pub fn gauss<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let mut u1: f32 = rng.gen();
    let u2: f32 = rng.gen();

    if u1 < 1e-6 {
        u1 = 1e-6;
    }

    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Phillips spectrum.
///
/// `k`: wave vector, `wind`: unit wind direction, `v`: wind speed,
/// `a`: amplitude constant, `dir_depend`: damping for waves against the wind.
pub fn phillips(k: [f32; 2], wind: [f32; 2], v: f32, a: f32, dir_depend: f32) -> f32 {
    let ksqr = k[0] * k[0] + k[1] * k[1];
    if ksqr == 0.0 {
        return 0.0;
    }

    // Largest possible wave from constant wind of velocity v
    let l = v * v / GRAV_ACCEL;
    let w = l / 1000.0;

    let kcos = k[0] * wind[0] + k[1] * wind[1];
    let mut phillips = a * (-1.0 / (l * l * ksqr)).exp() / (ksqr * ksqr * ksqr) * (kcos * kcos);

    // Waves moving opposite to the wind
    if kcos < 0.0 {
        phillips *= dir_depend;
    }

    // Damp out waves with very small length w << l
    phillips * (-ksqr * w * w).exp()
}

/// Angular frequency from the deep-water dispersion relation `ω² = g·|K|`.
pub fn dispersion(k: [f32; 2]) -> f32 {
    (GRAV_ACCEL * (k[0] * k[0] + k[1] * k[1]).sqrt()).sqrt()
}

/// Wave vector for grid coordinate (row `i`, column `j`). The centre of the
/// grid (`dim / 2`, `dim / 2`) maps to K = 0.
pub fn wave_vector(dim: usize, i: usize, j: usize, patch_length: f32) -> [f32; 2] {
    let half = dim as f32 / 2.0;
    let step = 2.0 * PI / patch_length;
    [(-half + j as f32) * step, (-half + i as f32) * step]
}

/// Build H0 and Omega for every coordinate in `[0, dim] × [0, dim]`.
///
/// Two Gaussian draws per bin, real part first. Identical RNG state and
/// config give identical output.
pub fn build_initial_spectrum<R: Rng + ?Sized>(
    config: &SpectrumConfig,
    rng: &mut R,
) -> InitialSpectrum {
    let dim = config.dim();
    let width = dim + 4;
    let size = width * (dim + 1);

    let wind = config.normalized_wind();
    let a = config.wave_amplitude * AMPLITUDE_SCALE;
    let v = config.wind_speed;
    let dir_depend = config.wind_dependency;

    let mut h0 = vec![[0.0f32; 2]; size];
    let mut omega = vec![0.0f32; size];

    for i in 0..=dim {
        for j in 0..=dim {
            let k = wave_vector(dim, i, j, config.patch_length);
            let phil = phillips(k, wind, v, a, dir_depend).sqrt();

            let index = i * width + j;
            h0[index] = [
                phil * gauss(rng) * HALF_SQRT_2,
                phil * gauss(rng) * HALF_SQRT_2,
            ];
            omega[index] = dispersion(k);
        }
    }

    log::debug!(
        "Built initial spectrum: {}x{} bins, pitch {}",
        dim + 1,
        dim + 1,
        width
    );

    InitialSpectrum { dim, h0, omega }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_phillips_zero_at_origin() {
        assert_eq!(phillips([0.0, 0.0], [1.0, 0.0], 600.0, 1e-7, 0.07), 0.0);
    }

    #[test]
    fn test_phillips_against_wind_is_damped() {
        let wind = [1.0, 0.0];
        let k = [0.01, 0.0];
        let along = phillips(k, wind, 600.0, 1.0, 0.07);
        let against = phillips([-0.01, 0.0], wind, 600.0, 1.0, 0.07);
        assert!(along > 0.0);
        assert!((against - along * 0.07).abs() <= along * 1e-5);
    }

    #[test]
    fn test_phillips_perpendicular_to_wind_is_zero() {
        let p = phillips([0.0, 0.01], [1.0, 0.0], 600.0, 1.0, 0.07);
        assert_eq!(p, 0.0);
    }

    #[test]
    fn test_gauss_is_finite_and_roughly_standard() {
        let mut rng = StdRng::seed_from_u64(7);
        let samples: Vec<f32> = (0..20000).map(|_| gauss(&mut rng)).collect();
        assert!(samples.iter().all(|s| s.is_finite()));

        let mean = samples.iter().sum::<f32>() / samples.len() as f32;
        let var = samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f32>()
            / samples.len() as f32;
        assert!(mean.abs() < 0.05, "mean {}", mean);
        assert!((var - 1.0).abs() < 0.1, "variance {}", var);
    }

    #[test]
    fn test_dispersion() {
        let k = [3.0, 4.0];
        assert!((dispersion(k) - (GRAV_ACCEL * 5.0).sqrt()).abs() < 1e-4);
        assert_eq!(dispersion([0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_wave_vector_centre() {
        assert_eq!(wave_vector(512, 256, 256, 2000.0), [0.0, 0.0]);
        let k = wave_vector(512, 256, 257, 2000.0);
        assert!((k[0] - 2.0 * PI / 2000.0).abs() < 1e-7);
        assert_eq!(k[1], 0.0);
    }

    #[test]
    fn test_layout_and_padding() {
        let config = SpectrumConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let spectrum = build_initial_spectrum(&config, &mut rng);

        assert_eq!(spectrum.width(), 516);
        assert_eq!(spectrum.height(), 513);
        assert_eq!(spectrum.h0().len(), 516 * 513);
        assert_eq!(spectrum.omega().len(), 516 * 513);

        // Padding columns are never written
        for i in 0..spectrum.height() {
            for j in 513..516 {
                assert_eq!(spectrum.h0_at(i, j), [0.0, 0.0]);
                assert_eq!(spectrum.omega_at(i, j), 0.0);
            }
        }
    }
}
