//! Shared host evaluations for the ocean tests.

#![allow(dead_code)]

use ocean_fft::InitialSpectrum;
use rustfft::num_complex::Complex64;

/// Evolve `spectrum` to `time` on the host in complex arithmetic.
///
/// Returns the packed H(t), Dx(t), Dy(t) channels, `dim²` elements each,
/// in the same layout the GPU writes.
pub fn evolve_spectrum(spectrum: &InitialSpectrum, time: f32) -> Vec<Complex64> {
    let dim = spectrum.dim();
    let half = (dim / 2) as f64;
    let area = dim * dim;
    let mut packed = vec![Complex64::new(0.0, 0.0); 3 * area];

    for y in 0..dim {
        for x in 0..dim {
            let h0_k = to_complex(spectrum.h0_at(y, x));
            let h0_mk = to_complex(spectrum.h0_at(dim - y, dim - x));
            // Same f32 product as the shader
            let phase = (spectrum.omega_at(y, x) * time) as f64;
            let rotation = Complex64::from_polar(1.0, phase);

            let ht = h0_k * rotation + h0_mk.conj() * rotation.conj();

            let kx = x as f64 - half;
            let ky = y as f64 - half;
            let len = kx.hypot(ky);
            let (dx, dy) = if len > 0.0 {
                let minus_i = Complex64::new(0.0, -1.0);
                (minus_i * (kx / len) * ht, minus_i * (ky / len) * ht)
            } else {
                (Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0))
            };

            let index = y * dim + x;
            packed[index] = ht;
            packed[index + area] = dx;
            packed[index + 2 * area] = dy;
        }
    }
    packed
}

/// Upper bound on |H(t)| at bin (x, y), used to scale tolerances.
pub fn amplitude_bound(spectrum: &InitialSpectrum, x: usize, y: usize) -> f64 {
    let dim = spectrum.dim();
    to_complex(spectrum.h0_at(y, x)).norm() + to_complex(spectrum.h0_at(dim - y, dim - x)).norm()
}

pub fn to_complex(value: [f32; 2]) -> Complex64 {
    Complex64::new(value[0] as f64, value[1] as f64)
}
