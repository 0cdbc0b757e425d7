//! The two variants of the radix-8 butterfly stage.
//!
//! Both variants share [`RadixStageParams`] and the same arithmetic; the
//! unit-stride variant only drops the input striding and twiddle step,
//! which are identities when `istride == 1`. The host `apply` performs
//! exactly the work of the matching WGSL entry point, thread by thread.

use super::params::RadixStageParams;

type Complex = [f32; 2];

const COS_PI_4: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Output slot `k` of the stage is written from `fft8` register `OUTPUT_ORDER[k]`.
const OUTPUT_ORDER: [usize; 8] = [0, 4, 2, 6, 1, 5, 3, 7];

/// Butterfly kernel variant of one FFT stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButterflyKernel {
    /// General addressing with twiddles, used while `istride > 1`.
    Strided,
    /// Contiguous input, no twiddles, used when `istride == 1`.
    UnitStride,
}

impl ButterflyKernel {
    /// Pick the kernel for a stage.
    pub fn for_stage(params: &RadixStageParams) -> Self {
        if params.istride > 1 {
            ButterflyKernel::Strided
        } else {
            ButterflyKernel::UnitStride
        }
    }

    /// WGSL entry point implementing this variant.
    pub fn entry_point(self) -> &'static str {
        match self {
            ButterflyKernel::Strided => "radix008a_strided",
            ButterflyKernel::UnitStride => "radix008a_unit_stride",
        }
    }

    /// Run one stage on the host, reading `src` and writing `dst`.
    ///
    /// Both slices must hold at least `8 * params.thread_count` elements.
    pub fn apply(self, params: &RadixStageParams, src: &[Complex], dst: &mut [Complex]) {
        for thread_id in 0..params.thread_count {
            let mut d = [[0.0f32; 2]; 8];

            match self {
                ButterflyKernel::Strided => {
                    let istride = params.istride;
                    let imod = thread_id & (istride - 1);
                    let iaddr = ((thread_id - imod) << 3) + imod;
                    for (i, value) in d.iter_mut().enumerate() {
                        *value = src[(iaddr + i as u32 * istride) as usize];
                    }

                    fft8(&mut d);

                    let p = thread_id & (istride - params.pstride);
                    let phase = params.phase_base * p as f32;
                    for (k, &slot) in OUTPUT_ORDER.iter().enumerate().skip(1) {
                        d[slot] = twiddle(d[slot], phase * k as f32);
                    }
                }
                ButterflyKernel::UnitStride => {
                    let iaddr = (thread_id << 3) as usize;
                    d.copy_from_slice(&src[iaddr..iaddr + 8]);
                    fft8(&mut d);
                }
            }

            let ostride = params.ostride;
            let omod = thread_id & (ostride - 1);
            let oaddr = ((thread_id - omod) << 3) + omod;
            for (k, &slot) in OUTPUT_ORDER.iter().enumerate() {
                dst[(oaddr + k as u32 * ostride) as usize] = d[slot];
            }
        }
    }
}

fn add(a: Complex, b: Complex) -> Complex {
    [a[0] + b[0], a[1] + b[1]]
}

fn sub(a: Complex, b: Complex) -> Complex {
    [a[0] - b[0], a[1] - b[1]]
}

fn mul(a: Complex, b: Complex) -> Complex {
    [a[0] * b[0] - a[1] * b[1], a[0] * b[1] + a[1] * b[0]]
}

// a * -i
fn rot_neg_i(a: Complex) -> Complex {
    [a[1], -a[0]]
}

fn twiddle(d: Complex, phase: f32) -> Complex {
    let (sin, cos) = phase.sin_cos();
    mul(d, [cos, sin])
}

fn ft2(d: &mut [Complex; 8], a: usize, b: usize) {
    let t = d[a];
    d[a] = add(t, d[b]);
    d[b] = sub(t, d[b]);
}

fn upd(d: &mut [Complex; 8], a: usize, b: usize) {
    let t = rot_neg_i(d[b]);
    d[b] = sub(d[a], t);
    d[a] = add(d[a], t);
}

/// 8-point DFT with negative exponent; register `r` ends up holding the
/// bin `OUTPUT_ORDER` places it at.
fn fft8(d: &mut [Complex; 8]) {
    for i in 0..4 {
        ft2(d, i, i + 4);
    }
    upd(d, 4, 6);
    upd(d, 5, 7);
    d[5] = mul(d[5], [COS_PI_4, -COS_PI_4]);
    d[7] = mul(d[7], [-COS_PI_4, -COS_PI_4]);

    ft2(d, 0, 2);
    ft2(d, 1, 3);
    ft2(d, 0, 1);
    upd(d, 2, 3);

    ft2(d, 4, 5);
    ft2(d, 6, 7);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dft8(x: &[Complex; 8]) -> [Complex; 8] {
        let mut out = [[0.0f32; 2]; 8];
        for (k, o) in out.iter_mut().enumerate() {
            for (n, v) in x.iter().enumerate() {
                let angle = -2.0 * std::f64::consts::PI * (k * n) as f64 / 8.0;
                let w = [angle.cos() as f32, angle.sin() as f32];
                *o = add(*o, mul(*v, w));
            }
        }
        out
    }

    #[test]
    fn test_fft8_matches_dft_in_output_order() {
        let input: [Complex; 8] = [
            [1.0, 0.5],
            [-0.25, 2.0],
            [0.75, -1.0],
            [3.0, 0.0],
            [-1.5, 0.25],
            [0.0, -0.75],
            [2.25, 1.25],
            [-0.5, -2.0],
        ];
        let expected = dft8(&input);

        let mut d = input;
        fft8(&mut d);

        for (k, &slot) in OUTPUT_ORDER.iter().enumerate() {
            assert!((d[slot][0] - expected[k][0]).abs() < 1e-4, "bin {} re", k);
            assert!((d[slot][1] - expected[k][1]).abs() < 1e-4, "bin {} im", k);
        }
    }

    #[test]
    fn test_kernel_selection() {
        let strided = RadixStageParams::new(1024, 8, 8, 1, 0.0);
        let unit = RadixStageParams::new(1024, 8, 1, 1, 0.0);
        assert_eq!(ButterflyKernel::for_stage(&strided), ButterflyKernel::Strided);
        assert_eq!(ButterflyKernel::for_stage(&unit), ButterflyKernel::UnitStride);
        assert_eq!(ButterflyKernel::UnitStride.entry_point(), "radix008a_unit_stride");
    }

    #[test]
    fn test_unit_stride_single_block() {
        // One thread, contiguous 8 elements: a plain 8-point DFT.
        let params = RadixStageParams::new(1, 1, 1, 1, 0.0);
        let src: Vec<Complex> = (0..8).map(|i| [i as f32, 0.0]).collect();
        let mut dst = vec![[0.0f32; 2]; 8];
        ButterflyKernel::UnitStride.apply(&params, &src, &mut dst);

        let mut input = [[0.0f32; 2]; 8];
        input.copy_from_slice(&src);
        let expected = dft8(&input);
        for k in 0..8 {
            assert!((dst[k][0] - expected[k][0]).abs() < 1e-4);
            assert!((dst[k][1] - expected[k][1]).abs() < 1e-4);
        }
    }
}
