//! CPU copies of the displacement and gradient maps.

use std::path::Path;

/// Mean, variance and range of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    pub mean: f32,
    pub variance: f32,
    pub min: f32,
    pub max: f32,
}

/// A `width × height` grid of RGBA float texels, row-major, row 0 first.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSnapshot {
    width: u32,
    height: u32,
    texels: Vec<[f32; 4]>,
}

impl FieldSnapshot {
    /// Wrap texel data.
    ///
    /// # Panics
    /// Panics if `texels.len() != width * height`.
    pub fn new(width: u32, height: u32, texels: Vec<[f32; 4]>) -> Self {
        assert_eq!(
            texels.len(),
            (width * height) as usize,
            "Snapshot texel count does not match its size"
        );
        Self {
            width,
            height,
            texels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn texels(&self) -> &[[f32; 4]] {
        &self.texels
    }

    /// Texel at integer coordinates, wrapping around the patch.
    pub fn texel(&self, x: i64, y: i64) -> [f32; 4] {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        self.texels[y * self.width as usize + x]
    }

    /// Bilinear sample at normalized coordinates with wrap addressing.
    ///
    /// Texel centres sit at `(i + 0.5) / width`, as on the GPU.
    pub fn sample_bilinear(&self, u: f32, v: f32) -> [f32; 4] {
        let fx = u * self.width as f32 - 0.5;
        let fy = v * self.height as f32 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let t00 = self.texel(x0, y0);
        let t10 = self.texel(x0 + 1, y0);
        let t01 = self.texel(x0, y0 + 1);
        let t11 = self.texel(x0 + 1, y0 + 1);

        let mut out = [0.0f32; 4];
        for c in 0..4 {
            let top = t00[c] + (t10[c] - t00[c]) * tx;
            let bottom = t01[c] + (t11[c] - t01[c]) * tx;
            out[c] = top + (bottom - top) * ty;
        }
        out
    }

    /// Per-channel statistics.
    pub fn statistics(&self) -> [ChannelStats; 4] {
        let count = self.texels.len().max(1) as f64;
        let mut stats = [ChannelStats {
            mean: 0.0,
            variance: 0.0,
            min: 0.0,
            max: 0.0,
        }; 4];

        for (c, stat) in stats.iter_mut().enumerate() {
            let mut sum = 0.0f64;
            let mut min = f32::INFINITY;
            let mut max = f32::NEG_INFINITY;
            for t in &self.texels {
                sum += t[c] as f64;
                min = min.min(t[c]);
                max = max.max(t[c]);
            }
            let mean = sum / count;
            let variance = self
                .texels
                .iter()
                .map(|t| {
                    let d = t[c] as f64 - mean;
                    d * d
                })
                .sum::<f64>()
                / count;

            *stat = ChannelStats {
                mean: mean as f32,
                variance: variance as f32,
                min,
                max,
            };
        }
        stats
    }

    /// Map each channel's range onto 0..=255 for viewing.
    pub fn to_rgba8(&self) -> image::RgbaImage {
        let stats = self.statistics();
        let mut img = image::RgbaImage::new(self.width, self.height);
        for (i, pixel) in img.pixels_mut().enumerate() {
            let texel = self.texels[i];
            let mut rgba = [0u8; 4];
            for c in 0..4 {
                let range = stats[c].max - stats[c].min;
                let normalized = if range > 0.0 {
                    (texel[c] - stats[c].min) / range
                } else {
                    0.5
                };
                rgba[c] = (normalized.clamp(0.0, 1.0) * 255.0).round() as u8;
            }
            *pixel = image::Rgba(rgba);
        }
        img
    }

    /// Write [`FieldSnapshot::to_rgba8`] to a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.to_rgba8().save_with_format(path, image::ImageFormat::Png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: u32, height: u32) -> FieldSnapshot {
        let texels = (0..height)
            .flat_map(|y| (0..width).map(move |x| [x as f32, y as f32, (x + y) as f32, 1.0]))
            .collect();
        FieldSnapshot::new(width, height, texels)
    }

    #[test]
    fn test_texel_wraps() {
        let snap = ramp(4, 4);
        assert_eq!(snap.texel(0, 0), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(snap.texel(-1, 0), [3.0, 0.0, 3.0, 1.0]);
        assert_eq!(snap.texel(5, 6), [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_bilinear_hits_texel_centres() {
        let snap = ramp(4, 4);
        let centre = snap.sample_bilinear(2.5 / 4.0, 1.5 / 4.0);
        assert!((centre[0] - 2.0).abs() < 1e-6);
        assert!((centre[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_bilinear_interpolates_between_texels() {
        let snap = ramp(4, 4);
        let mid = snap.sample_bilinear(2.0 / 4.0, 1.5 / 4.0);
        assert!((mid[0] - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_statistics() {
        let snap = ramp(4, 1);
        let stats = snap.statistics();
        assert!((stats[0].mean - 1.5).abs() < 1e-6);
        assert!((stats[0].variance - 1.25).abs() < 1e-6);
        assert_eq!(stats[0].min, 0.0);
        assert_eq!(stats[0].max, 3.0);
        assert_eq!(stats[3].variance, 0.0);
    }

    #[test]
    fn test_to_rgba8_normalizes() {
        let snap = ramp(4, 1);
        let img = snap.to_rgba8();
        assert_eq!(img.get_pixel(0, 0).0[0], 0);
        assert_eq!(img.get_pixel(3, 0).0[0], 255);
        // Constant channel maps to mid grey
        assert_eq!(img.get_pixel(2, 0).0[3], 128);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.png");
        ramp(8, 8).save_png(&path).unwrap();
        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.width(), 8);
    }
}
