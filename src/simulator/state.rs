//! World-space queries against the latest ocean maps.

use super::snapshot::FieldSnapshot;

/// Height and normal lookups for a tiled ocean patch.
///
/// Holds CPU copies of the displacement and gradient maps; refresh them
/// with [`OceanState::update`] (usually from
/// [`OceanSimulator::capture_state`](super::OceanSimulator::capture_state)).
#[derive(Debug, Clone)]
pub struct OceanState {
    global_level: f32,
    patch_length: f32,
    displacement: Option<FieldSnapshot>,
    gradient: Option<FieldSnapshot>,
}

impl OceanState {
    pub fn new(patch_length: f32, global_level: f32) -> Self {
        Self {
            global_level,
            patch_length,
            displacement: None,
            gradient: None,
        }
    }

    pub fn global_ocean_level(&self) -> f32 {
        self.global_level
    }

    pub fn set_global_ocean_level(&mut self, level: f32) {
        self.global_level = level;
    }

    pub fn patch_length(&self) -> f32 {
        self.patch_length
    }

    pub fn update(&mut self, displacement: FieldSnapshot, gradient: FieldSnapshot) {
        self.displacement = Some(displacement);
        self.gradient = Some(gradient);
    }

    pub fn has_maps(&self) -> bool {
        self.displacement.is_some() && self.gradient.is_some()
    }

    fn patch_uv(&self, x: f32, y: f32) -> (f32, f32) {
        (x / self.patch_length, y / self.patch_length)
    }

    /// Water surface height at world position `(x, y)`.
    ///
    /// Falls back to the global level until maps are available.
    pub fn level_at(&self, x: f32, y: f32) -> f32 {
        match &self.displacement {
            Some(map) => {
                let (u, v) = self.patch_uv(x, y);
                self.global_level + map.sample_bilinear(u, v)[2]
            }
            None => self.global_level,
        }
    }

    /// Horizontal displacement at world position `(x, y)`.
    pub fn displacement_at(&self, x: f32, y: f32) -> [f32; 3] {
        match &self.displacement {
            Some(map) => {
                let (u, v) = self.patch_uv(x, y);
                let d = map.sample_bilinear(u, v);
                [d[0], d[1], d[2]]
            }
            None => [0.0; 3],
        }
    }

    /// Unit surface normal at world position `(x, y)`. Straight up until
    /// maps are available.
    pub fn normal_at(&self, x: f32, y: f32) -> [f32; 3] {
        let Some(map) = &self.gradient else {
            return [0.0, 0.0, 1.0];
        };

        let (u, v) = self.patch_uv(x, y);
        let g = map.sample_bilinear(u, v);
        let len = (g[0] * g[0] + g[1] * g[1] + g[2] * g[2]).sqrt();
        if len > 0.0 {
            [g[0] / len, g[1] / len, g[2] / len]
        } else {
            [0.0, 0.0, 1.0]
        }
    }

    /// Folding (foam) intensity at world position `(x, y)`.
    pub fn folding_at(&self, x: f32, y: f32) -> f32 {
        match &self.gradient {
            Some(map) => {
                let (u, v) = self.patch_uv(x, y);
                map.sample_bilinear(u, v)[3]
            }
            None => 0.0,
        }
    }
}
