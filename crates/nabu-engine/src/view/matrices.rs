use crate::coords::{Vec2, Viewport};
use crate::geometry::COORD_SCALE;

/// Per-draw transforms handed to renderers.
///
/// `mvp` is column-major (WGSL `mat4x4<f32>` layout) and maps packed tile
/// coordinates (`tile units × COORD_SCALE`) straight to clip space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrices {
    pub mvp: [[f32; 4]; 4],
}

impl Matrices {
    pub const IDENTITY: Self = Self {
        mvp: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Builds the transform for a tile whose top-left corner sits at `origin`
    /// (pixels relative to the viewport center) and whose tile units are
    /// `px_per_unit` pixels wide.
    pub fn from_tile(origin: Vec2, px_per_unit: f32, viewport: Viewport) -> Self {
        let w = viewport.width.max(1.0);
        let h = viewport.height.max(1.0);
        let sx = px_per_unit / COORD_SCALE * 2.0 / w;
        let sy = -px_per_unit / COORD_SCALE * 2.0 / h;

        Self {
            mvp: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [origin.x * 2.0 / w, -origin.y * 2.0 / h, 0.0, 1.0],
            ],
        }
    }

    /// Applies `mvp` to a packed 2D position.
    #[cfg(test)]
    pub fn transform(&self, x: f32, y: f32) -> (f32, f32) {
        let m = &self.mvp;
        (
            m[0][0] * x + m[1][0] * y + m[3][0],
            m[0][1] * x + m[1][1] * y + m[3][1],
        )
    }
}

impl Default for Matrices {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_origin_at_center_maps_to_clip_origin() {
        let m = Matrices::from_tile(Vec2::zero(), 1.0, Viewport::new(800.0, 600.0));
        assert_eq!(m.transform(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn packed_units_are_scaled_to_pixels() {
        let vp = Viewport::new(800.0, 600.0);
        let m = Matrices::from_tile(Vec2::zero(), 1.0, vp);
        // 400 px right of center is the right clip edge; 300 px down is the bottom.
        let (x, y) = m.transform(400.0 * COORD_SCALE, 300.0 * COORD_SCALE);
        assert!((x - 1.0).abs() < 1e-6);
        assert!((y + 1.0).abs() < 1e-6);
    }
}
