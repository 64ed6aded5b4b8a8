use crate::coords::{Vec2, Viewport};
use crate::geo::{mercator, BoundingBox, GeoPoint};
use crate::geometry::TILE_UNITS;

use super::{Matrices, ViewState};

/// Edge length of a tile in logical pixels at its native zoom level.
pub const TILE_SIZE_PX: f64 = 256.0;

/// Web-Mercator camera: a center point, a zoom scale and the viewport.
///
/// Rotation and tilt are not modelled; the view box is the axis-aligned
/// unprojection of the viewport corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MapViewState {
    pub center: GeoPoint,
    /// `2^zoom`; 1.0 shows the whole world in one tile.
    pub zoom_scale: f64,
    pub viewport: Viewport,
}

impl MapViewState {
    #[inline]
    pub const fn new(center: GeoPoint, zoom_scale: f64, viewport: Viewport) -> Self {
        Self {
            center,
            zoom_scale,
            viewport,
        }
    }

    /// World edge length in pixels at the current zoom.
    #[inline]
    pub fn world_size(&self) -> f64 {
        TILE_SIZE_PX * self.zoom_scale
    }

    /// Inverse of [`ViewState::project`].
    pub fn unproject(&self, centered: Vec2) -> GeoPoint {
        let (cx, cy) = mercator::project(self.center);
        let world = self.world_size();
        mercator::unproject(
            cx + centered.x as f64 / world,
            cy + centered.y as f64 / world,
        )
    }

    /// Returns the transform for tile `(x, y)` at `zoom` and the matching zoom
    /// divisor (`2^zoom`) for the line renderer.
    pub fn tile_matrices(&self, x: u32, y: u32, zoom: u8) -> (Matrices, f32) {
        let div = (1u64 << zoom) as f64;
        let (cx, cy) = mercator::project(self.center);
        let world = self.world_size();

        let origin = Vec2::new(
            ((x as f64 / div - cx) * world) as f32,
            ((y as f64 / div - cy) * world) as f32,
        );
        let px_per_unit = (world / div / TILE_UNITS as f64) as f32;

        (
            Matrices::from_tile(origin, px_per_unit, self.viewport),
            div as f32,
        )
    }
}

impl ViewState for MapViewState {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn view_box(&self) -> BoundingBox {
        let half = self.viewport.center();
        let top_left = self.unproject(Vec2::new(-half.x, -half.y));
        let bottom_right = self.unproject(half);
        BoundingBox::from_corners(top_left, bottom_right)
    }

    fn project(&self, point: GeoPoint) -> Vec2 {
        let (cx, cy) = mercator::project(self.center);
        let (px, py) = mercator::project(point);
        let world = self.world_size();
        Vec2::new(((px - cx) * world) as f32, ((py - cy) * world) as f32)
    }

    fn zoom_scale(&self) -> f64 {
        self.zoom_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> MapViewState {
        MapViewState::new(GeoPoint::new(52.52, 13.405), 4096.0, Viewport::new(800.0, 600.0))
    }

    #[test]
    fn center_projects_to_origin() {
        let v = view();
        let p = v.project(v.center);
        assert!(p.length() < 1e-3);
    }

    #[test]
    fn east_is_right_and_north_is_up() {
        let v = view();
        let east = v.project(GeoPoint::new(52.52, 13.5));
        let north = v.project(GeoPoint::new(52.6, 13.405));
        assert!(east.x > 0.0 && east.y.abs() < 1e-3);
        assert!(north.y < 0.0);
    }

    #[test]
    fn view_box_contains_center_and_corners() {
        let v = view();
        let b = v.view_box();
        assert!(b.contains(v.center));
        let corner = v.unproject(Vec2::new(399.0, 299.0));
        assert!(b.contains(corner));
        let outside = v.unproject(Vec2::new(420.0, 0.0));
        assert!(!b.contains(outside));
    }

    #[test]
    fn unproject_inverts_project() {
        let v = view();
        let p = GeoPoint::new(52.50, 13.38);
        let q = v.unproject(v.project(p));
        assert!((q.latitude - p.latitude).abs() < 1e-6);
        assert!((q.longitude - p.longitude).abs() < 1e-6);
    }

    #[test]
    fn tile_divisor_is_power_of_two() {
        let (_, div) = view().tile_matrices(2200, 1343, 12);
        assert_eq!(div, 4096.0);
    }
}
