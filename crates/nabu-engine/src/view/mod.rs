//! Camera snapshot consumed by the renderer and the hit tester.
//!
//! `ViewState` is the read-only per-frame contract; `MapViewState` is the
//! Web-Mercator implementation used by the viewer and by tests.

mod map;
mod matrices;

pub use map::{MapViewState, TILE_SIZE_PX};
pub use matrices::Matrices;

use crate::coords::{Vec2, Viewport};
use crate::geo::{BoundingBox, GeoPoint};

/// Read-only view of the camera for one frame.
///
/// Implementations must be cheap to query; `project` is called once per
/// visible marker on every pointer event.
pub trait ViewState {
    /// Viewport size in logical pixels.
    fn viewport(&self) -> Viewport;

    /// Geographic area currently visible.
    fn view_box(&self) -> BoundingBox;

    /// Projects `point` to pixels relative to the viewport center (+Y down).
    fn project(&self, point: GeoPoint) -> Vec2;

    /// Scale of the world relative to zoom level 0 (`2^zoom`).
    fn zoom_scale(&self) -> f64;
}
