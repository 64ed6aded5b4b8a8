//! Web-Mercator projection normalized to the unit square.
//!
//! `x = 0` is longitude -180°, `x = 1` is +180°; `y = 0` is the northern
//! Mercator limit, `y = 1` the southern one.

use std::f64::consts::PI;

use super::GeoPoint;

/// Latitude beyond which Web-Mercator is clipped.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

#[inline]
pub fn longitude_to_x(longitude: f64) -> f64 {
    (longitude + 180.0) / 360.0
}

#[inline]
pub fn latitude_to_y(latitude: f64) -> f64 {
    let lat = latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    0.5 - lat.tan().asinh() / (2.0 * PI)
}

#[inline]
pub fn x_to_longitude(x: f64) -> f64 {
    x * 360.0 - 180.0
}

#[inline]
pub fn y_to_latitude(y: f64) -> f64 {
    ((0.5 - y) * 2.0 * PI).sinh().atan().to_degrees()
}

/// Projects a geographic point into normalized Mercator space.
#[inline]
pub fn project(p: GeoPoint) -> (f64, f64) {
    (longitude_to_x(p.longitude), latitude_to_y(p.latitude))
}

/// Inverse of [`project`].
#[inline]
pub fn unproject(x: f64, y: f64) -> GeoPoint {
    GeoPoint::new(y_to_latitude(y), x_to_longitude(x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_center() {
        let (x, y) = project(GeoPoint::new(0.0, 0.0));
        assert!((x - 0.5).abs() < 1e-12);
        assert!((y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn north_is_up() {
        let (_, north) = project(GeoPoint::new(60.0, 0.0));
        let (_, south) = project(GeoPoint::new(-60.0, 0.0));
        assert!(north < 0.5 && south > 0.5);
    }

    #[test]
    fn unproject_inverts_project() {
        let p = GeoPoint::new(52.52, 13.405);
        let (x, y) = project(p);
        let q = unproject(x, y);
        assert!((q.latitude - p.latitude).abs() < 1e-9);
        assert!((q.longitude - p.longitude).abs() < 1e-9);
    }

    #[test]
    fn latitude_is_clamped_to_mercator_limit() {
        assert!(latitude_to_y(90.0).abs() < 1e-9);
        assert!((latitude_to_y(-90.0) - 1.0).abs() < 1e-9);
    }
}
