use super::GeoPoint;

/// Axis-aligned latitude/longitude box.
///
/// Containment is inclusive on every edge: a marker sitting exactly on the
/// view border is still considered visible.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub min_longitude: f64,
    pub max_latitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    #[inline]
    pub const fn new(
        min_latitude: f64,
        min_longitude: f64,
        max_latitude: f64,
        max_longitude: f64,
    ) -> Self {
        Self {
            min_latitude,
            min_longitude,
            max_latitude,
            max_longitude,
        }
    }

    /// Smallest box containing both corner points, in any order.
    pub fn from_corners(a: GeoPoint, b: GeoPoint) -> Self {
        Self::new(
            a.latitude.min(b.latitude),
            a.longitude.min(b.longitude),
            a.latitude.max(b.latitude),
            a.longitude.max(b.longitude),
        )
    }

    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.latitude >= self.min_latitude
            && p.latitude <= self.max_latitude
            && p.longitude >= self.min_longitude
            && p.longitude <= self.max_longitude
    }

    #[cfg(test)]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_latitude + self.max_latitude) / 2.0,
            (self.min_longitude + self.max_longitude) / 2.0,
        )
    }
}
