use crate::geo::GeoPoint;

/// Anything that can be placed on the map.
pub trait MapItem {
    fn geo_point(&self) -> GeoPoint;
}

/// A titled marker.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayItem {
    pub uid: String,
    pub title: String,
    pub description: String,
    pub point: GeoPoint,
}

impl OverlayItem {
    pub fn new(
        uid: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        point: GeoPoint,
    ) -> Self {
        Self {
            uid: uid.into(),
            title: title.into(),
            description: description.into(),
            point,
        }
    }
}

impl MapItem for OverlayItem {
    #[inline]
    fn geo_point(&self) -> GeoPoint {
        self.point
    }
}

impl MapItem for GeoPoint {
    #[inline]
    fn geo_point(&self) -> GeoPoint {
        *self
    }
}
