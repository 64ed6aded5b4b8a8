/// A WGS84 position in degrees.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}
