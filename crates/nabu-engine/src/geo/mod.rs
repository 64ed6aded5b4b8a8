//! Geographic coordinates.
//!
//! Latitude/longitude are WGS84 degrees. Projection to pixels goes through
//! Web-Mercator (`mercator`), normalized to `[0, 1]` on both axes with +Y down.

mod bbox;
pub mod mercator;
mod point;

pub use bbox::BoundingBox;
pub use point::GeoPoint;
