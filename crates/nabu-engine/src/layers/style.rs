use crate::paint::Color;

/// Stroke parameters shared by all lines of a style.
///
/// Owned by the style pipeline and shared with layers through `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    /// Base stroke color, visible between stipple dashes.
    pub color: Color,
    /// Dash color drawn on top of the base stroke.
    pub stipple_color: Color,
    /// Length of one dash in tile units (one on/off period is twice this).
    pub stipple: f32,
    /// Dash width as a fraction of the stroke width, `0..=1`.
    pub stipple_width: f32,
}

impl LineStyle {
    pub fn new(color: Color, stipple_color: Color, stipple: f32, stipple_width: f32) -> Self {
        Self {
            color,
            stipple_color,
            stipple: stipple.max(0.0),
            stipple_width: stipple_width.clamp(0.0, 1.0),
        }
    }
}
