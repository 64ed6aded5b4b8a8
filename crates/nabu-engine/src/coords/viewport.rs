use super::Vec2;

/// Viewport size in logical pixels.
///
/// Pointer events arrive in this space (top-left origin); projected map
/// positions are relative to its center.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Converts a top-left based position into center-relative pixels.
    #[inline]
    pub fn to_centered(self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y) - self.center()
    }
}
