use nabu_engine::coords::{Vec2, Viewport};
use nabu_engine::geo::GeoPoint;
use nabu_engine::input::{InputFrame, InputState, Key, MouseButton};
use nabu_engine::view::MapViewState;

const MIN_ZOOM: f64 = 13.0;
const MAX_ZOOM: f64 = 18.0;
const KEY_PAN_PX: f32 = 64.0;
const WHEEL_ZOOM_STEP: f64 = 0.25;

/// Pan/zoom state driven by keyboard, wheel and drags.
#[derive(Debug, Clone)]
pub struct Camera {
    home: GeoPoint,
    home_zoom: f64,
    center: GeoPoint,
    zoom: f64,
    last_pointer: Option<(f32, f32)>,
}

impl Camera {
    pub fn new(center: GeoPoint, zoom: f64) -> Self {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        Self {
            home: center,
            home_zoom: zoom,
            center,
            zoom,
            last_pointer: None,
        }
    }

    #[inline]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn view(&self, viewport: Viewport) -> MapViewState {
        MapViewState::new(self.center, self.zoom.exp2(), viewport)
    }

    /// Moves the map content by `(dx, dy)` pixels.
    pub fn pan_px(&mut self, dx: f32, dy: f32, viewport: Viewport) {
        self.center = self.view(viewport).unproject(Vec2::new(-dx, -dy));
    }

    pub fn zoom_by(&mut self, levels: f64) {
        self.zoom = (self.zoom + levels).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn reset(&mut self) {
        self.center = self.home;
        self.zoom = self.home_zoom;
    }

    /// Applies this frame's input.
    ///
    /// `dragging` is true once a held primary press has left the tap slop.
    pub fn update(&mut self, input: &InputState, frame: &InputFrame, viewport: Viewport, dragging: bool) {
        for key in &frame.keys_pressed {
            match key {
                Key::ArrowLeft => self.pan_px(KEY_PAN_PX, 0.0, viewport),
                Key::ArrowRight => self.pan_px(-KEY_PAN_PX, 0.0, viewport),
                Key::ArrowUp => self.pan_px(0.0, KEY_PAN_PX, viewport),
                Key::ArrowDown => self.pan_px(0.0, -KEY_PAN_PX, viewport),
                Key::ZoomIn => self.zoom_by(1.0),
                Key::ZoomOut => self.zoom_by(-1.0),
                Key::Home => self.reset(),
                _ => {}
            }
        }

        if frame.wheel_lines != 0.0 {
            self.zoom_by(frame.wheel_lines as f64 * WHEEL_ZOOM_STEP);
        }

        let pointer = input.pointer_pos;
        if dragging && input.button_down(MouseButton::Left) {
            if let (Some((x0, y0)), Some((x1, y1))) = (self.last_pointer, pointer) {
                self.pan_px(x1 - x0, y1 - y0, viewport);
            }
        }
        self.last_pointer = pointer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nabu_engine::view::ViewState;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn zoom_is_clamped() {
        let mut c = Camera::new(GeoPoint::new(48.0, 11.0), 20.0);
        assert_eq!(c.zoom(), MAX_ZOOM);
        c.zoom_by(-10.0);
        assert_eq!(c.zoom(), MIN_ZOOM);
    }

    #[test]
    fn panning_moves_content_with_the_pointer() {
        let start = GeoPoint::new(48.0, 11.0);
        let mut c = Camera::new(start, 15.0);
        c.pan_px(100.0, 0.0, viewport());

        // the old center now sits 100 px right of the viewport center
        let p = c.view(viewport()).project(start);
        assert!((p.x - 100.0).abs() < 0.01, "{p:?}");
        assert!(p.y.abs() < 0.01, "{p:?}");
    }

    #[test]
    fn reset_restores_home() {
        let start = GeoPoint::new(48.0, 11.0);
        let mut c = Camera::new(start, 15.0);
        c.pan_px(10.0, 10.0, viewport());
        c.zoom_by(1.0);
        c.reset();
        assert_eq!(c.view(viewport()).center, start);
        assert_eq!(c.zoom(), 15.0);
    }
}
