use std::time::{Duration, Instant};

use super::types::{InputEvent, MouseButton, ButtonState, PointerButtonEvent, PointerMoveEvent};

/// Gesture recognized from raw pointer input.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GestureKind {
    Tap,
    LongPress,
}

/// A recognized gesture at a screen position (logical px, top-left origin).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub kind: GestureKind,
}

impl PointerEvent {
    #[inline]
    pub const fn new(x: f32, y: f32, kind: GestureKind) -> Self {
        Self { x, y, kind }
    }
}

/// Gesture thresholds.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Hold time after which a press becomes a long press.
    pub long_press: Duration,
    /// Movement (logical px) that turns a press into a drag.
    pub touch_slop: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press: Duration::from_millis(500),
            touch_slop: 8.0,
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct Press {
    x: f32,
    y: f32,
    at: Instant,
    long_press_sent: bool,
}

/// Turns primary-button input into taps and long presses.
///
/// Feed every `InputEvent` through [`handle_event`](Self::handle_event) and
/// call [`update`](Self::update) once per frame so a held press is reported
/// without waiting for its release.
#[derive(Debug, Default)]
pub struct GestureDetector {
    config: GestureConfig,
    press: Option<Press>,
}

impl GestureDetector {
    pub fn new(config: GestureConfig) -> Self {
        Self { config, press: None }
    }

    #[inline]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Whether a press is armed.
    #[inline]
    pub fn is_tracking(&self) -> bool {
        self.press.is_some()
    }

    /// When the armed press turns into a long press, if it has not yet.
    pub fn long_press_deadline(&self) -> Option<Instant> {
        self.press
            .filter(|p| !p.long_press_sent)
            .map(|p| p.at + self.config.long_press)
    }

    pub fn handle_event(&mut self, ev: &InputEvent, now: Instant) -> Option<PointerEvent> {
        match ev {
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state,
                x,
                y,
                ..
            }) => match state {
                ButtonState::Pressed => {
                    self.press = Some(Press {
                        x: *x,
                        y: *y,
                        at: now,
                        long_press_sent: false,
                    });
                    None
                }
                ButtonState::Released => self.release(*x, *y, now),
            },

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                if let Some(p) = self.press {
                    if !self.within_slop(&p, *x, *y) {
                        log::trace!("press moved past slop; cancelled");
                        self.press = None;
                    }
                }
                None
            }

            InputEvent::PointerLeft | InputEvent::Focused(false) => {
                self.press = None;
                None
            }

            _ => None,
        }
    }

    /// Reports a long press once the armed press has been held long enough.
    pub fn update(&mut self, now: Instant) -> Option<PointerEvent> {
        let p = self.press.as_mut()?;
        if p.long_press_sent || now.saturating_duration_since(p.at) < self.config.long_press {
            return None;
        }
        p.long_press_sent = true;
        Some(PointerEvent::new(p.x, p.y, GestureKind::LongPress))
    }

    /// Handles a frame's events in order, then runs [`update`](Self::update).
    pub fn process<'a, I>(&mut self, events: I, now: Instant) -> Vec<PointerEvent>
    where
        I: IntoIterator<Item = &'a InputEvent>,
    {
        let mut out: Vec<PointerEvent> = events
            .into_iter()
            .filter_map(|ev| self.handle_event(ev, now))
            .collect();
        out.extend(self.update(now));
        out
    }

    fn release(&mut self, x: f32, y: f32, now: Instant) -> Option<PointerEvent> {
        let p = self.press.take()?;
        if p.long_press_sent || !self.within_slop(&p, x, y) {
            return None;
        }

        let kind = if now.saturating_duration_since(p.at) < self.config.long_press {
            GestureKind::Tap
        } else {
            GestureKind::LongPress
        };
        Some(PointerEvent::new(p.x, p.y, kind))
    }

    fn within_slop(&self, p: &Press, x: f32, y: f32) -> bool {
        let (dx, dy) = (x - p.x, y - p.y);
        dx * dx + dy * dy <= self.config.touch_slop * self.config.touch_slop
    }
}
