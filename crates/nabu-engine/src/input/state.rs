use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{
    ButtonState, InputEvent, Key, Modifiers, MouseButton, PointerButtonEvent, PointerMoveEvent,
    TouchEvent, TouchPhase,
};

/// What is held down right now, for one window.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,
    /// Logical pixels; `None` while the pointer is outside the window.
    pub pointer_pos: Option<(f32, f32)>,
    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
    /// Touch contact currently driving the pointer.
    pub primary_touch: Option<u64>,
}

impl InputState {
    /// Folds `ev` into the held state and records it in `frame`.
    ///
    /// The primary touch contact is recorded as the equivalent pointer
    /// events, so gesture detection treats a finger like the left button.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Touch(touch) => {
                match self.primary_pointer_event(touch) {
                    Some(pointer) => {
                        for ev in pointer {
                            self.apply_event(frame, ev);
                        }
                    }
                    None => frame.push_event(InputEvent::Touch(touch)),
                }
                return;
            }

            InputEvent::ModifiersChanged(m) => self.modifiers = m,

            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // no releases arrive while unfocused
                    self.keys_down.clear();
                    self.buttons_down.clear();
                    self.primary_touch = None;
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => self.pointer_pos = Some((x, y)),

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = modifiers;
                let changed = match state {
                    ButtonState::Pressed => self.keys_down.insert(key),
                    ButtonState::Released => self.keys_down.remove(&key),
                };
                if changed {
                    match state {
                        ButtonState::Pressed => frame.keys_pressed.insert(key),
                        ButtonState::Released => frame.keys_released.insert(key),
                    };
                }
            }

            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, modifiers }) => {
                self.pointer_pos = Some((x, y));
                self.modifiers = modifiers;
                let changed = match state {
                    ButtonState::Pressed => self.buttons_down.insert(button),
                    ButtonState::Released => self.buttons_down.remove(&button),
                };
                if changed {
                    match state {
                        ButtonState::Pressed => frame.buttons_pressed.insert(button),
                        ButtonState::Released => frame.buttons_released.insert(button),
                    };
                }
            }

            InputEvent::MouseWheel { delta, modifiers } => {
                self.modifiers = modifiers;
                frame.wheel_lines += delta.lines_y();
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }

    /// Pointer events standing in for `touch`, or `None` for a secondary
    /// contact.
    fn primary_pointer_event(&mut self, touch: TouchEvent) -> Option<Vec<InputEvent>> {
        let TouchEvent { id, phase, x, y } = touch;
        let button = |state| {
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state,
                x,
                y,
                modifiers: self.modifiers,
            })
        };

        match phase {
            TouchPhase::Started if self.primary_touch.is_none() => {
                self.primary_touch = Some(id);
                Some(vec![
                    InputEvent::PointerMoved(PointerMoveEvent { x, y }),
                    button(ButtonState::Pressed),
                ])
            }
            _ if self.primary_touch != Some(id) => None,
            TouchPhase::Started | TouchPhase::Moved => {
                Some(vec![InputEvent::PointerMoved(PointerMoveEvent { x, y })])
            }
            TouchPhase::Ended => {
                let release = button(ButtonState::Released);
                self.primary_touch = None;
                Some(vec![release, InputEvent::PointerLeft])
            }
            TouchPhase::Cancelled => {
                self.primary_touch = None;
                self.buttons_down.remove(&MouseButton::Left);
                Some(vec![InputEvent::PointerLeft])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseWheelDelta;

    fn press(button: MouseButton, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button,
            state: ButtonState::Pressed,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    fn touch(id: u64, phase: TouchPhase, x: f32, y: f32) -> InputEvent {
        InputEvent::Touch(TouchEvent { id, phase, x, y })
    }

    // ── buttons and keys ──────────────────────────────────────────────────

    #[test]
    fn button_press_is_recorded_once() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();

        s.apply_event(&mut f, press(MouseButton::Left, 3.0, 4.0));
        s.apply_event(&mut f, press(MouseButton::Left, 3.0, 4.0));

        assert!(s.button_down(MouseButton::Left));
        assert_eq!(s.pointer_pos, Some((3.0, 4.0)));
        assert_eq!(f.buttons_pressed.len(), 1);
        assert_eq!(f.events.len(), 2);
    }

    #[test]
    fn key_release_without_press_is_not_a_transition() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();

        s.apply_event(
            &mut f,
            InputEvent::Key {
                key: Key::Space,
                state: ButtonState::Released,
                modifiers: Modifiers::default(),
                repeat: false,
            },
        );

        assert!(f.keys_released.is_empty());
        assert_eq!(f.events.len(), 1);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();

        s.apply_event(&mut f, press(MouseButton::Right, 0.0, 0.0));
        s.apply_event(&mut f, touch(7, TouchPhase::Started, 1.0, 1.0));
        s.apply_event(&mut f, InputEvent::Focused(false));

        assert!(!s.button_down(MouseButton::Right));
        assert_eq!(s.primary_touch, None);
    }

    #[test]
    fn wheel_accumulates_per_frame() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        let wheel = |delta| InputEvent::MouseWheel {
            delta,
            modifiers: Modifiers::default(),
        };

        s.apply_event(&mut f, wheel(MouseWheelDelta::Line { x: 0.0, y: 1.0 }));
        s.apply_event(&mut f, wheel(MouseWheelDelta::Pixel { x: 0.0, y: 80.0 }));
        assert_eq!(f.wheel_lines, 3.0);

        f.clear();
        assert_eq!(f.wheel_lines, 0.0);
    }

    // ── touch ─────────────────────────────────────────────────────────────

    #[test]
    fn primary_touch_becomes_left_button() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();

        s.apply_event(&mut f, touch(1, TouchPhase::Started, 10.0, 20.0));
        assert!(s.button_down(MouseButton::Left));
        assert_eq!(s.pointer_pos, Some((10.0, 20.0)));
        assert_eq!(f.events.len(), 2);
        assert!(matches!(f.events[1], InputEvent::PointerButton(_)));

        s.apply_event(&mut f, touch(1, TouchPhase::Moved, 12.0, 21.0));
        assert_eq!(s.pointer_pos, Some((12.0, 21.0)));

        s.apply_event(&mut f, touch(1, TouchPhase::Ended, 12.0, 21.0));
        assert!(!s.button_down(MouseButton::Left));
        assert_eq!(s.pointer_pos, None);
        assert!(f.buttons_released.contains(&MouseButton::Left));
    }

    #[test]
    fn secondary_touch_stays_raw() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();

        s.apply_event(&mut f, touch(1, TouchPhase::Started, 10.0, 20.0));
        f.clear();
        s.apply_event(&mut f, touch(2, TouchPhase::Started, 50.0, 60.0));
        s.apply_event(&mut f, touch(2, TouchPhase::Ended, 50.0, 60.0));

        assert_eq!(s.primary_touch, Some(1));
        assert_eq!(s.pointer_pos, Some((10.0, 20.0)));
        assert!(f.events.iter().all(|e| matches!(e, InputEvent::Touch(_))));
    }

    #[test]
    fn cancelled_touch_drops_the_press_without_release() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();

        s.apply_event(&mut f, touch(3, TouchPhase::Started, 0.0, 0.0));
        f.clear();
        s.apply_event(&mut f, touch(3, TouchPhase::Cancelled, 0.0, 0.0));

        assert!(!s.button_down(MouseButton::Left));
        assert!(f.buttons_released.is_empty());
        assert_eq!(f.events, vec![InputEvent::PointerLeft]);
    }
}
