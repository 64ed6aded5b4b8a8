use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

use crate::input::{
    ButtonState, InputEvent, InputState, Key, Modifiers, MouseButton, MouseWheelDelta,
    PointerButtonEvent, PointerMoveEvent, TouchEvent, TouchPhase,
};

/// Maps a winit window event onto an [`InputEvent`], in logical pixels.
///
/// Lifecycle and redraw events return `None`; the runtime handles those.
pub(crate) fn translate_window_event(
    window: &Window,
    state: &InputState,
    event: &WindowEvent,
) -> Option<InputEvent> {
    let scale = window.scale_factor();
    let logical = |p: PhysicalPosition<f64>| {
        let l = p.to_logical::<f64>(scale);
        (l.x as f32, l.y as f32)
    };

    let ev = match event {
        WindowEvent::ModifiersChanged(m) => {
            let m = m.state();
            InputEvent::ModifiersChanged(Modifiers {
                shift: m.shift_key(),
                ctrl: m.control_key(),
                alt: m.alt_key(),
                meta: m.super_key(),
            })
        }

        WindowEvent::Focused(focused) => InputEvent::Focused(*focused),

        WindowEvent::CursorLeft { .. } => InputEvent::PointerLeft,

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = logical(*position);
            InputEvent::PointerMoved(PointerMoveEvent { x, y })
        }

        WindowEvent::MouseInput { state: st, button, .. } => {
            // winit does not attach a position to button events
            let (x, y) = state.pointer_pos?;
            InputEvent::PointerButton(PointerButtonEvent {
                button: mouse_button(*button),
                state: button_state(*st),
                x,
                y,
                modifiers: state.modifiers,
            })
        }

        WindowEvent::MouseWheel { delta, .. } => InputEvent::MouseWheel {
            delta: match *delta {
                MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x, y },
                MouseScrollDelta::PixelDelta(p) => {
                    let (x, y) = logical(p);
                    MouseWheelDelta::Pixel { x, y }
                }
            },
            modifiers: state.modifiers,
        },

        WindowEvent::Touch(t) => {
            let (x, y) = logical(t.location);
            InputEvent::Touch(TouchEvent {
                id: t.id,
                phase: match t.phase {
                    winit::event::TouchPhase::Started => TouchPhase::Started,
                    winit::event::TouchPhase::Moved => TouchPhase::Moved,
                    winit::event::TouchPhase::Ended => TouchPhase::Ended,
                    winit::event::TouchPhase::Cancelled => TouchPhase::Cancelled,
                },
                x,
                y,
            })
        }

        WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
            key: key(event.physical_key),
            state: button_state(event.state),
            modifiers: state.modifiers,
            repeat: event.repeat,
        },

        _ => return None,
    };

    Some(ev)
}

fn button_state(s: ElementState) -> ButtonState {
    match s {
        ElementState::Pressed => ButtonState::Pressed,
        ElementState::Released => ButtonState::Released,
    }
}

fn mouse_button(b: winit::event::MouseButton) -> MouseButton {
    use winit::event::MouseButton as W;
    match b {
        W::Left => MouseButton::Left,
        W::Right => MouseButton::Right,
        W::Middle => MouseButton::Middle,
        W::Back => MouseButton::Other(3),
        W::Forward => MouseButton::Other(4),
        W::Other(v) => MouseButton::Other(v),
    }
}

fn key(pk: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = pk else {
        return Key::Other(0);
    };
    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Space => Key::Space,
        KeyCode::Home => Key::Home,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::Equal | KeyCode::NumpadAdd => Key::ZoomIn,
        KeyCode::Minus | KeyCode::NumpadSubtract => Key::ZoomOut,
        other => Key::Other(other as u32),
    }
}
