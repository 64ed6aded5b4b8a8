/// Keys the map viewer binds.
///
/// Unbound keys arrive as `Key::Other` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Space,
    Home,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// `+`, `=` and keypad plus.
    ZoomIn,
    /// `-` and keypad minus.
    ZoomOut,
    Other(u32),
}

/// Press or release, shared by keys, mouse buttons and touch contacts.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    /// Primary button; the first touch contact is reported as this too.
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Wheel movement: notches from a mouse wheel or pixels from a touchpad.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl MouseWheelDelta {
    /// Pixels per notch for touchpad scrolling.
    pub const PIXELS_PER_LINE: f32 = 40.0;

    /// Vertical scroll in notches, positive away from the user.
    pub fn lines_y(&self) -> f32 {
        match *self {
            Self::Line { y, .. } => y,
            Self::Pixel { y, .. } => y / Self::PIXELS_PER_LINE,
        }
    }
}

/// Pointer position in logical pixels, top-left origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

/// Button transition at the pointer position of the time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: ButtonState,
    pub x: f32,
    pub y: f32,
    pub modifiers: Modifiers,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// One touch contact update in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TouchEvent {
    pub id: u64,
    pub phase: TouchPhase,
    pub x: f32,
    pub y: f32,
}

/// Input events the runtime feeds to [`InputState`](super::InputState).
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),
    Key {
        key: Key,
        state: ButtonState,
        modifiers: Modifiers,
        repeat: bool,
    },
    PointerMoved(PointerMoveEvent),
    PointerButton(PointerButtonEvent),
    MouseWheel {
        delta: MouseWheelDelta,
        modifiers: Modifiers,
    },
    /// Raw touch contact. The primary contact is rewritten into pointer
    /// events by `InputState`; only secondary contacts stay as `Touch`.
    Touch(TouchEvent),
    PointerLeft,
    Focused(bool),
}
