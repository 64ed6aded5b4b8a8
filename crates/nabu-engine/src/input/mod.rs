//! Input subsystem.
//!
//! Platform events are translated into [`InputEvent`]s, folded into
//! [`InputState`] / [`InputFrame`], and turned into taps and long presses by
//! [`GestureDetector`]. No winit types leak out of `platform`.

mod frame;
mod gesture;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use gesture::{GestureConfig, GestureDetector, GestureKind, PointerEvent};
pub use state::InputState;
pub use types::{
    ButtonState,
    InputEvent,
    Key,
    Modifiers,
    MouseButton,
    MouseWheelDelta,
    PointerButtonEvent,
    PointerMoveEvent,
    TouchEvent,
    TouchPhase,
};
