//! Frame timing.
//!
//! One `FrameClock` per window; `tick()` once per presented frame. The
//! `FrameTime::now` stamp is what gesture detection measures hold time with.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
