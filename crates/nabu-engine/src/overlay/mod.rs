//! Map overlay items and pointer selection.
//!
//! - `ItemCollection` is the ordered marker list with a draw limit
//! - `OverlayHitTester` maps a tap or long press to the nearest visible marker
//!   and asks an `ItemGestureListener` to confirm it

mod collection;
mod item;

pub use collection::{ItemCollection, SharedItemCollection};
pub use hit_test::{
    GestureCallbacks,
    HitTestConfig,
    ItemGestureListener,
    OverlayHitTester,
};
pub use item::{MapItem, OverlayItem};
