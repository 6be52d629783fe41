//! Overlay-side models: the anchor synchronizer, the detail overlay and the
//! location picker

pub mod overlay;
pub mod picker;
pub mod sync;

pub use overlay::{DetailOverlay, OverlayClick, OverlayPlacement};
pub use picker::LocationPicker;
pub use sync::{AnchorCallback, AnchorUpdate, OverlaySynchronizer, SyncOutcome, SyncTransition};
