pub mod marker;
pub mod pins;

pub use marker::{Marker, MarkerIcon, MarkerId};
pub use pins::{PinActivatedCallback, PinRegistry};
