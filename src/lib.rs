//! # pinmap
//!
//! Keeps a photo post's detail overlay anchored to its spot on an interactive
//! map.
//!
//! The crate resolves the map's starting point from the device location with a
//! bounded wait, places one pin per post, and while a post is selected
//! re-projects its coordinate on every pan, zoom and resize so the overlay
//! follows the map. The map renderer and the location service are consumed
//! through the traits in [`traits`]; [`HeadlessMap`] is a renderer-free map for
//! tests and servers.

pub mod animation;
pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod location;
pub mod prelude;
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
pub mod session;
pub mod traits;
pub mod ui;

pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::{BootstrapConfig, CameraConfig, OverlayConfig, PinmapOptions, PinmapProfile},
    geo::{LatLng, Point},
    map::HeadlessMap,
    projector::{CoordinateProjector, Subscription},
    viewport::Viewport,
};

pub use data::{Post, PostCollection, PostId};

pub use input::{InputEvent, MapEvent, MapEventKind};

pub use layers::{MarkerIcon, PinRegistry};

pub use location::{LocateStatus, LocationError, PositionReply};

#[cfg(feature = "tokio-runtime")]
pub use location::{BootstrapHandle, GeolocationBootstrap, SpawnedPositionProvider};

pub use session::{MapSession, SessionCallbacks};

pub use traits::{FlyToOptions, LocationProvider, MapSurface, PositionSource};

pub use ui::{AnchorUpdate, DetailOverlay, LocationPicker, OverlaySynchronizer};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown post: {0}")]
    UnknownPost(PostId),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Location error: {0}")]
    Location(#[from] LocationError),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Locks a mutex, recovering the data if a panicking callback poisoned it
pub(crate) fn lock<T>(mutex: &std::sync::Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
