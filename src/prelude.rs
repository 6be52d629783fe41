//! Prelude module for common pinmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use pinmap::prelude::*;`

pub use crate::core::{
    config::{BootstrapConfig, CameraConfig, OverlayConfig, PinmapOptions, PinmapProfile},
    geo::{LatLng, Point},
    map::{FlyRequest, HeadlessMap},
    projector::{CoordinateProjector, Subscription},
    viewport::Viewport,
};

pub use crate::animation::{EasingType, FlyAnimation};

pub use crate::data::{Post, PostCollection, PostId};

pub use crate::input::{
    EventCallback, InputEvent, ListenerId, MapEvent, MapEventKind, TRANSFORM_EVENTS,
};

pub use crate::layers::{Marker, MarkerIcon, MarkerId, PinActivatedCallback, PinRegistry};

pub use crate::location::{
    LocateStatus, LocationError, PositionOptions, PositionReply, PositionResult,
    UnavailableLocation,
};

#[cfg(feature = "tokio-runtime")]
pub use crate::location::{BootstrapHandle, GeolocationBootstrap, SpawnedPositionProvider};

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::{runtime, spawn, AsyncHandle, AsyncSpawner};

pub use crate::session::{MapSession, SessionCallbacks};

pub use crate::traits::{ActivateCallback, FlyToOptions, LocationProvider, MapSurface, PositionSource};

pub use crate::ui::{
    AnchorCallback, AnchorUpdate, DetailOverlay, LocationPicker, OverlayClick, OverlayPlacement,
    OverlaySynchronizer, SyncTransition,
};

pub use crate::{Error as MapError, Result};

pub use std::{
    pin::Pin,
    sync::Arc,
    time::Duration,
};

pub use fxhash::FxHashMap as HashMap;

pub use futures::Future;
