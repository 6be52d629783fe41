//! Seams to the external collaborators
//!
//! The map renderer and the device location service live outside this crate.
//! Everything the overlay subsystem needs from them is expressed here, so a
//! browser map, a native widget or the bundled [`HeadlessMap`] can be plugged
//! in interchangeably.
//!
//! [`HeadlessMap`]: crate::core::map::HeadlessMap

use crate::{
    animation::EasingType,
    core::geo::{LatLng, Point},
    input::{EventCallback, ListenerId, MapEventKind},
    layers::marker::{MarkerIcon, MarkerId},
    location::provider::{LocationError, PositionOptions, PositionReply},
    prelude::{Arc, Duration},
};
use async_trait::async_trait;

/// Invoked by the map when the user activates (clicks/taps) a marker
pub type ActivateCallback = Arc<dyn Fn() + Send + Sync>;

/// Options for an animated camera move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyToOptions {
    pub duration: Duration,
    pub easing: EasingType,
}

impl Default for FlyToOptions {
    fn default() -> Self {
        Self {
            duration: crate::core::constants::FLY_TO_DURATION,
            easing: EasingType::EaseInOut,
        }
    }
}

/// The map rendering collaborator.
///
/// All methods take `&self`: callbacks registered with the map run while the
/// map is live and commonly call back into it (a transform listener asks for
/// a projection), so implementations use interior mutability and must not
/// hold internal locks while invoking callbacks.
pub trait MapSurface: Send + Sync {
    /// Geographic to container pixel conversion under the current camera.
    /// Must be a pure function of camera state.
    fn project(&self, position: LatLng) -> Point;

    /// Register a listener for `kind`
    fn on(&self, kind: MapEventKind, callback: EventCallback) -> ListenerId;

    /// Remove a listener; returns false if it was not registered
    fn off(&self, kind: MapEventKind, id: ListenerId) -> bool;

    /// Start an animated camera move. Fire-and-forget; the resulting pan and
    /// zoom events must be dispatched later, not from inside this call.
    fn fly_to(&self, target: LatLng, zoom: f64, options: FlyToOptions);

    /// Place a marker; `on_activate` fires on every activation
    fn place_marker(&self, position: LatLng, icon: &MarkerIcon, on_activate: ActivateCallback)
        -> MarkerId;

    fn remove_marker(&self, id: MarkerId) -> bool;
}

/// The device location collaborator, callback style.
///
/// `request_current_position` starts at most one lookup and answers through
/// `reply`; only the first answer is honored, later ones are ignored.
pub trait LocationProvider: Send + Sync {
    /// Whether the platform offers location at all
    fn is_available(&self) -> bool {
        true
    }

    fn request_current_position(&self, reply: PositionReply, options: PositionOptions);
}

/// The device location collaborator, async style
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> std::result::Result<LatLng, LocationError>;
}
