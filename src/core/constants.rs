//! Core constants derived from Leaflet defaults and the pin/overlay layout.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

use std::time::Duration;

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Fallback camera center when the device location is unknown (Tokyo Station).
pub const DEFAULT_CENTER: (f64, f64) = (35.6812, 139.7671);

/// Initial zoom once the bootstrap resolves.
pub const DEFAULT_ZOOM: f64 = 15.0;

/// How long the bootstrap waits for the device before falling back.
pub const LOCATE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Latitude added to a selected post before flying, so the overlay
/// anchored above the pin does not cover it.
pub const FLY_TO_LAT_OFFSET: f64 = 0.005;

/// Zoom level of the camera after flying to a selected post.
pub const FLY_TO_ZOOM: f64 = 15.0;

/// Duration of the fly-to animation.
pub const FLY_TO_DURATION: Duration = Duration::from_millis(1500);

/// Pin icon size (square artwork).
pub const PIN_ICON_SIZE: (u32, u32) = (40, 40);

/// Anchor inside the pin icon (hot-spot) in pixel coords: bottom center.
pub const PIN_ICON_ANCHOR: (u32, u32) = (20, 40);

/// Popup anchor relative to the hot-spot.
pub const PIN_POPUP_ANCHOR: (i32, i32) = (0, -40);

/// Gap between the anchor pixel and the bottom edge of the detail overlay.
pub const OVERLAY_MARGIN_TOP: f64 = 45.0;
