//! Configuration for bootstrap timing, camera flights, pins and the overlay
//!
//! Options can be taken from a preset profile or deserialized from JSON, where
//! every missing field falls back to its default.

use crate::animation::EasingType;
use crate::core::constants::{
    DEFAULT_CENTER, DEFAULT_ZOOM, FLY_TO_DURATION, FLY_TO_LAT_OFFSET, FLY_TO_ZOOM,
    LOCATE_TIMEOUT, OVERLAY_MARGIN_TOP,
};
use crate::core::geo::LatLng;
use crate::layers::marker::MarkerIcon;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum PinmapProfile {
    Standard,
    /// No flight animation and a short locate timeout; useful for kiosks and tests.
    Instant,
    Custom(PinmapOptions),
}

impl PinmapProfile {
    pub fn resolve(&self) -> PinmapOptions {
        match self {
            Self::Standard => PinmapOptions::default(),
            Self::Instant => PinmapOptions {
                bootstrap: BootstrapConfig {
                    timeout_ms: 1000,
                    ..BootstrapConfig::default()
                },
                camera: CameraConfig {
                    duration_ms: 0,
                    easing: EasingType::Linear,
                    ..CameraConfig::default()
                },
                ..PinmapOptions::default()
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

impl Default for PinmapProfile {
    fn default() -> Self {
        Self::Standard
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PinmapOptions {
    pub bootstrap: BootstrapConfig,
    pub camera: CameraConfig,
    pub marker: MarkerIcon,
    pub overlay: OverlayConfig,
}

impl PinmapOptions {
    /// Parses options from JSON; absent sections and fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Shared by every flow that needs the device location before showing a map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub timeout_ms: u64,
    pub default_center: LatLng,
    pub initial_zoom: f64,
}

impl BootstrapConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            timeout_ms: LOCATE_TIMEOUT.as_millis() as u64,
            default_center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            initial_zoom: DEFAULT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub lat_offset: f64,
    pub target_zoom: f64,
    pub duration_ms: u64,
    pub easing: EasingType,
}

impl CameraConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Where the camera should land for a post at `position`
    pub fn target_for(&self, position: LatLng) -> LatLng {
        position.offset(self.lat_offset, 0.0)
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            lat_offset: FLY_TO_LAT_OFFSET,
            target_zoom: FLY_TO_ZOOM,
            duration_ms: FLY_TO_DURATION.as_millis() as u64,
            easing: EasingType::EaseInOut,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub margin_top: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            margin_top: OVERLAY_MARGIN_TOP,
        }
    }
}
