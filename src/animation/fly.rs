use crate::animation::easing::{lerp, EasingType};
use crate::core::geo::LatLng;
use std::time::Duration;

/// Camera state produced by one step of a flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyFrame {
    pub center: LatLng,
    pub zoom: f64,
    pub finished: bool,
}

/// Animated camera transition from one center/zoom to another.
///
/// The animation is driven by elapsed time handed in by the caller, so the
/// host event loop decides the frame rate.
#[derive(Debug, Clone)]
pub struct FlyAnimation {
    from_center: LatLng,
    to_center: LatLng,
    from_zoom: f64,
    to_zoom: f64,
    duration: Duration,
    elapsed: Duration,
    easing: EasingType,
}

impl FlyAnimation {
    pub fn new(
        from_center: LatLng,
        from_zoom: f64,
        to_center: LatLng,
        to_zoom: f64,
        duration: Duration,
        easing: EasingType,
    ) -> Self {
        Self {
            from_center,
            to_center,
            from_zoom,
            to_zoom,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Advances the flight by `dt` and returns the camera for the new instant
    pub fn advance(&mut self, dt: Duration) -> FlyFrame {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        let progress = self.progress();

        if progress >= 1.0 {
            return FlyFrame {
                center: self.to_center,
                zoom: self.to_zoom,
                finished: true,
            };
        }

        let t = self.easing.apply(progress);
        FlyFrame {
            center: LatLng::new(
                lerp(self.from_center.lat, self.to_center.lat, t),
                lerp(self.from_center.lng, self.to_center.lng, t),
            ),
            zoom: lerp(self.from_zoom, self.to_zoom, t),
            finished: false,
        }
    }
}
