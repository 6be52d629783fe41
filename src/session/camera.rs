use crate::{
    core::{config::CameraConfig, geo::LatLng},
    data::Post,
    prelude::Arc,
    traits::{FlyToOptions, MapSurface},
};

/// Flies the camera to each newly selected post, once
pub struct CameraDirector {
    map: Arc<dyn MapSurface>,
    config: CameraConfig,
    current: Option<Arc<Post>>,
    flights: usize,
}

impl CameraDirector {
    pub fn new(map: Arc<dyn MapSurface>, config: CameraConfig) -> Self {
        Self {
            map,
            config,
            current: None,
            flights: 0,
        }
    }

    /// Follows a selection change. Returns the flight target when a flight
    /// was started.
    pub fn on_selection(&mut self, selected: Option<&Arc<Post>>) -> Option<LatLng> {
        let Some(post) = selected else {
            // Forget the post so selecting it again after a dismissal flies
            self.current = None;
            return None;
        };

        if self
            .current
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, post))
        {
            return None;
        }

        self.current = Some(post.clone());
        let target = self.config.target_for(post.position());
        self.map.fly_to(
            target,
            self.config.target_zoom,
            FlyToOptions {
                duration: self.config.duration(),
                easing: self.config.easing,
            },
        );
        self.flights += 1;
        Some(target)
    }

    pub fn flights_issued(&self) -> usize {
        self.flights
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }
}
