use crate::{
    core::geo::{LatLng, Point},
    data::Post,
    input::{EventCallback, ListenerId, MapEventKind},
    prelude::Arc,
    traits::MapSurface,
};

/// Geographic to screen projection, delegated to the map.
///
/// Holds no camera state of its own: every call asks the map, so a value is
/// never reused across a pan or zoom.
#[derive(Clone)]
pub struct CoordinateProjector {
    map: Arc<dyn MapSurface>,
}

impl CoordinateProjector {
    pub fn new(map: Arc<dyn MapSurface>) -> Self {
        Self { map }
    }

    pub fn project(&self, position: LatLng) -> Point {
        self.map.project(position)
    }

    /// The anchor pixel of a post under the current camera
    pub fn anchor_for(&self, post: &Post) -> Point {
        self.project(post.position())
    }

    /// Registers `callback` for every kind in `kinds`. The listeners stay
    /// registered until the returned guard is cancelled or dropped.
    pub fn subscribe(&self, kinds: &[MapEventKind], callback: EventCallback) -> Subscription {
        let listeners = kinds
            .iter()
            .map(|&kind| (kind, self.map.on(kind, callback.clone())))
            .collect();

        Subscription {
            map: self.map.clone(),
            listeners,
        }
    }

    pub fn map(&self) -> &Arc<dyn MapSurface> {
        &self.map
    }
}

/// Live listener registrations on a map
pub struct Subscription {
    map: Arc<dyn MapSurface>,
    listeners: Vec<(MapEventKind, ListenerId)>,
}

impl Subscription {
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = MapEventKind> + '_ {
        self.listeners.iter().map(|(kind, _)| *kind)
    }

    /// Unregisters every listener now
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        for (kind, id) in self.listeners.drain(..) {
            if !self.map.off(kind, id) {
                log::warn!("{} listener {:?} was already gone", kind, id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::map::HeadlessMap;
    use crate::input::{MapEvent, TRANSFORM_EVENTS};

    #[test]
    fn test_projection_delegates_to_map() {
        let map = HeadlessMap::shared(LatLng::new(35.0, 139.0), 15.0, Point::new(800.0, 600.0));
        let projector = CoordinateProjector::new(map.clone());

        for position in [
            LatLng::new(35.0, 139.0),
            LatLng::new(35.01, 138.99),
            LatLng::new(-33.86, 151.21),
        ] {
            assert_eq!(projector.project(position), map.viewport().lat_lng_to_pixel(&position));
        }
    }

    #[test]
    fn test_projection_follows_camera() {
        let map = HeadlessMap::shared(LatLng::new(35.0, 139.0), 15.0, Point::new(800.0, 600.0));
        let projector = CoordinateProjector::new(map.clone());
        let post = Post::new(1, LatLng::new(35.0, 139.0), "a.jpg", "");

        let before = projector.anchor_for(&post);
        map.pan_by(Point::new(30.0, 0.0));
        let after = projector.anchor_for(&post);
        assert!((after.x - before.x - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_subscription_guard_unregisters() {
        let map = HeadlessMap::shared(LatLng::new(35.0, 139.0), 15.0, Point::new(800.0, 600.0));
        let projector = CoordinateProjector::new(map.clone());

        let subscription = projector.subscribe(&TRANSFORM_EVENTS, Arc::new(|_: &MapEvent| {}));
        assert_eq!(subscription.len(), 3);
        assert_eq!(map.total_listeners(), 3);

        subscription.cancel();
        assert_eq!(map.total_listeners(), 0);

        {
            let _scoped = projector.subscribe(&[MapEventKind::Click], Arc::new(|_: &MapEvent| {}));
            assert_eq!(map.listener_count(MapEventKind::Click), 1);
        }
        assert_eq!(map.total_listeners(), 0);
    }
}
