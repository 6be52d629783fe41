use crate::{
    core::{
        geo::Point,
        projector::{CoordinateProjector, Subscription},
    },
    data::{Post, PostId},
    input::{MapEvent, TRANSFORM_EVENTS},
    lock,
    prelude::Arc,
};
use std::sync::Mutex;

/// Where the overlay for a post should be anchored right now
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorUpdate {
    pub post_id: PostId,
    pub pixel: Point,
}

pub type AnchorCallback = Arc<dyn Fn(AnchorUpdate) + Send + Sync>;

/// What a call to [`OverlaySynchronizer::sync`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTransition {
    /// Nothing was selected and now something is; listeners registered
    Subscribed,
    /// A different post is selected; listeners kept, target swapped
    Retargeted,
    /// The same post again
    Unchanged,
    /// Selection cleared; listeners removed
    Unsubscribed,
    /// Nothing selected before or after
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncOutcome {
    pub transition: SyncTransition,
    /// Anchor the overlay must receive immediately, if the target changed
    pub initial: Option<AnchorUpdate>,
}

/// Shared between the synchronizer and its transform listeners. The target
/// is read at event time, so a listener always reports the post that is
/// selected when the camera moves.
#[derive(Clone)]
struct AnchorEmitter {
    projector: CoordinateProjector,
    target: Arc<Mutex<Option<Arc<Post>>>>,
    on_anchor: AnchorCallback,
}

impl AnchorEmitter {
    fn current(&self) -> Option<AnchorUpdate> {
        let post = lock(&self.target).clone()?;
        Some(AnchorUpdate {
            post_id: post.id(),
            pixel: self.projector.anchor_for(&post),
        })
    }

    fn emit_current(&self) {
        if let Some(update) = self.current() {
            (self.on_anchor)(update);
        }
    }
}

/// Keeps the selected post's overlay pinned to its projection.
///
/// While a post is selected exactly one listener per transform event is
/// registered on the map; with no selection there are none. Dropping the
/// synchronizer removes whatever it registered.
pub struct OverlaySynchronizer {
    emitter: AnchorEmitter,
    subscription: Option<Subscription>,
}

impl OverlaySynchronizer {
    pub fn new(projector: CoordinateProjector, on_anchor: AnchorCallback) -> Self {
        Self {
            emitter: AnchorEmitter {
                projector,
                target: Arc::new(Mutex::new(None)),
                on_anchor,
            },
            subscription: None,
        }
    }

    /// Follows a selection change without delivering anything. The caller
    /// hands `initial` to [`deliver`](Self::deliver) once it holds no locks
    /// the anchor callback might need.
    pub fn sync(&mut self, selected: Option<&Arc<Post>>) -> SyncOutcome {
        let previous = lock(&self.emitter.target).clone();

        let transition = match (previous, selected) {
            (None, None) => SyncTransition::Idle,
            (Some(_), None) => {
                *lock(&self.emitter.target) = None;
                if let Some(subscription) = self.subscription.take() {
                    subscription.cancel();
                }
                SyncTransition::Unsubscribed
            }
            (Some(current), Some(post)) if Arc::ptr_eq(&current, post) => {
                SyncTransition::Unchanged
            }
            (Some(_), Some(post)) => {
                *lock(&self.emitter.target) = Some(post.clone());
                SyncTransition::Retargeted
            }
            (None, Some(post)) => {
                *lock(&self.emitter.target) = Some(post.clone());
                let emitter = self.emitter.clone();
                let on_transform = Arc::new(move |_: &MapEvent| emitter.emit_current());
                self.subscription = Some(
                    self.emitter
                        .projector
                        .subscribe(&TRANSFORM_EVENTS, on_transform),
                );
                SyncTransition::Subscribed
            }
        };

        let initial = match transition {
            SyncTransition::Subscribed | SyncTransition::Retargeted => self.emitter.current(),
            _ => None,
        };

        if transition != SyncTransition::Idle && transition != SyncTransition::Unchanged {
            log::debug!("overlay sync: {:?}", transition);
        }
        SyncOutcome {
            transition,
            initial,
        }
    }

    /// [`sync`](Self::sync), then deliver the initial anchor
    pub fn apply(&mut self, selected: Option<&Arc<Post>>) -> SyncTransition {
        let outcome = self.sync(selected);
        if let Some(update) = outcome.initial {
            self.deliver(update);
        }
        outcome.transition
    }

    pub fn deliver(&self, update: AnchorUpdate) {
        (self.emitter.on_anchor)(update);
    }

    pub fn target(&self) -> Option<Arc<Post>> {
        lock(&self.emitter.target).clone()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Listeners this synchronizer currently holds on the map
    pub fn listener_count(&self) -> usize {
        self.subscription.as_ref().map_or(0, Subscription::len)
    }

    pub fn teardown(&mut self) {
        self.sync(None);
    }
}

impl Drop for OverlaySynchronizer {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{geo::LatLng, map::HeadlessMap};
    use crate::input::MapEventKind;
    use crate::traits::MapSurface;

    type Updates = Arc<Mutex<Vec<AnchorUpdate>>>;

    fn setup() -> (Arc<HeadlessMap>, OverlaySynchronizer, Updates) {
        let map = HeadlessMap::shared(LatLng::new(35.0, 139.0), 15.0, Point::new(800.0, 600.0));
        let updates: Updates = Arc::default();
        let sink = updates.clone();
        let sync = OverlaySynchronizer::new(
            CoordinateProjector::new(map.clone()),
            Arc::new(move |update| sink.lock().unwrap().push(update)),
        );
        (map, sync, updates)
    }

    fn post(id: u64, lat: f64, lng: f64) -> Arc<Post> {
        Arc::new(Post::new(id, LatLng::new(lat, lng), "p.jpg", ""))
    }

    #[test]
    fn test_select_subscribes_and_emits_once() {
        let (map, mut sync, updates) = setup();
        let first = post(1, 35.0, 139.0);

        assert_eq!(sync.apply(Some(&first)), SyncTransition::Subscribed);
        assert_eq!(map.total_listeners(), 3);
        for kind in TRANSFORM_EVENTS {
            assert_eq!(map.listener_count(kind), 1);
        }
        assert_eq!(map.listener_count(MapEventKind::Click), 0);

        let updates = updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].post_id, PostId(1));
        assert_eq!(updates[0].pixel, map.project(LatLng::new(35.0, 139.0)));
    }

    #[test]
    fn test_each_transform_reprojects() {
        let (map, mut sync, updates) = setup();
        let first = post(1, 35.0, 139.0);
        sync.apply(Some(&first));

        map.pan_by(Point::new(12.0, 0.0));
        map.resize(Point::new(1000.0, 600.0));

        let updates = updates.lock().unwrap();
        assert_eq!(updates.len(), 3);
        assert!((updates[1].pixel.x - 412.0).abs() < 1e-6);
        assert_eq!(updates[2].pixel, map.project(LatLng::new(35.0, 139.0)));
    }

    #[test]
    fn test_retarget_keeps_listeners() {
        let (map, mut sync, updates) = setup();
        let first = post(1, 35.0, 139.0);
        let second = post(2, 35.001, 139.001);

        sync.apply(Some(&first));
        assert_eq!(sync.apply(Some(&second)), SyncTransition::Retargeted);
        assert_eq!(map.total_listeners(), 3);

        map.pan_by(Point::new(1.0, 1.0));
        let updates = updates.lock().unwrap();
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[1].post_id, PostId(2));
        assert_eq!(updates[2].post_id, PostId(2));
    }

    #[test]
    fn test_same_post_is_noop() {
        let (map, mut sync, updates) = setup();
        let first = post(1, 35.0, 139.0);
        sync.apply(Some(&first));

        let outcome = sync.sync(Some(&first));
        assert_eq!(outcome.transition, SyncTransition::Unchanged);
        assert_eq!(outcome.initial, None);
        assert_eq!(map.total_listeners(), 3);
        assert_eq!(updates.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_deselect_unsubscribes() {
        let (map, mut sync, updates) = setup();
        let first = post(1, 35.0, 139.0);
        sync.apply(Some(&first));

        assert_eq!(sync.apply(None), SyncTransition::Unsubscribed);
        assert_eq!(map.total_listeners(), 0);
        assert_eq!(sync.apply(None), SyncTransition::Idle);

        map.pan_by(Point::new(5.0, 5.0));
        assert_eq!(updates.lock().unwrap().len(), 1);
        assert_eq!(sync.listener_count(), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (map, mut sync, _) = setup();
        sync.apply(Some(&post(1, 35.0, 139.0)));
        drop(sync);
        assert_eq!(map.total_listeners(), 0);
    }

    #[test]
    fn test_sync_defers_delivery() {
        let (_map, mut sync, updates) = setup();
        let outcome = sync.sync(Some(&post(7, 35.0, 139.0)));
        assert_eq!(outcome.transition, SyncTransition::Subscribed);
        assert!(updates.lock().unwrap().is_empty());

        sync.deliver(outcome.initial.unwrap());
        assert_eq!(updates.lock().unwrap()[0].post_id, PostId(7));
    }
}
