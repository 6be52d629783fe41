//! The map session: pins, selection, camera and overlay sync wired together
//!
//! A marker activation runs, in one call: the host's pin callback, the
//! selection update, the camera flight, then the overlay subscription and its
//! first anchor. Anchors are delivered with the session unlocked, so the
//! host's anchor callback may call back into the session.

pub mod camera;
pub mod selection;

pub use camera::CameraDirector;
pub use selection::SelectionState;

use crate::{
    core::{config::PinmapOptions, projector::CoordinateProjector},
    data::{Post, PostCollection, PostId},
    layers::pins::{PinActivatedCallback, PinRegistry},
    lock,
    prelude::Arc,
    traits::MapSurface,
    ui::sync::{AnchorCallback, AnchorUpdate, OverlaySynchronizer},
    MapError, Result,
};
use std::sync::{Mutex, Weak};

/// Host hooks; both optional
#[derive(Clone, Default)]
pub struct SessionCallbacks {
    pub on_pin_activated: Option<PinActivatedCallback>,
    pub on_anchor_updated: Option<AnchorCallback>,
}

impl SessionCallbacks {
    pub fn with_pin_activated(mut self, callback: PinActivatedCallback) -> Self {
        self.on_pin_activated = Some(callback);
        self
    }

    pub fn with_anchor_updated(mut self, callback: AnchorCallback) -> Self {
        self.on_anchor_updated = Some(callback);
        self
    }
}

struct SessionInner {
    selection: SelectionState,
    pins: PinRegistry,
    camera: CameraDirector,
    sync: OverlaySynchronizer,
    unmounted: bool,
}

impl SessionInner {
    /// Camera first, then the synchronizer. Returns the anchor to deliver.
    fn follow_selection(&mut self) -> Option<AnchorUpdate> {
        let selected = self.selection.selected().cloned();
        self.camera.on_selection(selected.as_ref());
        self.sync.sync(selected.as_ref()).initial
    }
}

pub struct MapSession {
    inner: Mutex<SessionInner>,
    on_anchor: AnchorCallback,
}

impl MapSession {
    /// Places a pin for every post and starts with nothing selected
    pub fn mount(
        map: Arc<dyn MapSurface>,
        posts: PostCollection,
        options: &PinmapOptions,
        callbacks: SessionCallbacks,
    ) -> Arc<Self> {
        let on_anchor: AnchorCallback = callbacks
            .on_anchor_updated
            .unwrap_or_else(|| Arc::new(|_: AnchorUpdate| {}));

        Arc::new_cyclic(|session: &Weak<MapSession>| {
            let pin_callback = Self::pin_callback(session.clone(), callbacks.on_pin_activated);
            let mut pins = PinRegistry::new(map.clone(), options.marker.clone(), pin_callback);
            pins.render(&posts);
            log::debug!("mounted map session with {} pins", pins.len());

            Self {
                inner: Mutex::new(SessionInner {
                    selection: SelectionState::new(posts),
                    pins,
                    camera: CameraDirector::new(map.clone(), options.camera.clone()),
                    sync: OverlaySynchronizer::new(
                        CoordinateProjector::new(map),
                        on_anchor.clone(),
                    ),
                    unmounted: false,
                }),
                on_anchor,
            }
        })
    }

    fn pin_callback(
        session: Weak<MapSession>,
        host: Option<PinActivatedCallback>,
    ) -> PinActivatedCallback {
        Arc::new(move |post: &Arc<Post>, pixel| {
            if let Some(host) = &host {
                host(post, pixel);
            }
            let Some(session) = session.upgrade() else {
                return;
            };
            if let Err(err) = session.select_post(post) {
                log::warn!("pin for post {} is stale: {}", post.id(), err);
            }
        })
    }

    /// Returns whether the selection changed
    pub fn select_post(&self, post: &Arc<Post>) -> Result<bool> {
        self.update(|inner| inner.selection.select_post(post))
    }

    pub fn select_post_by_id(&self, id: PostId) -> Result<bool> {
        self.update(|inner| inner.selection.select_by_id(id))
    }

    /// Dismisses the overlay. Returns whether anything was selected.
    pub fn clear_selection(&self) -> bool {
        self.update(|inner| Ok(inner.selection.clear_selection()))
            .unwrap_or(false)
    }

    /// Appends a post and pins it; the selection is untouched. Fails for a
    /// duplicate id or once the session is unmounted.
    pub fn add_post(&self, post: impl Into<Arc<Post>>) -> Result<Arc<Post>> {
        let mut inner = lock(&self.inner);
        if inner.unmounted {
            return Err(MapError::InvalidInput("map session is unmounted".into()));
        }
        let post = inner.selection.add_post(post)?;
        inner.pins.place(&post);
        Ok(post)
    }

    /// Removes a post and its pin, dismissing it if it was selected
    pub fn remove_post(&self, id: PostId) -> Option<Arc<Post>> {
        let mut removed = None;
        let _ = self.update(|inner| {
            let was_selected = inner.selection.selected().is_some();
            removed = inner.selection.remove_post(id);
            inner.pins.remove(id);
            Ok(was_selected && inner.selection.selected().is_none())
        });
        removed
    }

    pub fn selected(&self) -> Option<Arc<Post>> {
        lock(&self.inner).selection.selected().cloned()
    }

    pub fn posts(&self) -> PostCollection {
        lock(&self.inner).selection.posts().clone()
    }

    pub fn pin_count(&self) -> usize {
        lock(&self.inner).pins.len()
    }

    /// Transform listeners the overlay sync holds on the map: 0 or 3
    pub fn active_listeners(&self) -> usize {
        lock(&self.inner).sync.listener_count()
    }

    /// Flights started since mount
    pub fn flights_issued(&self) -> usize {
        lock(&self.inner).camera.flights_issued()
    }

    /// Clears the selection and removes every listener and pin this session
    /// put on the map. Later selections and edits are ignored.
    pub fn unmount(&self) {
        let mut inner = lock(&self.inner);
        if std::mem::replace(&mut inner.unmounted, true) {
            return;
        }
        inner.selection.clear_selection();
        inner.camera.on_selection(None);
        inner.sync.teardown();
        inner.pins.clear();
        log::debug!("unmounted map session");
    }

    /// Applies `change` and, if it reports a change, drives the camera and
    /// the overlay sync. The first anchor goes out after the lock is released.
    fn update<F>(&self, change: F) -> Result<bool>
    where
        F: FnOnce(&mut SessionInner) -> Result<bool>,
    {
        let initial = {
            let mut inner = lock(&self.inner);
            if inner.unmounted {
                log::debug!("ignoring change to an unmounted map session");
                return Ok(false);
            }
            if !change(&mut inner)? {
                return Ok(false);
            }
            inner.follow_selection()
        };

        if let Some(update) = initial {
            (self.on_anchor)(update);
        }
        Ok(true)
    }
}
