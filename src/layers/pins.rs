use crate::{
    core::geo::Point,
    data::{Post, PostCollection, PostId},
    layers::marker::{Marker, MarkerIcon, MarkerId},
    prelude::Arc,
    traits::MapSurface,
};

/// Receives the activated post and its anchor pixel at activation time
pub type PinActivatedCallback = Arc<dyn Fn(&Arc<Post>, Point) + Send + Sync>;

/// One marker per post.
///
/// Marker activations are turned into `(post, pixel)` pairs; the pixel is
/// projected when the user clicks, never when the marker was placed.
pub struct PinRegistry {
    map: Arc<dyn MapSurface>,
    icon: MarkerIcon,
    markers: Vec<Marker>,
    on_activate: PinActivatedCallback,
}

impl PinRegistry {
    pub fn new(map: Arc<dyn MapSurface>, icon: MarkerIcon, on_activate: PinActivatedCallback) -> Self {
        Self {
            map,
            icon,
            markers: Vec::new(),
            on_activate,
        }
    }

    /// Brings the markers in line with `posts`: places a pin for every post
    /// that has none and removes pins whose post is gone. Returns the number
    /// of pins placed.
    pub fn render(&mut self, posts: &PostCollection) -> usize {
        let stale: Vec<PostId> = self
            .markers
            .iter()
            .map(Marker::post_id)
            .filter(|id| posts.get(*id).is_none())
            .collect();
        for id in stale {
            self.remove(id);
        }

        let mut placed = 0;
        for post in posts.iter() {
            if self.marker_for(post.id()).is_none() {
                self.place(post);
                placed += 1;
            }
        }
        placed
    }

    /// Places a pin for `post`, even if one already exists for its id
    pub fn place(&mut self, post: &Arc<Post>) -> MarkerId {
        let map = Arc::downgrade(&self.map);
        let target = post.clone();
        let on_activate = self.on_activate.clone();

        let id = self.map.place_marker(
            post.position(),
            &self.icon,
            Arc::new(move || {
                // The map outliving its owner would be a host bug; stay quiet
                let Some(map) = map.upgrade() else {
                    return;
                };
                let pixel = map.project(target.position());
                on_activate(&target, pixel);
            }),
        );

        log::trace!("placed pin {:?} for post {}", id, post.id());
        self.markers.push(Marker::new(id, post.id(), post.position()));
        id
    }

    /// Removes every pin of the post with `post_id`
    pub fn remove(&mut self, post_id: PostId) -> bool {
        let map = &self.map;
        let before = self.markers.len();
        self.markers.retain(|marker| {
            if marker.post_id() != post_id {
                return true;
            }
            map.remove_marker(marker.id());
            false
        });
        before != self.markers.len()
    }

    pub fn clear(&mut self) {
        for marker in self.markers.drain(..) {
            self.map.remove_marker(marker.id());
        }
    }

    pub fn marker_for(&self, post_id: PostId) -> Option<&Marker> {
        self.markers.iter().find(|marker| marker.post_id() == post_id)
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl Drop for PinRegistry {
    fn drop(&mut self) {
        self.clear();
    }
}
