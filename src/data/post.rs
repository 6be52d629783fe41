use crate::{core::geo::LatLng, MapError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use time::OffsetDateTime;

/// Opaque post identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A geotagged photo entry. Immutable once created; shared as `Arc<Post>` so
/// that identity, not field equality, tells two selections apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    id: PostId,
    #[serde(flatten)]
    position: LatLng,
    image_url: String,
    #[serde(default)]
    comment: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    created_at: Option<OffsetDateTime>,
}

impl Post {
    pub fn new(
        id: impl Into<PostId>,
        position: LatLng,
        image_url: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            image_url: image_url.into(),
            comment: comment.into(),
            created_at: None,
        }
    }

    pub fn with_created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// `None` means no date is shown for this post
    pub fn created_at(&self) -> Option<OffsetDateTime> {
        self.created_at
    }
}

/// Posts in insertion order, at most one per id
#[derive(Debug, Clone, Default)]
pub struct PostCollection {
    posts: Vec<Arc<Post>>,
}

impl PostCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a post and returns the shared handle stored in the collection.
    /// A post whose id is already held is rejected.
    pub fn push(&mut self, post: impl Into<Arc<Post>>) -> Result<Arc<Post>> {
        let post = post.into();
        if self.get(post.id()).is_some() {
            return Err(MapError::InvalidInput(format!(
                "post {} is already in the collection",
                post.id()
            )));
        }
        self.posts.push(post.clone());
        Ok(post)
    }

    pub fn get(&self, id: PostId) -> Option<&Arc<Post>> {
        self.posts.iter().find(|post| post.id() == id)
    }

    /// Whether this exact post instance is held by the collection
    pub fn contains(&self, post: &Arc<Post>) -> bool {
        self.posts.iter().any(|held| Arc::ptr_eq(held, post))
    }

    /// Removes the post with `id`. Only the selection state removes
    /// posts, so it can clear a selection that pointed at the removed one.
    pub(crate) fn remove(&mut self, id: PostId) -> Option<Arc<Post>> {
        let index = self.posts.iter().position(|post| post.id() == id)?;
        Some(self.posts.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Post>> {
        self.posts.iter()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Later duplicates of an id are dropped with a warning
impl FromIterator<Post> for PostCollection {
    fn from_iter<I: IntoIterator<Item = Post>>(iter: I) -> Self {
        let mut collection = Self::new();
        for post in iter {
            let id = post.id();
            if collection.push(post).is_err() {
                log::warn!("dropping duplicate post {}", id);
            }
        }
        collection
    }
}
