use crate::{
    data::{Post, PostCollection, PostId},
    prelude::Arc,
    MapError, Result,
};

/// The post collection and the current selection.
///
/// `selected` is either `None` or a post held by `posts`; removing that post
/// clears it.
#[derive(Debug, Default)]
pub struct SelectionState {
    posts: PostCollection,
    selected: Option<Arc<Post>>,
}

impl SelectionState {
    pub fn new(posts: PostCollection) -> Self {
        Self {
            posts,
            selected: None,
        }
    }

    pub fn posts(&self) -> &PostCollection {
        &self.posts
    }

    pub fn selected(&self) -> Option<&Arc<Post>> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, post: &Arc<Post>) -> bool {
        self.selected
            .as_ref()
            .is_some_and(|selected| Arc::ptr_eq(selected, post))
    }

    /// Selects `post`; returns whether the selection changed
    pub fn select_post(&mut self, post: &Arc<Post>) -> Result<bool> {
        if !self.posts.contains(post) {
            return Err(MapError::UnknownPost(post.id()));
        }
        if self.is_selected(post) {
            return Ok(false);
        }
        self.selected = Some(post.clone());
        Ok(true)
    }

    pub fn select_by_id(&mut self, id: PostId) -> Result<bool> {
        let post = self.posts.get(id).cloned().ok_or(MapError::UnknownPost(id))?;
        self.select_post(&post)
    }

    /// Returns whether anything was selected
    pub fn clear_selection(&mut self) -> bool {
        self.selected.take().is_some()
    }

    /// Appends a post. The selection is left alone.
    pub fn add_post(&mut self, post: impl Into<Arc<Post>>) -> Result<Arc<Post>> {
        self.posts.push(post)
    }

    pub fn remove_post(&mut self, id: PostId) -> Option<Arc<Post>> {
        let removed = self.posts.remove(id)?;
        if self.is_selected(&removed) {
            self.selected = None;
        }
        Some(removed)
    }
}
