use crate::{
    core::{config::OverlayConfig, geo::Point},
    data::Post,
    prelude::Arc,
    ui::sync::AnchorUpdate,
};

/// Where the detail box goes inside the map container
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayPlacement {
    /// Horizontally centered on the anchor, bottom edge `margin_top` above it
    Anchored { top_left: Point },
    /// No anchor known yet; center the box in the container
    Centered,
}

/// Which part of the overlay a click landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayClick {
    Backdrop,
    Content,
    CloseButton,
}

/// View model of the post detail overlay
#[derive(Debug, Clone, Default)]
pub struct DetailOverlay {
    post: Option<Arc<Post>>,
    anchor: Option<Point>,
    config: OverlayConfig,
}

impl DetailOverlay {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            post: None,
            anchor: None,
            config,
        }
    }

    /// Show `post`. A known `anchor` places it at once; otherwise it stays
    /// centered until the first [`AnchorUpdate`].
    pub fn open(&mut self, post: Arc<Post>, anchor: Option<Point>) {
        let same = self.post.as_ref().is_some_and(|open| Arc::ptr_eq(open, &post));
        if !same || anchor.is_some() {
            self.anchor = anchor;
        }
        self.post = Some(post);
    }

    pub fn close(&mut self) {
        self.post = None;
        self.anchor = None;
    }

    pub fn is_open(&self) -> bool {
        self.post.is_some()
    }

    pub fn post(&self) -> Option<&Arc<Post>> {
        self.post.as_ref()
    }

    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    /// Takes an update meant for the open post. Returns false when closed or
    /// when the update belongs to another post.
    pub fn apply_anchor(&mut self, update: &AnchorUpdate) -> bool {
        match &self.post {
            Some(post) if post.id() == update.post_id => {
                self.anchor = Some(update.pixel);
                true
            }
            _ => false,
        }
    }

    /// Placement of a box of `size` pixels, `None` while closed
    pub fn placement(&self, size: Point) -> Option<OverlayPlacement> {
        self.post.as_ref()?;

        Some(match self.anchor {
            Some(anchor) => OverlayPlacement::Anchored {
                top_left: Point::new(
                    anchor.x - size.x / 2.0,
                    anchor.y - size.y - self.config.margin_top,
                ),
            },
            None => OverlayPlacement::Centered,
        })
    }

    /// Returns true when the click dismisses the overlay. Clicks on the
    /// content itself never do.
    pub fn handle_click(&mut self, click: OverlayClick) -> bool {
        if !self.is_open() {
            return false;
        }
        match click {
            OverlayClick::Backdrop | OverlayClick::CloseButton => {
                self.close();
                true
            }
            OverlayClick::Content => false,
        }
    }
}
