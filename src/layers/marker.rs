use crate::{
    core::{
        constants::{PIN_ICON_ANCHOR, PIN_ICON_SIZE, PIN_POPUP_ANCHOR},
        geo::LatLng,
    },
    data::PostId,
};
use serde::{Deserialize, Serialize};

/// Handle for a marker placed on a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

/// Icon description handed to the map when placing a marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerIcon {
    pub icon_url: String,
    pub size: (u32, u32),
    /// Pixel inside the icon that sits on the coordinate
    pub anchor: (u32, u32),
    pub popup_anchor: (i32, i32),
}

impl MarkerIcon {
    pub fn new(icon_url: impl Into<String>) -> Self {
        Self {
            icon_url: icon_url.into(),
            ..Self::default()
        }
    }
}

impl Default for MarkerIcon {
    fn default() -> Self {
        Self {
            icon_url: "pin.png".to_string(),
            size: PIN_ICON_SIZE,
            anchor: PIN_ICON_ANCHOR,
            popup_anchor: PIN_POPUP_ANCHOR,
        }
    }
}

/// A post's pin as tracked by the registry
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    id: MarkerId,
    post_id: PostId,
    position: LatLng,
}

impl Marker {
    pub fn new(id: MarkerId, post_id: PostId, position: LatLng) -> Self {
        Self {
            id,
            post_id,
            position,
        }
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    pub fn position(&self) -> LatLng {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_icon_anchors_bottom_center() {
        let icon = MarkerIcon::new("neko.png");
        assert_eq!(icon.icon_url, "neko.png");
        assert_eq!(icon.anchor.0 * 2, icon.size.0);
        assert_eq!(icon.anchor.1, icon.size.1);
        assert_eq!(icon.popup_anchor, (0, -40));
    }
}
