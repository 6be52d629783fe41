use crate::core::geo::{LatLng, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw gestures fed to a map by its host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Single click/tap on the map background
    Click { position: Point },
    /// Drag in progress
    Drag { delta: Point },
    /// Scroll wheel or pinch zoom; positive delta zooms in
    Scroll { delta: f64, position: Point },
    /// Viewport/window resize
    Resize { size: Point },
}

impl InputEvent {
    /// Gets the primary position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::Click { position } => Some(*position),
            InputEvent::Scroll { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Names of the events a map emits, the keys listeners register under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapEventKind {
    Pan,
    Zoom,
    Resize,
    Click,
}

/// The camera-changing events an anchored overlay has to follow
pub const TRANSFORM_EVENTS: [MapEventKind; 3] =
    [MapEventKind::Pan, MapEventKind::Zoom, MapEventKind::Resize];

impl MapEventKind {
    pub fn is_transform(self) -> bool {
        TRANSFORM_EVENTS.contains(&self)
    }
}

impl fmt::Display for MapEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MapEventKind::Pan => "move",
            MapEventKind::Zoom => "zoom",
            MapEventKind::Resize => "resize",
            MapEventKind::Click => "click",
        };
        f.write_str(name)
    }
}

/// Map event types that can be emitted by the map
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Camera center moved
    Pan { center: LatLng },
    /// Zoom level changed
    Zoom { zoom: f64 },
    /// Viewport size changed
    Resize { size: Point },
    /// Click on the map background
    Click { lat_lng: LatLng, pixel: Point },
}

impl MapEvent {
    pub fn kind(&self) -> MapEventKind {
        match self {
            MapEvent::Pan { .. } => MapEventKind::Pan,
            MapEvent::Zoom { .. } => MapEventKind::Zoom,
            MapEvent::Resize { .. } => MapEventKind::Resize,
            MapEvent::Click { .. } => MapEventKind::Click,
        }
    }
}

/// Handle returned by a subscription, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_event_position() {
        let click = InputEvent::Click {
            position: Point::new(100.0, 200.0),
        };
        assert_eq!(click.position(), Some(Point::new(100.0, 200.0)));

        let drag = InputEvent::Drag {
            delta: Point::new(5.0, 5.0),
        };
        assert_eq!(drag.position(), None);
    }

    #[test]
    fn test_transform_kinds() {
        assert!(MapEventKind::Pan.is_transform());
        assert!(MapEventKind::Zoom.is_transform());
        assert!(MapEventKind::Resize.is_transform());
        assert!(!MapEventKind::Click.is_transform());
    }

    #[test]
    fn test_event_kind_mapping() {
        let event = MapEvent::Zoom { zoom: 12.0 };
        assert_eq!(event.kind(), MapEventKind::Zoom);
        assert_eq!(MapEventKind::Pan.to_string(), "move");
    }
}
