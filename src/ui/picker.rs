use crate::{
    core::{
        geo::LatLng,
        projector::{CoordinateProjector, Subscription},
    },
    input::{MapEvent, MapEventKind},
    location::LocateStatus,
    lock,
    prelude::Arc,
    MapError, Result,
};
use std::sync::Mutex;

/// Picks a position for a new post by clicking the map.
///
/// Opens on the same bootstrapped center as the main map view.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPicker {
    center: LatLng,
    candidate: Option<LatLng>,
}

impl LocationPicker {
    pub fn new(center: LatLng) -> Self {
        Self {
            center,
            candidate: None,
        }
    }

    /// `None` while the bootstrap is still locating
    pub fn from_status(status: LocateStatus) -> Option<Self> {
        status.center().map(Self::new)
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn handle_map_event(&mut self, event: &MapEvent) {
        if let MapEvent::Click { lat_lng, .. } = event {
            // Clicks come from the map and are always in range
            let _ = self.pick(*lat_lng);
        }
    }

    pub fn pick(&mut self, position: LatLng) -> Result<()> {
        if !position.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "({}, {})",
                position.lat, position.lng
            )));
        }
        self.candidate = Some(position);
        Ok(())
    }

    pub fn candidate(&self) -> Option<LatLng> {
        self.candidate
    }

    pub fn can_confirm(&self) -> bool {
        self.candidate.is_some()
    }

    /// The picked position, consumed. `None` if nothing was picked.
    pub fn confirm(&mut self) -> Option<LatLng> {
        self.candidate.take()
    }

    pub fn cancel(&mut self) {
        self.candidate = None;
    }

    /// Routes map clicks into `picker` until the guard is dropped
    pub fn subscribe(picker: &Arc<Mutex<Self>>, projector: &CoordinateProjector) -> Subscription {
        let picker = Arc::downgrade(picker);
        projector.subscribe(
            &[MapEventKind::Click],
            Arc::new(move |event: &MapEvent| {
                if let Some(picker) = picker.upgrade() {
                    lock(&picker).handle_map_event(event);
                }
            }),
        )
    }
}
