use crate::{
    animation::FlyAnimation,
    core::{
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    input::{EventCallback, EventManager, InputEvent, ListenerId, MapEvent, MapEventKind},
    layers::marker::{MarkerIcon, MarkerId},
    lock,
    prelude::{Arc, Duration},
    traits::{ActivateCallback, FlyToOptions, MapSurface},
    MapError, Result,
};
use std::collections::BTreeMap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex,
};

/// A camera move requested through [`MapSurface::fly_to`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyRequest {
    pub target: LatLng,
    pub zoom: f64,
    pub options: FlyToOptions,
}

struct PlacedMarker {
    position: LatLng,
    icon: MarkerIcon,
    on_activate: ActivateCallback,
}

/// A map without a renderer.
///
/// Keeps a real Web Mercator camera, listener registry and marker table, and
/// turns gestures into the same events a rendered map would emit. Camera
/// flights only move when the host calls [`HeadlessMap::tick`], so `fly_to`
/// never emits anything synchronously.
pub struct HeadlessMap {
    viewport: Mutex<Viewport>,
    events: Mutex<EventManager>,
    markers: Mutex<BTreeMap<MarkerId, PlacedMarker>>,
    next_marker: AtomicU64,
    flight: Mutex<Option<FlyAnimation>>,
    fly_history: Mutex<Vec<FlyRequest>>,
}

impl HeadlessMap {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            viewport: Mutex::new(Viewport::new(center, zoom, size)),
            events: Mutex::new(EventManager::new()),
            markers: Mutex::new(BTreeMap::new()),
            next_marker: AtomicU64::new(1),
            flight: Mutex::new(None),
            fly_history: Mutex::new(Vec::new()),
        }
    }

    pub fn shared(center: LatLng, zoom: f64, size: Point) -> Arc<Self> {
        Arc::new(Self::new(center, zoom, size))
    }

    /// Snapshot of the camera
    pub fn viewport(&self) -> Viewport {
        lock(&self.viewport).clone()
    }

    pub fn center(&self) -> LatLng {
        lock(&self.viewport).center
    }

    pub fn zoom(&self) -> f64 {
        lock(&self.viewport).zoom
    }

    /// Drag the map by a pixel delta
    pub fn pan_by(&self, delta: Point) {
        let center = {
            let mut viewport = lock(&self.viewport);
            viewport.pan(delta);
            viewport.center
        };
        self.emit(MapEvent::Pan { center });
    }

    /// Jump the camera without animation
    pub fn set_view(&self, center: LatLng, zoom: f64) -> Result<()> {
        if !center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "({}, {})",
                center.lat, center.lng
            )));
        }

        let (center, zoom) = {
            let mut viewport = lock(&self.viewport);
            viewport.set_center(center);
            viewport.set_zoom(zoom);
            (viewport.center, viewport.zoom)
        };
        self.emit(MapEvent::Pan { center });
        self.emit(MapEvent::Zoom { zoom });
        Ok(())
    }

    /// Zoom around `focus`, or the viewport center
    pub fn zoom_to(&self, zoom: f64, focus: Option<Point>) {
        let (before, after) = {
            let mut viewport = lock(&self.viewport);
            let before = (viewport.center, viewport.zoom);
            viewport.zoom_to(zoom, focus);
            (before, (viewport.center, viewport.zoom))
        };

        if before.1 == after.1 {
            return;
        }
        self.emit(MapEvent::Zoom { zoom: after.1 });
        if before.0 != after.0 {
            self.emit(MapEvent::Pan { center: after.0 });
        }
    }

    pub fn resize(&self, size: Point) {
        lock(&self.viewport).set_size(size);
        self.emit(MapEvent::Resize { size });
    }

    /// Feed a raw gesture into the map
    pub fn handle_input(&self, input: InputEvent) -> Result<()> {
        if let Some(position) = input.position() {
            if !position.x.is_finite() || !position.y.is_finite() {
                return Err(MapError::InvalidInput(format!(
                    "non-finite pointer position {:?}",
                    position
                )));
            }
        }

        match input {
            InputEvent::Click { position } => {
                if let Some(marker) = self.marker_at(position) {
                    log::trace!("click hit marker {:?}", marker);
                    self.activate_marker(marker);
                } else {
                    let lat_lng = lock(&self.viewport).pixel_to_lat_lng(&position);
                    self.emit(MapEvent::Click {
                        lat_lng,
                        pixel: position,
                    });
                }
            }
            InputEvent::Drag { delta } => self.pan_by(delta),
            InputEvent::Scroll { delta, position } => {
                let zoom = self.zoom() + delta;
                self.zoom_to(zoom, Some(position));
            }
            InputEvent::Resize { size } => {
                if !(size.x > 0.0 && size.y > 0.0) {
                    return Err(MapError::InvalidInput(format!(
                        "container size must be positive, got {:?}",
                        size
                    )));
                }
                self.resize(size);
            }
        }
        Ok(())
    }

    /// Topmost marker whose icon covers `pixel`
    fn marker_at(&self, pixel: Point) -> Option<MarkerId> {
        let viewport = lock(&self.viewport);
        let markers = lock(&self.markers);

        markers.iter().rev().find_map(|(id, marker)| {
            let anchor = viewport.lat_lng_to_pixel(&marker.position);
            let left = anchor.x - marker.icon.anchor.0 as f64;
            let top = anchor.y - marker.icon.anchor.1 as f64;
            let inside = pixel.x >= left
                && pixel.x <= left + marker.icon.size.0 as f64
                && pixel.y >= top
                && pixel.y <= top + marker.icon.size.1 as f64;
            inside.then_some(*id)
        })
    }

    /// Simulate a click on a marker; false if it is not on the map
    pub fn activate_marker(&self, id: MarkerId) -> bool {
        let callback = lock(&self.markers)
            .get(&id)
            .map(|marker| marker.on_activate.clone());

        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Advance the running flight. Returns whether the camera moved.
    pub fn tick(&self, dt: Duration) -> bool {
        let frame = {
            let mut flight = lock(&self.flight);
            let Some(animation) = flight.as_mut() else {
                return false;
            };
            let frame = animation.advance(dt);
            if frame.finished {
                *flight = None;
            }
            frame
        };

        let (center, zoom) = {
            let mut viewport = lock(&self.viewport);
            viewport.set_center(frame.center);
            viewport.set_zoom(frame.zoom);
            (viewport.center, viewport.zoom)
        };
        self.emit(MapEvent::Pan { center });
        self.emit(MapEvent::Zoom { zoom });

        if frame.finished {
            log::debug!("flight landed at ({:.5}, {:.5}) z{}", center.lat, center.lng, zoom);
        }
        true
    }

    /// Tick until the current flight lands
    pub fn finish_flight(&self) {
        while self.tick(Duration::from_millis(16)) {}
    }

    pub fn is_flying(&self) -> bool {
        lock(&self.flight).is_some()
    }

    /// Every `fly_to` received, oldest first
    pub fn fly_history(&self) -> Vec<FlyRequest> {
        lock(&self.fly_history).clone()
    }

    pub fn listener_count(&self, kind: MapEventKind) -> usize {
        lock(&self.events).listener_count(kind)
    }

    pub fn total_listeners(&self) -> usize {
        lock(&self.events).total_listeners()
    }

    pub fn marker_count(&self) -> usize {
        lock(&self.markers).len()
    }

    fn emit(&self, event: MapEvent) {
        // Released before dispatch; listeners call back into the map
        let callbacks = lock(&self.events).callbacks_for(&event);
        for callback in callbacks {
            callback(&event);
        }
    }
}

impl MapSurface for HeadlessMap {
    fn project(&self, position: LatLng) -> Point {
        lock(&self.viewport).lat_lng_to_pixel(&position)
    }

    fn on(&self, kind: MapEventKind, callback: EventCallback) -> ListenerId {
        lock(&self.events).on(kind, callback)
    }

    fn off(&self, kind: MapEventKind, id: ListenerId) -> bool {
        lock(&self.events).off(kind, id)
    }

    fn fly_to(&self, target: LatLng, zoom: f64, options: FlyToOptions) {
        let (from_center, from_zoom) = {
            let viewport = lock(&self.viewport);
            (viewport.center, viewport.zoom)
        };

        lock(&self.fly_history).push(FlyRequest {
            target,
            zoom,
            options,
        });
        *lock(&self.flight) = Some(FlyAnimation::new(
            from_center,
            from_zoom,
            target,
            zoom,
            options.duration,
            options.easing,
        ));
        log::debug!(
            "flying to ({:.5}, {:.5}) z{} over {} ms",
            target.lat,
            target.lng,
            zoom,
            options.duration.as_millis()
        );
    }

    fn place_marker(
        &self,
        position: LatLng,
        icon: &MarkerIcon,
        on_activate: ActivateCallback,
    ) -> MarkerId {
        let id = MarkerId(self.next_marker.fetch_add(1, Ordering::Relaxed));
        lock(&self.markers).insert(
            id,
            PlacedMarker {
                position,
                icon: icon.clone(),
                on_activate,
            },
        );
        id
    }

    fn remove_marker(&self, id: MarkerId) -> bool {
        lock(&self.markers).remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::EasingType;
    use std::sync::atomic::AtomicUsize;

    fn map() -> HeadlessMap {
        HeadlessMap::new(LatLng::new(35.0, 139.0), 15.0, Point::new(800.0, 600.0))
    }

    fn counter(map: &HeadlessMap, kind: MapEventKind) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let sink = hits.clone();
        map.on(
            kind,
            Arc::new(move |_: &MapEvent| {
                sink.fetch_add(1, Ordering::SeqCst);
            }),
        );
        hits
    }

    #[test]
    fn test_center_projects_to_container_middle() {
        let map = map();
        let pixel = map.project(LatLng::new(35.0, 139.0));
        assert!((pixel.x - 400.0).abs() < 1e-6);
        assert!((pixel.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_drag_emits_pan() {
        let map = map();
        let pans = counter(&map, MapEventKind::Pan);
        let zooms = counter(&map, MapEventKind::Zoom);

        map.handle_input(InputEvent::Drag {
            delta: Point::new(10.0, 0.0),
        })
        .unwrap();

        assert_eq!(pans.load(Ordering::SeqCst), 1);
        assert_eq!(zooms.load(Ordering::SeqCst), 0);
        assert!(map.center().lng < 139.0);
    }

    #[test]
    fn test_scroll_emits_zoom() {
        let map = map();
        let zooms = counter(&map, MapEventKind::Zoom);
        map.handle_input(InputEvent::Scroll {
            delta: 1.0,
            position: Point::new(400.0, 300.0),
        })
        .unwrap();
        assert_eq!(zooms.load(Ordering::SeqCst), 1);
        assert!((map.zoom() - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_rejects_empty_container() {
        let map = map();
        let result = map.handle_input(InputEvent::Resize {
            size: Point::new(0.0, 600.0),
        });
        assert!(matches!(result, Err(MapError::InvalidInput(_))));

        let resizes = counter(&map, MapEventKind::Resize);
        map.handle_input(InputEvent::Resize {
            size: Point::new(1024.0, 768.0),
        })
        .unwrap();
        assert_eq!(resizes.load(Ordering::SeqCst), 1);
        assert_eq!(map.viewport().size, Point::new(1024.0, 768.0));
    }

    #[test]
    fn test_fly_to_is_silent_until_ticked() {
        let map = map();
        let pans = counter(&map, MapEventKind::Pan);

        map.fly_to(
            LatLng::new(35.005, 139.0),
            15.0,
            FlyToOptions {
                duration: Duration::from_millis(100),
                easing: EasingType::Linear,
            },
        );
        assert_eq!(pans.load(Ordering::SeqCst), 0);
        assert!(map.is_flying());
        assert_eq!(map.fly_history().len(), 1);

        assert!(map.tick(Duration::from_millis(50)));
        assert_eq!(pans.load(Ordering::SeqCst), 1);
        assert!(map.is_flying());

        map.finish_flight();
        assert!(!map.is_flying());
        assert_eq!(map.center(), LatLng::new(35.005, 139.0));
        assert!(!map.tick(Duration::from_millis(16)));
    }

    #[test]
    fn test_zero_duration_flight_lands_on_first_tick() {
        let map = map();
        map.fly_to(
            LatLng::new(36.0, 140.0),
            12.0,
            FlyToOptions {
                duration: Duration::ZERO,
                easing: EasingType::Linear,
            },
        );
        assert!(map.tick(Duration::ZERO));
        assert!(!map.is_flying());
        assert_eq!(map.center(), LatLng::new(36.0, 140.0));
        assert_eq!(map.zoom(), 12.0);
    }

    #[test]
    fn test_click_on_marker_activates_it() {
        let map = map();
        let hits = Arc::new(AtomicUsize::new(0));
        let sink = hits.clone();
        let clicks = counter(&map, MapEventKind::Click);

        let id = map.place_marker(
            LatLng::new(35.0, 139.0),
            &MarkerIcon::default(),
            Arc::new(move || {
                sink.fetch_add(1, Ordering::SeqCst);
            }),
        );

        // Icon spans 20 px either side of the anchor and 40 px above it
        map.handle_input(InputEvent::Click {
            position: Point::new(400.0, 280.0),
        })
        .unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(clicks.load(Ordering::SeqCst), 0);

        map.handle_input(InputEvent::Click {
            position: Point::new(400.0, 320.0),
        })
        .unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(clicks.load(Ordering::SeqCst), 1);

        assert!(map.remove_marker(id));
        assert!(!map.activate_marker(id));
        assert_eq!(map.marker_count(), 0);
    }

    #[test]
    fn test_listener_may_reenter_map() {
        let map = Arc::new(map());
        let observed = Arc::new(Mutex::new(Vec::new()));

        let inner = Arc::downgrade(&map);
        let sink = observed.clone();
        map.on(
            MapEventKind::Pan,
            Arc::new(move |_: &MapEvent| {
                if let Some(map) = inner.upgrade() {
                    sink.lock().unwrap().push(map.project(LatLng::new(35.0, 139.0)));
                }
            }),
        );

        map.pan_by(Point::new(5.0, 5.0));
        let observed = observed.lock().unwrap();
        assert_eq!(observed.len(), 1);
        assert!((observed[0].x - 405.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_view_rejects_invalid_center() {
        let map = map();
        assert!(map.set_view(LatLng::new(120.0, 0.0), 10.0).is_err());
        map.set_view(LatLng::new(10.0, 20.0), 10.0).unwrap();
        assert_eq!(map.center(), LatLng::new(10.0, 20.0));
    }
}
