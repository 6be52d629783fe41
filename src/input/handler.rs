use crate::{
    input::events::{ListenerId, MapEvent, MapEventKind},
    prelude::{Arc, HashMap},
};

/// Event listener callback type
pub type EventCallback = Arc<dyn Fn(&MapEvent) + Send + Sync>;

/// Listener registry for map events.
///
/// Dispatch is split in two steps so the owner can release its lock between
/// collecting the callbacks and invoking them: a callback is then free to call
/// back into the map, including subscribing or unsubscribing.
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type, in registration order
    listeners: HashMap<MapEventKind, Vec<(ListenerId, EventCallback)>>,
    next_id: u64,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on(&mut self, kind: MapEventKind, callback: EventCallback) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.entry(kind).or_default().push((id, callback));
        id
    }

    /// Remove a listener; returns false if it was not registered for `kind`
    pub fn off(&mut self, kind: MapEventKind, id: ListenerId) -> bool {
        let Some(callbacks) = self.listeners.get_mut(&kind) else {
            return false;
        };
        let before = callbacks.len();
        callbacks.retain(|(listener, _)| *listener != id);
        before != callbacks.len()
    }

    /// Snapshot of the callbacks that should receive `event`
    pub fn callbacks_for(&self, event: &MapEvent) -> Vec<EventCallback> {
        self.listeners
            .get(&event.kind())
            .map(|callbacks| callbacks.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default()
    }

    /// Dispatch directly, for owners that hold no lock around the manager
    pub fn emit(&self, event: &MapEvent) {
        for callback in self.callbacks_for(event) {
            callback(event);
        }
    }

    pub fn listener_count(&self, kind: MapEventKind) -> usize {
        self.listeners.get(&kind).map(Vec::len).unwrap_or(0)
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }
}
