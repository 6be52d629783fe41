pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{InputEvent, ListenerId, MapEvent, MapEventKind, TRANSFORM_EVENTS};
pub use handler::{EventCallback, EventManager};
