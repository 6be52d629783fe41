//! Device location: the provider seam and the one-shot bootstrap that picks
//! the map's initial center

#[cfg(feature = "tokio-runtime")]
pub mod bootstrap;
pub mod provider;

#[cfg(feature = "tokio-runtime")]
pub use bootstrap::{BootstrapHandle, GeolocationBootstrap};
pub use provider::{
    LocateStatus, LocationError, PositionOptions, PositionReply, PositionResult,
    UnavailableLocation,
};
#[cfg(feature = "tokio-runtime")]
pub use provider::SpawnedPositionProvider;
