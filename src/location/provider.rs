use crate::{
    core::geo::LatLng,
    lock,
    prelude::{Arc, Duration},
    traits::LocationProvider,
};
use futures::channel::oneshot;
use std::sync::Mutex;

/// Why the device could not report a position
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("location request timed out")]
    Timeout,

    #[error("location is not supported on this platform")]
    Unsupported,
}

pub type PositionResult = std::result::Result<LatLng, LocationError>;

/// Options forwarded to the platform with each request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub timeout: Duration,
}

/// Progress of the initial-center lookup. `Located` and `Fallback` are
/// terminal; nothing ever moves back to `Locating`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocateStatus {
    Locating,
    Located(LatLng),
    Fallback(LatLng),
}

impl LocateStatus {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, LocateStatus::Locating)
    }

    /// The camera center to use, once known
    pub fn center(&self) -> Option<LatLng> {
        match self {
            LocateStatus::Locating => None,
            LocateStatus::Located(center) | LocateStatus::Fallback(center) => Some(*center),
        }
    }
}

/// Answer slot for one position request.
///
/// Cheap to clone so platform glue can hand it to both a success and an
/// error callback. The first `succeed`/`fail` wins; every later call is a
/// no-op returning `false`, as is any answer arriving after the requester
/// went away.
#[derive(Clone)]
pub struct PositionReply {
    slot: Arc<Mutex<Option<oneshot::Sender<PositionResult>>>>,
}

impl PositionReply {
    pub fn channel() -> (Self, oneshot::Receiver<PositionResult>) {
        let (tx, rx) = oneshot::channel();
        let reply = Self {
            slot: Arc::new(Mutex::new(Some(tx))),
        };
        (reply, rx)
    }

    pub fn succeed(&self, position: LatLng) -> bool {
        self.resolve(Ok(position))
    }

    pub fn fail(&self, error: LocationError) -> bool {
        self.resolve(Err(error))
    }

    pub fn resolve(&self, result: PositionResult) -> bool {
        let sender = lock(&self.slot).take();
        match sender {
            Some(tx) => {
                let delivered = tx.send(result).is_ok();
                if !delivered {
                    log::debug!("position answer arrived after the requester went away");
                }
                delivered
            }
            None => {
                log::debug!("ignoring repeated position answer");
                false
            }
        }
    }

    pub fn is_resolved(&self) -> bool {
        lock(&self.slot).is_none()
    }
}

/// Provider for platforms without any location capability
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLocation;

impl LocationProvider for UnavailableLocation {
    fn is_available(&self) -> bool {
        false
    }

    fn request_current_position(&self, reply: PositionReply, _options: PositionOptions) {
        reply.fail(LocationError::Unsupported);
    }
}

#[cfg(feature = "tokio-runtime")]
pub use spawned::SpawnedPositionProvider;

#[cfg(feature = "tokio-runtime")]
mod spawned {
    use super::*;
    use crate::{runtime, traits::PositionSource};

    /// Runs an async [`PositionSource`] on the crate runtime and answers the
    /// reply when it completes
    pub struct SpawnedPositionProvider<S> {
        source: Arc<S>,
    }

    impl<S: PositionSource + 'static> SpawnedPositionProvider<S> {
        pub fn new(source: S) -> Self {
            Self {
                source: Arc::new(source),
            }
        }
    }

    impl<S: PositionSource + 'static> LocationProvider for SpawnedPositionProvider<S> {
        fn request_current_position(&self, reply: PositionReply, options: PositionOptions) {
            let source = self.source.clone();
            // Detached: the reply ignores an answer nobody waits for anymore
            let _task = runtime::spawn(async move {
                reply.resolve(source.current_position(options).await);
            });
        }
    }
}
