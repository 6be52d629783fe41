use crate::{
    core::config::BootstrapConfig,
    location::provider::{LocateStatus, PositionOptions, PositionReply},
    prelude::{Arc, Duration},
    runtime::{self, AsyncHandle},
    traits::LocationProvider,
};
use tokio::sync::watch;

/// Resolves the map's initial camera center from the device location.
///
/// One request per acquisition, raced against the configured timeout. Any
/// failure degrades silently to the configured default center.
pub struct GeolocationBootstrap {
    provider: Arc<dyn LocationProvider>,
    config: BootstrapConfig,
}

impl GeolocationBootstrap {
    pub fn new(provider: Arc<dyn LocationProvider>, config: BootstrapConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Acquire with the configured timeout
    pub async fn acquire_initial_center(&self) -> LocateStatus {
        self.acquire_within(self.config.timeout()).await
    }

    /// Acquire, waiting at most `timeout` for the device
    pub async fn acquire_within(&self, timeout: Duration) -> LocateStatus {
        let fallback = LocateStatus::Fallback(self.config.default_center);

        if !self.provider.is_available() {
            log::warn!("geolocation is not supported; using the default center");
            return fallback;
        }

        let (reply, answer) = PositionReply::channel();
        self.provider
            .request_current_position(reply, PositionOptions { timeout });

        match tokio::time::timeout(timeout, answer).await {
            Ok(Ok(Ok(position))) => {
                log::debug!("located device at ({:.5}, {:.5})", position.lat, position.lng);
                LocateStatus::Located(position)
            }
            Ok(Ok(Err(error))) => {
                log::warn!("location lookup failed: {}; using the default center", error);
                fallback
            }
            Ok(Err(_)) => {
                log::warn!("location provider dropped the request; using the default center");
                fallback
            }
            Err(_) => {
                log::warn!(
                    "no location within {} ms; using the default center",
                    timeout.as_millis()
                );
                fallback
            }
        }
    }

    /// Runs the acquisition in the background. The returned handle reports
    /// `Locating` until the lookup resolves; a view should show its loading
    /// state until then rather than a map at a provisional center.
    pub fn mount(self) -> BootstrapHandle {
        let (tx, rx) = watch::channel(LocateStatus::Locating);
        let task = runtime::spawn(async move {
            let status = self.acquire_initial_center().await;
            // Receiver gone means the view is already torn down
            let _ = tx.send(status);
        });

        BootstrapHandle {
            status: rx,
            task: Some(task),
        }
    }
}

/// A mounted bootstrap. Dropping it unmounts: the lookup is cancelled and a
/// late device answer can no longer change anything.
pub struct BootstrapHandle {
    status: watch::Receiver<LocateStatus>,
    task: Option<Box<dyn AsyncHandle>>,
}

impl BootstrapHandle {
    pub fn status(&self) -> LocateStatus {
        *self.status.borrow()
    }

    pub fn is_locating(&self) -> bool {
        !self.status().is_resolved()
    }

    /// Waits for the terminal status; `None` if unmounted before resolving
    pub async fn resolved(&mut self) -> Option<LocateStatus> {
        loop {
            let status = *self.status.borrow_and_update();
            if status.is_resolved() {
                return Some(status);
            }
            if self.status.changed().await.is_err() {
                let status = *self.status.borrow();
                return status.is_resolved().then_some(status);
            }
        }
    }

    pub fn unmount(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                log::debug!("unmounting bootstrap before it resolved");
            }
            task.cancel();
        }
    }
}

impl Drop for BootstrapHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::location::provider::{LocationError, UnavailableLocation};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records every request and keeps the replies for the test to answer
    #[derive(Default)]
    struct ScriptedProvider {
        requests: AtomicUsize,
        replies: Mutex<Vec<PositionReply>>,
    }

    impl LocationProvider for ScriptedProvider {
        fn request_current_position(&self, reply: PositionReply, _options: PositionOptions) {
            self.requests.fetch_add(1, Ordering::SeqCst);
            self.replies.lock().unwrap().push(reply);
        }
    }

    struct Immediate(PositionResultFn);
    type PositionResultFn = fn() -> crate::location::provider::PositionResult;

    impl LocationProvider for Immediate {
        fn request_current_position(&self, reply: PositionReply, _options: PositionOptions) {
            reply.resolve((self.0)());
        }
    }

    fn tokyo() -> LatLng {
        BootstrapConfig::default().default_center
    }

    #[tokio::test]
    async fn test_success_resolves_to_device_position() {
        let bootstrap = GeolocationBootstrap::new(
            Arc::new(Immediate(|| Ok(LatLng::new(43.0642, 141.3469)))),
            BootstrapConfig::default(),
        );
        let status = bootstrap.acquire_initial_center().await;
        assert_eq!(status, LocateStatus::Located(LatLng::new(43.0642, 141.3469)));
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let bootstrap = GeolocationBootstrap::new(
            Arc::new(Immediate(|| Err(LocationError::PermissionDenied))),
            BootstrapConfig::default(),
        );
        assert_eq!(
            bootstrap.acquire_initial_center().await,
            LocateStatus::Fallback(tokyo())
        );
    }

    #[tokio::test]
    async fn test_unavailable_falls_back_without_request() {
        let bootstrap =
            GeolocationBootstrap::new(Arc::new(UnavailableLocation), BootstrapConfig::default());
        assert_eq!(
            bootstrap.acquire_initial_center().await,
            LocateStatus::Fallback(tokyo())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_silence_times_out_to_fallback() {
        let provider = Arc::new(ScriptedProvider::default());
        let bootstrap = GeolocationBootstrap::new(provider.clone(), BootstrapConfig::default());

        let started = tokio::time::Instant::now();
        let status = bootstrap.acquire_initial_center().await;

        assert_eq!(status, LocateStatus::Fallback(tokyo()));
        assert!(started.elapsed() >= Duration::from_millis(5000));
        assert_eq!(provider.requests.load(Ordering::SeqCst), 1);

        // The device finally answering changes nothing
        let late = provider.replies.lock().unwrap()[0].clone();
        assert!(!late.succeed(LatLng::new(1.0, 1.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_reports_locating_then_resolves_once() {
        let provider = Arc::new(ScriptedProvider::default());
        let bootstrap = GeolocationBootstrap::new(provider.clone(), BootstrapConfig::default());
        let mut handle = bootstrap.mount();
        assert!(handle.is_locating());

        // Let the task issue its request
        tokio::time::sleep(Duration::from_millis(10)).await;
        let reply = provider.replies.lock().unwrap()[0].clone();
        assert!(reply.succeed(LatLng::new(35.0, 139.0)));
        assert!(!reply.fail(LocationError::Timeout));

        let status = handle.resolved().await;
        assert_eq!(status, Some(LocateStatus::Located(LatLng::new(35.0, 139.0))));
        assert_eq!(handle.status(), LocateStatus::Located(LatLng::new(35.0, 139.0)));
        assert_eq!(provider.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_answer_after_unmount_is_ignored() {
        let provider = Arc::new(ScriptedProvider::default());
        let bootstrap = GeolocationBootstrap::new(provider.clone(), BootstrapConfig::default());
        let mut handle = bootstrap.mount();

        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.unmount();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let reply = provider.replies.lock().unwrap()[0].clone();
        assert!(!reply.succeed(LatLng::new(35.0, 139.0)));
        assert_eq!(handle.status(), LocateStatus::Locating);
        assert_eq!(handle.resolved().await, None);
    }
}
