use pinmap::prelude::*;
use std::sync::Mutex;

/// Pretend device that answers after a short GPS warm-up
struct SimulatedGps;

#[async_trait::async_trait]
impl PositionSource for SimulatedGps {
    async fn current_position(
        &self,
        _options: PositionOptions,
    ) -> std::result::Result<LatLng, LocationError> {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok(LatLng::new(34.6937, 135.5023)) // Osaka
    }
}

/// Example of driving a pinmap session without any renderer
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    println!("🗺️ Pinmap Headless Example");
    println!("==========================");

    let options = PinmapOptions::default();

    // Locate the device, falling back to Tokyo Station
    let provider = Arc::new(SpawnedPositionProvider::new(SimulatedGps));
    let mut bootstrap = GeolocationBootstrap::new(provider, options.bootstrap.clone()).mount();
    println!("⏳ Locating...");
    let status = bootstrap
        .resolved()
        .await
        .ok_or_else(|| anyhow::anyhow!("bootstrap was unmounted"))?;
    let center = status
        .center()
        .ok_or_else(|| anyhow::anyhow!("bootstrap resolved without a center"))?;
    println!("✅ Initial center: {:?}", status);

    let map = HeadlessMap::shared(center, options.bootstrap.initial_zoom, Point::new(1024.0, 768.0));

    let posts: PostCollection = [
        Post::new(1, center.offset(0.001, 0.0), "takoyaki.jpg", "Street food"),
        Post::new(2, center.offset(-0.002, 0.003), "castle.jpg", ""),
    ]
    .into_iter()
    .collect();

    let overlay = Arc::new(Mutex::new(DetailOverlay::new(options.overlay.clone())));
    let view = overlay.clone();
    let callbacks = SessionCallbacks::default()
        .with_pin_activated(Arc::new(|post: &Arc<Post>, pixel| {
            println!("   📍 Pin {} clicked at ({:.1}, {:.1})", post.id(), pixel.x, pixel.y);
        }))
        .with_anchor_updated(Arc::new(move |update| {
            if let Ok(mut overlay) = view.lock() {
                overlay.apply_anchor(&update);
            }
        }));

    let session = MapSession::mount(map.clone(), posts, &options, callbacks);
    println!("✅ Session mounted with {} pins", session.pin_count());

    // Click the first pin, just above its coordinate
    let first = session
        .posts()
        .get(PostId(1))
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("post 1 missing"))?;
    if let Ok(mut overlay) = overlay.lock() {
        overlay.open(first.clone(), None);
    }
    let pixel = map.project(first.position());
    map.handle_input(InputEvent::Click {
        position: Point::new(pixel.x, pixel.y - 10.0),
    })?;

    println!("\n🚀 Flying:");
    while map.tick(Duration::from_millis(250)) {
        let placement = overlay
            .lock()
            .ok()
            .and_then(|overlay| overlay.placement(Point::new(240.0, 160.0)));
        println!("   center {:?} -> overlay {:?}", map.center(), placement);
    }

    println!("\n🖐️ Dragging and zooming:");
    map.handle_input(InputEvent::Drag {
        delta: Point::new(-120.0, 40.0),
    })?;
    map.handle_input(InputEvent::Scroll {
        delta: 1.0,
        position: Point::new(512.0, 384.0),
    })?;
    if let Ok(overlay) = overlay.lock() {
        println!("   overlay anchor now {:?}", overlay.anchor());
    }

    // Backdrop click dismisses
    let dismissed = overlay
        .lock()
        .map(|mut overlay| overlay.handle_click(OverlayClick::Backdrop))
        .unwrap_or(false);
    if dismissed {
        session.clear_selection();
    }
    println!("\n✅ Dismissed; {} listeners left on the map", map.total_listeners());

    session.unmount();
    Ok(())
}
