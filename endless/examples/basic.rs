// Example: index mapping, window growth and current-item detection without any UI.
use endless::{
    Axis, DetectionPolicy, IndexMapper, LoadDirection, LoaderOptions, Rect, Viewport,
    ViewportTracker, WindowLoader,
};

fn main() {
    let mapper = IndexMapper::centered(100_000_000);
    println!(
        "anchor={} slot(-3)={} index(slot 50_000_010)={}",
        mapper.anchor(),
        mapper.physical_slot(-3),
        mapper.logical_index(50_000_010)
    );

    let mut loader = WindowLoader::new(LoaderOptions::default());
    println!("seeded window={:?}", loader.window());

    // 350px from the top: the start edge is inside the 400px buffer.
    let chunk = loader
        .notify_scroll_position(350.0, 3_650.0)
        .expect("consecutive chunks never fail")
        .expect("a backward chunk is due");
    println!("loaded {chunk:?}, window={:?}", loader.window());

    // The container applies the chunk here, then the loader is released.
    loader.finish(chunk);
    let offset = WindowLoader::<endless::ConsecutiveChunks>::corrected_offset(350.0, 4_800.0, 6_000.0);
    println!("corrected offset={offset}, anchor={}", loader.anchor());

    let chunk = loader.load(LoadDirection::Forward).expect("infallible").expect("idle");
    loader.finish(chunk);
    println!("after forward load: window={:?}", loader.window());

    let mut tracker = ViewportTracker::new(DetectionPolicy::default(), Axis::Vertical);
    let frame = Rect::new(0.0, 0.0, 390.0, 800.0);
    let viewports = (15..24).map(|slot| Viewport {
        slot,
        rect: Rect::new(0.0, (slot as f64 - 15.0) * 100.0 - 50.0, 390.0, 100.0),
    });
    let mapper = loader.mapper();
    let current = tracker.resolve(frame, viewports, |slot| mapper.logical_index(slot));
    println!("current={current:?}");
}
