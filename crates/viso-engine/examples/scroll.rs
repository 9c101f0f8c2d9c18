//! Simulated scroll session printing intersect/leave events.
//!
//! Run with `cargo run --example scroll`.

use viso_engine::{ViewportEngine, ViewportNotifier};
use viso_geometry::{Rect, RootMargin};
use viso_notify::{ObserverConfig, ObserverMode, TargetId, VisibilityEvent};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let engine = ViewportEngine::new(Rect::from_xywh(0.0, 0.0, 800.0, 600.0));
    let mut notifier = ViewportNotifier::new(engine);

    let target = TargetId(1);
    let config = ObserverConfig::new(RootMargin::from_px(100.0), 0.0, ObserverMode::Repeat)
        .expect("valid config");

    notifier
        .observe(
            target,
            config,
            Box::new(|target, event| match event {
                VisibilityEvent::Intersect {
                    intersection_ratio, ..
                } => println!("target {} intersect (ratio {intersection_ratio:.2})", target.0),
                VisibilityEvent::Leave => println!("target {} leave", target.0),
            }),
        )
        .expect("observe");

    // The target lives at y=1200 in the document; scroll past it and back.
    let doc_y = 1200.0;
    for (frame, scroll_y) in [0.0, 300.0, 700.0, 1100.0, 300.0, 0.0].into_iter().enumerate() {
        notifier
            .source_mut()
            .set_rect(target, Rect::from_xywh(100.0, doc_y - scroll_y, 200.0, 150.0));
        notifier.poll(frame as f64 * 16.0);
    }
}
