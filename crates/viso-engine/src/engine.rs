//! Viewport intersection engine.

use std::collections::HashMap;

use viso_geometry::{Rect, RootMargin};
use viso_notify::{IntersectionSample, IntersectionSource, ObserverConfig, TargetId};

struct EngineWatch {
    root_margin: RootMargin,
    threshold: f64,
    /// Last state reported to the notifier. None until the first poll.
    last_intersecting: Option<bool>,
}

/// Computes intersection samples for registered targets against a
/// margin-adjusted viewport.
///
/// Threshold interpretation lives here: a target is intersecting when its
/// visible-area ratio meets the configured threshold (any overlap at
/// threshold 0). Samples are produced only when that state changes, plus
/// one initial sample per target on the first poll after registration.
pub struct ViewportEngine {
    viewport: Rect,
    rects: HashMap<TargetId, Rect>,
    watches: HashMap<TargetId, EngineWatch>,
}

impl ViewportEngine {
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            rects: HashMap::new(),
            watches: HashMap::new(),
        }
    }

    /// Update the viewport bounds (resize).
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Current viewport bounds.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Place or move a target's layout rect (layout/scroll update).
    pub fn set_rect(&mut self, target: TargetId, rect: Rect) {
        self.rects.insert(target, rect);
    }

    /// Drop a target's layout rect (detached from the document). The
    /// target produces no further samples until a rect is set again.
    pub fn remove_rect(&mut self, target: TargetId) {
        self.rects.remove(&target);
    }
}

impl IntersectionSource for ViewportEngine {
    fn register(&mut self, target: TargetId, config: &ObserverConfig) {
        tracing::debug!(id = target.0, "engine register");
        self.watches.insert(
            target,
            EngineWatch {
                root_margin: config.root_margin,
                threshold: config.threshold,
                last_intersecting: None,
            },
        );
    }

    fn unregister(&mut self, target: TargetId) {
        if self.watches.remove(&target).is_some() {
            tracing::debug!(id = target.0, "engine unregister");
        }
    }

    fn poll(&mut self, now: f64) -> Vec<(TargetId, IntersectionSample)> {
        let mut samples = Vec::new();

        let mut targets: Vec<TargetId> = self.watches.keys().copied().collect();
        targets.sort_by_key(|t| t.0);

        for target in targets {
            let Some(rect) = self.rects.get(&target).copied() else {
                continue;
            };
            let Some(watch) = self.watches.get_mut(&target) else {
                continue;
            };

            let ratio = {
                let root = watch.root_margin.apply_to(&self.viewport);
                match rect.intersection(&root) {
                    Some(overlap) if rect.area() > 0.0 => overlap.area() / rect.area(),
                    _ => 0.0,
                }
            };
            let intersecting = if watch.threshold == 0.0 {
                ratio > 0.0
            } else {
                ratio >= watch.threshold
            };

            if watch.last_intersecting != Some(intersecting) {
                watch.last_intersecting = Some(intersecting);
                samples.push((
                    target,
                    IntersectionSample {
                        is_intersecting: intersecting,
                        intersection_ratio: ratio,
                        bounding_client_rect: Some(rect),
                        time: now,
                    },
                ));
            }
        }

        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viso_notify::ObserverMode;

    fn config(margin: RootMargin, threshold: f64) -> ObserverConfig {
        ObserverConfig::new(margin, threshold, ObserverMode::Repeat).unwrap()
    }

    const T: TargetId = TargetId(7);

    fn viewport() -> Rect {
        Rect::from_xywh(0.0, 0.0, 800.0, 600.0)
    }

    #[test]
    fn test_ratio_full_and_partial() {
        let mut engine = ViewportEngine::new(viewport());
        engine.register(T, &config(RootMargin::default(), 0.0));

        // Fully visible.
        engine.set_rect(T, Rect::from_xywh(100.0, 100.0, 200.0, 100.0));
        let samples = engine.poll(0.0);
        assert_eq!(samples.len(), 1);
        assert!(samples[0].1.is_intersecting);
        assert_eq!(samples[0].1.intersection_ratio, 1.0);

        // Half sticking out below the fold.
        engine.set_rect(T, Rect::from_xywh(100.0, 550.0, 200.0, 100.0));
        let samples = engine.poll(1.0);
        // Still intersecting, state unchanged: no sample.
        assert!(samples.is_empty());
    }

    #[test]
    fn test_no_sample_without_state_change() {
        let mut engine = ViewportEngine::new(viewport());
        engine.register(T, &config(RootMargin::default(), 0.0));
        engine.set_rect(T, Rect::from_xywh(0.0, 0.0, 100.0, 100.0));

        assert_eq!(engine.poll(0.0).len(), 1);
        assert!(engine.poll(1.0).is_empty());
        assert!(engine.poll(2.0).is_empty());
    }

    #[test]
    fn test_threshold_gates_intersecting_flag() {
        let mut engine = ViewportEngine::new(viewport());
        engine.register(T, &config(RootMargin::default(), 0.5));

        // Only a quarter visible: overlapping, but below the 0.5 threshold.
        engine.set_rect(T, Rect::from_xywh(0.0, 575.0, 100.0, 100.0));
        let samples = engine.poll(0.0);
        assert_eq!(samples.len(), 1);
        assert!(!samples[0].1.is_intersecting);
        assert!((samples[0].1.intersection_ratio - 0.25).abs() < 1e-9);

        // Three quarters visible: meets the threshold.
        engine.set_rect(T, Rect::from_xywh(0.0, 525.0, 100.0, 100.0));
        let samples = engine.poll(1.0);
        assert_eq!(samples.len(), 1);
        assert!(samples[0].1.is_intersecting);
        assert!((samples[0].1.intersection_ratio - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_margin_expands_trigger_zone() {
        let mut engine = ViewportEngine::new(viewport());
        engine.register(T, &config(RootMargin::from_px(100.0), 0.0));

        // 50px below the viewport edge, inside the 100px margin band.
        engine.set_rect(T, Rect::from_xywh(0.0, 650.0, 100.0, 100.0));
        let samples = engine.poll(0.0);
        assert_eq!(samples.len(), 1);
        assert!(samples[0].1.is_intersecting);
    }

    #[test]
    fn test_negative_margin_delays_trigger() {
        let mut engine = ViewportEngine::new(viewport());
        engine.register(T, &config(RootMargin::from_px(-100.0), 0.0));

        // Just inside the viewport but not yet 100px deep. The target sits
        // at x=200 so only the bottom edge of the shrunk root is in play.
        engine.set_rect(T, Rect::from_xywh(200.0, 550.0, 100.0, 40.0));
        let samples = engine.poll(0.0);
        assert_eq!(samples.len(), 1);
        assert!(!samples[0].1.is_intersecting);

        // Scrolled 150px deeper: now past the shrunk edge.
        engine.set_rect(T, Rect::from_xywh(200.0, 400.0, 100.0, 40.0));
        let samples = engine.poll(1.0);
        assert_eq!(samples.len(), 1);
        assert!(samples[0].1.is_intersecting);
    }

    #[test]
    fn test_detached_target_produces_no_samples() {
        let mut engine = ViewportEngine::new(viewport());
        engine.register(T, &config(RootMargin::default(), 0.0));
        assert!(engine.poll(0.0).is_empty());

        engine.set_rect(T, Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        assert_eq!(engine.poll(1.0).len(), 1);

        engine.remove_rect(T);
        assert!(engine.poll(2.0).is_empty());
    }
}
