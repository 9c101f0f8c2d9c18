//! The notifier core
//!
//! Per-target state machine turning raw intersection samples into
//! `intersect` / `leave` events.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{IntersectionSample, ObserveError, ObserverConfig, ObserverMode, TargetId, VisibilityEvent};

/// Platform intersection primitive.
///
/// The source owns threshold interpretation: the `is_intersecting` flag on
/// each sample is taken as-is, the notifier never recomputes ratio against
/// threshold.
pub trait IntersectionSource {
    /// Whether the primitive exists in this environment. `observe` fails
    /// with [`ObserveError::Unsupported`] when this is false.
    fn is_available(&self) -> bool {
        true
    }

    /// Start producing samples for a target.
    fn register(&mut self, target: TargetId, config: &ObserverConfig);

    /// Stop producing samples for a target.
    fn unregister(&mut self, target: TargetId);

    /// Drain pending samples, in delivery order.
    fn poll(&mut self, now: f64) -> Vec<(TargetId, IntersectionSample)>;
}

/// Event callback, invoked synchronously during sample delivery.
pub type EventCallback = Box<dyn FnMut(TargetId, &VisibilityEvent)>;

struct Watch {
    config: ObserverConfig,
    has_fired: bool,
    last_is_intersecting: Option<bool>,
    cancelled: Rc<Cell<bool>>,
    callback: EventCallback,
}

/// Handle returned by [`Notifier::observe`].
///
/// `cancel` flips a flag shared with the watch; the notifier checks it
/// before every dispatch, so samples already queued when `cancel` runs are
/// suppressed rather than delivered.
#[derive(Debug)]
pub struct Subscription {
    target: TargetId,
    cancelled: Rc<Cell<bool>>,
}

impl Subscription {
    /// Stop observation. Idempotent; safe to call from inside an event
    /// callback. A no-op after once-mode teardown.
    pub fn cancel(&self) {
        if !self.cancelled.replace(true) {
            tracing::debug!(id = self.target.0, "subscription cancelled");
        }
    }

    /// Whether observation is still live.
    pub fn is_active(&self) -> bool {
        !self.cancelled.get()
    }

    /// The observed target.
    pub fn target(&self) -> TargetId {
        self.target
    }
}

/// Visibility Notifier over an intersection source.
///
/// Single-threaded and callback-driven: the host drives [`Notifier::poll`]
/// (or feeds samples directly via [`Notifier::deliver`]) and events fire
/// synchronously within that call. Targets are fully independent.
pub struct Notifier<S: IntersectionSource> {
    source: S,
    watches: HashMap<TargetId, Watch>,
}

impl<S: IntersectionSource> Notifier<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            watches: HashMap::new(),
        }
    }

    /// Begin watching a target. No event is emitted before the first
    /// sample arrives from the source.
    pub fn observe(
        &mut self,
        target: TargetId,
        config: ObserverConfig,
        callback: EventCallback,
    ) -> Result<Subscription, ObserveError> {
        if !self.source.is_available() {
            return Err(ObserveError::Unsupported);
        }

        self.source.register(target, &config);
        let cancelled = Rc::new(Cell::new(false));
        tracing::debug!(
            id = target.0,
            threshold = config.threshold,
            mode = %config.mode,
            "observe"
        );

        // Re-observing a target replaces the previous watch.
        if let Some(old) = self.watches.insert(
            target,
            Watch {
                config,
                has_fired: false,
                last_is_intersecting: None,
                cancelled: Rc::clone(&cancelled),
                callback,
            },
        ) {
            old.cancelled.set(true);
        }

        Ok(Subscription { target, cancelled })
    }

    /// Stop watching a target immediately (host-side detachment).
    pub fn unobserve(&mut self, target: TargetId) {
        if let Some(watch) = self.watches.remove(&target) {
            watch.cancelled.set(true);
            self.source.unregister(target);
            tracing::debug!(id = target.0, "unobserve");
        }
    }

    /// Stop watching all targets.
    pub fn disconnect(&mut self) {
        for (target, watch) in self.watches.drain() {
            watch.cancelled.set(true);
            self.source.unregister(target);
        }
        tracing::debug!("disconnect");
    }

    /// Whether a live watch exists for the target.
    pub fn is_observing(&self, target: TargetId) -> bool {
        self.watches
            .get(&target)
            .is_some_and(|w| !w.cancelled.get())
    }

    /// Drain the source and dispatch every pending sample.
    pub fn poll(&mut self, now: f64) {
        for (target, sample) in self.source.poll(now) {
            self.deliver(target, &sample);
        }
    }

    /// Run the state machine for one sample.
    ///
    /// The very first sample establishes the baseline: a target already
    /// intersecting at observation start fires `intersect` immediately.
    pub fn deliver(&mut self, target: TargetId, sample: &IntersectionSample) {
        let mut done = false;

        if let Some(watch) = self.watches.get_mut(&target) {
            if watch.cancelled.get() {
                done = true;
            } else {
                let repeat = watch.config.mode == ObserverMode::Repeat;

                if sample.is_intersecting
                    && watch.last_is_intersecting != Some(true)
                    && (repeat || !watch.has_fired)
                {
                    watch.has_fired = true;
                    let event = VisibilityEvent::Intersect {
                        intersection_ratio: sample.intersection_ratio,
                        bounding_client_rect: sample.bounding_client_rect,
                        time: sample.time,
                    };
                    tracing::trace!(id = target.0, ratio = sample.intersection_ratio, "intersect");
                    (watch.callback)(target, &event);
                } else if !sample.is_intersecting
                    && watch.last_is_intersecting == Some(true)
                    && repeat
                {
                    tracing::trace!(id = target.0, "leave");
                    (watch.callback)(target, &VisibilityEvent::Leave);
                }

                watch.last_is_intersecting = Some(sample.is_intersecting);

                // Once-mode terminal state: tear down after the fire.
                if watch.config.mode == ObserverMode::Once && watch.has_fired {
                    watch.cancelled.set(true);
                    done = true;
                    tracing::debug!(id = target.0, "once-mode teardown");
                }
            }
        }

        if done {
            self.watches.remove(&target);
            self.source.unregister(target);
        }
    }

    /// Access the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the underlying source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
