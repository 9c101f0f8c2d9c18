//! Viso Notify - Visibility Notifier
//!
//! Wraps an intersection source and translates its raw sample stream into
//! de-duplicated `intersect` / `leave` events under a configurable firing
//! policy (`once` or `repeat`).

mod config;
mod error;
mod event;
mod notifier;

pub use config::{MarginSpec, ObserverConfig, ObserverMode};
pub use error::{ConfigError, ObserveError};
pub use event::{IntersectionSample, VisibilityEvent};
pub use notifier::{EventCallback, IntersectionSource, Notifier, Subscription};

/// Observed target identifier (opaque handle supplied by the host).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub u32);
