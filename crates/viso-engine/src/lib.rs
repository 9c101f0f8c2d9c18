//! Viso Engine
//!
//! A headless intersection source: tracks a viewport and per-target layout
//! rects, and reports threshold crossings as samples for the notifier.
//! Stands in for the platform intersection primitive in hosts that manage
//! layout themselves.

mod engine;

pub use engine::ViewportEngine;

use viso_notify::Notifier;

/// Notifier wired to the built-in engine.
pub type ViewportNotifier = Notifier<ViewportEngine>;
