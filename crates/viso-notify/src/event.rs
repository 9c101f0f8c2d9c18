//! Samples and emitted events.

use viso_geometry::Rect;

/// One reading delivered by the intersection source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionSample {
    /// Whether the target currently meets the configured threshold.
    pub is_intersecting: bool,
    /// Visible-area ratio in [0, 1].
    pub intersection_ratio: f64,
    /// Target bounds at sample time, when the source knows them.
    pub bounding_client_rect: Option<Rect>,
    /// Monotonic timestamp in milliseconds.
    pub time: f64,
}

impl IntersectionSample {
    /// Bare sample carrying only the intersecting flag.
    pub fn flag(is_intersecting: bool) -> Self {
        Self {
            is_intersecting,
            intersection_ratio: if is_intersecting { 1.0 } else { 0.0 },
            bounding_client_rect: None,
            time: 0.0,
        }
    }
}

/// Semantic event derived from the sample stream.
#[derive(Debug, Clone, PartialEq)]
pub enum VisibilityEvent {
    /// Target entered the (margin-adjusted) root.
    Intersect {
        intersection_ratio: f64,
        bounding_client_rect: Option<Rect>,
        time: f64,
    },
    /// Target left the root. Only fires in `repeat` mode.
    Leave,
}

impl VisibilityEvent {
    /// Intersecting flag carried by the event payload.
    pub fn is_intersecting(&self) -> bool {
        matches!(self, VisibilityEvent::Intersect { .. })
    }
}
