//! Root margin
//!
//! CSS margin-shorthand parsing and viewport expansion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Rect;

/// Root margin parse failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarginParseError {
    #[error("empty root margin")]
    Empty,
    #[error("invalid margin component `{0}`")]
    Component(String),
    #[error("expected 1 to 4 margin components, got {0}")]
    ComponentCount(usize),
}

/// One edge of a root margin, pixels or a percentage of the root size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginValue {
    Px(f64),
    Percent(f64),
}

impl MarginValue {
    /// Resolve to pixels against a reference dimension.
    pub fn to_px(&self, reference: f64) -> f64 {
        match self {
            MarginValue::Px(px) => *px,
            MarginValue::Percent(pct) => reference * pct / 100.0,
        }
    }
}

impl FromStr for MarginValue {
    type Err = MarginParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = if let Some(pct) = s.strip_suffix('%') {
            pct.parse::<f64>().ok().map(MarginValue::Percent)
        } else if let Some(px) = s.strip_suffix("px") {
            px.parse::<f64>().ok().map(MarginValue::Px)
        } else {
            // Bare numbers are pixels, matching numeric margin properties.
            s.parse::<f64>().ok().map(MarginValue::Px)
        };

        match parsed {
            Some(v) if v.to_px(1.0).is_finite() => Ok(v),
            _ => Err(MarginParseError::Component(s.to_string())),
        }
    }
}

impl fmt::Display for MarginValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarginValue::Px(px) => write!(f, "{px}px"),
            MarginValue::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// Per-edge offsets applied to the root bounds before intersection is
/// computed. Positive values grow the root, negative values shrink it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootMargin {
    pub top: MarginValue,
    pub right: MarginValue,
    pub bottom: MarginValue,
    pub left: MarginValue,
}

impl RootMargin {
    /// Same value on all four edges.
    pub fn all(value: MarginValue) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Uniform pixel margin.
    pub fn from_px(px: f64) -> Self {
        Self::all(MarginValue::Px(px))
    }

    /// Parse CSS margin shorthand: 1, 2, 3 or 4 components.
    pub fn parse(s: &str) -> Result<Self, MarginParseError> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        match parts.as_slice() {
            [] => Err(MarginParseError::Empty),
            [all] => Ok(Self::all(all.parse()?)),
            [vertical, horizontal] => {
                let v: MarginValue = vertical.parse()?;
                let h: MarginValue = horizontal.parse()?;
                Ok(Self {
                    top: v,
                    right: h,
                    bottom: v,
                    left: h,
                })
            }
            [top, horizontal, bottom] => {
                let h: MarginValue = horizontal.parse()?;
                Ok(Self {
                    top: top.parse()?,
                    right: h,
                    bottom: bottom.parse()?,
                    left: h,
                })
            }
            [top, right, bottom, left] => Ok(Self {
                top: top.parse()?,
                right: right.parse()?,
                bottom: bottom.parse()?,
                left: left.parse()?,
            }),
            parts => Err(MarginParseError::ComponentCount(parts.len())),
        }
    }

    /// Expand (or shrink, for negative edges) the root bounds.
    ///
    /// Percentages resolve against the root's own dimensions: top/bottom
    /// against height, left/right against width.
    pub fn apply_to(&self, root: &Rect) -> Rect {
        let top = self.top.to_px(root.height);
        let right = self.right.to_px(root.width);
        let bottom = self.bottom.to_px(root.height);
        let left = self.left.to_px(root.width);

        Rect::from_xywh(
            root.x - left,
            root.y - top,
            root.width + left + right,
            root.height + top + bottom,
        )
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::from_px(0.0)
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}
