//! Observer configuration
//!
//! Validated, immutable input to `observe`. Unifies the upstream schema
//! variants (numeric pixel margin vs. CSS shorthand string) behind one
//! config type; the firing mode is a required field since the variants
//! disagreed on its default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use viso_geometry::RootMargin;

use crate::ConfigError;

/// Firing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObserverMode {
    /// Tear down after the first `intersect`; `leave` never fires.
    Once,
    /// Fire `intersect` / `leave` on every visibility transition.
    Repeat,
}

impl FromStr for ObserverMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "once" => Ok(ObserverMode::Once),
            "repeat" => Ok(ObserverMode::Repeat),
            other => Err(ConfigError::Mode(other.to_string())),
        }
    }
}

impl fmt::Display for ObserverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObserverMode::Once => write!(f, "once"),
            ObserverMode::Repeat => write!(f, "repeat"),
        }
    }
}

/// Root margin as it arrives from declarative configuration: either a
/// bare pixel offset or a CSS margin shorthand string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarginSpec {
    Px(f64),
    Css(String),
}

impl MarginSpec {
    /// Resolve to per-edge margin values.
    pub fn resolve(&self) -> Result<RootMargin, ConfigError> {
        match self {
            MarginSpec::Px(px) if px.is_finite() => Ok(RootMargin::from_px(*px)),
            MarginSpec::Px(px) => Err(ConfigError::Margin(
                viso_geometry::MarginParseError::Component(px.to_string()),
            )),
            MarginSpec::Css(s) => Ok(RootMargin::parse(s)?),
        }
    }
}

/// Validated observer configuration.
///
/// Deserialization funnels through [`ObserverConfig::new`], so the
/// threshold invariant holds on every construction path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawObserverConfig")]
pub struct ObserverConfig {
    pub root_margin: RootMargin,
    pub threshold: f64,
    pub mode: ObserverMode,
}

/// Unvalidated wire form of [`ObserverConfig`].
#[derive(Deserialize)]
struct RawObserverConfig {
    root_margin: RootMargin,
    threshold: f64,
    mode: ObserverMode,
}

impl TryFrom<RawObserverConfig> for ObserverConfig {
    type Error = ConfigError;

    fn try_from(raw: RawObserverConfig) -> Result<Self, Self::Error> {
        Self::new(raw.root_margin, raw.threshold, raw.mode)
    }
}

impl ObserverConfig {
    /// Build a config, validating the threshold range.
    pub fn new(
        root_margin: RootMargin,
        threshold: f64,
        mode: ObserverMode,
    ) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&threshold) || !threshold.is_finite() {
            return Err(ConfigError::Threshold(threshold));
        }
        Ok(Self {
            root_margin,
            threshold,
            mode,
        })
    }

    /// Build from raw declarative properties (margin spec, threshold,
    /// mode string), failing fast on any malformed field.
    pub fn from_spec(margin: MarginSpec, threshold: f64, mode: &str) -> Result<Self, ConfigError> {
        Self::new(margin.resolve()?, threshold, mode.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viso_geometry::MarginValue;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("once".parse::<ObserverMode>().unwrap(), ObserverMode::Once);
        assert_eq!(
            "repeat".parse::<ObserverMode>().unwrap(),
            ObserverMode::Repeat
        );
        assert!(matches!(
            "always".parse::<ObserverMode>(),
            Err(ConfigError::Mode(_))
        ));
    }

    #[test]
    fn test_threshold_range() {
        let margin = RootMargin::default();
        assert!(ObserverConfig::new(margin, 0.0, ObserverMode::Repeat).is_ok());
        assert!(ObserverConfig::new(margin, 1.0, ObserverMode::Once).is_ok());
        assert!(matches!(
            ObserverConfig::new(margin, 1.5, ObserverMode::Repeat),
            Err(ConfigError::Threshold(_))
        ));
        assert!(matches!(
            ObserverConfig::new(margin, -0.1, ObserverMode::Repeat),
            Err(ConfigError::Threshold(_))
        ));
        assert!(matches!(
            ObserverConfig::new(margin, f64::NAN, ObserverMode::Repeat),
            Err(ConfigError::Threshold(_))
        ));
    }

    #[test]
    fn test_from_spec_numeric_margin() {
        let config = ObserverConfig::from_spec(MarginSpec::Px(-100.0), 0.5, "once").unwrap();
        assert_eq!(config.root_margin.top, MarginValue::Px(-100.0));
        assert_eq!(config.mode, ObserverMode::Once);
    }

    #[test]
    fn test_from_spec_css_margin() {
        let config =
            ObserverConfig::from_spec(MarginSpec::Css("10px 5%".into()), 0.0, "repeat").unwrap();
        assert_eq!(config.root_margin.right, MarginValue::Percent(5.0));
    }

    #[test]
    fn test_from_spec_rejects_malformed_margin() {
        assert!(matches!(
            ObserverConfig::from_spec(MarginSpec::Css("abc".into()), 0.0, "repeat"),
            Err(ConfigError::Margin(_))
        ));
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_threshold() {
        let valid = serde_json::to_string(
            &ObserverConfig::new(RootMargin::default(), 0.5, ObserverMode::Repeat).unwrap(),
        )
        .unwrap();
        let config: ObserverConfig = serde_json::from_str(&valid).unwrap();
        assert_eq!(config.threshold, 0.5);

        // Same document with a threshold the constructor would refuse.
        let tampered = valid.replace("0.5", "5.0");
        assert!(serde_json::from_str::<ObserverConfig>(&tampered).is_err());
    }

    #[test]
    fn test_margin_spec_deserializes_both_variants() {
        let px: MarginSpec = serde_json::from_str("-100").unwrap();
        assert_eq!(px, MarginSpec::Px(-100.0));

        let css: MarginSpec = serde_json::from_str("\"10px 20px\"").unwrap();
        assert_eq!(css, MarginSpec::Css("10px 20px".into()));
    }
}
