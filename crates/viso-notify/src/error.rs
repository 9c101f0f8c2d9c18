//! Notifier errors.

use viso_geometry::MarginParseError;

/// Invalid observer configuration. Raised at config construction; no
/// observation begins.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid root margin: {0}")]
    Margin(#[from] MarginParseError),
    #[error("threshold {0} outside [0, 1]")]
    Threshold(f64),
    #[error("unknown observer mode `{0}`, expected `once` or `repeat`")]
    Mode(String),
}

/// `observe` failure. Deterministic precondition failures, never raised
/// mid-observation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObserveError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("intersection source is not available in this environment")]
    Unsupported,
}
