use thiserror::Error;

/// Reasons a framing computation cannot produce a result.
///
/// Every variant is recoverable: the caller picks a fallback scale or
/// placement and keeps rendering.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("content has no visible extent ({width} x {height})")]
    DegenerateGeometry { width: f32, height: f32 },
    #[error("invalid camera projection: {0}")]
    InvalidProjection(String),
    #[error("invalid camera placement: {0}")]
    InvalidPlacement(String),
    #[error("target fraction {0} must be in (0, 1]")]
    InvalidTargetFraction(f32),
    #[error("safety margin {0} must be a finite value >= 1")]
    InvalidSafetyMargin(f32),
    #[error("fit is not representable: {0}")]
    OutOfRange(String),
}

impl FitError {
    pub fn is_degenerate_geometry(&self) -> bool {
        matches!(self, Self::DegenerateGeometry { .. })
    }
}
