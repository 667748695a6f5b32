use bevy::prelude::Vec3;

/// Width and height of an object's local-space bounding box.
///
/// Measured before any scale or translation is applied to the object. Zero
/// in either axis means there is nothing to frame (empty geometry, a font
/// that never loaded, a model that failed to import).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingExtent {
    pub width: f32,
    pub height: f32,
}

impl BoundingExtent {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    /// Extent of the box spanned by `min` and `max` on the X/Y plane.
    ///
    /// Inverted corners (an empty box) collapse to zero instead of going
    /// negative.
    pub fn from_corners(min: Vec3, max: Vec3) -> Self {
        let size = max - min;
        Self::new(size.x, size.y)
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn scaled(&self, scale: f32) -> Self {
        Self::new(self.width * scale, self.height * scale)
    }
}

/// Non-finite sizes carry no usable geometry and count as empty.
fn sanitize(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
