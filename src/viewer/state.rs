use crate::framing::{BoundingExtent, FitResult};
use bevy::math::Affine3A;
use bevy::prelude::*;

/// Axis-aligned bounds in the content root's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for LocalBounds {
    fn default() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }
}

impl LocalBounds {
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grows the bounds by a box given in some child space, `to_local` maps
    /// that space into the root's.
    pub fn include_box(&mut self, min: Vec3, max: Vec3, to_local: &Affine3A) {
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            );
            self.include_point(to_local.transform_point3(corner));
        }
    }

    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    pub fn extent(&self) -> BoundingExtent {
        BoundingExtent::from_corners(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContentPhase {
    /// Spawned, waiting for assets or for bounds to be computed.
    Pending { frames_waited: u32 },
    Measured(LocalBounds),
    /// Load failed or nothing measurable showed up.
    Missing,
}

#[derive(Resource)]
pub struct FramingState {
    pub root: Option<Entity>,
    pub scene: Option<Handle<Scene>>,
    pub phase: ContentPhase,
    pub needs_fit: bool,
    pub fallback: Option<Entity>,
    pub last_fit: Option<FitResult>,
    pub status: String,
}

impl Default for FramingState {
    fn default() -> Self {
        Self {
            root: None,
            scene: None,
            phase: ContentPhase::Pending { frames_waited: 0 },
            needs_fit: false,
            fallback: None,
            last_fit: None,
            status: "Loading content".to_string(),
        }
    }
}

impl FramingState {
    pub fn bounds(&self) -> Option<&LocalBounds> {
        match &self.phase {
            ContentPhase::Measured(bounds) => Some(bounds),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, ContentPhase::Pending { .. })
    }
}
