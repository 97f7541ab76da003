use bevy_ecs::prelude::Component;

/// Fallback edge length for entities that carry no explicit size.
pub const DEFAULT_OBJECT_SIZE: f32 = 32.0;

/// Axis-aligned rectangle anchored at the entity's [`MapPosition`](super::mapposition::MapPosition).
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub width: f32,
    pub height: f32,
}

impl Default for BoxCollider {
    fn default() -> Self {
        Self::new(DEFAULT_OBJECT_SIZE, DEFAULT_OBJECT_SIZE)
    }
}

impl BoxCollider {
    /// Create a BoxCollider with given size
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns `(min_x, min_y, max_x, max_y)` for a collider placed at `(x, y)`.
    /// Handles negative size by normalizing to proper min/max.
    pub fn aabb(&self, x: f32, y: f32) -> (f32, f32, f32, f32) {
        let (x1, y1) = (x + self.width, y + self.height);
        (x.min(x1), y.min(y1), x.max(x1), y.max(y1))
    }

    /// AABB vs AABB overlap test against another collider at a different position.
    /// Touching edges do not count as overlap.
    pub fn overlaps(&self, x: f32, y: f32, other: &Self, other_x: f32, other_y: f32) -> bool {
        let (min_ax, min_ay, max_ax, max_ay) = self.aabb(x, y);
        let (min_bx, min_by, max_bx, max_by) = other.aabb(other_x, other_y);
        min_ax < max_bx && max_ax > min_bx && min_ay < max_by && max_ay > min_by
    }

    /// Point containment in world space, edges inclusive.
    pub fn contains_point(&self, x: f32, y: f32, px: f32, py: f32) -> bool {
        let (min_x, min_y, max_x, max_y) = self.aabb(x, y);
        px >= min_x && px <= max_x && py >= min_y && py <= max_y
    }
}
