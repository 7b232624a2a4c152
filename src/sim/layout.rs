//! Playing field geometry
//!
//! The field is a square centered in the viewport. Every pixel size the
//! session needs (target radius, cursor hitbox, spawn disk) is derived from
//! half the field edge, so the whole layout is recomputed from scratch
//! whenever the viewport or one of the size settings changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Pixel geometry of the playing field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldLayout {
    /// Edge length of the square field
    pub field_size: f32,
    pub half_field: f32,
    /// Top-left corner in viewport coordinates
    pub field_tl: Vec2,
    /// Bottom-right corner in viewport coordinates
    pub field_br: Vec2,
    pub center: Vec2,
    pub target_radius_px: f32,
    pub cursor_radius_px: f32,
    /// Largest distance from center a target center may spawn at
    pub spawn_max_radius: f32,
}

impl FieldLayout {
    /// Compute the layout for a viewport.
    ///
    /// Returns `None` when either viewport dimension is not positive; callers
    /// must not spawn or hit-test until a layout exists.
    pub fn compute(
        viewport_w: f32,
        viewport_h: f32,
        scale: f32,
        target_radius_frac: f32,
        cursor_radius_frac: f32,
    ) -> Option<Self> {
        if viewport_w <= 0.0 || viewport_h <= 0.0 {
            return None;
        }

        let field_size = viewport_w.min(viewport_h) * scale;
        let half_field = field_size * 0.5;
        let field_tl = Vec2::new(
            (viewport_w - field_size) * 0.5,
            (viewport_h - field_size) * 0.5,
        );
        let field_br = field_tl + Vec2::splat(field_size);
        let center = field_tl + Vec2::splat(half_field);
        let target_radius_px = target_radius_frac * half_field;

        Some(Self {
            field_size,
            half_field,
            field_tl,
            field_br,
            center,
            target_radius_px,
            cursor_radius_px: cursor_radius_frac * half_field,
            spawn_max_radius: (half_field - target_radius_px).max(0.0),
        })
    }

    /// Distance at which a cursor counts as touching a target
    #[inline]
    pub fn hit_radius(&self) -> f32 {
        self.target_radius_px + self.cursor_radius_px
    }

    /// True if a click at `cursor` lands on a target centered at `target`
    pub fn is_hit(&self, cursor: Vec2, target: Vec2) -> bool {
        crate::circles_touch(cursor, target, self.hit_radius())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_invalid_viewport() {
        assert!(FieldLayout::compute(0.0, 600.0, 0.9, 0.1, 0.01).is_none());
        assert!(FieldLayout::compute(800.0, -1.0, 0.9, 0.1, 0.01).is_none());
    }

    #[test]
    fn test_landscape_layout() {
        let layout = FieldLayout::compute(800.0, 600.0, 0.5, 0.1, 0.02).unwrap();
        assert_eq!(layout.field_size, 300.0);
        assert_eq!(layout.half_field, 150.0);
        assert_eq!(layout.field_tl, Vec2::new(250.0, 150.0));
        assert_eq!(layout.field_br, Vec2::new(550.0, 450.0));
        assert_eq!(layout.center, Vec2::new(400.0, 300.0));
        assert!((layout.target_radius_px - 15.0).abs() < 1e-4);
        assert!((layout.cursor_radius_px - 3.0).abs() < 1e-4);
        assert!((layout.spawn_max_radius - 135.0).abs() < 1e-4);
    }

    #[test]
    fn test_oversized_target_clamps_spawn_radius() {
        let layout = FieldLayout::compute(400.0, 400.0, 1.0, 1.5, 0.0).unwrap();
        assert_eq!(layout.spawn_max_radius, 0.0);
    }

    #[test]
    fn test_hit_radius_includes_cursor() {
        let layout = FieldLayout::compute(200.0, 200.0, 1.0, 0.1, 0.05).unwrap();
        // target 10px + cursor 5px
        assert!(layout.is_hit(Vec2::new(115.0, 100.0), layout.center));
        assert!(!layout.is_hit(Vec2::new(115.5, 100.0), layout.center));
    }

    proptest! {
        #[test]
        fn prop_layout_invariants(
            w in 1.0f32..4000.0,
            h in 1.0f32..4000.0,
            scale in 0.01f32..=1.0,
            target_frac in 0.0f32..2.0,
            cursor_frac in 0.0f32..1.0,
        ) {
            let layout = FieldLayout::compute(w, h, scale, target_frac, cursor_frac).unwrap();
            prop_assert!(layout.field_size <= w.min(h) + 1e-3);
            prop_assert!(layout.spawn_max_radius >= 0.0);
            prop_assert!((layout.field_tl.x - (w / 2.0 - layout.field_size / 2.0)).abs() < 1e-2);
            prop_assert!((layout.field_tl.y - (h / 2.0 - layout.field_size / 2.0)).abs() < 1e-2);
        }
    }
}
