//! Flicks - a flick aim trainer
//!
//! Core modules:
//! - `sim`: Deterministic session logic (layout, placement, scheduling, scoring)
//! - `settings`: Player settings, presets and the settings store
//! - `history`: Persisted per-session summaries and aggregate statistics
//! - `input`: Pointer delta accumulation and the input source boundary
//! - `renderer` / `audio`: Presentation boundaries
//! - `app`: Host loop gluing the core to its capabilities
//! - `bot`: Auto-player used by the headless runner

pub mod app;
pub mod audio;
pub mod bot;
pub mod error;
pub mod history;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::StoreError;
pub use history::{History, HistoryStats, HistorySummary};
pub use settings::{Preset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Rejection-sampling bound for target placement
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 50;

    /// Tolerance when comparing persisted radius fractions
    pub const SETTINGS_EPS: f32 = 0.001;

    /// Milliseconds per score-history sample
    pub const SAMPLE_INTERVAL_MS: u64 = 1000;

    /// Default simulated frame rate for the headless runner
    pub const DEFAULT_FPS: u32 = 240;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// True if two circles of the given radii touch or overlap
#[inline]
pub fn circles_touch(a: Vec2, b: Vec2, radius_sum: f32) -> bool {
    a.distance_squared(b) <= radius_sum * radius_sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(2.0, std::f32::consts::FRAC_PI_2);
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_circles_touch_boundary() {
        let a = Vec2::new(0.0, 0.0);
        assert!(circles_touch(a, Vec2::new(3.0, 4.0), 5.0));
        assert!(!circles_touch(a, Vec2::new(3.0, 4.1), 5.0));
    }
}
