//! Player settings and presets
//!
//! Persisted as JSON next to the session history.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// RGBA color, components in 0.0 - 1.0
pub type Color = [f32; 4];

/// Named drill presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Big ball, 250 ms, timed
    Bb250,
    /// Big ball, 250 ms, 60 targets with random gaps
    RandBb250,
    /// Reaction time drill, 80 targets
    Rtda225,
    Bb230,
    Tda200,
    /// Slow precise flicks, 10 targets
    PrFlick,
    /// Small ball, 270 ms
    Sb270,
    /// Tiny target, 500 ms
    OneWideOneThin500,
    RandSb270,
}

impl Preset {
    pub const ALL: [Preset; 9] = [
        Preset::Bb250,
        Preset::RandBb250,
        Preset::Rtda225,
        Preset::Bb230,
        Preset::Tda200,
        Preset::PrFlick,
        Preset::Sb270,
        Preset::OneWideOneThin500,
        Preset::RandSb270,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Bb250 => "BB250ms",
            Preset::RandBb250 => "randBB250ms",
            Preset::Rtda225 => "RTDA225ms",
            Preset::Bb230 => "BB230ms",
            Preset::Tda200 => "TDA200ms",
            Preset::PrFlick => "PRflick",
            Preset::Sb270 => "SB270ms",
            Preset::OneWideOneThin500 => "1w1t500ms",
            Preset::RandSb270 => "randSB270ms",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
    }

    /// (target radius frac, lifetime ms, game time s, by count, max spawns, min delay, max delay)
    fn params(&self) -> (f32, u32, u32, bool, u32, u32, u32) {
        match self {
            Preset::Bb250 => (0.112, 250, 60, false, 10, 0, 0),
            Preset::RandBb250 => (0.112, 250, 60, true, 60, 0, 1200),
            Preset::Rtda225 => (0.112, 225, 60, true, 80, 200, 500),
            Preset::Bb230 => (0.120, 230, 30, false, 10, 0, 0),
            Preset::Tda200 => (0.120, 200, 60, false, 10, 500, 500),
            Preset::PrFlick => (0.125, 2000, 60, true, 10, 500, 3000),
            Preset::Sb270 => (0.065, 270, 60, false, 10, 0, 0),
            Preset::OneWideOneThin500 => (0.035, 500, 60, false, 10, 0, 0),
            Preset::RandSb270 => (0.065, 270, 60, true, 60, 0, 1200),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Colors ===
    pub bg_color: Color,
    pub field_color: Color,
    pub target_color: Color,
    pub cursor_color: Color,
    pub cursor_outline_color: Color,
    /// Outline width of the custom cursor, in pixels
    pub cursor_thickness: f32,
    /// Draw our own cursor instead of the system arrow
    pub use_custom_cursor: bool,

    // === Sizes ===
    /// Field edge as a fraction of the shorter viewport side
    pub scale: f32,
    /// Target radius as a fraction of half the field
    pub target_radius_frac: f32,
    /// Cursor hitbox radius as a fraction of half the field
    pub cursor_radius_frac: f32,

    // === Timing ===
    pub target_lifetime_ms: u32,
    pub game_time_sec: u32,
    /// Minimum distance between consecutive targets, relative to the spawn area
    pub distance_ratio: f32,
    pub min_spawn_delay_ms: u32,
    pub max_spawn_delay_ms: u32,

    // === End condition ===
    /// End after `max_spawn_count` targets instead of `game_time_sec`
    pub end_by_spawn_count: bool,
    pub max_spawn_count: u32,

    /// Frames the presenter may queue
    pub frame_latency: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bg_color: [0.2, 0.2, 0.2, 1.0],
            field_color: [0.1, 0.1, 0.1, 1.0],
            target_color: [1.0, 1.0, 1.0, 1.0],
            cursor_color: [1.0, 1.0, 1.0, 1.0],
            cursor_outline_color: [1.0, 1.0, 1.0, 1.0],
            cursor_thickness: 0.0,
            use_custom_cursor: true,

            scale: 0.9,
            target_radius_frac: 0.112,
            cursor_radius_frac: 0.015,

            target_lifetime_ms: 250,
            game_time_sec: 60,
            distance_ratio: 0.2,
            min_spawn_delay_ms: 0,
            max_spawn_delay_ms: 0,

            end_by_spawn_count: false,
            max_spawn_count: 0,

            frame_latency: 1,
        }
    }
}

impl Settings {
    /// Create settings from a preset (other fields at defaults)
    pub fn from_preset(preset: Preset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a preset; only gameplay fields change, colors are kept
    pub fn apply_preset(&mut self, preset: Preset) {
        let (radius, lifetime, game_time, by_count, max_spawns, min_delay, max_delay) =
            preset.params();
        self.target_radius_frac = radius;
        self.target_lifetime_ms = lifetime;
        self.cursor_radius_frac = 0.015;
        self.game_time_sec = game_time;
        self.end_by_spawn_count = by_count;
        self.max_spawn_count = max_spawns;
        self.min_spawn_delay_ms = min_delay;
        self.max_spawn_delay_ms = max_delay;
    }

    /// Copy with every field pulled into its editable range
    pub fn clamped(&self) -> Self {
        let mut s = self.clone();
        s.scale = s.scale.clamp(0.1, 1.0);
        s.target_radius_frac = s.target_radius_frac.clamp(0.001, 1.0);
        s.cursor_radius_frac = s.cursor_radius_frac.clamp(0.0, 1.0);
        s.cursor_thickness = s.cursor_thickness.clamp(0.0, 10.0);
        s.target_lifetime_ms = s.target_lifetime_ms.clamp(50, 2000);
        s.game_time_sec = s.game_time_sec.clamp(5, 300);
        if s.end_by_spawn_count {
            s.max_spawn_count = s.max_spawn_count.clamp(1, 1000);
        }
        s.min_spawn_delay_ms = s.min_spawn_delay_ms.min(5000);
        s.max_spawn_delay_ms = s.max_spawn_delay_ms.min(5000);
        s
    }

    /// Load from a store, falling back to defaults on any failure
    pub fn load_or_default(store: &impl SettingsStore) -> Self {
        match store.load() {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(err) => {
                log::warn!("Failed to load settings, using defaults: {err}");
                Self::default()
            }
        }
    }
}

/// Where settings live between runs
pub trait SettingsStore {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<Settings>, StoreError>;
    fn save(&self, settings: &Settings) -> Result<(), StoreError>;
}

/// Settings as a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub const FILE_NAME: &'static str = "settings.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/settings.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Option<Settings>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(settings)?)?;
        log::info!("Settings saved");
        Ok(())
    }
}
