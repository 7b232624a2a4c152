//! Session state and core simulation types
//!
//! Everything one play-through accumulates lives in `Session`; the host
//! passes it to `tick` by mutable reference each frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use super::scheduler::schedule_next_delay;
use super::scoring::{accuracy, average_reaction_time, compute_score};
use crate::consts::SAMPLE_INTERVAL_MS;
use crate::settings::Settings;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle, preview target at field center waiting to be clicked
    #[default]
    NotStarted,
    /// Targets are spawning
    Running,
    /// Results available, waiting for reset
    Finished,
}

/// Gameplay settings frozen when a session starts.
///
/// Editing the live `Settings` mid-session does not affect a running session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub scale: f32,
    pub target_radius_frac: f32,
    pub cursor_radius_frac: f32,
    pub target_lifetime_ms: u32,
    pub game_time_sec: u32,
    pub distance_ratio: f32,
    pub min_spawn_delay_ms: u32,
    pub max_spawn_delay_ms: u32,
    pub end_by_spawn_count: bool,
    pub max_spawn_count: u32,
}

impl From<&Settings> for SessionSettings {
    fn from(s: &Settings) -> Self {
        Self {
            scale: s.scale,
            target_radius_frac: s.target_radius_frac,
            cursor_radius_frac: s.cursor_radius_frac,
            target_lifetime_ms: s.target_lifetime_ms,
            game_time_sec: s.game_time_sec,
            distance_ratio: s.distance_ratio,
            min_spawn_delay_ms: s.min_spawn_delay_ms,
            max_spawn_delay_ms: s.max_spawn_delay_ms,
            end_by_spawn_count: s.end_by_spawn_count,
            max_spawn_count: s.max_spawn_count,
        }
    }
}

/// The single clickable target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub pos: Vec2,
    pub spawned_at_ms: u64,
}

/// Something that happened during a tick, for the host to react to
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Preview target clicked, session running
    Started,
    TargetSpawned { pos: Vec2 },
    /// Target timed out without being hit
    TargetExpired { pos: Vec2 },
    Hit { pos: Vec2, reaction_ms: u32 },
    /// Click that did not land on a target
    Miss,
    /// No further targets will spawn
    FinalTargetLatched,
    Finished(Box<GameResult>),
    Reset,
}

/// Snapshot of a finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub settings: SessionSettings,
    pub hits: u32,
    pub attempts: u32,
    /// Percent of attempts that hit
    pub accuracy: f32,
    pub score: f32,
    /// Hits so far, sampled once per elapsed second (index = second)
    pub score_history: Vec<u32>,
    /// Reaction time per hit, in hit order
    pub reaction_times: Vec<u32>,
    pub average_reaction_time: f32,
    /// Ended early on request; excluded from history
    pub forced: bool,
}

impl GameResult {
    pub fn fastest_reaction(&self) -> Option<u32> {
        self.reaction_times.iter().copied().min()
    }

    pub fn slowest_reaction(&self) -> Option<u32> {
        self.reaction_times.iter().copied().max()
    }

    pub fn peak_hits(&self) -> u32 {
        self.score_history.iter().copied().max().unwrap_or(0)
    }

    /// Whole seconds covered by the score history
    pub fn elapsed_secs(&self) -> usize {
        self.score_history.len().saturating_sub(1)
    }

    /// Compare scores in the direction this session's end condition rewards
    pub fn is_better_than(&self, other_score: f32) -> bool {
        if self.settings.end_by_spawn_count {
            self.score < other_score
        } else {
            self.score > other_score
        }
    }
}

/// Complete session state (deterministic given `now` and the random source)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub phase: GamePhase,
    /// Settings captured at start; `None` until the first start
    pub settings: Option<SessionSettings>,
    pub start_ms: u64,
    pub hits: u32,
    pub attempts: u32,
    pub spawn_count: u32,
    /// Sticky once set: no more spawns this session
    pub final_target_pending: bool,
    /// Early finish requested; observed at the next tick
    pub force_finish: bool,
    pub active_target: Option<Target>,
    pub next_spawn_ms: u64,
    pub last_sampled_second: u64,
    pub score_history: Vec<u32>,
    pub reaction_times: Vec<u32>,
    /// Position of the previous target, `None` before the first spawn
    pub last_target_pos: Option<Vec2>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything and return to the idle preview
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Milliseconds since the session started
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.start_ms)
    }

    /// Begin a session, freezing the current settings
    pub fn start<R: RandomSource>(&mut self, settings: &Settings, now_ms: u64, rng: &mut R) {
        self.reset();
        let frozen = SessionSettings::from(settings);

        self.phase = GamePhase::Running;
        self.start_ms = now_ms;
        self.score_history.push(0);
        self.next_spawn_ms =
            now_ms + schedule_next_delay(rng, frozen.min_spawn_delay_ms, frozen.max_spawn_delay_ms);
        self.settings = Some(frozen);

        log::info!("Session started at {now_ms} ms");
    }

    /// Append the current hit count once for every whole second crossed
    /// since the last sample.
    pub fn sample_elapsed_seconds(&mut self, now_ms: u64) {
        let elapsed_sec = self.elapsed_ms(now_ms) / SAMPLE_INTERVAL_MS;
        while self.last_sampled_second < elapsed_sec {
            self.score_history.push(self.hits);
            self.last_sampled_second += 1;
        }
    }

    /// Schedule the next spawn from `now` unless the session is winding down
    pub fn schedule_next<R: RandomSource>(&mut self, now_ms: u64, rng: &mut R) {
        if self.final_target_pending {
            return;
        }
        if let Some(settings) = &self.settings {
            let delay =
                schedule_next_delay(rng, settings.min_spawn_delay_ms, settings.max_spawn_delay_ms);
            self.next_spawn_ms = now_ms + delay;
        }
    }

    /// Close the session and build its result.
    ///
    /// Returns `None` if the session was never started.
    pub fn finish(&mut self, now_ms: u64) -> Option<GameResult> {
        let settings = self.settings.clone()?;
        self.sample_elapsed_seconds(now_ms);
        self.phase = GamePhase::Finished;

        let average_reaction_time = average_reaction_time(&self.reaction_times);
        let forced = std::mem::take(&mut self.force_finish);
        let result = GameResult {
            score: compute_score(&settings, self.hits, average_reaction_time),
            accuracy: accuracy(self.hits, self.attempts),
            settings,
            hits: self.hits,
            attempts: self.attempts,
            score_history: self.score_history.clone(),
            reaction_times: self.reaction_times.clone(),
            average_reaction_time,
            forced,
        };

        log::info!(
            "Session finished: {} hits / {} attempts, score {:.1}{}",
            result.hits,
            result.attempts,
            result.score,
            if forced { " (forced)" } else { "" }
        );
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::SeededRng;

    #[test]
    fn test_start_freezes_settings() {
        let mut settings = Settings {
            min_spawn_delay_ms: 300,
            max_spawn_delay_ms: 300,
            ..Default::default()
        };
        let mut session = Session::new();
        session.start(&settings, 5_000, &mut SeededRng::new(3));

        settings.target_lifetime_ms = 9_999;
        let frozen = session.settings.as_ref().unwrap();
        assert_eq!(frozen.target_lifetime_ms, 250);
        assert_eq!(session.phase, GamePhase::Running);
        assert_eq!(session.next_spawn_ms, 5_300);
        assert_eq!(session.score_history, vec![0]);
    }

    #[test]
    fn test_backfill_per_whole_second() {
        let mut session = Session::new();
        session.start(&Settings::default(), 0, &mut SeededRng::new(3));
        session.hits = 2;
        session.sample_elapsed_seconds(600);
        assert_eq!(session.score_history, vec![0]);

        session.sample_elapsed_seconds(4_000);
        assert_eq!(session.score_history, vec![0, 2, 2, 2, 2]);
        assert_eq!(session.last_sampled_second, 4);
    }

    #[test]
    fn test_backfill_three_point_four_seconds() {
        let mut session = Session::new();
        session.start(&Settings::default(), 0, &mut SeededRng::new(3));
        session.hits = 2;
        session.sample_elapsed_seconds(1_000);
        let before = session.score_history.len();

        session.sample_elapsed_seconds(4_400);
        assert_eq!(session.score_history.len() - before, 3);
        assert!(session.score_history[before..].iter().all(|&h| h == 2));
    }

    #[test]
    fn test_finish_without_start() {
        let mut session = Session::new();
        assert!(session.finish(1_000).is_none());
        assert_eq!(session.phase, GamePhase::NotStarted);
    }

    #[test]
    fn test_finish_degenerate_result() {
        let mut session = Session::new();
        session.start(&Settings::default(), 0, &mut SeededRng::new(3));
        let result = session.finish(2_500).unwrap();
        assert_eq!(result.accuracy, 0.0);
        assert_eq!(result.average_reaction_time, 0.0);
        assert_eq!(result.score_history, vec![0, 0, 0]);
        assert_eq!(result.elapsed_secs(), 2);
        assert_eq!(result.fastest_reaction(), None);
        assert_eq!(session.phase, GamePhase::Finished);
    }

    #[test]
    fn test_is_better_than_direction() {
        let mut session = Session::new();
        let settings = Settings {
            end_by_spawn_count: true,
            max_spawn_count: 5,
            ..Default::default()
        };
        session.start(&settings, 0, &mut SeededRng::new(3));
        let result = session.finish(0).unwrap();
        // sqrt(5) * 100
        assert!(result.is_better_than(300.0));
        assert!(!result.is_better_than(200.0));
    }
}
