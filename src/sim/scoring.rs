//! Final score and derived statistics
//!
//! The two end conditions score in opposite directions: count-based sessions
//! are lower-is-better (missed targets and slow reactions add), time-based
//! sessions are simply the hit count. Anything comparing scores must branch
//! on `end_by_spawn_count`.

use super::state::SessionSettings;

/// Score for a finished session
pub fn compute_score(settings: &SessionSettings, hits: u32, average_reaction_ms: f32) -> f32 {
    if settings.end_by_spawn_count {
        let missed = (i64::from(settings.max_spawn_count) - i64::from(hits)).max(0);
        (missed as f32).sqrt() * 100.0 + average_reaction_ms
    } else {
        hits as f32
    }
}

/// Hit percentage, 0 when nothing was clicked
pub fn accuracy(hits: u32, attempts: u32) -> f32 {
    if attempts == 0 {
        0.0
    } else {
        100.0 * hits as f32 / attempts as f32
    }
}

/// Mean reaction time in ms, 0 for an empty list
pub fn average_reaction_time(reaction_times: &[u32]) -> f32 {
    if reaction_times.is_empty() {
        return 0.0;
    }
    let sum: u64 = reaction_times.iter().map(|&rt| u64::from(rt)).sum();
    sum as f32 / reaction_times.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn frozen(settings: Settings) -> SessionSettings {
        SessionSettings::from(&settings)
    }

    #[test]
    fn test_count_based_all_hit() {
        let s = frozen(Settings {
            end_by_spawn_count: true,
            max_spawn_count: 3,
            ..Default::default()
        });
        let avg = average_reaction_time(&[100, 150, 200]);
        assert_eq!(avg, 150.0);
        assert_eq!(compute_score(&s, 3, avg), 150.0);
    }

    #[test]
    fn test_count_based_misses_penalized() {
        let s = frozen(Settings {
            end_by_spawn_count: true,
            max_spawn_count: 10,
            ..Default::default()
        });
        // sqrt(10 - 6) * 100 + 200
        assert!((compute_score(&s, 6, 200.0) - 400.0).abs() < 1e-3);
        // More hits than spawns cannot go negative
        assert_eq!(compute_score(&s, 12, 0.0), 0.0);
    }

    #[test]
    fn test_time_based_is_hits() {
        let s = frozen(Settings {
            game_time_sec: 60,
            ..Default::default()
        });
        assert_eq!(compute_score(&s, 12, 321.0), 12.0);
    }

    #[test]
    fn test_degenerate_stats() {
        assert_eq!(accuracy(0, 0), 0.0);
        assert_eq!(accuracy(3, 4), 75.0);
        assert_eq!(average_reaction_time(&[]), 0.0);
    }
}
