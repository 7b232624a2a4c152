//! Spawn timing and end-of-session decisions

use super::rng::RandomSource;
use super::state::{Session, SessionSettings};

/// Random delay before the next target, in milliseconds.
///
/// Reversed bounds are swapped rather than rejected.
pub fn schedule_next_delay<R: RandomSource>(rng: &mut R, min_ms: u32, max_ms: u32) -> u64 {
    let (lo, hi) = if min_ms <= max_ms {
        (min_ms, max_ms)
    } else {
        (max_ms, min_ms)
    };
    rng.uniform_int(i64::from(lo), i64::from(hi)).max(0) as u64
}

/// Whether the session has reached its last target.
///
/// Only consulted while the final-target latch is still clear; the caller
/// latches the first `true`.
pub fn is_final_target(
    session: &Session,
    settings: &SessionSettings,
    now_ms: u64,
    force_finish: bool,
) -> bool {
    if force_finish {
        return true;
    }
    if settings.end_by_spawn_count {
        session.spawn_count >= settings.max_spawn_count
    } else {
        session.elapsed_ms(now_ms) >= u64::from(settings.game_time_sec) * 1000
    }
}

/// A target may appear when none is showing, the session is not winding
/// down, and its scheduled time has come.
pub fn can_spawn(session: &Session, now_ms: u64) -> bool {
    session.active_target.is_none()
        && !session.final_target_pending
        && now_ms >= session.next_spawn_ms
}
