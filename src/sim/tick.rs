//! Per-frame session update
//!
//! One call per rendered frame. Within a tick the order is fixed: score
//! sampling, final-target latch, target expiry, spawning, finalization, and
//! last the click (if any) for this frame.

use glam::Vec2;

use super::layout::FieldLayout;
use super::placement::{min_separation, sample_position};
use super::rng::RandomSource;
use super::scheduler::{can_spawn, is_final_target};
use super::state::{GamePhase, Session, SessionEvent, Target};
use crate::settings::Settings;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Monotonic milliseconds
    pub now_ms: u64,
    /// Cursor position in viewport pixels
    pub cursor: Vec2,
    /// Primary button went down since the last tick
    pub button_down: bool,
    /// An overlay owns the pointer; clicks do not reach the game
    pub ui_capture: bool,
    /// End the session after the current target resolves
    pub force_finish: bool,
    /// Abandon the session and return to the idle preview
    pub reset: bool,
}

/// Advance the session by one frame.
///
/// `settings` are the live settings, only read when a session starts.
/// Without a layout nothing spawns and clicks are ignored.
pub fn tick<R: RandomSource>(
    session: &mut Session,
    settings: &Settings,
    layout: Option<&FieldLayout>,
    input: &TickInput,
    rng: &mut R,
) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    let now = input.now_ms;

    if input.reset {
        session.reset();
        events.push(SessionEvent::Reset);
    }

    if input.force_finish && session.phase == GamePhase::Running {
        session.force_finish = true;
    }

    if session.phase == GamePhase::Running {
        advance_running(session, layout, now, rng, &mut events);
    }

    if input.button_down && !input.ui_capture {
        if let Some(layout) = layout {
            judge_click(session, settings, layout, input.cursor, now, rng, &mut events);
        }
    }

    events
}

fn advance_running<R: RandomSource>(
    session: &mut Session,
    layout: Option<&FieldLayout>,
    now: u64,
    rng: &mut R,
    events: &mut Vec<SessionEvent>,
) {
    let Some(settings) = session.settings.clone() else {
        return;
    };

    session.sample_elapsed_seconds(now);

    if !session.final_target_pending
        && is_final_target(session, &settings, now, session.force_finish)
    {
        session.final_target_pending = true;
        log::debug!("Final target latched after {} spawns", session.spawn_count);
        events.push(SessionEvent::FinalTargetLatched);
    }

    if let Some(target) = session.active_target {
        if now.saturating_sub(target.spawned_at_ms) >= u64::from(settings.target_lifetime_ms) {
            session.active_target = None;
            events.push(SessionEvent::TargetExpired { pos: target.pos });
            session.schedule_next(now, rng);
        }
    }

    if let Some(layout) = layout {
        if can_spawn(session, now) {
            let pos = sample_position(
                rng,
                layout.center,
                layout.spawn_max_radius,
                session.last_target_pos,
                min_separation(layout, settings.distance_ratio),
            );
            session.active_target = Some(Target {
                pos,
                spawned_at_ms: now,
            });
            session.last_target_pos = Some(pos);
            session.spawn_count += 1;
            events.push(SessionEvent::TargetSpawned { pos });
        }
    }

    if session.final_target_pending && session.active_target.is_none() {
        if let Some(result) = session.finish(now) {
            events.push(SessionEvent::Finished(Box::new(result)));
        }
    }
}

fn judge_click<R: RandomSource>(
    session: &mut Session,
    settings: &Settings,
    layout: &FieldLayout,
    cursor: Vec2,
    now: u64,
    rng: &mut R,
    events: &mut Vec<SessionEvent>,
) {
    match session.phase {
        GamePhase::NotStarted => {
            if layout.is_hit(cursor, layout.center) {
                session.start(settings, now, rng);
                events.push(SessionEvent::Started);
            }
        }
        GamePhase::Running => {
            session.attempts += 1;
            match session.active_target {
                Some(target) if layout.is_hit(cursor, target.pos) => {
                    let reaction_ms =
                        u32::try_from(now.saturating_sub(target.spawned_at_ms)).unwrap_or(u32::MAX);
                    session.hits += 1;
                    session.reaction_times.push(reaction_ms);
                    session.active_target = None;
                    events.push(SessionEvent::Hit {
                        pos: target.pos,
                        reaction_ms,
                    });
                    session.schedule_next(now, rng);
                }
                _ => events.push(SessionEvent::Miss),
            }
        }
        GamePhase::Finished => {}
    }
}
