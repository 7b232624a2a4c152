//! Auto-player
//!
//! Plays sessions on its own for the headless runner: clicks the preview
//! target to start, then flicks to each target after a randomized reaction
//! delay, sometimes deliberately wide. Deltas are divided by the pointer
//! speed multiplier so flicks land where they are aimed.

use glam::Vec2;

use crate::input::{InputSource, RawInput};
use crate::polar_to_cartesian;
use crate::sim::{FieldLayout, GamePhase, RandomSource, SeededRng, Session};

#[derive(Debug, Clone, Copy)]
struct Shot {
    /// Spawn time of the target this shot is for
    target_spawned_at: u64,
    fire_at_ms: u64,
    aim: Vec2,
    fired: bool,
}

/// Simulated player
#[derive(Debug, Clone)]
pub struct AutoPlayer {
    rng: SeededRng,
    reaction_min_ms: u32,
    reaction_max_ms: u32,
    /// Probability (0-1) that a shot lands outside the target
    miss_chance: f32,
    speed_multiplier: f32,
    shot: Option<Shot>,
    /// Input decided by the last `observe`, handed out by `poll`
    pending: RawInput,
}

impl AutoPlayer {
    pub fn new(seed: u64, reaction_min_ms: u32, reaction_max_ms: u32, miss_chance: f32) -> Self {
        Self {
            rng: SeededRng::new(seed),
            reaction_min_ms: reaction_min_ms.min(reaction_max_ms),
            reaction_max_ms: reaction_max_ms.max(reaction_min_ms),
            miss_chance: miss_chance.clamp(0.0, 1.0),
            speed_multiplier: 1.0,
            shot: None,
            pending: RawInput::default(),
        }
    }

    /// Match the game's pointer speed multiplier
    pub fn with_speed_multiplier(mut self, multiplier: f32) -> Self {
        if multiplier > 0.0 {
            self.speed_multiplier = multiplier;
        }
        self
    }

    /// Look at the screen and queue this frame's input for `poll`
    pub fn observe(
        &mut self,
        now_ms: u64,
        session: &Session,
        layout: Option<&FieldLayout>,
        cursor: Vec2,
    ) {
        self.pending = self.next_input(now_ms, session, layout, cursor);
    }

    /// Decide this frame's input from what is on screen
    pub fn next_input(
        &mut self,
        now_ms: u64,
        session: &Session,
        layout: Option<&FieldLayout>,
        cursor: Vec2,
    ) -> RawInput {
        let Some(layout) = layout else {
            return RawInput::default();
        };

        match session.phase {
            GamePhase::NotStarted => {
                self.shot = None;
                self.flick(cursor, layout.center)
            }
            GamePhase::Running => {
                let Some(target) = session.active_target else {
                    return RawInput::default();
                };

                let stale = self
                    .shot
                    .is_none_or(|s| s.target_spawned_at != target.spawned_at_ms);
                if stale {
                    self.shot = Some(self.plan(target.pos, target.spawned_at_ms, layout));
                }

                match &mut self.shot {
                    Some(shot) if !shot.fired && now_ms >= shot.fire_at_ms => {
                        shot.fired = true;
                        let aim = shot.aim;
                        self.flick(cursor, aim)
                    }
                    _ => RawInput::default(),
                }
            }
            GamePhase::Finished => RawInput::default(),
        }
    }

    fn plan(&mut self, target: Vec2, spawned_at: u64, layout: &FieldLayout) -> Shot {
        let reaction = self.rng.uniform_int(
            i64::from(self.reaction_min_ms),
            i64::from(self.reaction_max_ms),
        ) as u64;

        let aim = if self.rng.uniform_float(0.0, 1.0) < self.miss_chance {
            self.miss_aim(target, layout)
        } else {
            target
        };

        Shot {
            target_spawned_at: spawned_at,
            fire_at_ms: spawned_at + reaction,
            aim,
            fired: false,
        }
    }

    /// A point off the target that the cursor can actually reach.
    ///
    /// The cursor is clamped to the viewport, so an offset past the edge
    /// could be pulled back onto the target.
    fn miss_aim(&mut self, target: Vec2, layout: &FieldLayout) -> Vec2 {
        let viewport = layout.center * 2.0;
        // Rounded deltas can be off by half a multiplier per axis
        let clearance = layout.hit_radius() + self.speed_multiplier;

        for _ in 0..MISS_AIM_ATTEMPTS {
            let theta = self.rng.uniform_float(0.0, std::f32::consts::TAU);
            let aim = (target + polar_to_cartesian(layout.hit_radius() * 1.5 + 2.0, theta))
                .clamp(Vec2::ZERO, viewport);
            if aim.distance(target) > clearance {
                return aim;
            }
        }

        // Farthest viewport corner
        Vec2::new(
            if target.x < layout.center.x { viewport.x } else { 0.0 },
            if target.y < layout.center.y { viewport.y } else { 0.0 },
        )
    }

    fn flick(&self, from: Vec2, to: Vec2) -> RawInput {
        let d = (to - from) / self.speed_multiplier;
        RawInput {
            delta: (d.x.round() as i32, d.y.round() as i32),
            button_down: true,
            ..Default::default()
        }
    }
}

impl InputSource for AutoPlayer {
    fn poll(&mut self) -> RawInput {
        std::mem::take(&mut self.pending)
    }
}

const MISS_AIM_ATTEMPTS: usize = 16;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::Target;

    fn layout() -> FieldLayout {
        FieldLayout::compute(1000.0, 1000.0, 1.0, 0.1, 0.0).unwrap()
    }

    fn running_with_target(pos: Vec2, spawned_at_ms: u64) -> Session {
        let mut session = Session::new();
        session.start(&Settings::default(), 0, &mut SeededRng::new(1));
        session.active_target = Some(Target { pos, spawned_at_ms });
        session
    }

    #[test]
    fn test_clicks_preview_to_start() {
        let mut bot = AutoPlayer::new(1, 100, 100, 0.0);
        let input = bot.next_input(0, &Session::new(), Some(&layout()), Vec2::new(400.0, 450.0));
        assert!(input.button_down);
        assert_eq!(input.delta, (100, 50));
    }

    #[test]
    fn test_waits_for_reaction_then_fires_once() {
        let mut bot = AutoPlayer::new(1, 150, 150, 0.0);
        let session = running_with_target(Vec2::new(600.0, 500.0), 1_000);
        let cursor = Vec2::new(500.0, 500.0);

        assert!(!bot.next_input(1_100, &session, Some(&layout()), cursor).button_down);
        let input = bot.next_input(1_150, &session, Some(&layout()), cursor);
        assert!(input.button_down);
        assert_eq!(input.delta, (100, 0));
        assert!(!bot.next_input(1_160, &session, Some(&layout()), cursor).button_down);
    }

    #[test]
    fn test_always_miss_lands_outside() {
        let mut bot = AutoPlayer::new(9, 0, 0, 1.0);
        let target = Vec2::new(500.0, 500.0);
        let session = running_with_target(target, 0);
        let cursor = Vec2::new(500.0, 500.0);

        let input = bot.next_input(0, &session, Some(&layout()), cursor);
        let landed = cursor + Vec2::new(input.delta.0 as f32, input.delta.1 as f32);
        assert!(!layout().is_hit(landed, target));
    }

    #[test]
    fn test_miss_near_corner_stays_off_target() {
        let layout = layout();
        let target = Vec2::new(layout.hit_radius() * 0.5, layout.hit_radius() * 0.5);
        let session = running_with_target(target, 0);

        for seed in 0..64 {
            let mut bot = AutoPlayer::new(seed, 0, 0, 1.0);
            let cursor = layout.center;
            let input = bot.next_input(0, &session, Some(&layout), cursor);
            let landed = (cursor + Vec2::new(input.delta.0 as f32, input.delta.1 as f32))
                .clamp(Vec2::ZERO, layout.center * 2.0);
            assert!(!layout.is_hit(landed, target), "seed {seed} landed {landed}");
        }
    }

    #[test]
    fn test_deltas_divided_by_speed_multiplier() {
        let mut bot = AutoPlayer::new(1, 0, 0, 0.0).with_speed_multiplier(2.0);
        bot.observe(0, &Session::new(), Some(&layout()), Vec2::new(300.0, 500.0));
        let input = bot.poll();
        assert!(input.button_down);
        assert_eq!(input.delta, (100, 0));
        assert_eq!(bot.poll(), RawInput::default());
    }

    #[test]
    fn test_idle_without_layout() {
        let mut bot = AutoPlayer::new(1, 0, 0, 0.0);
        assert_eq!(
            bot.next_input(0, &Session::new(), None, Vec2::ZERO),
            RawInput::default()
        );
    }
}
