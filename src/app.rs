//! Host loop
//!
//! `Game` owns the session plus every boundary capability and runs exactly
//! one tick per presented frame, routing session events to audio and the
//! history store.

use chrono::Utc;
use glam::Vec2;

use crate::audio::SoundPlayer;
use crate::history::{History, HistoryStats, HistoryStore, HistorySummary};
use crate::input::{CursorTracker, InputSource, mouse_speed_multiplier};
use crate::renderer::{Frame, Renderer};
use crate::settings::Settings;
use crate::sim::{
    FieldLayout, GamePhase, GameResult, RandomSource, Session, SessionEvent, TickInput, tick,
};

/// Keyboard commands for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct Keys {
    /// Abandon the session (R)
    pub reset: bool,
    /// Finish after the current target (E)
    pub force_finish: bool,
}

/// Game instance holding all state
pub struct Game<R: RandomSource, S: SoundPlayer, H: HistoryStore> {
    settings: Settings,
    session: Session,
    viewport: Vec2,
    layout: Option<FieldLayout>,
    cursor: CursorTracker,
    rng: R,
    sound: S,
    store: H,
    history: History,
    last_result: Option<GameResult>,
    /// An overlay held the pointer during the last frame
    ui_capture: bool,
}

impl<R: RandomSource, S: SoundPlayer, H: HistoryStore> Game<R, S, H> {
    /// Create a game, loading past summaries from `store` once
    pub fn new(settings: Settings, viewport: Vec2, rng: R, sound: S, store: H) -> Self {
        let history = match store.load_all() {
            Ok(entries) => History::from_entries(entries),
            Err(err) => {
                log::warn!("Failed to load session history: {err}");
                History::new()
            }
        };

        let mut game = Self {
            settings: settings.clamped(),
            session: Session::new(),
            viewport,
            layout: None,
            cursor: CursorTracker::new(viewport, 1.0),
            rng,
            sound,
            store,
            history,
            last_result: None,
            ui_capture: false,
        };
        game.refresh_layout();
        game
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn layout(&self) -> Option<&FieldLayout> {
        self.layout.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn last_result(&self) -> Option<&GameResult> {
        self.last_result.as_ref()
    }

    pub fn cursor_pos(&self) -> Vec2 {
        self.cursor.pos()
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.cursor.speed_multiplier()
    }

    /// Scale pointer motion the way the OS pointer speed setting (1-20) would
    pub fn set_mouse_speed(&mut self, speed: i32) {
        self.cursor.set_speed_multiplier(mouse_speed_multiplier(speed));
    }

    pub fn store(&self) -> &H {
        &self.store
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    /// Aggregates over past sessions comparable to the last result
    pub fn last_result_stats(&self) -> Option<HistoryStats> {
        let result = self.last_result.as_ref()?;
        self.history.stats_for(&result.settings)
    }

    /// Replace the live settings. A running session keeps its frozen copy.
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings.clamped();
        self.refresh_layout();
    }

    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.cursor.set_viewport(viewport);
        self.refresh_layout();
    }

    /// Poll one frame of input, run one tick and react to what happened
    pub fn frame(
        &mut self,
        now_ms: u64,
        source: &mut impl InputSource,
        keys: Keys,
    ) -> Vec<SessionEvent> {
        let raw = source.poll();
        let cursor = self.cursor.apply(&raw);
        self.ui_capture = raw.ui_capture;
        let input = TickInput {
            now_ms,
            cursor,
            button_down: raw.button_down,
            ui_capture: raw.ui_capture,
            force_finish: keys.force_finish,
            reset: keys.reset,
        };

        let events = tick(
            &mut self.session,
            &self.settings,
            self.layout.as_ref(),
            &input,
            &mut self.rng,
        );

        for event in &events {
            match event {
                SessionEvent::Hit { .. } => self.sound.play_hit_sound(),
                SessionEvent::Finished(result) => self.record(result),
                SessionEvent::Reset => {
                    self.last_result = None;
                    self.cursor.recenter();
                }
                _ => {}
            }
        }

        if events.iter().any(|e| {
            matches!(
                e,
                SessionEvent::Started | SessionEvent::Finished(_) | SessionEvent::Reset
            )
        }) {
            self.refresh_layout();
        }

        events
    }

    /// Compose what should be on screen, if the viewport is usable
    pub fn compose_frame(&self) -> Option<Frame> {
        let layout = self.layout.as_ref()?;
        Some(Frame::compose(
            &self.session,
            &self.settings,
            layout,
            self.cursor.pos(),
            self.ui_capture,
        ))
    }

    pub fn present(&self, renderer: &mut impl Renderer) {
        if let Some(frame) = self.compose_frame() {
            renderer.present(&frame);
        }
    }

    fn record(&mut self, result: &GameResult) {
        self.last_result = Some(result.clone());
        if result.forced {
            log::info!("Forced finish, session not recorded");
            return;
        }

        let summary = HistorySummary::from_result(result, Utc::now().timestamp());
        if let Err(err) = self.store.append(&summary) {
            log::warn!("Failed to save session summary: {err}");
        }
        self.history.push(summary);
    }

    /// Size parameters come from the frozen session settings while running
    fn refresh_layout(&mut self) {
        let frozen = match self.session.phase {
            GamePhase::Running => self.session.settings.as_ref(),
            _ => None,
        };
        let (scale, target_frac, cursor_frac) = match frozen {
            Some(frozen) => (
                frozen.scale,
                frozen.target_radius_frac,
                frozen.cursor_radius_frac,
            ),
            None => (
                self.settings.scale,
                self.settings.target_radius_frac,
                self.settings.cursor_radius_frac,
            ),
        };
        self.layout = FieldLayout::compute(
            self.viewport.x,
            self.viewport.y,
            scale,
            target_frac,
            cursor_frac,
        );
        if self.layout.is_none() {
            log::warn!("Viewport {}x{} too small for a field", self.viewport.x, self.viewport.y);
        }
    }
}
