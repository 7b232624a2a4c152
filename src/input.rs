//! Pointer input
//!
//! The platform layer reports raw relative motion and button edges; the
//! tracker turns them into an absolute cursor inside the viewport. When an
//! overlay owns the pointer the game cursor follows the system cursor and
//! relative motion is thrown away.

use std::collections::VecDeque;

use glam::Vec2;

/// Input gathered since the previous frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawInput {
    /// Accumulated relative pointer motion, in device counts
    pub delta: (i32, i32),
    /// Primary button went down at least once
    pub button_down: bool,
    /// An overlay wants the pointer
    pub ui_capture: bool,
    /// System cursor position, reported while an overlay has the pointer
    pub ui_cursor: Option<Vec2>,
}

/// Anything that can report per-frame pointer input
pub trait InputSource {
    fn poll(&mut self) -> RawInput;
}

/// A single frame's worth of input, reported once
impl InputSource for RawInput {
    fn poll(&mut self) -> RawInput {
        std::mem::take(self)
    }
}

/// Replays queued input, then reports no input
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: VecDeque<RawInput>,
}

impl ScriptedInput {
    pub fn new(inputs: impl IntoIterator<Item = RawInput>) -> Self {
        Self {
            queue: inputs.into_iter().collect(),
        }
    }

    pub fn push(&mut self, input: RawInput) {
        self.queue.push_back(input);
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> RawInput {
        self.queue.pop_front().unwrap_or_default()
    }
}

/// OS pointer speed setting (1-20) to motion multiplier
pub fn mouse_speed_multiplier(speed: i32) -> f32 {
    const TABLE: [(i32, f32); 11] = [
        (1, 0.0625),
        (2, 0.125),
        (4, 0.25),
        (6, 0.5),
        (8, 0.75),
        (10, 1.0),
        (12, 1.5),
        (14, 2.0),
        (16, 2.5),
        (18, 3.0),
        (20, 3.5),
    ];

    let (first, last) = (TABLE[0], TABLE[TABLE.len() - 1]);
    if speed <= first.0 {
        return first.1;
    }
    if speed >= last.0 {
        return last.1;
    }

    for pair in TABLE.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        if speed == x0 {
            return y0;
        }
        if speed < x1 {
            let t = (speed - x0) as f32 / (x1 - x0) as f32;
            return y0 + t * (y1 - y0);
        }
    }
    last.1
}

/// Absolute game cursor built from relative motion
#[derive(Debug, Clone)]
pub struct CursorTracker {
    pos: Vec2,
    viewport: Vec2,
    speed_multiplier: f32,
}

impl CursorTracker {
    pub fn new(viewport: Vec2, speed_multiplier: f32) -> Self {
        Self {
            pos: viewport * 0.5,
            viewport,
            speed_multiplier,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier;
    }

    /// Jump to the viewport center
    pub fn recenter(&mut self) {
        self.pos = self.viewport * 0.5;
    }

    /// Track a resized viewport, keeping the cursor inside it
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport.max(Vec2::ZERO);
        self.pos = self.pos.clamp(Vec2::ZERO, self.viewport);
    }

    /// Fold one frame of input into the cursor and return its new position
    pub fn apply(&mut self, raw: &RawInput) -> Vec2 {
        if raw.ui_capture {
            if let Some(p) = raw.ui_cursor {
                self.pos = p.clamp(Vec2::ZERO, self.viewport);
            }
            return self.pos;
        }

        let delta = Vec2::new(raw.delta.0 as f32, raw.delta.1 as f32);
        self.pos = (self.pos + delta * self.speed_multiplier).clamp(Vec2::ZERO, self.viewport);
        self.pos
    }
}
