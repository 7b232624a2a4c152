//! Presentation boundary
//!
//! The session never draws. Each frame the host composes a `Frame` (what is
//! visible and where) and hands it to a `Renderer`.

use glam::Vec2;

use crate::settings::{Color, Settings};
use crate::sim::{FieldLayout, GamePhase, Session};

/// A filled circle to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
}

/// Everything visible in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub background: Color,
    pub layout: FieldLayout,
    pub field_color: Color,
    /// Preview or active target
    pub target: Option<Disc>,
    /// Custom cursor, outline first then the inner fill
    pub cursor: Vec<Disc>,
}

impl Frame {
    /// Decide what is drawn this frame
    pub fn compose(
        session: &Session,
        settings: &Settings,
        layout: &FieldLayout,
        cursor: Vec2,
        ui_capture: bool,
    ) -> Self {
        let target_at = match session.phase {
            GamePhase::NotStarted => Some(layout.center),
            GamePhase::Running => session.active_target.map(|t| t.pos),
            GamePhase::Finished => None,
        };
        let target = target_at.map(|center| Disc {
            center,
            radius: layout.target_radius_px,
            color: settings.target_color,
        });

        let mut cursor_discs = Vec::new();
        if settings.use_custom_cursor && !ui_capture {
            let radius = layout.cursor_radius_px;
            cursor_discs.push(Disc {
                center: cursor,
                radius,
                color: settings.cursor_outline_color,
            });
            let inner = radius - settings.cursor_thickness;
            if inner > 0.0 {
                cursor_discs.push(Disc {
                    center: cursor,
                    radius: inner,
                    color: settings.cursor_color,
                });
            }
        }

        Self {
            background: settings.bg_color,
            layout: *layout,
            field_color: settings.field_color,
            target,
            cursor: cursor_discs,
        }
    }
}

/// Something that can put a frame on screen
pub trait Renderer {
    fn present(&mut self, frame: &Frame);
}

/// Headless renderer, counts presented frames
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames: u64,
    pub last_target: Option<Vec2>,
}

impl Renderer for NullRenderer {
    fn present(&mut self, frame: &Frame) {
        self.frames += 1;
        self.last_target = frame.target.map(|t| t.center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SeededRng, Target};

    fn layout() -> FieldLayout {
        FieldLayout::compute(1000.0, 1000.0, 1.0, 0.1, 0.02).unwrap()
    }

    #[test]
    fn test_preview_target_while_idle() {
        let frame = Frame::compose(
            &Session::new(),
            &Settings::default(),
            &layout(),
            Vec2::ZERO,
            false,
        );
        let target = frame.target.unwrap();
        assert_eq!(target.center, Vec2::new(500.0, 500.0));
        assert!((target.radius - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_running_draws_active_target_only() {
        let settings = Settings::default();
        let mut session = Session::new();
        session.start(&settings, 0, &mut SeededRng::new(1));

        let frame = Frame::compose(&session, &settings, &layout(), Vec2::ZERO, false);
        assert!(frame.target.is_none());

        session.active_target = Some(Target {
            pos: Vec2::new(10.0, 20.0),
            spawned_at_ms: 0,
        });
        let frame = Frame::compose(&session, &settings, &layout(), Vec2::ZERO, false);
        assert_eq!(frame.target.unwrap().center, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_cursor_layers() {
        let mut settings = Settings {
            cursor_thickness: 4.0,
            ..Default::default()
        };
        // cursor radius is 10px
        let frame = Frame::compose(&Session::new(), &settings, &layout(), Vec2::ONE, false);
        assert_eq!(frame.cursor.len(), 2);
        assert!((frame.cursor[1].radius - 6.0).abs() < 1e-4);

        settings.cursor_thickness = 10.0;
        let frame = Frame::compose(&Session::new(), &settings, &layout(), Vec2::ONE, false);
        assert_eq!(frame.cursor.len(), 1);

        let frame = Frame::compose(&Session::new(), &settings, &layout(), Vec2::ONE, true);
        assert!(frame.cursor.is_empty());

        settings.use_custom_cursor = false;
        let frame = Frame::compose(&Session::new(), &settings, &layout(), Vec2::ONE, false);
        assert!(frame.cursor.is_empty());
    }

    #[test]
    fn test_null_renderer_tracks_target() {
        let mut renderer = NullRenderer::default();
        let layout = layout();
        let frame = Frame::compose(
            &Session::new(),
            &Settings::default(),
            &layout,
            Vec2::ZERO,
            false,
        );
        renderer.present(&frame);
        assert_eq!(renderer.frames, 1);
        assert_eq!(renderer.last_target, Some(layout.center));
    }
}
