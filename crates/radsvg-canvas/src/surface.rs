//! The abstract drawing surface and a command-recording implementation.

use tracing::trace;

use crate::color::Color;
use crate::geometry::Transform;
use crate::path::Path2D;

// ==================== Paint Styles ====================

/// Fill rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// Line cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Line join style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Stroke geometry parameters. The color is surface state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 4.0,
        }
    }
}

/// Horizontal anchoring of a text run relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

/// A single run of text positioned at its baseline origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: u16,
    pub anchor: TextAnchor,
}

// ==================== Drawing Surface ====================

/// A 2D drawing target.
///
/// Paths and text are given in user space; the surface maps them to device space with the
/// most recent transform. Fill and stroke colors are sticky state, like a canvas context.
pub trait DrawingSurface {
    /// Replace the current user-to-device transform.
    fn set_transform(&mut self, transform: Transform);

    /// Set the color used by subsequent `fill_path` and `draw_text` calls.
    fn set_fill_color(&mut self, color: Color);

    /// Set the color used by subsequent `stroke_path` calls.
    fn set_stroke_color(&mut self, color: Color);

    fn fill_path(&mut self, path: &Path2D, rule: FillRule);

    fn stroke_path(&mut self, path: &Path2D, stroke: &StrokeStyle);

    fn draw_text(&mut self, run: &TextRun);
}

// ==================== Draw Command ====================

/// A recorded drawing command with the state it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill a path.
    FillPath {
        path: Path2D,
        rule: FillRule,
        color: Color,
        transform: Transform,
    },
    /// Stroke a path.
    StrokePath {
        path: Path2D,
        stroke: StrokeStyle,
        color: Color,
        transform: Transform,
    },
    /// Fill text.
    FillText {
        run: TextRun,
        color: Color,
        transform: Transform,
    },
}

impl DrawCommand {
    pub fn color(&self) -> Color {
        match self {
            DrawCommand::FillPath { color, .. }
            | DrawCommand::StrokePath { color, .. }
            | DrawCommand::FillText { color, .. } => *color,
        }
    }

    pub fn transform(&self) -> Transform {
        match self {
            DrawCommand::FillPath { transform, .. }
            | DrawCommand::StrokePath { transform, .. }
            | DrawCommand::FillText { transform, .. } => *transform,
        }
    }
}

// ==================== Recording Surface ====================

/// A surface that records every drawing command in emission order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    transform: Transform,
    fill_color: Color,
    stroke_color: Color,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded commands.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the surface empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Replay recorded commands onto another surface.
    pub fn replay<S: DrawingSurface + ?Sized>(&self, target: &mut S) {
        for cmd in &self.commands {
            target.set_transform(cmd.transform());
            match cmd {
                DrawCommand::FillPath {
                    path, rule, color, ..
                } => {
                    target.set_fill_color(*color);
                    target.fill_path(path, *rule);
                }
                DrawCommand::StrokePath {
                    path,
                    stroke,
                    color,
                    ..
                } => {
                    target.set_stroke_color(*color);
                    target.stroke_path(path, stroke);
                }
                DrawCommand::FillText { run, color, .. } => {
                    target.set_fill_color(*color);
                    target.draw_text(run);
                }
            }
        }
    }
}

impl DrawingSurface for RecordingSurface {
    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    fn fill_path(&mut self, path: &Path2D, rule: FillRule) {
        trace!(commands = path.commands().len(), "record fill");
        self.commands.push(DrawCommand::FillPath {
            path: path.clone(),
            rule,
            color: self.fill_color,
            transform: self.transform,
        });
    }

    fn stroke_path(&mut self, path: &Path2D, stroke: &StrokeStyle) {
        trace!(commands = path.commands().len(), width = stroke.width, "record stroke");
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            stroke: *stroke,
            color: self.stroke_color,
            transform: self.transform,
        });
    }

    fn draw_text(&mut self, run: &TextRun) {
        trace!(text = %run.text, "record text");
        self.commands.push(DrawCommand::FillText {
            run: run.clone(),
            color: self.fill_color,
            transform: self.transform,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Path2D {
        let mut path = Path2D::new();
        path.rect(0.0, 0.0, 10.0, 10.0);
        path
    }

    #[test]
    fn test_recording_captures_state() {
        let mut surface = RecordingSurface::new();
        surface.set_transform(Transform::translate(1.0, 2.0));
        surface.set_fill_color(Color::from_rgb(255, 0, 0));
        surface.fill_path(&square(), FillRule::EvenOdd);
        surface.set_stroke_color(Color::from_rgb(0, 0, 255));
        surface.stroke_path(&square(), &StrokeStyle::default());

        let cmds = surface.commands();
        assert_eq!(cmds.len(), 2);
        assert!(matches!(
            &cmds[0],
            DrawCommand::FillPath { rule: FillRule::EvenOdd, color, .. } if *color == Color::from_rgb(255, 0, 0)
        ));
        assert_eq!(cmds[1].color(), Color::from_rgb(0, 0, 255));
        assert_eq!(cmds[1].transform(), Transform::translate(1.0, 2.0));
    }

    #[test]
    fn test_replay_reproduces_commands() {
        let mut source = RecordingSurface::new();
        source.set_fill_color(Color::WHITE);
        source.fill_path(&square(), FillRule::NonZero);
        source.draw_text(&TextRun {
            text: "hi".into(),
            x: 1.0,
            y: 2.0,
            font_family: "sans-serif".into(),
            font_size: 12.0,
            font_weight: 400,
            anchor: TextAnchor::Middle,
        });

        let mut target = RecordingSurface::new();
        source.replay(&mut target);
        assert_eq!(source.commands(), target.commands());

        assert_eq!(target.take_commands().len(), 2);
        assert!(target.commands().is_empty());
    }
}
