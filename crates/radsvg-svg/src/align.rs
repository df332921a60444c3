//! Fitting a viewBox into a target rectangle.

use radsvg_canvas::{Rect, Transform};

/// Horizontal placement of the scaled content inside the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical placement of the scaled content inside the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlignment {
    Top,
    #[default]
    Center,
    Bottom,
}

impl HorizontalAlignment {
    fn offset(self, slack: f32) -> f32 {
        match self {
            HorizontalAlignment::Left => 0.0,
            HorizontalAlignment::Center => slack / 2.0,
            HorizontalAlignment::Right => slack,
        }
    }
}

impl VerticalAlignment {
    fn offset(self, slack: f32) -> f32 {
        match self {
            VerticalAlignment::Top => 0.0,
            VerticalAlignment::Center => slack / 2.0,
            VerticalAlignment::Bottom => slack,
        }
    }
}

/// Compute the uniform scale + translation mapping `view_box` into `target`.
///
/// The scale is `min(target.w / vb.w, target.h / vb.h)`; leftover space on the other axis
/// is distributed by the alignment. A viewBox without area maps to a plain translation to
/// the target origin. A target without area collapses the scale to zero.
pub fn compute_transform(
    view_box: Rect,
    target: Rect,
    valign: VerticalAlignment,
    halign: HorizontalAlignment,
) -> Transform {
    if view_box.width <= 0.0 || view_box.height <= 0.0 {
        return Transform::translate(target.x, target.y);
    }

    let scale = (target.width / view_box.width)
        .min(target.height / view_box.height)
        .max(0.0);

    let slack_x = target.width - view_box.width * scale;
    let slack_y = target.height - view_box.height * scale;

    let tx = target.x + halign.offset(slack_x) - view_box.x * scale;
    let ty = target.y + valign.offset(slack_y) - view_box.y * scale;

    Transform::from_row(scale, 0.0, 0.0, scale, tx, ty)
}
