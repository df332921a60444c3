//! Scene renderer: walks the document and emits drawing commands into a surface.

use std::collections::HashMap;

use radsvg_canvas::{Color, DrawingSurface, Path2D, Rect, TextRun, Transform};
use tracing::{debug, trace};

use crate::align::{compute_transform, HorizontalAlignment, VerticalAlignment};
use crate::document::{GroupRole, NodeId, NodeKind, SceneNode, SvgDocument};
use crate::style::{ComputedStyle, Display, Paint};

/// Replacement colors keyed by element id or class name.
pub type ColorOverrides = HashMap<String, Color>;

/// Render `document` into `surface`, mapping user space to device space with `transform`.
///
/// Drawables are emitted depth-first in document order. For each one the surface receives
/// `set_transform`, then the fill (`set_fill_color` + `fill_path`), then the stroke
/// (`set_stroke_color` + `stroke_path`). Text emits `set_fill_color` + `draw_text`.
pub fn render<S: DrawingSurface + ?Sized>(
    document: &SvgDocument,
    transform: Transform,
    overrides: &ColorOverrides,
    surface: &mut S,
) {
    if document.is_degenerate() {
        debug!(view_box = ?document.view_box(), "Degenerate viewBox, nothing to render");
        return;
    }

    let mut renderer = Renderer {
        document,
        overrides,
        surface,
    };
    renderer.visit(
        document.root(),
        transform,
        &ComputedStyle::initial(),
        None,
        false,
    );
}

/// Fit the document's viewBox into `target` with the given alignment and render it.
pub fn draw<S: DrawingSurface + ?Sized>(
    document: &SvgDocument,
    surface: &mut S,
    target: Rect,
    valign: VerticalAlignment,
    halign: HorizontalAlignment,
    overrides: &ColorOverrides,
) {
    let transform = compute_transform(document.view_box(), target, valign, halign);
    render(document, transform, overrides, surface);
}

struct Renderer<'a, S: ?Sized> {
    document: &'a SvgDocument,
    overrides: &'a ColorOverrides,
    surface: &'a mut S,
}

impl<S: DrawingSurface + ?Sized> Renderer<'_, S> {
    /// `instantiated` is true when the node is the direct target of a `use`.
    /// `instance_override` is the override matched by the enclosing `use`, if any;
    /// it reaches every drawable of the instance that has no match of its own.
    fn visit(
        &mut self,
        id: NodeId,
        parent_transform: Transform,
        parent_style: &ComputedStyle,
        instance_override: Option<Color>,
        instantiated: bool,
    ) {
        let document = self.document;
        let node = document.node(id);
        let style = parent_style.cascade(&node.style);
        if style.display == Display::None {
            trace!(node = id.index(), "display:none, skipping subtree");
            return;
        }

        let transform = parent_transform.multiply(&node.transform);
        let override_color = self.override_for(node).or(instance_override);

        match &node.kind {
            NodeKind::Group { children, role } => {
                let rendered = match role {
                    GroupRole::Normal => true,
                    GroupRole::Symbol => instantiated,
                    GroupRole::Definitions => false,
                };
                if !rendered {
                    return;
                }
                // A group's own match does not recolor its descendants.
                for &child in children {
                    self.visit(child, transform, &style, instance_override, false);
                }
            }
            NodeKind::Path(path) => {
                self.paint_path(id, path, true, transform, &style, override_color);
            }
            NodeKind::Shape(shape) => {
                let path = shape.to_path();
                self.paint_path(id, &path, shape.is_fillable(), transform, &style, override_color);
            }
            NodeKind::Text { x, y, content } => {
                if content.is_empty() || !style.is_painted() {
                    return;
                }
                let fill = resolve_paint(&style, &style.fill, style.fill_opacity, override_color);
                let Some(color) = fill else {
                    return;
                };
                self.surface.set_transform(transform);
                self.surface.set_fill_color(color);
                self.surface.draw_text(&TextRun {
                    text: content.clone(),
                    x: *x,
                    y: *y,
                    font_family: style.font_family.clone(),
                    font_size: style.font_size,
                    font_weight: style.font_weight,
                    anchor: style.text_anchor,
                });
            }
            NodeKind::Use { target, x, y, href } => match target {
                Some(target) => {
                    let placed = transform.multiply(&Transform::translate(*x, *y));
                    self.visit(*target, placed, &style, override_color, true);
                }
                None => trace!(href = %href, "Unresolved use, nothing to render"),
            },
        }
    }

    fn paint_path(
        &mut self,
        id: NodeId,
        path: &Path2D,
        fillable: bool,
        transform: Transform,
        style: &ComputedStyle,
        override_color: Option<Color>,
    ) {
        if path.is_empty() || !style.is_painted() {
            trace!(node = id.index(), "Nothing to paint");
            return;
        }

        let fill = fillable
            .then(|| resolve_paint(style, &style.fill, style.fill_opacity, override_color))
            .flatten();
        let stroke = (style.stroke_width > 0.0)
            .then(|| resolve_paint(style, &style.stroke, style.stroke_opacity, override_color))
            .flatten();
        if fill.is_none() && stroke.is_none() {
            return;
        }

        self.surface.set_transform(transform);
        if let Some(color) = fill {
            self.surface.set_fill_color(color);
            self.surface.fill_path(path, style.fill_rule);
        }
        if let Some(color) = stroke {
            self.surface.set_stroke_color(color);
            self.surface.stroke_path(path, &style.stroke_style());
        }
    }

    /// Own id first, then classes in attribute order.
    fn override_for(&self, node: &SceneNode) -> Option<Color> {
        if self.overrides.is_empty() {
            return None;
        }
        node.id
            .iter()
            .chain(node.classes.iter())
            .find_map(|key| self.overrides.get(key).copied())
    }
}

/// Final color of one paint, or `None` when nothing should be drawn.
fn resolve_paint(
    style: &ComputedStyle,
    paint: &Paint,
    paint_opacity: f32,
    override_color: Option<Color>,
) -> Option<Color> {
    let base = match (paint, override_color) {
        (Paint::None, _) => return None,
        (_, Some(color)) => color,
        (paint, None) => style.paint_color(paint)?,
    };
    let color = base.with_alpha_scaled(paint_opacity * style.opacity);
    (!color.is_transparent()).then_some(color)
}
