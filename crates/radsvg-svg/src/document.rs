//! The parsed scene: an immutable arena of nodes indexed by [`NodeId`].

use std::collections::HashMap;

use radsvg_canvas::{Path2D, Point, Rect, Transform};

use crate::error::GeometryWarning;
use crate::style::ResolvedStyle;

/// Index of a node inside its [`SvgDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a group is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupRole {
    /// Rendered in place.
    #[default]
    Normal,
    /// `<defs>`: never rendered directly.
    Definitions,
    /// `<symbol>`: rendered only through `<use>`.
    Symbol,
}

/// Basic shape parameters, in local user units.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rx: f32,
        ry: f32,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
    },
    Ellipse {
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    Polyline(Vec<Point>),
    Polygon(Vec<Point>),
}

impl Shape {
    /// Outline of the shape. Shapes with a non-positive size produce an empty path.
    pub fn to_path(&self) -> Path2D {
        let mut path = Path2D::new();
        match *self {
            Shape::Rect {
                x,
                y,
                width,
                height,
                rx,
                ry,
            } => {
                if width > 0.0 && height > 0.0 {
                    path.rounded_rect(x, y, width, height, rx, ry);
                }
            }
            Shape::Circle { cx, cy, r } => {
                if r > 0.0 {
                    path.ellipse(cx, cy, r, r);
                }
            }
            Shape::Ellipse { cx, cy, rx, ry } => {
                if rx > 0.0 && ry > 0.0 {
                    path.ellipse(cx, cy, rx, ry);
                }
            }
            Shape::Line { x1, y1, x2, y2 } => {
                path.move_to(x1, y1);
                path.line_to(x2, y2);
            }
            Shape::Polyline(ref points) | Shape::Polygon(ref points) => {
                if let Some((first, rest)) = points.split_first() {
                    path.move_to(first.x, first.y);
                    for p in rest {
                        path.line_to(p.x, p.y);
                    }
                    if matches!(self, Shape::Polygon(_)) {
                        path.close();
                    }
                }
            }
        }
        path
    }

    /// Lines are stroke-only.
    pub fn is_fillable(&self) -> bool {
        !matches!(self, Shape::Line { .. })
    }
}

/// Node payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group {
        children: Vec<NodeId>,
        role: GroupRole,
    },
    Path(Path2D),
    Shape(Shape),
    Text {
        x: f32,
        y: f32,
        content: String,
    },
    Use {
        href: String,
        /// Resolved target; `None` when missing or when expansion would be cyclic.
        target: Option<NodeId>,
        x: f32,
        y: f32,
    },
}

/// A node of the scene tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Local-to-parent transform.
    pub transform: Transform,
    pub style: ResolvedStyle,
    pub kind: NodeKind,
}

impl SceneNode {
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Group { children, .. } => children,
            _ => &[],
        }
    }
}

/// A parsed SVG document. Immutable; share it behind an `Arc` for concurrent rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) view_box: Rect,
    pub(crate) nodes: Vec<SceneNode>,
    pub(crate) root: NodeId,
    pub(crate) ids: HashMap<String, NodeId>,
    pub(crate) warnings: Vec<GeometryWarning>,
}

impl SvgDocument {
    /// Declared intrinsic width in pixels, 0 when undeclared.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Declared intrinsic height in pixels, 0 when undeclared.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn view_box(&self) -> Rect {
        self.view_box
    }

    /// The root `<svg>` group.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    /// Find a node by its `id` attribute. Duplicates resolve to the first in document order.
    pub fn lookup(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over all nodes in document (pre-)order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Recoverable problems found while parsing.
    pub fn warnings(&self) -> &[GeometryWarning] {
        &self.warnings
    }

    /// True when the viewBox has no area, in which case nothing renders.
    pub fn is_degenerate(&self) -> bool {
        self.view_box.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_paths() {
        let rect = Shape::Rect {
            x: 1.0,
            y: 2.0,
            width: 3.0,
            height: 4.0,
            rx: 0.0,
            ry: 0.0,
        };
        assert_eq!(rect.to_path().bounds(), Some(Rect::new(1.0, 2.0, 3.0, 4.0)));

        let empty = Shape::Circle {
            cx: 0.0,
            cy: 0.0,
            r: 0.0,
        };
        assert!(empty.to_path().is_empty());

        let polygon = Shape::Polygon(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 5.0),
        ]);
        let path = polygon.to_path();
        assert_eq!(path.commands().len(), 4);
        assert_eq!(path.bounds(), Some(Rect::new(0.0, 0.0, 10.0, 5.0)));

        assert!(Shape::Polyline(Vec::new()).to_path().is_empty());
    }

    #[test]
    fn test_line_not_fillable() {
        let line = Shape::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
        };
        assert!(!line.is_fillable());
        assert!(Shape::Polyline(Vec::new()).is_fillable());
    }
}
